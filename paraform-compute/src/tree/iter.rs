use paraform_parser::parser::ast::Node;
use super::NodeId;

/// An iterator that traverses a tree in preorder: each node, then its left subtree, then its
/// right subtree.
///
/// Each node is yielded alongside its [`NodeId`]. This iterator is created by
/// [`preorder`](super::preorder).
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
    next_id: usize,
}

impl<'a> Preorder<'a> {
    /// Creates a new iterator starting at the given root.
    pub fn new(root: &'a Node) -> Self {
        Self {
            stack: vec![root],
            next_id: 0,
        }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some((lhs, rhs)) = node.children() {
            self.stack.push(rhs);
            self.stack.push(lhs);
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;
        Some((id, node))
    }
}
