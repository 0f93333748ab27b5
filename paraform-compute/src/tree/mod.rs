//! Structural operations on expression trees.
//!
//! Trees are immutable, so every operation here either inspects a tree or builds a new one. To
//! point at a node inside a tree, use its [`NodeId`], which is the node's position in the
//! [`preorder`] traversal of that tree.

pub mod iter;

use paraform_parser::parser::ast::{Node, Op};
use crate::error::{kind, Error};
pub use iter::Preorder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The position of a node in the preorder traversal of one particular tree.
///
/// The root is always `NodeId(0)`. An id is only meaningful for the tree it was taken from; two
/// nodes with identical contents at different positions have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub usize);

/// Returns an iterator over every node of the tree in preorder, with ids.
pub fn preorder(root: &Node) -> Preorder<'_> {
    Preorder::new(root)
}

/// Returns the number of nodes in the tree, leaves included.
pub fn size(node: &Node) -> usize {
    match node {
        Node::Leaf(_) => 1,
        Node::Binary { lhs, rhs, .. } => 1 + size(lhs) + size(rhs),
    }
}

/// Returns the number of edges on the longest path from the node to a leaf. A leaf has depth 0.
pub fn depth(node: &Node) -> usize {
    match node {
        Node::Leaf(_) => 0,
        Node::Binary { lhs, rhs, .. } => 1 + depth(lhs).max(depth(rhs)),
    }
}

/// Returns the number of internal nodes in the tree.
pub fn internal_count(node: &Node) -> usize {
    preorder(node).filter(|(_, node)| !node.is_leaf()).count()
}

/// Returns the number of leaves in the tree.
pub fn leaf_count(node: &Node) -> usize {
    preorder(node).filter(|(_, node)| node.is_leaf()).count()
}

/// Returns a copy of `root` where the node identified by `target` is swapped for `replacement`.
///
/// Only the nodes on the path from the root to the target are rebuilt; the rest is cloned as is.
/// If `target` does not exist in the tree, the copy is identical to `root`.
pub fn replace(root: &Node, target: NodeId, replacement: Node) -> Node {
    /// Rebuilds `node` if the target is inside it. `next` is the preorder id of `node` on entry,
    /// and is advanced past every node visited.
    fn replace_at(
        node: &Node,
        next: &mut usize,
        target: usize,
        replacement: &mut Option<Node>,
    ) -> Option<Node> {
        if *next == target {
            return replacement.take();
        }
        *next += 1;

        let Node::Binary { op, lhs, rhs } = node else {
            return None;
        };
        if let Some(lhs) = replace_at(lhs, next, target, replacement) {
            return Some(Node::binary(*op, lhs, (**rhs).clone()));
        }
        replace_at(rhs, next, target, replacement)
            .map(|rhs| Node::binary(*op, (**lhs).clone(), rhs))
    }

    let mut next = 0;
    replace_at(root, &mut next, target.0, &mut Some(replacement))
        .unwrap_or_else(|| root.clone())
}

/// Collects the operands of the maximal chain of `op` rooted at `node`, from left to right.
///
/// The chain continues through every descendant that is an internal node with the same operator,
/// on either side. A node that is not an `op` node is its own one-operand chain.
///
/// ```
/// use paraform_compute::tree::collect_chain;
/// use paraform_parser::parser::{ast::Op, parse_expression};
///
/// let tree = parse_expression("(a+b)+(c*d+e)").unwrap();
/// let operands = collect_chain(&tree, Op::Add)
///     .into_iter()
///     .map(|node| node.canonical())
///     .collect::<Vec<_>>();
/// assert_eq!(operands, ["a", "b", "(c*d)", "e"]);
/// ```
pub fn collect_chain(node: &Node, op: Op) -> Vec<&Node> {
    fn collect<'a>(node: &'a Node, op: Op, out: &mut Vec<&'a Node>) {
        match node {
            Node::Binary { op: node_op, lhs, rhs } if *node_op == op => {
                collect(lhs, op, out);
                collect(rhs, op, out);
            },
            _ => out.push(node),
        }
    }

    let mut out = Vec::new();
    collect(node, op, &mut out);
    out
}

/// Combines the operands with `op` into a tree of minimal height, returning [`None`] if there are
/// no operands.
///
/// Operands are paired left to right, level by level; an odd operand out at the end of a level is
/// carried up unchanged. Operand order is preserved.
pub fn balance(op: Op, mut level: Vec<Node>) -> Option<Node> {
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut operands = level.into_iter();
        while let Some(lhs) = operands.next() {
            match operands.next() {
                Some(rhs) => next.push(Node::binary(op, lhs, rhs)),
                None => next.push(lhs),
            }
        }
        level = next;
    }

    level.pop()
}

/// Combines the operands with `op` into a tree of minimal height. See [`balance`].
///
/// Returns an error if there are no operands.
pub fn build_balanced(op: Op, operands: Vec<Node>) -> Result<Node, Error> {
    balance(op, operands).ok_or_else(|| Error::unspanned(kind::EmptyChain { op }))
}
