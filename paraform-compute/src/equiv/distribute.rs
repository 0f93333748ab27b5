//! Rewrites with the distributive property of `*` over `+`.
//!
//! Each rule looks at a single node and returns the rewritten node if the rule applies. Factoring
//! requires the shared factor to be identical on both sides, compared by canonical rendering.

use paraform_parser::parser::ast::{Node, Op};
use crate::tree::{preorder, replace};
use super::Discovered;

/// Returns the children of the node if it is an internal node with the given operator.
fn operands_of(node: &Node, op: Op) -> Option<(&Node, &Node)> {
    node.children().filter(|_| node.is_op(op))
}

fn mul(lhs: &Node, rhs: &Node) -> Node {
    Node::binary(Op::Mul, lhs.clone(), rhs.clone())
}

fn add(lhs: &Node, rhs: &Node) -> Node {
    Node::binary(Op::Add, lhs.clone(), rhs.clone())
}

/// `a*(b+c) = a*b + a*c`
pub fn distribute_right(node: &Node) -> Option<Node> {
    let (a, sum) = operands_of(node, Op::Mul)?;
    let (b, c) = operands_of(sum, Op::Add)?;
    Some(Node::binary(Op::Add, mul(a, b), mul(a, c)))
}

/// `(a+b)*c = a*c + b*c`
pub fn distribute_left(node: &Node) -> Option<Node> {
    let (sum, c) = operands_of(node, Op::Mul)?;
    let (a, b) = operands_of(sum, Op::Add)?;
    Some(Node::binary(Op::Add, mul(a, c), mul(b, c)))
}

/// `x*y + x*v = x*(y+v)`
pub fn factor_left(node: &Node) -> Option<Node> {
    let (lhs, rhs) = operands_of(node, Op::Add)?;
    let (x, y) = operands_of(lhs, Op::Mul)?;
    let (u, v) = operands_of(rhs, Op::Mul)?;
    (x.canonical() == u.canonical()).then(|| mul(x, &add(y, v)))
}

/// `x*y + u*y = (x+u)*y`
pub fn factor_right(node: &Node) -> Option<Node> {
    let (lhs, rhs) = operands_of(node, Op::Add)?;
    let (x, y) = operands_of(lhs, Op::Mul)?;
    let (u, v) = operands_of(rhs, Op::Mul)?;
    (y.canonical() == v.canonical()).then(|| mul(&add(x, u), y))
}

/// Returns every single-step distributive rewrite of the node itself (not its descendants).
///
/// Rules are tried in a fixed order: [`distribute_right`], [`distribute_left`], [`factor_left`],
/// [`factor_right`].
pub fn dist_rewrites(node: &Node) -> Vec<Node> {
    [distribute_right, distribute_left, factor_left, factor_right]
        .into_iter()
        .filter_map(|rule| rule(node))
        .collect()
}

/// Returns the forms reachable from `root` within `max_depth` distributive rewrites, starting
/// with `root` itself.
///
/// Each form in the queue that is fewer than `max_depth` rewrites away from `root` is expanded by
/// visiting its nodes in preorder and applying [`dist_rewrites`] at each one. At most
/// `max_results` forms are returned.
pub fn dist_generate(root: &Node, max_results: usize, max_depth: usize) -> Vec<Node> {
    let mut discovered = Discovered::new(root, max_results);

    while let Some((current, depth)) = discovered.pop() {
        if depth >= max_depth {
            continue;
        }

        'nodes: for (id, node) in preorder(&current) {
            for rewrite in dist_rewrites(node) {
                discovered.push(replace(&current, id, rewrite), depth + 1);
                if discovered.is_full() {
                    break 'nodes;
                }
            }
        }
    }

    discovered.into_forms("distributivity")
}

#[cfg(test)]
mod tests {
    use paraform_parser::parser::parse_expression;
    use pretty_assertions::assert_eq;
    use super::*;

    fn node(source: &str) -> Node {
        parse_expression(source).unwrap()
    }

    fn render(forms: &[Node]) -> Vec<String> {
        forms.iter().map(Node::canonical).collect()
    }

    #[test]
    fn distribute_both_sides() {
        assert_eq!(distribute_right(&node("a*(b+c)")), Some(node("a*b+a*c")));
        assert_eq!(distribute_left(&node("(a+b)*c")), Some(node("a*c+b*c")));
        assert_eq!(distribute_right(&node("(a+b)*c")), None);
        assert_eq!(distribute_left(&node("a*(b+c)")), None);
    }

    #[test]
    fn factor_shared_operand() {
        assert_eq!(factor_left(&node("x*y+x*v")), Some(node("x*(y+v)")));
        assert_eq!(factor_right(&node("x*y+u*y")), Some(node("(x+u)*y")));
        assert_eq!(factor_left(&node("x*y+u*v")), None);
    }

    #[test]
    fn factor_compares_whole_subtrees() {
        assert_eq!(factor_left(&node("(a+b)*y+(a+b)*v")), Some(node("(a+b)*(y+v)")));
        assert_eq!(factor_left(&node("(a+b)*y+(b+a)*v")), None);
    }

    #[test]
    fn rewrite_order() {
        // both operands are sums, so both distributions apply
        assert_eq!(render(&dist_rewrites(&node("(a+b)*(c+d)"))), vec![
            "(((a+b)*c)+((a+b)*d))",
            "((a*(c+d))+(b*(c+d)))",
        ]);

        // both factorings apply
        assert_eq!(render(&dist_rewrites(&node("x*y+x*y"))), vec![
            "(x*(y+y))",
            "((x+x)*y)",
        ]);
    }

    #[test]
    fn no_rewrites() {
        assert!(dist_rewrites(&node("a")).is_empty());
        assert!(dist_rewrites(&node("a-b*c")).is_empty());
    }

    #[test]
    fn generate_single_product() {
        let forms = dist_generate(&node("A*(B+C)"), 100, 3);
        assert_eq!(render(&forms), vec!["(A*(B+C))", "((A*B)+(A*C))"]);
    }

    #[test]
    fn depth_zero_is_base_only() {
        let base = node("A*(B+C)");
        let forms = dist_generate(&base, 100, 0);
        assert_eq!(forms, vec![base]);
    }

    #[test]
    fn cap_is_respected() {
        let base = node("(A+B)*(C+D)*(E+F)");
        let forms = dist_generate(&base, 5, 4);
        assert_eq!(forms.len(), 5);
        assert_eq!(forms[0], base);
    }
}
