//! Regrouping with the associative property.

use paraform_parser::parser::ast::{Node, Op};
use crate::tree::{collect_chain, preorder, replace};
use super::Discovered;

/// Returns the binary trees that join the operands with `op`, keeping their order.
///
/// There are `C(n - 1)` such trees for `n` operands, where `C` is the Catalan sequence. They are
/// produced by the position of the root split, leftmost first, and within each split by the left
/// subtree, then the right subtree. At most `limit` trees are returned.
///
/// ```
/// use paraform_compute::equiv::parenthesizations;
/// use paraform_parser::parser::ast::{Node, Op};
///
/// let operands = [Node::leaf("a"), Node::leaf("b"), Node::leaf("c")];
/// let trees = parenthesizations(Op::Mul, &operands.iter().collect::<Vec<_>>(), usize::MAX)
///     .into_iter()
///     .map(|tree| tree.canonical())
///     .collect::<Vec<_>>();
/// assert_eq!(trees, ["(a*(b*c))", "((a*b)*c)"]);
/// ```
pub fn parenthesizations(op: Op, operands: &[&Node], limit: usize) -> Vec<Node> {
    if let [operand] = operands {
        return vec![(*operand).clone()];
    }

    let mut trees = Vec::new();
    for split in 1..operands.len() {
        let lefts = parenthesizations(op, &operands[..split], limit);
        let rights = parenthesizations(op, &operands[split..], limit);
        for lhs in &lefts {
            for rhs in &rights {
                if trees.len() >= limit {
                    return trees;
                }
                trees.push(Node::binary(op, lhs.clone(), rhs.clone()));
            }
        }
    }

    trees
}

/// Returns the forms reachable from `root` by regrouping chains of `+` and `*`, starting with
/// `root` itself.
///
/// Each form in the queue is expanded by visiting its nodes in preorder; every `+` or `*` node
/// whose chain has three or more operands is replaced by each parenthesization of that chain in
/// turn. At most `max_results` forms are returned.
pub fn assoc_generate(root: &Node, max_results: usize) -> Vec<Node> {
    let mut discovered = Discovered::new(root, max_results);

    while let Some((current, _)) = discovered.pop() {
        'nodes: for (id, node) in preorder(&current) {
            let Some(op) = node.op().filter(|op| op.is_associative()) else {
                continue;
            };

            let operands = collect_chain(node, op);
            if operands.len() <= 2 {
                continue;
            }

            for variant in parenthesizations(op, &operands, usize::MAX) {
                discovered.push(replace(&current, id, variant), 0);
                if discovered.is_full() {
                    break 'nodes;
                }
            }
        }
    }

    discovered.into_forms("associativity")
}

#[cfg(test)]
mod tests {
    use paraform_parser::parser::parse_expression;
    use pretty_assertions::assert_eq;
    use crate::parallel::parallel_form;
    use super::*;

    fn render(forms: &[Node]) -> Vec<String> {
        forms.iter().map(Node::canonical).collect()
    }

    fn leaves(count: usize) -> Vec<Node> {
        (0..count).map(|i| Node::leaf(format!("x{}", i))).collect()
    }

    #[test]
    fn catalan_counts() {
        for (count, expected) in [(1, 1), (2, 1), (3, 2), (4, 5), (5, 14), (6, 42)] {
            let operands = leaves(count);
            let refs = operands.iter().collect::<Vec<_>>();
            assert_eq!(parenthesizations(Op::Add, &refs, usize::MAX).len(), expected);
        }
    }

    #[test]
    fn parenthesization_limit() {
        let operands = leaves(6);
        let refs = operands.iter().collect::<Vec<_>>();
        assert_eq!(parenthesizations(Op::Add, &refs, 10).len(), 10);
        assert_eq!(parenthesizations(Op::Add, &refs, 0).len(), 0);
    }

    #[test]
    fn no_operands() {
        assert!(parenthesizations(Op::Add, &[], usize::MAX).is_empty());
    }

    #[test]
    fn four_operand_forms() {
        let base = parallel_form(&parse_expression("A+B+C+D").unwrap());
        assert_eq!(render(&assoc_generate(&base, 100)), vec![
            "((A+B)+(C+D))",
            "(A+(B+(C+D)))",
            "(A+((B+C)+D))",
            "((A+(B+C))+D)",
            "(((A+B)+C)+D)",
        ]);
    }

    #[test]
    fn forms_are_distinct() {
        let base = parse_expression("A*B*C*D*E").unwrap();
        let forms = render(&assoc_generate(&base, 100));
        assert_eq!(forms.len(), 14);
        let mut unique = forms.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), forms.len());
    }

    #[test]
    fn cap_is_respected() {
        let base = parse_expression("A+B+C+D+E").unwrap();
        let forms = assoc_generate(&base, 7);
        assert_eq!(forms.len(), 7);
        assert_eq!(forms[0], base);
    }

    #[test]
    fn zero_cap() {
        let base = parse_expression("A+B+C").unwrap();
        assert!(assoc_generate(&base, 0).is_empty());
    }

    #[test]
    fn nothing_to_regroup() {
        let base = parse_expression("(A+B)*(C-D)").unwrap();
        assert_eq!(assoc_generate(&base, 10), vec![base]);
    }

    #[test]
    fn nested_chains() {
        // the outer chain has two operands, but each inner product can be regrouped
        let base = parse_expression("A*B*C+D*E*F").unwrap();
        let forms = render(&assoc_generate(&base, 100));
        assert_eq!(forms.len(), 4);
        assert_eq!(forms[0], "(((A*B)*C)+((D*E)*F))");
        assert!(forms.contains(&"((A*(B*C))+(D*(E*F)))".to_string()));
    }
}
