//! Reshaping expression trees into parallel form.
//!
//! The parallel form of a tree is an equivalent tree of reduced height, which exposes more
//! operations that can run at the same time. It is computed in three passes over the whole tree,
//! in this order:
//!
//! 1. [`rewrite_division_chains`]: `a/b/c/d` becomes `a/((b*c)*d)`.
//! 2. [`rewrite_subtraction_chains`]: `a-b-c-d` becomes `a-((b+c)+d)`.
//! 3. [`flatten_associative`]: every maximal chain of `+` or `*` is rebuilt as a balanced tree.
//!
//! Operand order is preserved by every pass; no commutativity is assumed. Normalizing a tree that
//! is already in parallel form returns the same tree.

pub mod step;

use paraform_parser::parser::ast::{Node, Op};
use crate::{step_collector::StepCollector, tree::{balance, collect_chain}};
pub use step::Step;

/// Returns the parallel form of the tree.
///
/// ```
/// use paraform_compute::parallel::parallel_form;
/// use paraform_parser::parser::parse_expression;
///
/// let tree = parse_expression("a+b+c+d").unwrap();
/// assert_eq!(parallel_form(&tree).canonical(), "((a+b)+(c+d))");
/// ```
pub fn parallel_form(node: &Node) -> Node {
    parallel_form_with(node, &mut ())
}

/// Returns the parallel form of the tree, along with the rewrites that were applied.
pub fn parallel_form_with_steps(node: &Node) -> (Node, Vec<Step>) {
    let mut steps = Vec::new();
    let form = parallel_form_with(node, &mut steps);
    (form, steps)
}

/// Returns the parallel form of the tree, pushing every applied rewrite into the collector.
pub fn parallel_form_with(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Node {
    let node = rewrite_division_chains(node, step_collector);
    let node = rewrite_subtraction_chains(&node, step_collector);
    flatten_associative(&node, step_collector)
}

/// `a/b/c/d = a/((b*c)*d)`
///
/// Every left-nested chain of `/` is split into its numerator and its divisors; the divisors are
/// multiplied together in a balanced tree. A chain with a single divisor keeps its shape.
pub fn rewrite_division_chains(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Node {
    rewrite_inverse_chains(node, Op::Div, Op::Mul, Step::DivisionChain, step_collector)
}

/// `a-b-c-d = a-((b+c)+d)`
///
/// Every left-nested chain of `-` is split into its minuend and its subtrahends; the subtrahends
/// are added together in a balanced tree. A chain with a single subtrahend keeps its shape.
pub fn rewrite_subtraction_chains(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Node {
    rewrite_inverse_chains(node, Op::Sub, Op::Add, Step::SubtractionChain, step_collector)
}

/// Rewrites `x op y1 op y2 ... op yn` into `x op (y1 combine y2 ... combine yn)`.
fn rewrite_inverse_chains(
    node: &Node,
    op: Op,
    combine: Op,
    step: Step,
    step_collector: &mut dyn StepCollector<Step>,
) -> Node {
    let Node::Binary { op: node_op, lhs, rhs } = node else {
        return node.clone();
    };

    if *node_op != op {
        return Node::binary(
            *node_op,
            rewrite_inverse_chains(lhs, op, combine, step, step_collector),
            rewrite_inverse_chains(rhs, op, combine, step, step_collector),
        );
    }

    // peel the chain down its left spine; the right operands are collected innermost last
    let mut operands = Vec::new();
    let mut head = node;
    while let Node::Binary { op: head_op, lhs, rhs } = head {
        if *head_op != op {
            break;
        }
        operands.push(&**rhs);
        head = &**lhs;
    }
    operands.reverse();

    let head = rewrite_inverse_chains(head, op, combine, step, step_collector);
    let operands = operands.into_iter()
        .map(|operand| rewrite_inverse_chains(operand, op, combine, step, step_collector))
        .collect::<Vec<_>>();
    if operands.len() > 1 {
        step_collector.push(step);
    }

    match balance(combine, operands) {
        Some(rhs) => Node::binary(op, head, rhs),
        None => head,
    }
}

/// `((a+b)+c)+d = (a+b)+(c+d)`
///
/// Every maximal chain of an associative operator is rebuilt as a balanced tree over the same
/// operands, in the same order. Operands are flattened first.
pub fn flatten_associative(node: &Node, step_collector: &mut dyn StepCollector<Step>) -> Node {
    match node {
        Node::Leaf(_) => node.clone(),
        Node::Binary { op, .. } if op.is_associative() => {
            let operands = collect_chain(node, *op)
                .into_iter()
                .map(|operand| flatten_associative(operand, step_collector))
                .collect::<Vec<_>>();
            if operands.len() > 2 {
                step_collector.push(Step::Rebalance);
            }

            balance(*op, operands).unwrap_or_else(|| node.clone())
        },
        Node::Binary { op, lhs, rhs } => Node::binary(
            *op,
            flatten_associative(lhs, step_collector),
            flatten_associative(rhs, step_collector),
        ),
    }
}
