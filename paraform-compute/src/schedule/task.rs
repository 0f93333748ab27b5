use paraform_parser::parser::ast::{Node, Op};
use std::collections::BTreeMap;
use crate::error::{kind, Error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The duration of each operator, in abstract time units.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CostTable(BTreeMap<Op, u64>);

impl Default for CostTable {
    /// `+` and `-` take one unit, `*` and `/` take two.
    fn default() -> Self {
        Self::empty()
            .with(Op::Add, 1)
            .with(Op::Sub, 1)
            .with(Op::Mul, 2)
            .with(Op::Div, 2)
    }
}

impl CostTable {
    /// Creates a table with no costs.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets the cost of the operator.
    pub fn with(mut self, op: Op, cost: u64) -> Self {
        self.set(op, cost);
        self
    }

    /// Sets the cost of the operator.
    pub fn set(&mut self, op: Op, cost: u64) {
        self.0.insert(op, cost);
    }

    /// Returns the cost of the operator, if configured.
    pub fn get(&self, op: Op) -> Option<u64> {
        self.0.get(&op).copied()
    }

    /// Returns the cost of the operator, or an error if it is not configured.
    pub fn require(&self, op: Op) -> Result<u64, Error> {
        self.get(op).ok_or_else(|| Error::unspanned(kind::MissingOperatorCost { op }))
    }

    /// Returns the configured operators and their costs, in the order `+ - * /`.
    pub fn iter(&self) -> impl Iterator<Item = (Op, u64)> + '_ {
        self.0.iter().map(|(op, cost)| (*op, *cost))
    }
}

impl FromIterator<(Op, u64)> for CostTable {
    fn from_iter<T: IntoIterator<Item = (Op, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One operation of a tree, to be run by a processor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    /// The id of the task, starting at 1.
    pub id: usize,

    /// The operator the task applies.
    pub op: Op,

    /// How long the task occupies its processor, excluding memory access.
    pub duration: u64,

    /// The ids of the tasks computing this task's operands, ascending. Leaf operands have no task.
    pub deps: Vec<usize>,
}

/// The tasks of a tree, in postorder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskGraph {
    /// Every task. A task always appears after the tasks it depends on.
    pub tasks: Vec<Task>,

    /// The id of the task computing the whole tree, or 0 if the tree is a single leaf.
    pub root: usize,
}

impl TaskGraph {
    /// Builds one task per internal node of the tree.
    ///
    /// Tasks are numbered from 1 in postorder (left subtree, right subtree, node), so the root
    /// task has the highest id. Fails if an operator in the tree has no cost.
    pub fn build(root: &Node, costs: &CostTable) -> Result<Self, Error> {
        fn visit(node: &Node, costs: &CostTable, tasks: &mut Vec<Task>) -> Result<Option<usize>, Error> {
            let Node::Binary { op, lhs, rhs } = node else {
                return Ok(None);
            };

            let lhs = visit(lhs, costs, tasks)?;
            let rhs = visit(rhs, costs, tasks)?;
            let duration = costs.require(*op)?;

            let mut deps = lhs.into_iter().chain(rhs).collect::<Vec<_>>();
            deps.sort_unstable();

            let id = tasks.len() + 1;
            tasks.push(Task { id, op: *op, duration, deps });
            Ok(Some(id))
        }

        let mut tasks = Vec::new();
        let root = visit(root, costs, &mut tasks)?.unwrap_or(0);
        Ok(Self { tasks, root })
    }

    /// Returns the time to run every task one after the other on a single processor.
    pub fn sequential_time(&self) -> Result<u64, Error> {
        sequential_time(&self.tasks)
    }
}

/// Builds the task graph of the tree. See [`TaskGraph::build`].
pub fn build_tasks(root: &Node, costs: &CostTable) -> Result<TaskGraph, Error> {
    TaskGraph::build(root, costs)
}

/// Returns the sum of the task durations, the sequential time `T1`.
///
/// Fails if the sum does not fit in a `u64`.
pub fn sequential_time(tasks: &[Task]) -> Result<u64, Error> {
    tasks.iter().try_fold(0u64, |total, task| {
        total.checked_add(task.duration)
            .ok_or_else(|| Error::unspanned(kind::TimeOverflow { task: task.id }))
    })
}
