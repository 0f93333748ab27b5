use ariadne::Fmt;
use paraform_attrs::ErrorKind;
use paraform_error::EXPR;
use paraform_parser::parser::ast::Op;

/// The machine was configured with fewer than one processor.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid processor count: {}", given),
    help = format!("the machine needs at least {} processor", "one".fg(EXPR)),
)]
pub struct InvalidProcessorCount {
    /// The processor count that was given.
    pub given: i64,
}

/// The machine was configured with fewer than one memory bank.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid memory bank count: {}", given),
    help = format!("the machine needs at least {} memory bank", "one".fg(EXPR)),
)]
pub struct InvalidMemoryBankCount {
    /// The memory bank count that was given.
    pub given: i64,
}

/// The memory access latency was negative.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid memory access cost: {}", given),
    help = "use `0` to model a machine without memory contention",
)]
pub struct NegativeMemoryLatency {
    /// The latency that was given.
    pub given: i64,
}

/// The cost table has no duration for an operator that appears in the tree.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("no cost is configured for the `{}` operator", op),
    help = format!("add a duration for `{}` to the cost table", op.fg(EXPR)),
)]
pub struct MissingOperatorCost {
    /// The operator without a cost.
    pub op: Op,
}

/// An empty list of operands was given where at least one is required.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot combine an empty list of operands with `{}`", op),
)]
pub struct EmptyChain {
    /// The operator that would have joined the operands.
    pub op: Op,
}

/// Two tasks in the same task list share an id.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("task {} appears more than once in the task list", id),
)]
pub struct DuplicateTask {
    /// The repeated id.
    pub id: usize,
}

/// A task depends on a task that is not in the task list.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("task {} depends on task {}, which does not exist", task, dependency),
)]
pub struct UnknownDependency {
    /// The task with the dangling dependency.
    pub task: usize,

    /// The id that could not be found.
    pub dependency: usize,
}

/// The scheduler stopped making progress because some tasks wait on each other.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{} tasks could never start", unfinished),
    note = "the task dependencies contain a cycle",
)]
pub struct DependencyCycle {
    /// The number of tasks that never ran.
    pub unfinished: usize,
}

/// A time in the schedule is too large to represent.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the time at which task {} finishes is too large to represent", task),
    help = format!("lower the operator costs or the {}", "memory access cost".fg(EXPR)),
)]
pub struct TimeOverflow {
    /// The task whose finish time overflowed.
    pub task: usize,
}
