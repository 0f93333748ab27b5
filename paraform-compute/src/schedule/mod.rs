//! Turning trees into task graphs, and scheduling them on a machine with limited processors and
//! memory banks.

pub mod dataflow;
pub mod machine;
pub mod queue;
pub mod task;

pub use dataflow::{schedule, Schedule, TaskRun};
pub use machine::Machine;
pub use queue::FreeQueue;
pub use task::{build_tasks, sequential_time, CostTable, Task, TaskGraph};
