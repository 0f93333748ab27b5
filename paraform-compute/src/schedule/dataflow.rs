//! Greedy list scheduling of a task graph on a dataflow machine.
//!
//! The scheduler repeats two phases until every task has finished:
//!
//! 1. **Dispatch.** While a task is ready and a processor is free, the lowest-id ready task is
//!    placed on the processor that becomes available earliest. It starts no earlier than the
//!    current time, the processor's availability, and the finish of its dependencies; then it
//!    reads its operands through the memory bank that becomes free earliest, and computes.
//! 2. **Complete.** The running task with the earliest finish is retired: the clock moves to its
//!    finish time, its processor is returned, and any dependent whose dependencies are now all
//!    finished becomes ready.
//!
//! Every tie is broken by the lowest id or index, so the schedule is fully deterministic.

use log::{error, trace};
use paraform_parser::parser::ast::Op;
use std::{cmp::Reverse, collections::{BinaryHeap, HashMap}};
use crate::error::{kind, Error};
use super::{machine::Machine, queue::FreeQueue, task::Task};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The placement of one task in a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskRun {
    /// The id of the task.
    pub task_id: usize,

    /// The operator of the task.
    pub op: Op,

    /// The index of the processor running the task.
    pub processor: usize,

    /// The time the task starts computing, after its memory access.
    pub start: u64,

    /// The time the task finishes.
    pub finish: u64,
}

/// The result of scheduling a task list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    /// The finish time of the last task, or 0 if there are no tasks.
    pub makespan: u64,

    /// One run per task, sorted by start time, then processor, then task id.
    pub runs: Vec<TaskRun>,
}

/// The memory banks of the machine, by the time each becomes free.
#[derive(Debug)]
struct Banks {
    free_at: Vec<u64>,
    access_cost: u64,
}

impl Banks {
    fn new(machine: &Machine) -> Self {
        Self {
            free_at: vec![0; machine.memory_banks()],
            access_cost: machine.mem_cost(),
        }
    }

    /// Reserves the bank that is free earliest for one access starting no earlier than `ready`,
    /// and returns the time the access completes. Free accesses reserve nothing.
    ///
    /// Returns [`None`] if the completion time overflows.
    fn reserve(&mut self, ready: u64) -> Option<u64> {
        if self.access_cost == 0 {
            return Some(ready);
        }

        let mut best = 0;
        for (bank, &free_at) in self.free_at.iter().enumerate() {
            if free_at < self.free_at[best] {
                best = bank;
            }
        }

        let start = ready.max(self.free_at[best]);
        let end = start.checked_add(self.access_cost)?;
        self.free_at[best] = end;
        trace!("memory bank {} busy from {} to {}", best, start, end);
        Some(end)
    }
}

/// Schedules the tasks on the machine.
///
/// The tasks may come in any order, but ids must be unique and every dependency must name a task
/// in the list. Fails if the dependencies contain a cycle, or if a finish time does not fit in a
/// `u64`.
pub fn schedule(tasks: &[Task], machine: &Machine) -> Result<Schedule, Error> {
    let mut by_id = HashMap::with_capacity(tasks.len());
    for task in tasks {
        if by_id.insert(task.id, task).is_some() {
            return Err(Error::unspanned(kind::DuplicateTask { id: task.id }));
        }
    }

    let mut dependents = HashMap::<usize, Vec<usize>>::new();
    let mut waiting_on = HashMap::with_capacity(tasks.len());
    let mut ready = BinaryHeap::new();
    for task in tasks {
        for &dependency in &task.deps {
            if !by_id.contains_key(&dependency) {
                return Err(Error::unspanned(kind::UnknownDependency { task: task.id, dependency }));
            }
            dependents.entry(dependency).or_default().push(task.id);
        }

        if task.deps.is_empty() {
            ready.push(Reverse(task.id));
        } else {
            waiting_on.insert(task.id, task.deps.len());
        }
    }

    let mut processors = FreeQueue::all_free(machine.processors());
    let mut banks = Banks::new(machine);
    let mut running = BinaryHeap::new();
    let mut finished = HashMap::with_capacity(tasks.len());
    let mut runs = Vec::with_capacity(tasks.len());
    let mut clock = 0;

    while finished.len() < tasks.len() {
        while let Some(&Reverse(task_id)) = ready.peek() {
            let Some((free_at, processor)) = processors.pop() else {
                break;
            };
            ready.pop();
            let task = by_id[&task_id];

            let deps_done = task.deps.iter()
                .filter_map(|dependency| finished.get(dependency).copied())
                .max()
                .unwrap_or(0);
            let finish = banks.reserve(clock.max(free_at).max(deps_done))
                .and_then(|start| Some((start, start.checked_add(task.duration)?)));
            let Some((start, finish)) = finish else {
                return Err(Error::unspanned(kind::TimeOverflow { task: task_id }));
            };
            trace!("t{} ({}) on P{}: {} -> {}", task_id, task.op, processor, start, finish);

            runs.push(TaskRun { task_id, op: task.op, processor, start, finish });
            running.push(Reverse((finish, task_id, processor)));
        }

        let Some(Reverse((finish, task_id, processor))) = running.pop() else {
            let unfinished = tasks.len() - finished.len();
            error!("scheduler stalled at time {} with {} tasks unfinished", clock, unfinished);
            return Err(Error::unspanned(kind::DependencyCycle { unfinished }));
        };

        clock = clock.max(finish);
        finished.insert(task_id, finish);
        processors.push(clock, processor);
        trace!("t{} done at {}", task_id, clock);

        for &dependent in dependents.get(&task_id).into_iter().flatten() {
            if let Some(count) = waiting_on.get_mut(&dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }
    }

    let makespan = runs.iter().map(|run| run.finish).max().unwrap_or(0);
    runs.sort_by_key(|run| (run.start, run.processor, run.task_id));
    Ok(Schedule { makespan, runs })
}
