//! Searching the equivalent forms of a tree for the one that runs fastest.
//!
//! Every form is scored by building its task graph and scheduling it on the configured
//! [`Machine`]. Forms are compared by [`rank`]: shortest makespan first, then highest efficiency,
//! then fewest tasks. Two strategies share this scoring:
//!
//! - [`exhaustive`] scores every form produced by the generators in [`equiv`](crate::equiv).
//! - [`beam_search`] walks outward from the base tree, keeping only the best few neighbors of
//!   each round.

pub mod beam;
pub mod options;

use log::debug;
use paraform_parser::parser::ast::Node;
use std::{cmp::Ordering, collections::HashSet};
use crate::{
    equiv::{assoc_generate, dist_generate},
    error::Error,
    schedule::{build_tasks, schedule, CostTable, Machine, Schedule, TaskGraph},
};

pub use beam::{beam_search, neighbors};
pub use options::{SearchOptions, SearchOptionsBuilder};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How well a form runs on a machine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metrics {
    /// The finish time of the schedule, `Tp`.
    pub makespan: u64,

    /// The time to run every task on one processor, `T1`.
    pub sequential: u64,

    /// `T1 / Tp`, or 0 if the makespan is 0.
    pub speedup: f64,

    /// The speedup divided by the number of processors.
    pub efficiency: f64,

    /// The number of tasks.
    pub tasks: usize,
}

impl Metrics {
    /// Computes the metrics of a schedule of the given task graph.
    pub fn new(graph: &TaskGraph, schedule: &Schedule, machine: &Machine) -> Result<Self, Error> {
        let sequential = graph.sequential_time()?;
        let speedup = if schedule.makespan == 0 {
            0.0
        } else {
            sequential as f64 / schedule.makespan as f64
        };

        Ok(Self {
            makespan: schedule.makespan,
            sequential,
            speedup,
            efficiency: speedup / machine.processors() as f64,
            tasks: graph.tasks.len(),
        })
    }
}

/// Builds the task graph of the form, schedules it, and returns the graph, schedule, and metrics.
pub fn analyze(
    form: &Node,
    costs: &CostTable,
    machine: &Machine,
) -> Result<(TaskGraph, Schedule, Metrics), Error> {
    let graph = build_tasks(form, costs)?;
    let schedule = schedule(&graph.tasks, machine)?;
    let metrics = Metrics::new(&graph, &schedule, machine)?;
    Ok((graph, schedule, metrics))
}

/// Returns the metrics of the form on the machine.
pub fn evaluate(form: &Node, costs: &CostTable, machine: &Machine) -> Result<Metrics, Error> {
    analyze(form, costs, machine).map(|(_, _, metrics)| metrics)
}

/// Orders metrics from best to worst: shortest makespan, then highest efficiency, then fewest
/// tasks.
pub fn rank(a: &Metrics, b: &Metrics) -> Ordering {
    a.makespan.cmp(&b.makespan)
        .then_with(|| b.efficiency.total_cmp(&a.efficiency))
        .then_with(|| a.tasks.cmp(&b.tasks))
}

/// A scored form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    /// The position of the form in the order it was discovered, starting at 1.
    pub index: usize,

    /// The form itself.
    pub form: Node,

    /// The canonical rendering of the form.
    pub rendering: String,

    /// The metrics of the form.
    pub metrics: Metrics,
}

impl Candidate {
    /// Scores the form.
    pub fn evaluate(index: usize, form: Node, costs: &CostTable, machine: &Machine) -> Result<Self, Error> {
        let metrics = evaluate(&form, costs, machine)?;
        Ok(Self {
            index,
            rendering: form.canonical(),
            form,
            metrics,
        })
    }
}

/// Sorts the candidates from best to worst with [`rank`]. Equal candidates keep their order.
pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| rank(&a.metrics, &b.metrics));
}

/// Every candidate of an exhaustive search, best first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ranking {
    /// The candidates, sorted with [`rank`]. Never empty.
    pub candidates: Vec<Candidate>,
}

impl Ranking {
    /// Returns the best candidate.
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }
}

/// Returns the base tree followed by every distinct form found by the associativity and
/// distributivity generators, in that order.
pub fn candidate_forms(base: &Node, options: &SearchOptions) -> Vec<Node> {
    let mut seen = HashSet::new();
    std::iter::once(base.clone())
        .chain(assoc_generate(base, options.assoc_limit))
        .chain(dist_generate(base, options.dist_limit, options.dist_depth))
        .filter(|form| seen.insert(form.canonical()))
        .collect()
}

/// Scores every form from [`candidate_forms`] and ranks them.
pub fn exhaustive(base: &Node, options: &SearchOptions) -> Result<Ranking, Error> {
    let machine = options.machine()?;
    let mut candidates = candidate_forms(base, options)
        .into_iter()
        .enumerate()
        .map(|(i, form)| Candidate::evaluate(i + 1, form, &options.costs, &machine))
        .collect::<Result<Vec<_>, _>>()?;
    sort_candidates(&mut candidates);

    if let Some(best) = candidates.first() {
        debug!(
            "exhaustive search scored {} forms; best is #{} with makespan {}",
            candidates.len(),
            best.index,
            best.metrics.makespan,
        );
    }
    Ok(Ranking { candidates })
}

#[cfg(test)]
mod tests {
    use paraform_parser::parser::{ast::Op, parse_expression};
    use pretty_assertions::assert_eq;
    use super::*;

    fn metrics(makespan: u64, efficiency: f64, tasks: usize) -> Metrics {
        Metrics { makespan, sequential: 0, speedup: 0.0, efficiency, tasks }
    }

    #[test]
    fn rank_order() {
        assert_eq!(rank(&metrics(3, 0.1, 9), &metrics(4, 0.9, 1)), Ordering::Less);
        assert_eq!(rank(&metrics(4, 0.9, 9), &metrics(4, 0.5, 1)), Ordering::Less);
        assert_eq!(rank(&metrics(4, 0.5, 2), &metrics(4, 0.5, 3)), Ordering::Less);
        assert_eq!(rank(&metrics(4, 0.5, 3), &metrics(4, 0.5, 3)), Ordering::Equal);
    }

    #[test]
    fn evaluate_sum() {
        let machine = Machine::new(2, 1, 1).unwrap();
        let form = parse_expression("(a+b)+(c+d)").unwrap();
        let metrics = evaluate(&form, &CostTable::default(), &machine).unwrap();

        // two memory accesses serialize the leaf sums, then the root waits for both
        assert_eq!(metrics.makespan, 5);
        assert_eq!(metrics.sequential, 3);
        assert_eq!(metrics.tasks, 3);
        assert_eq!(metrics.speedup, 0.6);
        assert_eq!(metrics.efficiency, 0.3);
    }

    #[test]
    fn evaluate_leaf() {
        let machine = Machine::new(3, 1, 1).unwrap();
        let metrics = evaluate(&Node::leaf("x"), &CostTable::default(), &machine).unwrap();
        assert_eq!(metrics, Metrics { makespan: 0, sequential: 0, speedup: 0.0, efficiency: 0.0, tasks: 0 });
    }

    #[test]
    fn evaluate_huge_cost() {
        let machine = Machine::new(1, 1, 1).unwrap();
        let costs = CostTable::default().with(Op::Add, u64::MAX);
        let form = parse_expression("a+b").unwrap();
        let err = evaluate(&form, &costs, &machine).unwrap_err();
        assert!(err.is::<crate::error::kind::TimeOverflow>());
    }

    #[test]
    fn candidates_are_deduplicated() {
        let base = parse_expression("a*(b+c)").unwrap();
        let forms = candidate_forms(&base, &SearchOptions::default())
            .iter()
            .map(Node::canonical)
            .collect::<Vec<_>>();
        assert_eq!(forms, vec!["(a*(b+c))", "((a*b)+(a*c))"]);
    }

    #[test]
    fn exhaustive_picks_shorter_form() {
        // with free memory, the balanced form finishes a level earlier
        let base = parse_expression("((a+b)+c)+d").unwrap();
        let options = SearchOptions::builder().mem_cost(0).build();
        let ranking = exhaustive(&base, &options).unwrap();
        let best = ranking.best().unwrap();
        assert_eq!(best.rendering, "((a+b)+(c+d))");
        assert_eq!(best.metrics.makespan, 2);
        assert_eq!(ranking.candidates.len(), 5);
    }

    #[test]
    fn exhaustive_rejects_bad_machine() {
        let base = parse_expression("a+b").unwrap();
        let options = SearchOptions::builder().processors(0).build();
        assert!(exhaustive(&base, &options).is_err());
    }
}
