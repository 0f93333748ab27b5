use crate::{error::Error, schedule::{CostTable, Machine}};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Configuration shared by both search strategies.
///
/// The defaults describe a two-processor dataflow machine with one memory bank and unit memory
/// latency, using [`CostTable::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SearchOptions {
    /// The duration of each operator.
    pub costs: CostTable,

    /// The number of processors. Validated by [`SearchOptions::machine`].
    pub processors: i64,

    /// The number of memory banks. Validated by [`SearchOptions::machine`].
    pub memory_banks: i64,

    /// The latency of one memory access. Validated by [`SearchOptions::machine`].
    pub mem_cost: i64,

    /// The maximum number of forms produced by regrouping.
    pub assoc_limit: usize,

    /// The maximum number of forms produced by distributive rewriting.
    pub dist_limit: usize,

    /// The maximum number of distributive rewrites applied to the base tree.
    pub dist_depth: usize,

    /// The number of candidates kept between rounds of the beam search.
    pub beam_width: usize,

    /// The number of rounds of the beam search.
    pub rounds: usize,

    /// The maximum number of regrouping neighbors generated per candidate.
    pub neighbors_assoc: usize,

    /// The maximum number of distributive neighbors generated per candidate.
    pub neighbors_dist: usize,

    /// The number of candidates the beam search returns.
    pub top_k: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            costs: CostTable::default(),
            processors: 2,
            memory_banks: 1,
            mem_cost: 1,
            assoc_limit: 60,
            dist_limit: 60,
            dist_depth: 4,
            beam_width: 8,
            rounds: 6,
            neighbors_assoc: 6,
            neighbors_dist: 6,
            top_k: 15,
        }
    }
}

impl SearchOptions {
    /// Creates a new builder for search options.
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }

    /// Returns the machine described by these options, or an error if the resources are invalid.
    pub fn machine(&self) -> Result<Machine, Error> {
        Machine::new(self.processors, self.memory_banks, self.mem_cost)
    }
}

/// Builder for [`SearchOptions`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptionsBuilder {
    options: SearchOptions,
}

impl SearchOptionsBuilder {
    /// Set the operator costs.
    pub fn costs(mut self, costs: CostTable) -> Self {
        self.options.costs = costs;
        self
    }

    /// Set the number of processors.
    pub fn processors(mut self, processors: i64) -> Self {
        self.options.processors = processors;
        self
    }

    /// Set the number of memory banks.
    pub fn memory_banks(mut self, memory_banks: i64) -> Self {
        self.options.memory_banks = memory_banks;
        self
    }

    /// Set the latency of one memory access.
    pub fn mem_cost(mut self, mem_cost: i64) -> Self {
        self.options.mem_cost = mem_cost;
        self
    }

    /// Set the cap on regrouped forms.
    pub fn assoc_limit(mut self, assoc_limit: usize) -> Self {
        self.options.assoc_limit = assoc_limit;
        self
    }

    /// Set the cap on distributed forms, and how many rewrites away from the base they may be.
    pub fn dist_limit(mut self, dist_limit: usize, dist_depth: usize) -> Self {
        self.options.dist_limit = dist_limit;
        self.options.dist_depth = dist_depth;
        self
    }

    /// Set the beam width.
    pub fn beam_width(mut self, beam_width: usize) -> Self {
        self.options.beam_width = beam_width;
        self
    }

    /// Set the number of beam search rounds.
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.options.rounds = rounds;
        self
    }

    /// Set the caps on neighbors generated per candidate, by regrouping and by distribution.
    pub fn neighbors(mut self, assoc: usize, dist: usize) -> Self {
        self.options.neighbors_assoc = assoc;
        self.options.neighbors_dist = dist;
        self
    }

    /// Set the number of candidates the beam search returns.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.options.top_k = top_k;
        self
    }

    /// Build the search options.
    pub fn build(self) -> SearchOptions {
        self.options
    }
}
