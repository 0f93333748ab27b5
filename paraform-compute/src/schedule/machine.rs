use crate::error::{kind, Error};

#[cfg(feature = "serde")]
use serde::Serialize;

/// The resources of the simulated machine.
///
/// Before it computes, every task reads its operands through one of the memory banks, which takes
/// `mem_cost` time units and blocks that bank for other tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Machine {
    processors: usize,
    memory_banks: usize,
    mem_cost: u64,
}

impl Machine {
    /// Creates a machine with the given resources.
    ///
    /// Fails if there are no processors or no memory banks, or if the memory access cost is
    /// negative.
    pub fn new(processors: i64, memory_banks: i64, mem_cost: i64) -> Result<Self, Error> {
        let processors = usize::try_from(processors)
            .ok()
            .filter(|&count| count > 0)
            .ok_or_else(|| Error::unspanned(kind::InvalidProcessorCount { given: processors }))?;
        let memory_banks = usize::try_from(memory_banks)
            .ok()
            .filter(|&count| count > 0)
            .ok_or_else(|| Error::unspanned(kind::InvalidMemoryBankCount { given: memory_banks }))?;
        let mem_cost = u64::try_from(mem_cost)
            .map_err(|_| Error::unspanned(kind::NegativeMemoryLatency { given: mem_cost }))?;

        Ok(Self { processors, memory_banks, mem_cost })
    }

    /// The number of processors, at least one.
    pub fn processors(&self) -> usize {
        self.processors
    }

    /// The number of memory banks, at least one.
    pub fn memory_banks(&self) -> usize {
        self.memory_banks
    }

    /// The time one memory access takes.
    pub fn mem_cost(&self) -> u64 {
        self.mem_cost
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn valid() {
        let machine = Machine::new(4, 2, 0).unwrap();
        assert_eq!((machine.processors(), machine.memory_banks(), machine.mem_cost()), (4, 2, 0));
    }

    #[test]
    fn no_processors() {
        let err = Machine::new(0, 1, 1).unwrap_err();
        assert_eq!(
            err.downcast_ref::<kind::InvalidProcessorCount>(),
            Some(&kind::InvalidProcessorCount { given: 0 }),
        );
        assert!(Machine::new(-3, 1, 1).unwrap_err().is::<kind::InvalidProcessorCount>());
    }

    #[test]
    fn no_memory_banks() {
        let err = Machine::new(2, 0, 1).unwrap_err();
        assert_eq!(err.to_string(), "invalid memory bank count: 0");
    }

    #[test]
    fn negative_latency() {
        let err = Machine::new(2, 1, -1).unwrap_err();
        assert_eq!(
            err.downcast_ref::<kind::NegativeMemoryLatency>(),
            Some(&kind::NegativeMemoryLatency { given: -1 }),
        );
    }

    #[test]
    fn processors_checked_first() {
        let err = Machine::new(0, 0, -1).unwrap_err();
        assert!(err.is::<kind::InvalidProcessorCount>());
    }
}
