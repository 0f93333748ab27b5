use std::{cmp::Reverse, collections::BinaryHeap};

/// A min-priority queue of interchangeable resources, keyed by the time each becomes available.
///
/// Resources available at the same time are popped lowest index first.
#[derive(Debug, Clone, Default)]
pub struct FreeQueue {
    heap: BinaryHeap<Reverse<(u64, usize)>>,
}

impl FreeQueue {
    /// Creates a queue of `count` resources, all available at time 0.
    pub fn all_free(count: usize) -> Self {
        Self {
            heap: (0..count).map(|index| Reverse((0, index))).collect(),
        }
    }

    /// Returns a resource to the queue, available from `available_at`.
    pub fn push(&mut self, available_at: u64, index: usize) {
        self.heap.push(Reverse((available_at, index)));
    }

    /// Takes the resource that becomes available first, as `(available_at, index)`.
    pub fn pop(&mut self) -> Option<(u64, usize)> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// Returns the resource that becomes available first without taking it.
    pub fn peek(&self) -> Option<(u64, usize)> {
        self.heap.peek().map(|Reverse(entry)| *entry)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
