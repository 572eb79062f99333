//! Min-heap of in-flight flows ordered by completion tick.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Snapshot of an in-flight flow, fixed at admission.
///
/// Ordered by completion tick; the remaining fields only make the order
/// total so that equal-tick pops are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Completion {
    /// Tick at which the flow releases its bandwidth.
    pub completion_time: i64,
    /// Flow position in the run.
    pub flow: usize,
    /// Port position in the run.
    pub port: usize,
    /// Bandwidth to release.
    pub bandwidth: u64,
}

/// Completion heap.
#[derive(Debug, Clone, Default)]
pub struct CompletionHeap {
    heap: BinaryHeap<Reverse<Completion>>,
}

impl CompletionHeap {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an in-flight flow.
    pub fn push(&mut self, completion: Completion) {
        self.heap.push(Reverse(completion));
    }

    /// Earliest completion, if any.
    pub fn peek_min(&self) -> Option<&Completion> {
        self.heap.peek().map(|Reverse(c)| c)
    }

    /// Removes and returns the earliest completion.
    pub fn pop_min(&mut self) -> Option<Completion> {
        self.heap.pop().map(|Reverse(c)| c)
    }

    /// Pops the earliest completion if it is due at or before `time`.
    pub fn pop_due(&mut self, time: i64) -> Option<Completion> {
        match self.peek_min() {
            Some(c) if c.completion_time <= time => self.pop_min(),
            _ => None,
        }
    }

    /// Tick of the earliest completion.
    pub fn next_completion_time(&self) -> Option<i64> {
        self.peek_min().map(|c| c.completion_time)
    }

    /// Number of in-flight flows.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(completion_time: i64, flow: usize) -> Completion {
        Completion {
            completion_time,
            flow,
            port: 0,
            bandwidth: 1,
        }
    }

    #[test]
    fn test_pops_in_completion_order() {
        let mut h = CompletionHeap::new();
        h.push(c(7, 0));
        h.push(c(3, 1));
        h.push(c(5, 2));
        assert_eq!(h.len(), 3);
        assert_eq!(h.next_completion_time(), Some(3));
        assert_eq!(h.pop_min().map(|x| x.flow), Some(1));
        assert_eq!(h.pop_min().map(|x| x.flow), Some(2));
        assert_eq!(h.pop_min().map(|x| x.flow), Some(0));
        assert!(h.is_empty());
    }

    #[test]
    fn test_pop_due() {
        let mut h = CompletionHeap::new();
        h.push(c(4, 0));
        h.push(c(4, 1));
        h.push(c(6, 2));

        assert!(h.pop_due(3).is_none());
        assert_eq!(h.pop_due(4).map(|x| x.flow), Some(0));
        assert_eq!(h.pop_due(4).map(|x| x.flow), Some(1));
        assert!(h.pop_due(4).is_none());
        assert_eq!(h.peek_min().map(|x| x.flow), Some(2));
    }
}
