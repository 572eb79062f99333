//! Holding areas for flows that could not be admitted on arrival.
//!
//! - [`DispatchBuffer`]: global, bounded by the caller, ordered by score.
//! - [`WaitQueue`]: per port, bounded, FIFO.

use std::cmp::Ordering;
use std::collections::VecDeque;

use super::config::EvictionPolicy;
use crate::dispatching::TieBreaker;

/// A buffered flow with the fields the buffer orders and evicts by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferEntry {
    /// Flow position in the run.
    pub flow: usize,
    /// Flow ID (for ID tie-breaking).
    pub id: u32,
    /// Ranking score. Lower = higher priority.
    pub score: f64,
    /// Flow duration (for shortest-duration eviction).
    pub duration: i64,
}

/// Priority-ordered dispatch buffer.
///
/// Entries are kept ascending by score; the front is the next flow to try.
/// Among equal scores a new entry goes behind existing ones unless the
/// tie-breaker orders by ID.
#[derive(Debug, Clone)]
pub struct DispatchBuffer {
    entries: VecDeque<BufferEntry>,
    tie_breaker: TieBreaker,
}

impl DispatchBuffer {
    /// Creates an empty buffer.
    pub fn new(tie_breaker: TieBreaker) -> Self {
        Self {
            entries: VecDeque::new(),
            tie_breaker,
        }
    }

    fn compare(&self, a: &BufferEntry, b: &BufferEntry) -> Ordering {
        match a.score.total_cmp(&b.score) {
            Ordering::Equal => match self.tie_breaker {
                TieBreaker::Insertion => Ordering::Equal,
                TieBreaker::ById => a.id.cmp(&b.id),
            },
            ord => ord,
        }
    }

    /// Inserts at the entry's sorted position.
    pub fn insert(&mut self, entry: BufferEntry) {
        let at = self
            .entries
            .partition_point(|e| self.compare(e, &entry) != Ordering::Greater);
        self.entries.insert(at, entry);
    }

    /// Highest-priority entry.
    pub fn front(&self) -> Option<&BufferEntry> {
        self.entries.front()
    }

    /// Removes the highest-priority entry.
    pub fn pop_front(&mut self) -> Option<BufferEntry> {
        self.entries.pop_front()
    }

    /// Removes the lowest-priority entry.
    pub fn pop_back(&mut self) -> Option<BufferEntry> {
        self.entries.pop_back()
    }

    /// Removes the entry with the shortest duration (frontmost on ties).
    pub fn pop_shortest(&mut self) -> Option<BufferEntry> {
        let (at, _) = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|&(i, e)| (e.duration, i))?;
        self.entries.remove(at)
    }

    /// Removes the overflow victim chosen by `policy`.
    ///
    /// For [`EvictionPolicy::FrontThenShortest`] this is the second-stage
    /// victim; the caller tries the front first.
    pub fn evict(&mut self, policy: EvictionPolicy) -> Option<BufferEntry> {
        match policy {
            EvictionPolicy::HighestPriority => self.pop_front(),
            EvictionPolicy::FrontThenShortest => self.pop_shortest(),
            EvictionPolicy::LowestPriority => self.pop_back(),
            EvictionPolicy::ShortestDuration => self.pop_shortest(),
        }
    }

    /// Removes every entry, front to back.
    pub fn drain(&mut self) -> impl Iterator<Item = BufferEntry> + '_ {
        self.entries.drain(..)
    }

    /// Entries, front to back.
    pub fn iter(&self) -> impl Iterator<Item = &BufferEntry> {
        self.entries.iter()
    }

    /// Number of buffered flows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bounded FIFO of flows reserved for one port.
#[derive(Debug, Clone)]
pub struct WaitQueue {
    flows: VecDeque<usize>,
    bound: usize,
}

impl WaitQueue {
    /// Creates an empty queue holding at most `bound` flows.
    pub fn new(bound: usize) -> Self {
        Self {
            flows: VecDeque::new(),
            bound,
        }
    }

    /// Appends a flow. Returns `false` if the queue is full.
    pub fn try_push(&mut self, flow: usize) -> bool {
        if self.is_full() {
            return false;
        }
        self.flows.push_back(flow);
        true
    }

    /// Oldest queued flow.
    pub fn front(&self) -> Option<usize> {
        self.flows.front().copied()
    }

    /// Removes the oldest queued flow.
    pub fn pop_front(&mut self) -> Option<usize> {
        self.flows.pop_front()
    }

    /// Whether the queue holds `bound` flows.
    pub fn is_full(&self) -> bool {
        self.flows.len() >= self.bound
    }

    /// Number of queued flows.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(flow: usize, id: u32, score: f64, duration: i64) -> BufferEntry {
        BufferEntry {
            flow,
            id,
            score,
            duration,
        }
    }

    fn ids(buffer: &DispatchBuffer) -> Vec<u32> {
        buffer.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_buffer_sorted_by_score() {
        let mut b = DispatchBuffer::new(TieBreaker::Insertion);
        b.insert(entry(0, 0, 5.0, 1));
        b.insert(entry(1, 1, -2.0, 1));
        b.insert(entry(2, 2, 3.5, 1));
        assert_eq!(ids(&b), vec![1, 2, 0]);
        assert_eq!(b.front().map(|e| e.id), Some(1));
    }

    #[test]
    fn test_buffer_equal_scores_keep_insertion_order() {
        let mut b = DispatchBuffer::new(TieBreaker::Insertion);
        b.insert(entry(0, 7, 1.0, 1));
        b.insert(entry(1, 3, 1.0, 1));
        b.insert(entry(2, 5, 1.0, 1));
        assert_eq!(ids(&b), vec![7, 3, 5]);
    }

    #[test]
    fn test_buffer_equal_scores_by_id() {
        let mut b = DispatchBuffer::new(TieBreaker::ById);
        b.insert(entry(0, 7, 1.0, 1));
        b.insert(entry(1, 3, 1.0, 1));
        b.insert(entry(2, 5, 1.0, 1));
        assert_eq!(ids(&b), vec![3, 5, 7]);
    }

    #[test]
    fn test_eviction_policies() {
        let fill = || {
            let mut b = DispatchBuffer::new(TieBreaker::Insertion);
            b.insert(entry(0, 0, 1.0, 9));
            b.insert(entry(1, 1, 2.0, 2));
            b.insert(entry(2, 2, 3.0, 2));
            b
        };

        let mut b = fill();
        assert_eq!(b.evict(EvictionPolicy::HighestPriority).map(|e| e.id), Some(0));
        let mut b2 = fill();
        assert_eq!(b2.evict(EvictionPolicy::LowestPriority).map(|e| e.id), Some(2));
        let mut b3 = fill();
        assert_eq!(b3.evict(EvictionPolicy::ShortestDuration).map(|e| e.id), Some(1));
        assert_eq!(ids(&b3), vec![0, 2]);
        let mut b4 = fill();
        assert_eq!(b4.evict(EvictionPolicy::FrontThenShortest).map(|e| e.id), Some(1));
        b.pop_front();
        b.pop_front();
        assert!(b.is_empty());
        assert!(b.evict(EvictionPolicy::ShortestDuration).is_none());
    }

    #[test]
    fn test_buffer_drain() {
        let mut b = DispatchBuffer::new(TieBreaker::Insertion);
        b.insert(entry(0, 0, 2.0, 1));
        b.insert(entry(1, 1, 1.0, 1));
        let drained: Vec<u32> = b.drain().map(|e| e.id).collect();
        assert_eq!(drained, vec![1, 0]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_wait_queue_bound() {
        let mut q = WaitQueue::new(2);
        assert!(q.try_push(4));
        assert!(q.try_push(9));
        assert!(q.is_full());
        assert!(!q.try_push(1));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop_front(), Some(4));
        assert_eq!(q.front(), Some(9));
    }

    #[test]
    fn test_zero_bound_wait_queue_is_always_full() {
        let mut q = WaitQueue::new(0);
        assert!(q.is_full());
        assert!(!q.try_push(0));
        assert!(q.is_empty());
    }
}
