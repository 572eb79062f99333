//! Flow model.
//!
//! A flow is a time-stamped bandwidth request: it becomes eligible at its
//! arrival tick and, once started, occupies `bandwidth` units of one port
//! for exactly `duration` ticks.
//!
//! # Lifecycle
//!
//! ```text
//! Pending ──► Buffered ──► Queued ──► InFlight ──► Completed
//!    │            │                      ▲
//!    │            └──────────────────────┘
//!    ├────────────────────────────────────┘
//!    └──► Dropped ◄── Buffered
//! ```
//!
//! Transitions only move forward; a flow never returns to `Pending`.

use serde::{Deserialize, Serialize};

/// Scheduling state of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    /// Not yet arrived (or not yet processed at its arrival tick).
    Pending,
    /// Waiting in the global dispatch buffer.
    Buffered,
    /// Reserved on a specific port's wait queue.
    Queued,
    /// Admitted and occupying port capacity.
    InFlight,
    /// Finished sending; capacity released.
    Completed,
    /// Permanently excluded; counted as a penalty in the objective.
    Dropped,
}

impl FlowState {
    /// Whether the state is terminal (`Completed` or `Dropped`).
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, FlowState::Completed | FlowState::Dropped)
    }

    /// Whether moving from `self` to `next` is a legal forward transition.
    pub fn can_transition_to(self, next: FlowState) -> bool {
        use FlowState::*;
        matches!(
            (self, next),
            (Pending, Buffered)
                | (Pending, InFlight)
                | (Pending, Dropped)
                | (Buffered, Queued)
                | (Buffered, InFlight)
                | (Buffered, Dropped)
                | (Queued, InFlight)
                | (InFlight, Completed)
        )
    }
}

/// A bandwidth-bounded transmission request.
///
/// Input fields (`id`, `bandwidth`, `arrival_time`, `duration`) are fixed.
/// The scheduling fields are filled in by the scheduler on its private copy
/// of the flow set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Unique flow identifier.
    pub id: u32,
    /// Capacity demand while in flight.
    pub bandwidth: u64,
    /// Tick at which the flow becomes eligible.
    pub arrival_time: i64,
    /// Number of ticks the flow occupies its port.
    pub duration: i64,
    /// Port that sends this flow (or that it is reserved on while queued).
    pub assigned_port: Option<u32>,
    /// Tick at which the flow started sending.
    pub start_time: Option<i64>,
    /// Ranking score, computed when the flow becomes a candidate.
    pub priority_score: Option<f64>,
    /// Current lifecycle state.
    pub state: FlowState,
}

impl Flow {
    /// Creates a pending flow.
    pub fn new(id: u32, bandwidth: u64, arrival_time: i64, duration: i64) -> Self {
        Self {
            id,
            bandwidth,
            arrival_time,
            duration,
            assigned_port: None,
            start_time: None,
            priority_score: None,
            state: FlowState::Pending,
        }
    }

    /// Throughput: `bandwidth / duration`.
    ///
    /// Returns 0.0 for a non-positive duration.
    pub fn rate(&self) -> f64 {
        if self.duration <= 0 {
            return 0.0;
        }
        self.bandwidth as f64 / self.duration as f64
    }

    /// Inverse throughput: `duration / bandwidth`.
    ///
    /// Returns 0.0 for zero bandwidth.
    pub fn inverse_rate(&self) -> f64 {
        if self.bandwidth == 0 {
            return 0.0;
        }
        self.duration as f64 / self.bandwidth as f64
    }

    /// Completion tick (`start_time + duration`), once started.
    #[inline]
    pub fn completion_time(&self) -> Option<i64> {
        self.start_time.map(|s| s + self.duration)
    }

    /// Tick count between arrival and start, once started.
    #[inline]
    pub fn wait_time(&self) -> Option<i64> {
        self.start_time.map(|s| s - self.arrival_time)
    }

    /// Moves the flow to `next`.
    ///
    /// Transitions are checked in debug builds only; the scheduler is the
    /// sole caller and drives states strictly forward.
    pub(crate) fn transition(&mut self, next: FlowState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "flow {}: illegal transition {:?} -> {:?}",
            self.id,
            self.state,
            next
        );
        self.state = next;
    }

    /// Marks the flow as started on `port_id` at tick `time`.
    pub(crate) fn start(&mut self, port_id: u32, time: i64) {
        self.assigned_port = Some(port_id);
        self.start_time = Some(time);
        self.transition(FlowState::InFlight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_new() {
        let f = Flow::new(7, 400, 12, 8);
        assert_eq!(f.id, 7);
        assert_eq!(f.state, FlowState::Pending);
        assert!(f.assigned_port.is_none());
        assert!(f.completion_time().is_none());
        assert!(f.wait_time().is_none());
    }

    #[test]
    fn test_rates() {
        let f = Flow::new(0, 300, 0, 6);
        assert!((f.rate() - 50.0).abs() < 1e-10);
        assert!((f.inverse_rate() - 0.02).abs() < 1e-10);

        let degenerate = Flow::new(1, 0, 0, 0);
        assert!((degenerate.rate() - 0.0).abs() < 1e-10);
        assert!((degenerate.inverse_rate() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_start_sets_times() {
        let mut f = Flow::new(0, 5, 2, 3);
        f.start(4, 6);
        assert_eq!(f.state, FlowState::InFlight);
        assert_eq!(f.assigned_port, Some(4));
        assert_eq!(f.start_time, Some(6));
        assert_eq!(f.completion_time(), Some(9));
        assert_eq!(f.wait_time(), Some(4));
    }

    #[test]
    fn test_transitions_forward_only() {
        use FlowState::*;
        assert!(Pending.can_transition_to(Buffered));
        assert!(Buffered.can_transition_to(Queued));
        assert!(Queued.can_transition_to(InFlight));
        assert!(InFlight.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Dropped));

        assert!(!Buffered.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InFlight));
        assert!(!Dropped.can_transition_to(Buffered));
        assert!(!Queued.can_transition_to(Buffered));
        assert!(!InFlight.can_transition_to(Dropped));
    }

    #[test]
    fn test_terminal_states() {
        assert!(FlowState::Completed.is_terminal());
        assert!(FlowState::Dropped.is_terminal());
        assert!(!FlowState::InFlight.is_terminal());
        assert!(!FlowState::Queued.is_terminal());
    }
}
