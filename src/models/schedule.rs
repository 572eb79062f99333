//! Schedule (assignment trace) model.
//!
//! A schedule records, in admission order, which port sends each admitted
//! flow and when, plus every flow that was dropped and the penalty it cost.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A flow-port-time assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Admitted flow ID.
    pub flow_id: u32,
    /// Sending port ID.
    pub port_id: u32,
    /// Start tick.
    pub start_time: i64,
    /// Completion tick (`start_time + duration`).
    pub end_time: i64,
    /// Bandwidth held on the port during `[start_time, end_time)`.
    pub bandwidth: u64,
}

/// Why a flow was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropReason {
    /// Evicted from a full buffer onto a port whose wait queue was full.
    QueueFull,
    /// Bandwidth exceeds the capacity of every port.
    Unschedulable,
    /// Still buffered when no further event could free capacity.
    Stranded,
}

/// A dropped flow and its objective penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedFlow {
    /// Dropped flow ID.
    pub flow_id: u32,
    /// Tick at which the drop happened.
    pub time: i64,
    /// Penalty added to the objective.
    pub penalty: f64,
    /// Drop cause.
    pub reason: DropReason,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(flow_id: u32, port_id: u32, start_time: i64, end_time: i64, bandwidth: u64) -> Self {
        Self {
            flow_id,
            port_id,
            start_time,
            end_time,
            bandwidth,
        }
    }

    /// Ticks spent in flight.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Bandwidth-ticks consumed (`bandwidth × duration`).
    #[inline]
    pub fn volume(&self) -> f64 {
        self.bandwidth as f64 * self.duration() as f64
    }
}

/// The output of one scheduling pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments in admission order.
    pub assignments: Vec<Assignment>,
    /// Drops in the order they happened.
    pub drops: Vec<DroppedFlow>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Adds a drop.
    pub fn add_drop(&mut self, dropped: DroppedFlow) {
        self.drops.push(dropped);
    }

    /// Makespan: latest completion tick across all assignments.
    pub fn makespan(&self) -> i64 {
        self.assignments
            .iter()
            .map(|a| a.end_time)
            .max()
            .unwrap_or(0)
    }

    /// Sum of drop penalties.
    pub fn total_penalty(&self) -> f64 {
        self.drops.iter().map(|d| d.penalty).sum()
    }

    /// Objective: makespan plus drop penalties.
    pub fn objective(&self) -> f64 {
        self.makespan() as f64 + self.total_penalty()
    }

    /// Finds the assignment for a flow.
    pub fn assignment_for_flow(&self, flow_id: u32) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.flow_id == flow_id)
    }

    /// Finds the drop record for a flow.
    pub fn drop_for_flow(&self, flow_id: u32) -> Option<&DroppedFlow> {
        self.drops.iter().find(|d| d.flow_id == flow_id)
    }

    /// Returns all assignments on a port.
    pub fn assignments_for_port(&self, port_id: u32) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.port_id == port_id)
            .collect()
    }

    /// Bandwidth-ticks consumed per port.
    pub fn volume_by_port(&self) -> HashMap<u32, f64> {
        let mut volume: HashMap<u32, f64> = HashMap::new();
        for a in &self.assignments {
            *volume.entry(a.port_id).or_insert(0.0) += a.volume();
        }
        volume
    }

    /// `(flow_id, port_id, start_time)` triples, the external result format.
    pub fn trace(&self) -> Vec<(u32, u32, i64)> {
        self.assignments
            .iter()
            .map(|a| (a.flow_id, a.port_id, a.start_time))
            .collect()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Number of drops.
    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_assignment(Assignment::new(0, 1, 0, 5, 10));
        s.add_assignment(Assignment::new(1, 2, 1, 4, 20));
        s.add_assignment(Assignment::new(2, 1, 5, 8, 10));
        s.add_drop(DroppedFlow {
            flow_id: 3,
            time: 2,
            penalty: 6.0,
            reason: DropReason::QueueFull,
        });
        s
    }

    #[test]
    fn test_makespan_and_objective() {
        let s = sample_schedule();
        assert_eq!(s.makespan(), 8);
        assert!((s.total_penalty() - 6.0).abs() < 1e-10);
        assert!((s.objective() - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_assignment_volume() {
        let a = Assignment::new(0, 0, 2, 7, 30);
        assert_eq!(a.duration(), 5);
        assert!((a.volume() - 150.0).abs() < 1e-10);
    }

    #[test]
    fn test_lookup() {
        let s = sample_schedule();
        assert_eq!(s.assignment_for_flow(1).map(|a| a.port_id), Some(2));
        assert!(s.assignment_for_flow(3).is_none());
        assert_eq!(s.drop_for_flow(3).map(|d| d.reason), Some(DropReason::QueueFull));
        assert_eq!(s.assignments_for_port(1).len(), 2);
    }

    #[test]
    fn test_volume_by_port() {
        let s = sample_schedule();
        let v = s.volume_by_port();
        // Port 1: 10×5 + 10×3 = 80
        assert!((v[&1] - 80.0).abs() < 1e-10);
        // Port 2: 20×3 = 60
        assert!((v[&2] - 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_trace_in_admission_order() {
        let s = sample_schedule();
        assert_eq!(s.trace(), vec![(0, 1, 0), (1, 2, 1), (2, 1, 5)]);
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new();
        assert_eq!(s.makespan(), 0);
        assert!((s.objective() - 0.0).abs() < 1e-10);
        assert_eq!(s.assignment_count(), 0);
        assert_eq!(s.drop_count(), 0);
    }
}
