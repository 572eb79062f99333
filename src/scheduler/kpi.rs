//! Schedule quality metrics (KPIs).
//!
//! Computes performance indicators from a finished scheduling pass.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest completion tick of an admitted flow |
//! | Objective | Makespan + Σ drop penalties |
//! | Drop Rate | Dropped / total flows |
//! | Avg / Max Wait | start − arrival over admitted flows |
//! | Utilization | Σ bandwidth·duration / (capacity · makespan) per port |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use super::greedy::ScheduleOutcome;

/// Scheduling performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Latest completion tick.
    pub makespan: i64,
    /// Makespan plus drop penalties.
    pub objective: f64,
    /// Number of admitted flows.
    pub admitted: usize,
    /// Number of dropped flows.
    pub dropped: usize,
    /// Sum of drop penalties.
    pub total_penalty: f64,
    /// Fraction of flows dropped (0.0..1.0).
    pub drop_rate: f64,
    /// Mean ticks between arrival and start of admitted flows.
    pub avg_wait: f64,
    /// Longest wait of an admitted flow.
    pub max_wait: i64,
    /// Mean bandwidth utilization over all ports (0.0..1.0).
    pub avg_utilization: f64,
    /// Bandwidth utilization per port ID.
    pub utilization_by_port: HashMap<u32, f64>,
}

impl ScheduleKpi {
    /// Computes KPIs from a scheduling outcome.
    pub fn calculate(outcome: &ScheduleOutcome) -> Self {
        let schedule = &outcome.schedule;
        let makespan = schedule.makespan();
        let admitted = schedule.assignment_count();
        let dropped = schedule.drop_count();
        let total = admitted + dropped;

        let waits: Vec<i64> = outcome.flows.iter().filter_map(|f| f.wait_time()).collect();
        let avg_wait = if waits.is_empty() {
            0.0
        } else {
            waits.iter().sum::<i64>() as f64 / waits.len() as f64
        };
        let max_wait = waits.iter().copied().max().unwrap_or(0);

        let volume = schedule.volume_by_port();
        let utilization_by_port: HashMap<u32, f64> = outcome
            .ports
            .iter()
            .map(|p| {
                let area = p.capacity as f64 * makespan as f64;
                let used = volume.get(&p.id).copied().unwrap_or(0.0);
                let util = if area > 0.0 { used / area } else { 0.0 };
                (p.id, util)
            })
            .collect();
        let avg_utilization = if utilization_by_port.is_empty() {
            0.0
        } else {
            utilization_by_port.values().sum::<f64>() / utilization_by_port.len() as f64
        };

        Self {
            makespan,
            objective: schedule.objective(),
            admitted,
            dropped,
            total_penalty: schedule.total_penalty(),
            drop_rate: if total == 0 {
                0.0
            } else {
                dropped as f64 / total as f64
            },
            avg_wait,
            max_wait,
            avg_utilization,
            utilization_by_port,
        }
    }

    /// Whether the run meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_drop_rate: f64, min_utilization: f64) -> bool {
        self.drop_rate <= max_drop_rate && self.avg_utilization >= min_utilization
    }
}
