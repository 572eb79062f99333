//! Ranking coefficient sweep.
//!
//! Runs the same input once per candidate [`RankingWeights`] and keeps the
//! outcome with the lowest objective.
//!
//! # Candidates
//!
//! - [`ParameterSweep::default_grid`]: hand-tuned coefficient families that
//!   favour long flows (negative α) with a rate or `duration / bandwidth` term.
//! - [`ParameterSweep::random`]: uniform draws from `[-10, 10]` per coefficient.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SchedulerConfig;
use super::greedy::{FlowScheduler, ScheduleOutcome};
use crate::dispatching::RankingWeights;
use crate::models::{Flow, Port};

/// Result of a sweep.
#[derive(Debug, Clone)]
pub struct SweepResult {
    /// Objective of every candidate, in candidate order.
    pub objectives: Vec<f64>,
    /// Position of the winning candidate.
    pub best_index: usize,
    /// Weights of the winning candidate.
    pub best_weights: RankingWeights,
    /// Outcome of the winning candidate.
    pub best: ScheduleOutcome,
}

impl SweepResult {
    /// Objective of the winning candidate.
    pub fn best_objective(&self) -> f64 {
        self.objectives[self.best_index]
    }
}

/// Set of ranking coefficients to try.
#[derive(Debug, Clone, Default)]
pub struct ParameterSweep {
    candidates: Vec<RankingWeights>,
}

impl ParameterSweep {
    /// Creates an empty sweep.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate.
    pub fn with_candidate(mut self, weights: RankingWeights) -> Self {
        self.candidates.push(weights);
        self
    }

    /// The built-in coefficient grid.
    pub fn default_grid() -> Self {
        let mut sweep = Self::new();
        for a in [-6.4, -6.2, -7.7, -6.5, -6.1, -5.9, -4.9, -4.1] {
            sweep = sweep.with_candidate(RankingWeights::new(a, 0.0, 1.0, 0.0));
        }
        for a in [-9.9, -9.8, -9.5, -9.3, -9.2, -9.1, -9.0, -8.8, -8.7, -8.3] {
            sweep = sweep
                .with_candidate(RankingWeights::new(a, 0.1, 0.0, 0.0).with_inverse_rate(1.0));
        }
        sweep
            .with_candidate(RankingWeights::new(1.0, 2.3, 0.0, 0.0).with_inverse_rate(-7.9))
            .with_candidate(RankingWeights::new(1.0, 0.8, 0.0, 0.0))
    }

    /// `n` candidates with α, β, γ and ε drawn uniformly from `[-10, 10]`.
    ///
    /// δ stays 0. The draw is deterministic for a given seed.
    pub fn random(n: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let candidates = (0..n)
            .map(|_| {
                RankingWeights::new(
                    rng.random_range(-10.0..=10.0),
                    rng.random_range(-10.0..=10.0),
                    rng.random_range(-10.0..=10.0),
                    0.0,
                )
                .with_inverse_rate(rng.random_range(-10.0..=10.0))
            })
            .collect();
        Self { candidates }
    }

    /// Candidates, in run order.
    pub fn candidates(&self) -> &[RankingWeights] {
        &self.candidates
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Schedules the input once per candidate.
    ///
    /// Every field of `base` except the ranking is shared by all runs.
    /// The lowest objective wins; the earliest candidate wins ties.
    /// Returns `None` if there are no candidates.
    pub fn run(&self, base: &SchedulerConfig, flows: &[Flow], ports: &[Port]) -> Option<SweepResult> {
        let mut objectives = Vec::with_capacity(self.candidates.len());
        let mut best: Option<(usize, ScheduleOutcome)> = None;

        for (i, weights) in self.candidates.iter().enumerate() {
            let config = base.clone().with_ranking(*weights);
            let outcome = FlowScheduler::new(config).schedule(flows, ports);
            let objective = outcome.objective();
            debug!("candidate {} {}: objective {}", i, weights, objective);
            objectives.push(objective);

            let improves = match &best {
                Some((_, current)) => objective < current.objective(),
                None => true,
            };
            if improves {
                best = Some((i, outcome));
            }
        }

        let (best_index, best) = best?;
        let best_weights = self.candidates[best_index];
        info!(
            "sweep of {} candidates: best #{} {} with objective {}",
            self.candidates.len(),
            best_index,
            best_weights,
            best.objective()
        );
        Some(SweepResult {
            objectives,
            best_index,
            best_weights,
            best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::config::BufferBound;

    fn contended() -> (Vec<Flow>, Vec<Port>) {
        // One long and two short flows competing for a single port.
        let flows = vec![
            Flow::new(0, 10, 0, 1),
            Flow::new(1, 10, 0, 1),
            Flow::new(2, 10, 0, 8),
        ];
        (flows, vec![Port::new(0, 10)])
    }

    #[test]
    fn test_default_grid_size() {
        let grid = ParameterSweep::default_grid();
        assert_eq!(grid.len(), 20);
        assert!((grid.candidates()[0].duration + 6.4).abs() < 1e-10);
        assert!((grid.candidates()[0].rate - 1.0).abs() < 1e-10);
        assert!((grid.candidates()[8].inverse_rate - 1.0).abs() < 1e-10);
        assert!((grid.candidates()[18].inverse_rate + 7.9).abs() < 1e-10);
    }

    #[test]
    fn test_random_is_seeded() {
        let a = ParameterSweep::random(5, 42);
        let b = ParameterSweep::random(5, 42);
        let c = ParameterSweep::random(5, 43);
        assert_eq!(a.candidates(), b.candidates());
        assert_ne!(a.candidates(), c.candidates());
        for w in a.candidates() {
            for v in [w.duration, w.bandwidth, w.rate, w.inverse_rate] {
                assert!((-10.0..=10.0).contains(&v));
            }
            assert!((w.arrival - 0.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_picks_lowest_objective() {
        let (flows, ports) = contended();
        let base = SchedulerConfig::default()
            .with_buffer_bound(BufferBound::Fixed(0))
            .with_queue_bound(0);
        // With no room to wait, only the first admitted flow survives.
        // Longest-first keeps the 8-tick flow and drops two 1-tick flows
        // (8 + 2 + 2 = 12); shortest-first keeps a 1-tick flow (1 + 2 + 16 = 19).
        let sweep = ParameterSweep::new()
            .with_candidate(RankingWeights::new(1.0, 0.0, 0.0, 0.0))
            .with_candidate(RankingWeights::new(-1.0, 0.0, 0.0, 0.0));
        let result = sweep.run(&base, &flows, &ports).unwrap();

        assert_eq!(result.objectives.len(), 2);
        assert!((result.objectives[0] - 19.0).abs() < 1e-10);
        assert!((result.objectives[1] - 12.0).abs() < 1e-10);
        assert_eq!(result.best_index, 1);
        assert!((result.best_objective() - 12.0).abs() < 1e-10);
        assert_eq!(result.best.schedule.trace(), vec![(2, 0, 0)]);
    }

    #[test]
    fn test_tie_keeps_earliest_candidate() {
        let flows = vec![Flow::new(0, 1, 0, 3)];
        let ports = vec![Port::new(0, 1)];
        let sweep = ParameterSweep::new()
            .with_candidate(RankingWeights::new(1.0, 0.0, 0.0, 0.0))
            .with_candidate(RankingWeights::new(-1.0, 0.0, 0.0, 0.0));
        let result = sweep
            .run(&SchedulerConfig::default(), &flows, &ports)
            .unwrap();
        assert_eq!(result.best_index, 0);
    }

    #[test]
    fn test_empty_sweep() {
        let (flows, ports) = contended();
        assert!(ParameterSweep::new()
            .run(&SchedulerConfig::default(), &flows, &ports)
            .is_none());
    }
}
