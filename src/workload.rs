//! Synthetic workload generator.
//!
//! Produces random flow/port instances for benchmarking and for filling
//! dataset directories. Generation is deterministic for a given seed.
//!
//! # Default ranges
//!
//! | Quantity | Range |
//! |----------|-------|
//! | Ports | 5..=14 |
//! | Port capacity | 3000..=12000, multiples of 1000 |
//! | Flows | 5000..=14000, multiples of 1000 |
//! | Flow bandwidth | 1..=1000 |
//! | Arrival | `0..h`, `h` in 50..=99 |
//! | Duration | `1..=d`, `d` in 50..=99 |

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{Flow, Port};

/// Shape of one generated instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    /// Number of ports.
    pub port_count: usize,
    /// Number of flows.
    pub flow_count: usize,
    /// Port capacity range.
    pub capacity_range: RangeInclusive<u64>,
    /// Flow bandwidth range.
    pub bandwidth_range: RangeInclusive<u64>,
    /// Arrivals fall in `0..arrival_horizon`.
    pub arrival_horizon: i64,
    /// Durations fall in `1..=max_duration`.
    pub max_duration: i64,
}

impl WorkloadSpec {
    /// Creates a workload shape with the default capacity and bandwidth ranges.
    pub fn new(port_count: usize, flow_count: usize, arrival_horizon: i64, max_duration: i64) -> Self {
        Self {
            port_count,
            flow_count,
            capacity_range: 3000..=12000,
            bandwidth_range: 1..=1000,
            arrival_horizon,
            max_duration,
        }
    }

    /// Draws instance dimensions from the default ranges.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self::new(
            rng.random_range(5..=14),
            rng.random_range(5..=14) * 1000,
            rng.random_range(50..=99),
            rng.random_range(50..=99),
        )
    }

    /// Sets the capacity range.
    pub fn with_capacity_range(mut self, range: RangeInclusive<u64>) -> Self {
        self.capacity_range = range;
        self
    }

    /// Sets the bandwidth range.
    pub fn with_bandwidth_range(mut self, range: RangeInclusive<u64>) -> Self {
        self.bandwidth_range = range;
        self
    }
}

/// Seeded instance generator.
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    rng: StdRng,
}

impl WorkloadGenerator {
    /// Creates a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a workload shape from the default ranges.
    pub fn sample_spec(&mut self) -> WorkloadSpec {
        WorkloadSpec::sample(&mut self.rng)
    }

    /// Generates `(flows, ports)` with IDs `0..n` in input order.
    ///
    /// Capacities that are multiples of 1000 are drawn in steps of 1000
    /// when the range allows it.
    pub fn generate(&mut self, spec: &WorkloadSpec) -> (Vec<Flow>, Vec<Port>) {
        let (lo, hi) = (*spec.capacity_range.start(), *spec.capacity_range.end());
        let stepped = lo % 1000 == 0 && hi % 1000 == 0 && lo > 0;
        let ports = (0..spec.port_count)
            .map(|i| {
                let capacity = if stepped {
                    self.rng.random_range(lo / 1000..=hi / 1000) * 1000
                } else {
                    self.rng.random_range(lo..=hi)
                };
                Port::new(i as u32, capacity)
            })
            .collect();

        let horizon = spec.arrival_horizon.max(1);
        let max_duration = spec.max_duration.max(1);
        let flows = (0..spec.flow_count)
            .map(|i| {
                let bandwidth = self.rng.random_range(spec.bandwidth_range.clone());
                let arrival = self.rng.random_range(0..horizon);
                let duration = self.rng.random_range(1..=max_duration);
                Flow::new(i as u32, bandwidth, arrival, duration)
            })
            .collect();

        (flows, ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_input;

    #[test]
    fn test_deterministic() {
        let spec = WorkloadSpec::new(4, 200, 50, 60);
        let a = WorkloadGenerator::new(7).generate(&spec);
        let b = WorkloadGenerator::new(7).generate(&spec);
        let c = WorkloadGenerator::new(8).generate(&spec);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ranges() {
        let spec = WorkloadSpec::new(10, 500, 60, 70);
        let (flows, ports) = WorkloadGenerator::new(1).generate(&spec);

        assert_eq!(ports.len(), 10);
        assert_eq!(flows.len(), 500);
        for p in &ports {
            assert!((3000..=12000).contains(&p.capacity));
            assert_eq!(p.capacity % 1000, 0);
        }
        for f in &flows {
            assert!((1..=1000).contains(&f.bandwidth));
            assert!((0..60).contains(&f.arrival_time));
            assert!((1..=70).contains(&f.duration));
        }
        assert!(validate_input(&flows, &ports).is_ok());
    }

    #[test]
    fn test_sample_spec_ranges() {
        let mut generator = WorkloadGenerator::new(3);
        for _ in 0..20 {
            let spec = generator.sample_spec();
            assert!((5..=14).contains(&spec.port_count));
            assert!((5000..=14000).contains(&spec.flow_count));
            assert_eq!(spec.flow_count % 1000, 0);
            assert!((50..=99).contains(&spec.arrival_horizon));
            assert!((50..=99).contains(&spec.max_duration));
        }
    }

    #[test]
    fn test_custom_ranges() {
        let spec = WorkloadSpec::new(3, 50, 5, 2)
            .with_capacity_range(7..=9)
            .with_bandwidth_range(2..=3);
        let (flows, ports) = WorkloadGenerator::new(11).generate(&spec);
        assert!(ports.iter().all(|p| (7..=9).contains(&p.capacity)));
        assert!(flows.iter().all(|f| (2..=3).contains(&f.bandwidth)));
        assert!(flows.iter().all(|f| f.duration <= 2));
    }
}
