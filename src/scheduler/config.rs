//! Scheduler policy configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dispatching::{RankingWeights, TieBreaker};
use crate::error::Result;

/// Port selection strategy of the port index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortSelection {
    /// Smallest remaining capacity that still fits (preserves large free blocks).
    #[default]
    BestFit,
    /// First port, in ascending capacity order, that fits.
    FirstFit,
}

/// Bound on the global dispatch buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferBound {
    /// `k × port_count` entries.
    PerPort(usize),
    /// A fixed number of entries.
    Fixed(usize),
}

impl BufferBound {
    /// Resolves the bound for a run with `port_count` ports.
    pub fn resolve(self, port_count: usize) -> usize {
        match self {
            BufferBound::PerPort(k) => k.saturating_mul(port_count),
            BufferBound::Fixed(n) => n,
        }
    }
}

impl Default for BufferBound {
    fn default() -> Self {
        BufferBound::PerPort(20)
    }
}

/// Order in which same-tick arrivals are offered to the port index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalOrder {
    /// By ranking score.
    #[default]
    Priority,
    /// Pre-sort order: `(arrival_time, bandwidth, duration)`, then input position.
    Arrival,
}

/// Which buffered flow leaves the buffer when it overflows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionPolicy {
    /// The buffer front if its wait queue has room, otherwise the flow with
    /// the shortest duration.
    #[default]
    FrontThenShortest,
    /// The buffer front (lowest score).
    HighestPriority,
    /// The buffer back (highest score).
    LowestPriority,
    /// The flow with the shortest duration.
    ShortestDuration,
}

/// Complete policy of one scheduling run.
///
/// Every field has a default, so a partial JSON document is a valid config.
///
/// # Example
/// ```
/// use u_flowsched::scheduler::{BufferBound, PortSelection, SchedulerConfig};
///
/// let config = SchedulerConfig::from_json_str(
///     r#"{ "port_selection": "FirstFit", "buffer_bound": { "Fixed": 8 } }"#,
/// ).unwrap();
/// assert_eq!(config.port_selection, PortSelection::FirstFit);
/// assert_eq!(config.buffer_bound, BufferBound::Fixed(8));
/// assert_eq!(config.queue_bound, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ranking coefficients.
    pub ranking: RankingWeights,
    /// Port selection strategy.
    pub port_selection: PortSelection,
    /// Dispatch buffer bound.
    pub buffer_bound: BufferBound,
    /// Per-port wait queue bound.
    pub queue_bound: usize,
    /// Drop penalty = multiplier × duration.
    pub drop_penalty_multiplier: f64,
    /// Same-tick arrival order.
    pub arrival_order: ArrivalOrder,
    /// Buffer overflow victim.
    pub eviction: EvictionPolicy,
    /// Final tie-breaker between equal scores.
    pub tie_breaker: TieBreaker,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            ranking: RankingWeights::default(),
            port_selection: PortSelection::BestFit,
            buffer_bound: BufferBound::default(),
            queue_bound: 30,
            drop_penalty_multiplier: 2.0,
            arrival_order: ArrivalOrder::Priority,
            eviction: EvictionPolicy::FrontThenShortest,
            tie_breaker: TieBreaker::Insertion,
        }
    }
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Sets the ranking weights.
    pub fn with_ranking(mut self, ranking: RankingWeights) -> Self {
        self.ranking = ranking;
        self
    }

    /// Sets the port selection strategy.
    pub fn with_port_selection(mut self, port_selection: PortSelection) -> Self {
        self.port_selection = port_selection;
        self
    }

    /// Sets the buffer bound.
    pub fn with_buffer_bound(mut self, buffer_bound: BufferBound) -> Self {
        self.buffer_bound = buffer_bound;
        self
    }

    /// Sets the per-port wait queue bound.
    pub fn with_queue_bound(mut self, queue_bound: usize) -> Self {
        self.queue_bound = queue_bound;
        self
    }

    /// Sets the drop penalty multiplier.
    pub fn with_drop_penalty_multiplier(mut self, multiplier: f64) -> Self {
        self.drop_penalty_multiplier = multiplier;
        self
    }

    /// Sets the same-tick arrival order.
    pub fn with_arrival_order(mut self, arrival_order: ArrivalOrder) -> Self {
        self.arrival_order = arrival_order;
        self
    }

    /// Sets the eviction policy.
    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    /// Sets the tie-breaker.
    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SchedulerConfig::default();
        assert_eq!(c.ranking, RankingWeights::fifo());
        assert_eq!(c.port_selection, PortSelection::BestFit);
        assert_eq!(c.buffer_bound, BufferBound::PerPort(20));
        assert_eq!(c.queue_bound, 30);
        assert!((c.drop_penalty_multiplier - 2.0).abs() < 1e-10);
        assert_eq!(c.arrival_order, ArrivalOrder::Priority);
        assert_eq!(c.eviction, EvictionPolicy::FrontThenShortest);
        assert_eq!(c.tie_breaker, TieBreaker::Insertion);
    }

    #[test]
    fn test_buffer_bound_resolve() {
        assert_eq!(BufferBound::PerPort(20).resolve(7), 140);
        assert_eq!(BufferBound::Fixed(3).resolve(7), 3);
        assert_eq!(BufferBound::PerPort(20).resolve(0), 0);
    }

    #[test]
    fn test_json_round_trip() {
        let c = SchedulerConfig::new()
            .with_ranking(RankingWeights::new(-6.4, 0.0, 1.0, 0.0))
            .with_port_selection(PortSelection::FirstFit)
            .with_buffer_bound(BufferBound::Fixed(0))
            .with_queue_bound(0)
            .with_drop_penalty_multiplier(3.0)
            .with_arrival_order(ArrivalOrder::Arrival)
            .with_eviction(EvictionPolicy::ShortestDuration)
            .with_tie_breaker(TieBreaker::ById);

        let json = serde_json::to_string(&c).unwrap();
        let back = SchedulerConfig::from_json_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_partial_json() {
        let c = SchedulerConfig::from_json_str(r#"{"queue_bound": 5}"#).unwrap();
        assert_eq!(c.queue_bound, 5);
        assert_eq!(c.buffer_bound, BufferBound::PerPort(20));
    }

    #[test]
    fn test_invalid_json() {
        assert!(SchedulerConfig::from_json_str("{ not json").is_err());
    }
}
