//! Built-in ranking rules.
//!
//! Each rule measures one raw flow quantity. Combined with weights in a
//! [`RuleEngine`](super::RuleEngine) they form the canonical ranking score
//!
//! ```text
//! score = α·duration + β·bandwidth + γ·rate + δ·arrival + ε·inverse_rate
//! ```
//!
//! # Score Convention
//! Lower scores = higher priority. A negative weight turns a rule around
//! (e.g. `-1 × duration` = longest flow first).

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Flow;

/// Sending duration in ticks.
///
/// With a positive weight this is Shortest Processing Time.
#[derive(Debug, Clone, Copy)]
pub struct Duration;

impl DispatchingRule for Duration {
    fn name(&self) -> &'static str {
        "DURATION"
    }

    fn evaluate(&self, flow: &Flow, _context: &SchedulingContext) -> RuleScore {
        flow.duration as f64
    }

    fn description(&self) -> &'static str {
        "Flow duration (ticks)"
    }
}

/// Bandwidth demand.
#[derive(Debug, Clone, Copy)]
pub struct Bandwidth;

impl DispatchingRule for Bandwidth {
    fn name(&self) -> &'static str {
        "BANDWIDTH"
    }

    fn evaluate(&self, flow: &Flow, _context: &SchedulingContext) -> RuleScore {
        flow.bandwidth as f64
    }

    fn description(&self) -> &'static str {
        "Flow bandwidth demand"
    }
}

/// Throughput: `bandwidth / duration`.
#[derive(Debug, Clone, Copy)]
pub struct Rate;

impl DispatchingRule for Rate {
    fn name(&self) -> &'static str {
        "RATE"
    }

    fn evaluate(&self, flow: &Flow, _context: &SchedulingContext) -> RuleScore {
        flow.rate()
    }

    fn description(&self) -> &'static str {
        "Bandwidth per tick of duration"
    }
}

/// Inverse throughput: `duration / bandwidth`.
#[derive(Debug, Clone, Copy)]
pub struct InverseRate;

impl DispatchingRule for InverseRate {
    fn name(&self) -> &'static str {
        "INVERSE_RATE"
    }

    fn evaluate(&self, flow: &Flow, _context: &SchedulingContext) -> RuleScore {
        flow.inverse_rate()
    }

    fn description(&self) -> &'static str {
        "Duration per unit of bandwidth"
    }
}

/// Arrival tick. Alone, this is FIFO by arrival.
#[derive(Debug, Clone, Copy)]
pub struct Arrival;

impl DispatchingRule for Arrival {
    fn name(&self) -> &'static str {
        "ARRIVAL"
    }

    fn evaluate(&self, flow: &Flow, _context: &SchedulingContext) -> RuleScore {
        flow.arrival_time as f64
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let ctx = SchedulingContext::at_time(0);
        let short = Flow::new(0, 100, 0, 5);
        let long = Flow::new(1, 100, 0, 50);
        assert!(Duration.evaluate(&short, &ctx) < Duration.evaluate(&long, &ctx));
        assert!((Duration.evaluate(&long, &ctx) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_bandwidth() {
        let ctx = SchedulingContext::at_time(0);
        let thin = Flow::new(0, 10, 0, 5);
        let fat = Flow::new(1, 900, 0, 5);
        assert!(Bandwidth.evaluate(&thin, &ctx) < Bandwidth.evaluate(&fat, &ctx));
    }

    #[test]
    fn test_rate_and_inverse() {
        let ctx = SchedulingContext::at_time(0);
        let f = Flow::new(0, 200, 0, 8);
        assert!((Rate.evaluate(&f, &ctx) - 25.0).abs() < 1e-10);
        assert!((InverseRate.evaluate(&f, &ctx) - 0.04).abs() < 1e-10);
    }

    #[test]
    fn test_arrival_is_fifo() {
        let ctx = SchedulingContext::at_time(10);
        let first = Flow::new(0, 100, 2, 5);
        let second = Flow::new(1, 1, 7, 1);
        assert!(Arrival.evaluate(&first, &ctx) < Arrival.evaluate(&second, &ctx));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(Arrival.description(), "First In First Out");
        assert_eq!(Rate.name(), "RATE");
    }
}
