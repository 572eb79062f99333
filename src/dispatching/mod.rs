//! Ranking rules and rule engine for flow prioritization.
//!
//! A ranking policy is a weighted linear combination of per-flow rules.
//! Different coefficient sets are different instances of the same policy,
//! so the scheduler only ever sees one [`RuleEngine`].
//!
//! # Usage
//!
//! ```
//! use u_flowsched::dispatching::{RankingWeights, RuleEngine, SchedulingContext};
//! use u_flowsched::dispatching::rules;
//! use u_flowsched::models::Flow;
//!
//! let engine = RankingWeights::new(-6.4, 0.0, 1.0, 0.0).to_rule_engine();
//! let flow = Flow::new(0, 500, 3, 10);
//! let score = engine.score(&flow, &SchedulingContext::at_time(3));
//! assert!((score - (-6.4 * 10.0 + 50.0)).abs() < 1e-9);
//!
//! let fifo = RuleEngine::new().with_rule(rules::Arrival);
//! assert!((fifo.score(&flow, &SchedulingContext::at_time(3)) - 3.0).abs() < 1e-9);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::{RankingWeights, RuleEngine, TieBreaker};

use crate::models::Flow;
use std::fmt::Debug;

/// Score returned by a ranking rule.
///
/// Lower scores = higher priority (dispatched first, evicted first).
pub type RuleScore = f64;

/// A rule that evaluates one aspect of a flow's priority.
///
/// # Score Convention
/// **Lower score = higher priority.** A rule returns the raw quantity it
/// measures; the sign and magnitude of its influence come from the weight
/// it is given in a [`RuleEngine`].
///
/// Rules must be pure: the same flow and context always yield the same score.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "DURATION", "RATE").
    fn name(&self) -> &'static str;

    /// Evaluates the flow given the current scheduling context.
    fn evaluate(&self, flow: &Flow, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
