//! Rule engine for weighted flow ranking.
//!
//! Combines rules into a single score (weighted sum) and breaks ties
//! between equal scores with a configurable final strategy.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::rules;
use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Flow;

/// How ties are broken between equal scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreaker {
    /// Keep candidate order: earlier candidates stay ahead (default).
    #[default]
    Insertion,
    /// Deterministic by flow ID (ascending).
    ById,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn DispatchingRule>,
    weight: f64,
}

/// A composable weighted ranking engine.
///
/// # Example
/// ```
/// use u_flowsched::dispatching::{RuleEngine, SchedulingContext, TieBreaker};
/// use u_flowsched::dispatching::rules;
///
/// let engine = RuleEngine::new()
///     .with_weighted_rule(rules::Duration, -6.4)
///     .with_rule(rules::Rate)
///     .with_final_tie_breaker(TieBreaker::ById);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    tie_breaker: TieBreaker,
}

impl RuleEngine {
    /// Creates an empty rule engine. Every flow scores 0.0.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::Insertion,
        }
    }

    /// Adds a rule with weight 1.0.
    pub fn with_rule<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: DispatchingRule + 'static>(
        mut self,
        rule: R,
        weight: f64,
    ) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// The final tie-breaking strategy.
    pub fn tie_breaker(&self) -> TieBreaker {
        self.tie_breaker
    }

    /// Number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Weighted score of a flow. Lower = higher priority.
    pub fn score(&self, flow: &Flow, context: &SchedulingContext) -> RuleScore {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(flow, context) * wr.weight)
            .sum()
    }

    /// Orders two scored flows: by score, then by the final tie-breaker.
    ///
    /// Under [`TieBreaker::Insertion`] equal scores compare `Equal`, so a
    /// stable sort keeps candidate order.
    pub fn compare_scores(&self, a: (RuleScore, u32), b: (RuleScore, u32)) -> Ordering {
        match a.0.total_cmp(&b.0) {
            Ordering::Equal => match self.tie_breaker {
                TieBreaker::Insertion => Ordering::Equal,
                TieBreaker::ById => a.1.cmp(&b.1),
            },
            ord => ord,
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}

/// Coefficients of the canonical ranking score
/// `α·duration + β·bandwidth + γ·rate + δ·arrival + ε·inverse_rate`.
///
/// The default is FIFO by arrival (δ = 1).
///
/// When deserialized, omitted coefficients are zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    /// α
    #[serde(default)]
    pub duration: f64,
    /// β
    #[serde(default)]
    pub bandwidth: f64,
    /// γ
    #[serde(default)]
    pub rate: f64,
    /// δ
    #[serde(default)]
    pub arrival: f64,
    /// ε
    #[serde(default)]
    pub inverse_rate: f64,
}

impl RankingWeights {
    /// Creates weights `(α, β, γ, δ)` with ε = 0.
    pub fn new(duration: f64, bandwidth: f64, rate: f64, arrival: f64) -> Self {
        Self {
            duration,
            bandwidth,
            rate,
            arrival,
            inverse_rate: 0.0,
        }
    }

    /// Pure FIFO by arrival.
    pub fn fifo() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Sets ε, the `duration / bandwidth` weight.
    pub fn with_inverse_rate(mut self, inverse_rate: f64) -> Self {
        self.inverse_rate = inverse_rate;
        self
    }

    /// Builds a rule engine with one rule per non-zero weight.
    pub fn to_rule_engine(&self) -> RuleEngine {
        let mut engine = RuleEngine::new();
        if self.duration != 0.0 {
            engine = engine.with_weighted_rule(rules::Duration, self.duration);
        }
        if self.bandwidth != 0.0 {
            engine = engine.with_weighted_rule(rules::Bandwidth, self.bandwidth);
        }
        if self.rate != 0.0 {
            engine = engine.with_weighted_rule(rules::Rate, self.rate);
        }
        if self.arrival != 0.0 {
            engine = engine.with_weighted_rule(rules::Arrival, self.arrival);
        }
        if self.inverse_rate != 0.0 {
            engine = engine.with_weighted_rule(rules::InverseRate, self.inverse_rate);
        }
        engine
    }
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self::fifo()
    }
}

impl std::fmt::Display for RankingWeights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(α={}, β={}, γ={}, δ={}, ε={})",
            self.duration, self.bandwidth, self.rate, self.arrival, self.inverse_rate
        )
    }
}
