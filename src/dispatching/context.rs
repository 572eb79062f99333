//! Scheduling context for rule evaluation.

/// Runtime scheduling state passed to ranking rules.
///
/// Scores are computed once, when a flow becomes a scheduling candidate, so
/// a context-aware rule sees the tick of that moment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulingContext {
    /// Current simulation tick.
    pub current_time: i64,
}

impl SchedulingContext {
    /// Creates a context at the given tick.
    pub fn at_time(current_time: i64) -> Self {
        Self { current_time }
    }
}
