//! Online greedy flow scheduler.
//!
//! # Algorithm
//!
//! Discrete time starts at the earliest arrival. At each tick `t`:
//!
//! 1. **Release**: every in-flight flow completing at `t` returns its
//!    bandwidth; the owning port's wait queue is then promoted in FIFO order
//!    while its head fits.
//! 2. **Admission**: flows arriving at `t` are scored and, in priority (or
//!    input) order, admitted to the port chosen by the port index. A flow
//!    that does not fit is inserted into the dispatch buffer.
//! 3. **Overflow**: whenever the buffer exceeds its bound, the buffer front
//!    is moved onto the wait queue of the smallest-capacity port that can
//!    ever carry it (shortest queue on ties). If that queue is full, the
//!    shortest buffered flow is tried the same way instead, and dropped with
//!    a `multiplier × duration` penalty if its queue is full too. Other
//!    eviction policies pick a single victim.
//! 4. **Drain**: the buffer front is admitted while it fits some port.
//! 5. **Advance** to the next tick at which an arrival or a completion
//!    happens. Ticks without either change nothing.
//!
//! A flow wider than every port is dropped on arrival. Placing a flow on a
//! wait queue promotes that queue immediately, so a non-empty wait queue
//! always has in-flight work on its port and is guaranteed to be revisited.
//!
//! # Complexity
//! O(F·(log F + P + B)) where F = flows, P = ports, B = buffer bound.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use std::collections::VecDeque;

use log::{debug, info, trace, warn};

use super::completion::{Completion, CompletionHeap};
use super::config::{ArrivalOrder, EvictionPolicy, SchedulerConfig};
use super::port_index::PortIndex;
use super::queue::{BufferEntry, DispatchBuffer, WaitQueue};
use crate::dispatching::{RuleEngine, SchedulingContext};
use crate::models::{Assignment, DropReason, DroppedFlow, Flow, FlowState, Port, Schedule};

/// Result of one scheduling pass.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// Assignment trace and drops.
    pub schedule: Schedule,
    /// Final state of every flow, in input order.
    pub flows: Vec<Flow>,
    /// Final state of every port, in input order.
    pub ports: Vec<Port>,
}

impl ScheduleOutcome {
    /// Objective: makespan plus drop penalties.
    pub fn objective(&self) -> f64 {
        self.schedule.objective()
    }

    /// Latest completion tick of an admitted flow.
    pub fn makespan(&self) -> i64 {
        self.schedule.makespan()
    }

    /// Number of flows in a given state.
    pub fn count_in_state(&self, state: FlowState) -> usize {
        self.flows.iter().filter(|f| f.state == state).count()
    }
}

/// Online greedy flow-to-port scheduler.
///
/// Holds only configuration; every call to [`schedule`](Self::schedule)
/// works on private copies of the flows and ports, so runs are repeatable
/// and independent.
///
/// # Example
///
/// ```
/// use u_flowsched::models::{Flow, Port};
/// use u_flowsched::scheduler::{FlowScheduler, SchedulerConfig};
///
/// let flows = vec![Flow::new(0, 5, 0, 3), Flow::new(1, 6, 0, 2)];
/// let ports = vec![Port::new(0, 10)];
///
/// let outcome = FlowScheduler::new(SchedulerConfig::default()).schedule(&flows, &ports);
/// assert_eq!(outcome.schedule.trace(), vec![(0, 0, 0), (1, 0, 3)]);
/// assert_eq!(outcome.makespan(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct FlowScheduler {
    config: SchedulerConfig,
    rule_engine: RuleEngine,
}

impl FlowScheduler {
    /// Creates a scheduler whose ranking comes from `config.ranking`.
    pub fn new(config: SchedulerConfig) -> Self {
        let rule_engine = config
            .ranking
            .to_rule_engine()
            .with_final_tie_breaker(config.tie_breaker);
        Self {
            config,
            rule_engine,
        }
    }

    /// Replaces the ranking with a custom rule engine.
    ///
    /// The engine's tie-breaker takes precedence over `config.tie_breaker`.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.config.tie_breaker = engine.tie_breaker();
        self.rule_engine = engine;
        self
    }

    /// The policy configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedules `flows` onto `ports`.
    pub fn schedule(&self, flows: &[Flow], ports: &[Port]) -> ScheduleOutcome {
        let mut run = Run::new(self, flows, ports);
        run.execute();
        let outcome = run.finish();
        info!(
            "scheduled {} flows on {} ports: admitted={}, dropped={}, makespan={}, objective={}",
            flows.len(),
            ports.len(),
            outcome.schedule.assignment_count(),
            outcome.schedule.drop_count(),
            outcome.makespan(),
            outcome.objective()
        );
        outcome
    }
}

impl Default for FlowScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

/// Mutable state of one scheduling pass.
struct Run<'a> {
    scheduler: &'a FlowScheduler,
    flows: Vec<Flow>,
    index: PortIndex,
    completions: CompletionHeap,
    buffer: DispatchBuffer,
    wait_queues: Vec<WaitQueue>,
    pending: VecDeque<usize>,
    schedule: Schedule,
    buffer_bound: usize,
    max_capacity: u64,
}

impl<'a> Run<'a> {
    fn new(scheduler: &'a FlowScheduler, flows: &[Flow], ports: &[Port]) -> Self {
        let config = &scheduler.config;
        let flows: Vec<Flow> = flows
            .iter()
            .map(|f| Flow::new(f.id, f.bandwidth, f.arrival_time, f.duration))
            .collect();

        let mut pending: Vec<usize> = (0..flows.len()).collect();
        pending.sort_by_key(|&i| (flows[i].arrival_time, flows[i].bandwidth, flows[i].duration));

        let ports: Vec<Port> = ports.iter().map(|p| Port::new(p.id, p.capacity)).collect();
        let index = PortIndex::new(ports, config.port_selection);

        Self {
            scheduler,
            wait_queues: (0..index.len())
                .map(|_| WaitQueue::new(config.queue_bound))
                .collect(),
            buffer_bound: config.buffer_bound.resolve(index.len()),
            max_capacity: index.max_capacity(),
            buffer: DispatchBuffer::new(scheduler.rule_engine.tie_breaker()),
            completions: CompletionHeap::new(),
            pending: pending.into(),
            schedule: Schedule::new(),
            flows,
            index,
        }
    }

    fn execute(&mut self) {
        let Some(mut time) = self.next_arrival() else {
            return;
        };
        loop {
            self.release_due(time);
            self.admit_arrivals(time);
            self.drain(time);
            match self.next_event(time) {
                Some(next) => time = next,
                None => break,
            }
        }
        self.drop_stranded(time);
    }

    fn finish(self) -> ScheduleOutcome {
        debug_assert!(self.flows.iter().all(|f| f.state.is_terminal()));
        ScheduleOutcome {
            schedule: self.schedule,
            flows: self.flows,
            ports: self.index.into_ports(),
        }
    }

    fn next_arrival(&self) -> Option<i64> {
        self.pending.front().map(|&i| self.flows[i].arrival_time)
    }

    /// Next tick at which something can change, strictly after `time`.
    fn next_event(&self, time: i64) -> Option<i64> {
        let next = match (self.next_arrival(), self.completions.next_completion_time()) {
            (Some(a), Some(c)) => a.min(c),
            (Some(a), None) => a,
            (None, Some(c)) => c,
            (None, None) => return None,
        };
        Some(next.max(time.saturating_add(1)))
    }

    fn release_due(&mut self, time: i64) {
        while let Some(done) = self.completions.pop_due(time) {
            self.index.release(done.port, done.bandwidth);
            self.flows[done.flow].transition(FlowState::Completed);
            trace!(
                "t={}: flow {} released {} on port {}",
                time,
                self.flows[done.flow].id,
                done.bandwidth,
                self.index.port(done.port).id
            );
            self.promote(done.port, time);
        }
    }

    fn admit_arrivals(&mut self, time: i64) {
        let context = SchedulingContext::at_time(time);
        let mut arrivals = Vec::new();
        while let Some(&i) = self.pending.front() {
            if self.flows[i].arrival_time > time {
                break;
            }
            self.pending.pop_front();
            let score = self.scheduler.rule_engine.score(&self.flows[i], &context);
            self.flows[i].priority_score = Some(score);
            arrivals.push(i);
        }

        if self.scheduler.config.arrival_order == ArrivalOrder::Priority {
            let engine = &self.scheduler.rule_engine;
            let flows = &self.flows;
            arrivals.sort_by(|&a, &b| {
                engine.compare_scores(
                    (flows[a].priority_score.unwrap_or(0.0), flows[a].id),
                    (flows[b].priority_score.unwrap_or(0.0), flows[b].id),
                )
            });
        }

        for i in arrivals {
            let bandwidth = self.flows[i].bandwidth;
            if bandwidth > self.max_capacity {
                self.drop_flow(i, time, DropReason::Unschedulable);
                continue;
            }
            match self.index.find(bandwidth) {
                Some(port) => self.admit(i, port, time),
                None => self.enqueue(i, time),
            }
        }
    }

    fn enqueue(&mut self, i: usize, time: i64) {
        let flow = &self.flows[i];
        self.buffer.insert(BufferEntry {
            flow: i,
            id: flow.id,
            score: flow.priority_score.unwrap_or(0.0),
            duration: flow.duration,
        });
        self.flows[i].transition(FlowState::Buffered);

        if self.buffer.len() > self.buffer_bound {
            self.overflow(time);
        }
    }

    fn overflow(&mut self, time: i64) {
        let policy = self.scheduler.config.eviction;
        if policy == EvictionPolicy::FrontThenShortest && self.reserve_front(time) {
            return;
        }
        let Some(victim) = self.buffer.evict(policy) else {
            return;
        };
        let i = victim.flow;
        let Some(port) = self.reservation_port(self.flows[i].bandwidth) else {
            self.drop_flow(i, time, DropReason::Unschedulable);
            return;
        };
        if self.wait_queues[port].is_full() {
            self.drop_flow(i, time, DropReason::QueueFull);
            return;
        }
        self.reserve(i, port, time);
    }

    /// Moves the buffer front onto its reservation queue if that queue has room.
    fn reserve_front(&mut self, time: i64) -> bool {
        let Some(i) = self.buffer.front().map(|e| e.flow) else {
            return false;
        };
        match self.reservation_port(self.flows[i].bandwidth) {
            Some(port) if !self.wait_queues[port].is_full() => {
                self.buffer.pop_front();
                self.reserve(i, port, time);
                true
            }
            _ => false,
        }
    }

    /// Appends flow `i` to the wait queue of `port`, which must have room.
    fn reserve(&mut self, i: usize, port: usize, time: i64) {
        let pushed = self.wait_queues[port].try_push(i);
        debug_assert!(pushed, "flow reserved on a full wait queue");
        let port_id = self.index.port(port).id;
        self.flows[i].assigned_port = Some(port_id);
        self.flows[i].transition(FlowState::Queued);
        debug!(
            "t={}: buffer overflow, flow {} queued on port {} ({} waiting)",
            time,
            self.flows[i].id,
            port_id,
            self.wait_queues[port].len()
        );
        self.promote(port, time);
    }

    /// Smallest-capacity port able to carry `bandwidth`, shortest wait queue
    /// on ties, then lowest ID.
    fn reservation_port(&self, bandwidth: u64) -> Option<usize> {
        (0..self.index.len())
            .filter(|&p| self.index.port(p).capacity >= bandwidth)
            .min_by_key(|&p| {
                let port = self.index.port(p);
                (port.capacity, self.wait_queues[p].len(), port.id)
            })
    }

    /// Admits queued flows on `port` in FIFO order while the head fits.
    fn promote(&mut self, port: usize, time: i64) {
        while let Some(i) = self.wait_queues[port].front() {
            if !self.index.port(port).fits(self.flows[i].bandwidth) {
                break;
            }
            self.wait_queues[port].pop_front();
            self.admit(i, port, time);
        }
    }

    fn drain(&mut self, time: i64) {
        while let Some(front) = self.buffer.front() {
            let i = front.flow;
            let Some(port) = self.index.find(self.flows[i].bandwidth) else {
                break;
            };
            self.buffer.pop_front();
            self.admit(i, port, time);
        }
    }

    fn admit(&mut self, i: usize, port: usize, time: i64) {
        let bandwidth = self.flows[i].bandwidth;
        let admitted = self.index.admit(port, bandwidth);
        debug_assert!(admitted, "flow admitted to a port it does not fit");

        let port_id = self.index.port(port).id;
        let flow = &mut self.flows[i];
        flow.start(port_id, time);
        let end = time.saturating_add(flow.duration);

        self.completions.push(Completion {
            completion_time: end,
            flow: i,
            port,
            bandwidth,
        });
        self.schedule
            .add_assignment(Assignment::new(flow.id, port_id, time, end, bandwidth));
        trace!(
            "t={}: flow {} admitted on port {} until {}",
            time,
            flow.id,
            port_id,
            end
        );
    }

    fn drop_flow(&mut self, i: usize, time: i64, reason: DropReason) {
        let penalty = self.scheduler.config.drop_penalty_multiplier * self.flows[i].duration as f64;
        let flow = &mut self.flows[i];
        flow.transition(FlowState::Dropped);
        self.schedule.add_drop(DroppedFlow {
            flow_id: flow.id,
            time,
            penalty,
            reason,
        });
        debug!(
            "t={}: flow {} dropped ({:?}), penalty {}",
            time, flow.id, reason, penalty
        );
    }

    fn drop_stranded(&mut self, time: i64) {
        if self.buffer.is_empty() {
            return;
        }
        warn!(
            "t={}: {} flows left in the buffer with no pending events",
            time,
            self.buffer.len()
        );
        let stranded: Vec<usize> = self.buffer.drain().map(|e| e.flow).collect();
        for i in stranded {
            self.drop_flow(i, time, DropReason::Stranded);
        }
    }
}
