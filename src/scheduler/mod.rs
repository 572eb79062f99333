//! Online flow scheduler, its data structures, and run evaluation.
//!
//! # Algorithm
//!
//! `FlowScheduler` is a greedy, event-driven simulation: flows are admitted
//! to ports as soon as bandwidth allows, in ranking order, and never moved
//! once admitted. Flows that cannot start wait in a bounded dispatch buffer,
//! then in bounded per-port wait queues, and are dropped with a penalty when
//! both are full.
//!
//! # Components
//!
//! | Type | Role |
//! |------|------|
//! | `PortIndex` | Best-fit / first-fit port lookup |
//! | `CompletionHeap` | In-flight flows by completion tick |
//! | `DispatchBuffer` | Global score-ordered holding area |
//! | `WaitQueue` | Per-port FIFO reservation |
//! | `ScheduleKpi` | Makespan, penalty, wait and utilization metrics |
//! | `ParameterSweep` | Best-of-N ranking coefficients |
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Coffman, Garey & Johnson (1996), "Approximation Algorithms for Bin Packing"

mod completion;
mod config;
mod greedy;
mod kpi;
mod port_index;
mod queue;
mod sweep;

pub use completion::{Completion, CompletionHeap};
pub use config::{ArrivalOrder, BufferBound, EvictionPolicy, PortSelection, SchedulerConfig};
pub use greedy::{FlowScheduler, ScheduleOutcome};
pub use kpi::ScheduleKpi;
pub use port_index::PortIndex;
pub use queue::{BufferEntry, DispatchBuffer, WaitQueue};
pub use sweep::{ParameterSweep, SweepResult};
