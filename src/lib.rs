//! Online greedy scheduling of bandwidth-bound flows onto capacity-bound ports.
//!
//! Each flow requests a fixed bandwidth for a fixed number of ticks starting
//! no earlier than its arrival. Ports carry any set of concurrent flows whose
//! bandwidth fits their capacity. The scheduler admits flows as soon as they
//! fit, parks the rest in bounded holding areas, and drops what does not fit
//! there with a penalty. Quality is measured as makespan plus total penalty.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Flow`, `Port`, `Schedule`, `Assignment`, `DroppedFlow`
//! - **`dispatching`**: Ranking policy: `DispatchingRule`, `RuleEngine`, `RankingWeights`
//! - **`scheduler`**: `FlowScheduler`, its data structures, KPIs and `ParameterSweep`
//! - **`validation`**: Input integrity checks (duplicate IDs, degenerate flows and ports)
//! - **`io`**: Dataset files (`flow.txt`, `port.txt`, `result.txt`)
//! - **`workload`**: Seeded synthetic instances
//!
//! # Example
//!
//! ```
//! use u_flowsched::models::{Flow, Port};
//! use u_flowsched::scheduler::{FlowScheduler, ScheduleKpi};
//!
//! let flows = vec![Flow::new(0, 5, 0, 3), Flow::new(1, 6, 0, 2)];
//! let ports = vec![Port::new(0, 10)];
//!
//! let outcome = FlowScheduler::default().schedule(&flows, &ports);
//! let kpi = ScheduleKpi::calculate(&outcome);
//! assert_eq!(kpi.makespan, 5);
//! assert_eq!(kpi.dropped, 0);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Coffman, Garey & Johnson (1996), "Approximation Algorithms for Bin Packing: A Survey"

pub mod dispatching;
pub mod error;
pub mod io;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod workload;

pub use error::{Error, Result};
