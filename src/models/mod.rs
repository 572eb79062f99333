//! Flow scheduling domain models.
//!
//! Provides the value types that describe a scheduling problem (flows and
//! ports) and its solution (the assignment trace and drops).
//!
//! # Domain Mappings
//!
//! | u-flowsched | Networking | Batch compute | Logistics |
//! |-------------|------------|---------------|-----------|
//! | Flow | Transfer request | Job | Shipment |
//! | Port | Egress link | Node with N cores | Dock with N bays |
//! | Schedule | Send plan | Placement trace | Loading plan |

mod flow;
mod port;
mod schedule;

pub use flow::{Flow, FlowState};
pub use port::Port;
pub use schedule::{Assignment, DropReason, DroppedFlow, Schedule};
