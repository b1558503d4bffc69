//! Sluice: per-requestor QoS policies for shared resources
//!
//! Sluice assigns an admission priority to every request arriving at a
//! shared resource (a memory controller, a storage device, an accelerator
//! queue), based on which requestor issued it. Two policies are provided:
//!
//! - [`StaticPolicy`]: fixed priorities configured up front
//! - [`DynamicPolicy`]: priorities recalibrated from per-window bandwidth
//!
//! Hosts drive a policy with one [`QosPolicy::schedule`] call per request
//! and read decisions back through [`ScheduleStats`] counters and
//! serializable [`PolicySnapshot`] exports. Time is whatever the host says
//! it is: every call carries the current [`Tick`], so simulators and live
//! systems use the same code paths.
//!
//! ```
//! use sluice::{PolicyConfig, QosConfig, QosPolicy};
//!
//! let config = QosConfig {
//!     max_requestors: 8,
//!     policy: PolicyConfig::Dynamic {
//!         monitoring_window: 1_000,
//!         high_bandwidth_threshold: 4_096,
//!         low_bandwidth_threshold: 128,
//!     },
//! };
//!
//! let mut policy = config.create_policy()?;
//! assert_eq!(policy.schedule(0, 64, 0), 128);
//! # Ok::<(), sluice::Error>(())
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod policy;
pub mod stats;

pub use clock::{ManualTicks, MonotonicTicks, Tick, TickSource};
pub use config::{PolicyConfig, QosConfig, StaticAssignment};
pub use error::{Error, Result};
pub use policy::{
    DynamicPolicy, Priority, QosPolicy, RequestorActivity, RequestorId, RequestorTable,
    StaticPolicy, DEFAULT_PRIORITY,
};
pub use stats::{PolicySnapshot, RequestorSnapshot, ScheduleStats};
