//! Per-requestor QoS priority policies
//!
//! Policies decide WHICH priority a request is admitted at, based on the
//! requestor that issued it. Each shared resource (a memory controller, a
//! storage device, an accelerator queue) owns one policy instance and asks
//! it for a priority on every incoming request.
//!
//! ```text
//! QosPolicy (priority assignment contract)
//! ├── StaticPolicy   fixed per-requestor priorities
//! └── DynamicPolicy  bandwidth-driven recalibration
//! ```
//!
//! Policies never read clocks or shared counters behind the caller's back:
//! the current tick and the request cost arrive as arguments, so a given
//! call sequence always produces the same decisions.

pub mod dynamic;
pub mod static_policy;
pub mod table;

pub use dynamic::{DynamicPolicy, RequestorActivity};
pub use static_policy::StaticPolicy;
pub use table::RequestorTable;

use crate::clock::Tick;
use crate::stats::{PolicySnapshot, ScheduleStats};

/// Identifier of a request source (a core, a DMA engine, an accelerator)
pub type RequestorId = u16;

/// Admission priority of a request; higher values are more important
pub type Priority = u8;

/// Priority for requestors without an explicit assignment
pub const DEFAULT_PRIORITY: Priority = 0;

/// Policy trait for per-requestor priority assignment
///
/// One policy instance serves one shared resource. The host calls
/// [`schedule`](Self::schedule) once per request and uses the returned
/// priority to order admission; the policy keeps whatever bookkeeping it
/// needs between calls.
pub trait QosPolicy: Send {
    /// Assign a priority to one request
    ///
    /// # Parameters
    /// - `requestor`: Id of the request source
    /// - `cost`: Cost of the request (bytes, bus beats, any additive unit)
    /// - `now`: Current tick; must never decrease across calls
    ///
    /// # Returns
    /// The priority the request is admitted at. This never fails: unknown
    /// or untrackable requestors are answered with the policy's default
    /// priority.
    fn schedule(&mut self, requestor: RequestorId, cost: u64, now: Tick) -> Priority;

    /// Get the policy name for logs and exports
    fn name(&self) -> &'static str;

    /// Clear accumulated runtime state
    ///
    /// Configured priority assignments survive a reset; everything learned
    /// from traffic does not.
    fn reset(&mut self);

    /// Access the decision counters
    fn stats(&self) -> &ScheduleStats;

    /// Export the observable state for serialization
    fn snapshot(&self) -> PolicySnapshot;
}
