//! Observability counters for policy decisions
//!
//! Every policy carries a [`ScheduleStats`] block that counts scheduling
//! decisions as they happen, plus a serializable [`PolicySnapshot`] for
//! export. Priorities are 8-bit, so the per-priority histogram is an exact
//! 256-bucket table rather than an approximation.

use crate::policy::{Priority, RequestorId};
use serde::Serialize;

/// Number of distinct priority levels (8-bit priority space)
pub const PRIORITY_LEVELS: usize = 256;

/// Decision counters shared by all policies
///
/// Counters only grow between calls to [`reset`](ScheduleStats::reset).
pub struct ScheduleStats {
    total_requests: u64,
    untracked_requests: u64,
    requests_per_priority: Box<[u64; PRIORITY_LEVELS]>,
}

impl ScheduleStats {
    /// Create a zeroed counter block
    pub fn new() -> Self {
        Self {
            total_requests: 0,
            untracked_requests: 0,
            requests_per_priority: Box::new([0; PRIORITY_LEVELS]),
        }
    }

    /// Count one scheduling decision at the returned priority
    pub(crate) fn record_decision(&mut self, priority: Priority) {
        self.total_requests += 1;
        self.requests_per_priority[priority as usize] += 1;
    }

    /// Count one request from a requestor outside the table capacity
    pub(crate) fn record_untracked(&mut self) {
        self.untracked_requests += 1;
    }

    /// Total number of requests processed
    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// Requests from requestors the policy could not track
    ///
    /// These are counted in `total_requests` as well; each one was answered
    /// with the policy's default priority.
    pub fn untracked_requests(&self) -> u64 {
        self.untracked_requests
    }

    /// Requests answered at a specific priority level
    pub fn requests_at(&self, priority: Priority) -> u64 {
        self.requests_per_priority[priority as usize]
    }

    /// Full per-priority histogram, indexed by priority value
    pub fn requests_per_priority(&self) -> &[u64; PRIORITY_LEVELS] {
        &self.requests_per_priority
    }

    /// Reset all counters to zero
    pub fn reset(&mut self) {
        self.total_requests = 0;
        self.untracked_requests = 0;
        self.requests_per_priority.fill(0);
    }
}

impl Default for ScheduleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time export of a policy's observable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicySnapshot {
    /// Policy name, as returned by `QosPolicy::name`
    pub policy: &'static str,
    /// Total number of requests processed
    pub total_requests: u64,
    /// Requests answered with the default priority because the requestor
    /// could not be tracked
    pub untracked_requests: u64,
    /// Recalibration sweeps performed (always 0 for static policies)
    pub priority_updates: u64,
    /// Requests per priority level, indexed by priority value
    pub requests_per_priority: Vec<u64>,
    /// Per-requestor view, ordered by requestor id
    pub requestors: Vec<RequestorSnapshot>,
}

/// Per-requestor entry in a [`PolicySnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestorSnapshot {
    /// Requestor id
    pub requestor: RequestorId,
    /// Priority currently assigned to this requestor
    pub priority: Priority,
    /// Bandwidth measured over the last completed monitoring window
    /// (always 0 for static policies)
    pub bandwidth: u64,
}
