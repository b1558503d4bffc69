//! Fixed-priority policy

use crate::clock::Tick;
use crate::policy::table::RequestorTable;
use crate::policy::{Priority, QosPolicy, RequestorId, DEFAULT_PRIORITY};
use crate::stats::{PolicySnapshot, RequestorSnapshot, ScheduleStats};

/// Static priority policy with explicit per-requestor assignments
///
/// Priorities are configured up front with [`set_priority`](Self::set_priority)
/// and never change in response to traffic. Requestors without an assignment
/// are admitted at priority 0, the lowest level.
///
/// # Example
/// ```
/// use sluice::{QosPolicy, StaticPolicy};
///
/// let mut policy = StaticPolicy::new(16);
/// policy.set_priority(3, 200);
///
/// assert_eq!(policy.schedule(3, 64, 0), 200);
/// assert_eq!(policy.schedule(7, 64, 0), 0); // no assignment
/// ```
pub struct StaticPolicy {
    priorities: RequestorTable<Priority>,
    stats: ScheduleStats,
}

impl StaticPolicy {
    /// Create a policy with capacity for requestor ids `0..max_requestors`
    pub fn new(max_requestors: usize) -> Self {
        Self {
            priorities: RequestorTable::with_capacity(max_requestors),
            stats: ScheduleStats::new(),
        }
    }

    /// Assign a fixed priority to a requestor
    ///
    /// Reassigning a requestor overwrites its previous value. Ids outside
    /// the table capacity are ignored with a warning.
    pub fn set_priority(&mut self, requestor: RequestorId, priority: Priority) {
        if self.priorities.insert(requestor, priority) {
            tracing::debug!(requestor, priority, "set static priority");
        } else {
            tracing::warn!(
                requestor,
                capacity = self.priorities.capacity(),
                "ignoring priority assignment outside table capacity"
            );
        }
    }

    /// Get the configured priority for a requestor, if any
    pub fn priority_of(&self, requestor: RequestorId) -> Option<Priority> {
        self.priorities.get(requestor).copied()
    }

    /// Number of requestors with an explicit assignment
    pub fn assigned(&self) -> usize {
        self.priorities.len()
    }
}

impl QosPolicy for StaticPolicy {
    fn schedule(&mut self, requestor: RequestorId, _cost: u64, _now: Tick) -> Priority {
        if !self.priorities.in_range(requestor) {
            self.stats.record_untracked();
        }
        let priority = self.priorities.get(requestor).copied().unwrap_or(DEFAULT_PRIORITY);

        self.stats.record_decision(priority);
        tracing::trace!(requestor, priority, "scheduled request");
        priority
    }

    fn name(&self) -> &'static str {
        "Static"
    }

    fn reset(&mut self) {
        // Assignments are configuration and survive the reset
        self.stats.reset();
    }

    fn stats(&self) -> &ScheduleStats {
        &self.stats
    }

    fn snapshot(&self) -> PolicySnapshot {
        PolicySnapshot {
            policy: self.name(),
            total_requests: self.stats.total_requests(),
            untracked_requests: self.stats.untracked_requests(),
            priority_updates: 0,
            requests_per_priority: self.stats.requests_per_priority().to_vec(),
            requestors: self
                .priorities
                .iter()
                .map(|(requestor, &priority)| RequestorSnapshot {
                    requestor,
                    priority,
                    bandwidth: 0,
                })
                .collect(),
        }
    }
}
