//! Bandwidth-adaptive priority policy
//!
//! [`DynamicPolicy`] measures how much cost each requestor pushes through
//! the resource per monitoring window and nudges priorities to rebalance:
//! heavy consumers drift down, light consumers drift up, and anything
//! between the two thresholds holds steady. Priorities move at most one
//! step per window, so a burst cannot swing a requestor's standing faster
//! than the window allows.
//!
//! Recalibration piggybacks on `schedule`: the first call at or past a
//! window boundary sweeps every tracked requestor. Idle gaps spanning
//! several windows still produce a single sweep.

use crate::clock::Tick;
use crate::policy::table::RequestorTable;
use crate::policy::{Priority, QosPolicy, RequestorId};
use crate::stats::{PolicySnapshot, RequestorSnapshot, ScheduleStats};

/// Priority given to a requestor the first time it is seen (middle of the
/// 8-bit range, leaving equal room to drift in both directions)
pub const INITIAL_PRIORITY: Priority = 128;

/// Lowest priority the bandwidth feedback can demote a requestor to
///
/// Priority 0 is reserved for traffic without any assignment, so demotion
/// stops one level above it.
pub const MIN_ADJUSTED_PRIORITY: Priority = 1;

/// Per-requestor traffic record for the current monitoring window
#[derive(Debug, Clone, Copy)]
pub struct RequestorActivity {
    /// Requests observed in the current window
    pub request_count: u64,
    /// Completion latency accumulated in the current window
    pub total_latency: u64,
    /// Cost accumulated in the current window
    pub bandwidth: u64,
    /// Tick of this requestor's most recent request
    pub last_access: Tick,
    /// Priority the requestor is currently admitted at
    pub priority: Priority,
    /// Bandwidth measured over the last completed window
    pub window_bandwidth: u64,
}

impl RequestorActivity {
    fn first_seen(now: Tick) -> Self {
        Self {
            request_count: 0,
            total_latency: 0,
            bandwidth: 0,
            last_access: now,
            priority: INITIAL_PRIORITY,
            window_bandwidth: 0,
        }
    }
}

/// Bandwidth-driven dynamic priority policy
///
/// Every requestor starts at priority 128. Once per monitoring window the
/// policy sweeps all tracked requestors and compares the bandwidth each one
/// consumed against two thresholds:
///
/// - above `high_bandwidth`: priority drops by one, never below 1
/// - below `low_bandwidth`: priority rises by one, never above 255
/// - inside `[low_bandwidth, high_bandwidth]`: priority holds
///
/// The band between the thresholds keeps well-behaved requestors at a
/// stable priority instead of oscillating around a single set point.
/// Window counters are cleared after every sweep, so each window is judged
/// on its own traffic.
///
/// # Example
/// ```
/// use sluice::{DynamicPolicy, QosPolicy};
///
/// // 1000-tick windows; demote above 4096 cost units, promote below 128
/// let mut policy = DynamicPolicy::new(1_000, 4_096, 128, 16);
/// assert_eq!(policy.schedule(0, 64, 0), 128);
/// ```
pub struct DynamicPolicy {
    activity: RequestorTable<RequestorActivity>,
    window: Tick,
    last_update: Tick,
    high_bandwidth: u64,
    low_bandwidth: u64,
    priority_updates: u64,
    stats: ScheduleStats,
}

impl DynamicPolicy {
    /// Create a dynamic policy
    ///
    /// # Parameters
    /// - `window`: Monitoring window length in ticks
    /// - `high_bandwidth`: Per-window cost above which a requestor is demoted
    /// - `low_bandwidth`: Per-window cost below which a requestor is promoted
    /// - `max_requestors`: Tracking capacity; requestor ids `0..max_requestors`
    ///
    /// Arguments are taken as-is. [`QosConfig`](crate::config::QosConfig)
    /// validates them before building a policy; a zero `window` makes every
    /// call recalibrate.
    pub fn new(
        window: Tick,
        high_bandwidth: u64,
        low_bandwidth: u64,
        max_requestors: usize,
    ) -> Self {
        Self {
            activity: RequestorTable::with_capacity(max_requestors),
            window,
            last_update: 0,
            high_bandwidth,
            low_bandwidth,
            priority_updates: 0,
            stats: ScheduleStats::new(),
        }
    }

    /// Monitoring window length in ticks
    pub fn window(&self) -> Tick {
        self.window
    }

    /// Bandwidth thresholds as `(low, high)`
    pub fn thresholds(&self) -> (u64, u64) {
        (self.low_bandwidth, self.high_bandwidth)
    }

    /// Number of requestors currently tracked
    pub fn tracked(&self) -> usize {
        self.activity.len()
    }

    /// Current priority of a tracked requestor
    pub fn current_priority(&self, requestor: RequestorId) -> Option<Priority> {
        self.activity.get(requestor).map(|record| record.priority)
    }

    /// Traffic record of a tracked requestor
    pub fn activity(&self, requestor: RequestorId) -> Option<&RequestorActivity> {
        self.activity.get(requestor)
    }

    /// Number of recalibration sweeps performed
    pub fn priority_updates(&self) -> u64 {
        self.priority_updates
    }

    /// Feed a completion latency observation for a requestor
    ///
    /// Latency accumulates per window next to the bandwidth counters and is
    /// cleared by the same sweep. It does not influence priorities; it is
    /// kept for hosts that correlate service time with admission level.
    pub fn add_latency_sample(&mut self, requestor: RequestorId, latency: u64) {
        if let Some(record) = self.activity.get_mut(requestor) {
            record.total_latency = record.total_latency.saturating_add(latency);
        }
    }

    /// Sweep all tracked requestors if a full window has elapsed
    fn recalibrate(&mut self, now: Tick) {
        if now.saturating_sub(self.last_update) < self.window {
            return;
        }

        let (low, high) = (self.low_bandwidth, self.high_bandwidth);
        for (requestor, record) in self.activity.iter_mut() {
            let bandwidth = record.bandwidth;

            if bandwidth > high {
                if record.priority > MIN_ADJUSTED_PRIORITY {
                    record.priority -= 1;
                    tracing::trace!(
                        requestor,
                        bandwidth,
                        priority = record.priority,
                        "demoted high-bandwidth requestor"
                    );
                }
            } else if bandwidth < low {
                if record.priority < Priority::MAX {
                    record.priority += 1;
                    tracing::trace!(
                        requestor,
                        bandwidth,
                        priority = record.priority,
                        "promoted low-bandwidth requestor"
                    );
                }
            }

            // Close the window for this requestor
            record.window_bandwidth = bandwidth;
            record.bandwidth = 0;
            record.request_count = 0;
            record.total_latency = 0;
        }

        self.last_update = now;
        self.priority_updates += 1;
        tracing::debug!(
            tick = now,
            requestors = self.activity.len(),
            sweeps = self.priority_updates,
            "recalibrated priorities"
        );
    }
}

impl QosPolicy for DynamicPolicy {
    fn schedule(&mut self, requestor: RequestorId, cost: u64, now: Tick) -> Priority {
        if !self.activity.in_range(requestor) {
            self.stats.record_untracked();
            self.stats.record_decision(INITIAL_PRIORITY);
            tracing::trace!(
                requestor,
                capacity = self.activity.capacity(),
                "requestor outside table capacity, using initial priority"
            );
            return INITIAL_PRIORITY;
        }

        if let Some(record) = self.activity.get_or_insert_with(requestor, || {
            tracing::debug!(requestor, tick = now, "tracking new requestor");
            RequestorActivity::first_seen(now)
        }) {
            record.request_count += 1;
            record.bandwidth = record.bandwidth.saturating_add(cost);
            record.last_access = now;
        }

        self.recalibrate(now);

        let priority =
            self.activity.get(requestor).map_or(INITIAL_PRIORITY, |record| record.priority);
        self.stats.record_decision(priority);
        tracing::trace!(requestor, cost, priority, "scheduled request");
        priority
    }

    fn name(&self) -> &'static str {
        "Dynamic"
    }

    fn reset(&mut self) {
        self.activity.clear();
        self.last_update = 0;
        self.priority_updates = 0;
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
            priority_updates: self.priority_updates,
            requests_per_priority: self.stats.requests_per_priority().to_vec(),
            requestors: self
                .activity
                .iter()
                .map(|(requestor, record)| RequestorSnapshot {
                    requestor,
                    priority: record.priority,
                    bandwidth: record.window_bandwidth,
                })
                .collect(),
        }
    }
}
