//! Delivery statistics
//!
//! Broadcast enqueues that lose bytes are never reported to the sender; they
//! are counted here instead.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-broadcast tally of target mailboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub truncated: usize,
    pub dropped: usize,
}

impl DeliveryReport {
    pub fn record(&mut self, accepted: usize, offered: usize) {
        if accepted == offered {
            self.delivered += 1;
        } else if accepted == 0 {
            self.dropped += 1;
        } else {
            self.truncated += 1;
        }
    }

    pub fn targets(&self) -> usize {
        self.delivered + self.truncated + self.dropped
    }

    pub fn is_lossless(&self) -> bool {
        self.truncated == 0 && self.dropped == 0
    }
}

#[derive(Debug, Default)]
pub(crate) struct DeliveryCounters {
    delivered: AtomicU64,
    truncated: AtomicU64,
    dropped: AtomicU64,
}

impl DeliveryCounters {
    pub(crate) fn absorb(&self, report: &DeliveryReport) {
        self.delivered
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.truncated
            .fetch_add(report.truncated as u64, Ordering::Relaxed);
        self.dropped.fetch_add(report.dropped as u64, Ordering::Relaxed);
    }

    pub(crate) fn load(&self) -> (u64, u64, u64) {
        (
            self.delivered.load(Ordering::Relaxed),
            self.truncated.load(Ordering::Relaxed),
            self.dropped.load(Ordering::Relaxed),
        )
    }
}

/// Point-in-time view of the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    pub active_clients: usize,
    pub high_water: usize,
    pub usable_slots: usize,
    pub delivered: u64,
    pub truncated: u64,
    pub dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_classifies_each_target() {
        let mut report = DeliveryReport::default();
        report.record(9, 9);
        report.record(4, 9);
        report.record(0, 9);
        assert_eq!(report.targets(), 3);
        assert_eq!((report.delivered, report.truncated, report.dropped), (1, 1, 1));
        assert!(!report.is_lossless());
    }

    #[test]
    fn counters_accumulate() {
        let counters = DeliveryCounters::default();
        let report = DeliveryReport {
            delivered: 2,
            truncated: 0,
            dropped: 1,
        };
        counters.absorb(&report);
        counters.absorb(&report);
        assert_eq!(counters.load(), (4, 0, 2));
    }
}
