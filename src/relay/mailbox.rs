//! Module `mailbox`
//!
//! A bounded, lossy FIFO of chat lines owned by one client. Capacity is a
//! byte budget shared by all queued lines; an enqueue that does not fit is
//! truncated or dropped according to the [`OverflowPolicy`], never blocked.

use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mailbox guarded by its own lock, shared between the registry and Receive.
pub type SharedMailbox = Arc<Mutex<Mailbox>>;

/// What a mailbox does with a line that exceeds its remaining budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Keep the prefix that fits.
    #[default]
    Truncate,
    /// Keep the line only if all of it fits.
    Drop,
}

#[derive(Debug)]
pub struct Mailbox {
    capacity: usize,
    queued_bytes: usize,
    policy: OverflowPolicy,
    records: VecDeque<Vec<u8>>,
}

impl Mailbox {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            capacity,
            queued_bytes: 0,
            policy,
            records: VecDeque::new(),
        }
    }

    pub fn shared(capacity: usize, policy: OverflowPolicy) -> SharedMailbox {
        Arc::new(Mutex::new(Self::new(capacity, policy)))
    }

    /// Appends `payload` as one record and returns how many bytes were kept.
    ///
    /// Returns less than `payload.len()` (possibly zero) when the budget is
    /// short. A zero-byte result queues nothing.
    pub fn try_enqueue(&mut self, payload: &[u8]) -> usize {
        let room = self.remaining();
        let accepted = match self.policy {
            OverflowPolicy::Truncate => payload.len().min(room),
            OverflowPolicy::Drop if payload.len() <= room => payload.len(),
            OverflowPolicy::Drop => 0,
        };
        if accepted == 0 {
            return 0;
        }

        self.records.push_back(payload[..accepted].to_vec());
        self.queued_bytes += accepted;
        accepted
    }

    /// Pops the oldest record, cut to `buffer_size` bytes. The part of the
    /// record that does not fit the buffer is discarded.
    pub fn try_dequeue_one(&mut self, buffer_size: usize) -> Option<Vec<u8>> {
        let mut record = self.records.pop_front()?;
        self.queued_bytes -= record.len();
        record.truncate(buffer_size);
        Some(record)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn queued_bytes(&self) -> usize {
        self.queued_bytes
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.queued_bytes
    }

    pub fn is_saturated(&self) -> bool {
        self.queued_bytes == self.capacity
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut mailbox = Mailbox::new(128, OverflowPolicy::Truncate);
        mailbox.try_enqueue(b"first");
        mailbox.try_enqueue(b"second");

        assert_eq!(mailbox.try_dequeue_one(64).unwrap(), b"first");
        assert_eq!(mailbox.try_dequeue_one(64).unwrap(), b"second");
        assert!(mailbox.try_dequeue_one(64).is_none());
        assert_eq!(mailbox.queued_bytes(), 0);
    }

    #[test]
    fn truncates_to_remaining_budget() {
        let mut mailbox = Mailbox::new(10, OverflowPolicy::Truncate);
        assert_eq!(mailbox.try_enqueue(b"123456"), 6);
        assert_eq!(mailbox.try_enqueue(b"abcdef"), 4);
        assert!(mailbox.is_saturated());
        assert_eq!(mailbox.try_enqueue(b"more"), 0);
        assert_eq!(mailbox.len(), 2);

        mailbox.try_dequeue_one(64);
        assert_eq!(mailbox.try_dequeue_one(64).unwrap(), b"abcd");
    }

    #[test]
    fn drop_policy_keeps_whole_lines_only() {
        let mut mailbox = Mailbox::new(10, OverflowPolicy::Drop);
        assert_eq!(mailbox.try_enqueue(b"123456"), 6);
        assert_eq!(mailbox.try_enqueue(b"abcdef"), 0);
        assert_eq!(mailbox.try_enqueue(b"abcd"), 4);
        assert_eq!(mailbox.queued_bytes(), 10);
        assert_eq!(mailbox.len(), 2);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut mailbox = Mailbox::new(128, OverflowPolicy::Truncate);
        for _ in 0..10 {
            mailbox.try_enqueue(&[b'x'; 63]);
            assert!(mailbox.queued_bytes() <= mailbox.capacity());
        }
        assert!(mailbox.is_saturated());
    }

    #[test]
    fn dequeue_cuts_to_buffer() {
        let mut mailbox = Mailbox::new(128, OverflowPolicy::Truncate);
        mailbox.try_enqueue(b"hello world");
        assert_eq!(mailbox.try_dequeue_one(5).unwrap(), b"hello");
        assert!(mailbox.is_empty());
        assert_eq!(mailbox.remaining(), 128);
    }

    #[test]
    fn empty_payload_is_not_queued() {
        let mut mailbox = Mailbox::new(128, OverflowPolicy::Truncate);
        assert_eq!(mailbox.try_enqueue(b""), 0);
        assert!(mailbox.is_empty());
    }
}
