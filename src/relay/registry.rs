//! Client registry
//!
//! A fixed-capacity table of client slots. Slots are never removed: leaving
//! marks a slot Inactive and the next Join reuses the lowest Inactive index
//! before the table grows. The last of the `max_clients` slots is never
//! handed out, so at most `max_clients - 1` clients are Active at once.

use std::sync::Arc;

use crate::protocol::ClientId;
use crate::relay::mailbox::{Mailbox, OverflowPolicy, SharedMailbox};
use crate::relay::{MAILBOX_CAPACITY, MAX_CLIENTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Active,
    Inactive,
}

/// One slot of the client table. Holds a mailbox only while Active.
#[derive(Debug)]
pub struct ClientEntry {
    id: ClientId,
    state: SlotState,
    mailbox: Option<SharedMailbox>,
}

impl ClientEntry {
    fn active(id: ClientId, mailbox: SharedMailbox) -> Self {
        Self {
            id,
            state: SlotState::Active,
            mailbox: Some(mailbox),
        }
    }

    fn activate(&mut self, id: ClientId, mailbox: SharedMailbox) {
        self.id = id;
        self.state = SlotState::Active;
        self.mailbox = Some(mailbox);
    }

    /// Drops the registry's handle on the mailbox; queued lines are discarded
    /// once no Receive still holds it.
    fn deactivate(&mut self) {
        self.state = SlotState::Inactive;
        self.mailbox = None;
    }

    pub fn is_active(&self) -> bool {
        self.state == SlotState::Active
    }

    fn is_active_as(&self, id: ClientId) -> bool {
        self.is_active() && self.id == id
    }
}

/// Result of [`Registry::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// A slot was activated for the id.
    Allocated(usize),
    /// The id already holds this slot; nothing changed.
    AlreadyActive(usize),
    /// Every usable slot is Active.
    Full,
}

/// Registry for tracking active clients
#[derive(Debug)]
pub struct Registry {
    table: Vec<ClientEntry>,
    max_clients: usize,
    mailbox_capacity: usize,
    overflow_policy: OverflowPolicy,
}

impl Registry {
    /// `max_clients` is clamped to [`MAX_CLIENTS`].
    pub fn new(max_clients: usize, mailbox_capacity: usize, overflow_policy: OverflowPolicy) -> Self {
        let max_clients = max_clients.min(MAX_CLIENTS);
        Self {
            table: Vec::with_capacity(max_clients.saturating_sub(1)),
            max_clients,
            mailbox_capacity,
            overflow_policy,
        }
    }

    /// Activates a slot for `id`, reusing the lowest Inactive slot first.
    pub fn allocate(&mut self, id: ClientId) -> Allocation {
        if let Some(slot) = self.slot_of(id) {
            return Allocation::AlreadyActive(slot);
        }

        if let Some(slot) = self.table.iter().position(|entry| !entry.is_active()) {
            let mailbox = self.fresh_mailbox();
            self.table[slot].activate(id, mailbox);
            return Allocation::Allocated(slot);
        }

        if self.table.len() < self.usable_slots() {
            let mailbox = self.fresh_mailbox();
            self.table.push(ClientEntry::active(id, mailbox));
            return Allocation::Allocated(self.table.len() - 1);
        }

        Allocation::Full
    }

    /// Marks the Active slot of `id` Inactive and returns its index, or
    /// `None` when `id` holds no slot.
    pub fn release(&mut self, id: ClientId) -> Option<usize> {
        let slot = self.slot_of(id)?;
        self.table[slot].deactivate();
        Some(slot)
    }

    /// Deactivates every slot and returns how many were Active.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for entry in self.table.iter_mut().filter(|entry| entry.is_active()) {
            entry.deactivate();
            released += 1;
        }
        released
    }

    /// Indices of Active slots other than `id`'s, in table order.
    pub fn active_except(&self, id: ClientId) -> impl Iterator<Item = usize> + '_ {
        self.table
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.is_active() && entry.id != id)
            .map(|(slot, _)| slot)
    }

    pub fn mailbox_of(&self, id: ClientId) -> Option<SharedMailbox> {
        self.slot_of(id).and_then(|slot| self.mailbox_at(slot))
    }

    pub fn mailbox_at(&self, slot: usize) -> Option<SharedMailbox> {
        self.table.get(slot)?.mailbox.as_ref().map(Arc::clone)
    }

    pub fn slot_of(&self, id: ClientId) -> Option<usize> {
        self.table.iter().position(|entry| entry.is_active_as(id))
    }

    pub fn is_active(&self, id: ClientId) -> bool {
        self.slot_of(id).is_some()
    }

    /// Number of slots ever allocated.
    pub fn high_water(&self) -> usize {
        self.table.len()
    }

    pub fn active_count(&self) -> usize {
        self.table.iter().filter(|entry| entry.is_active()).count()
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }

    /// Slots a Join can ever occupy: one less than `max_clients`.
    pub fn usable_slots(&self) -> usize {
        self.max_clients.saturating_sub(1)
    }

    fn fresh_mailbox(&self) -> SharedMailbox {
        Mailbox::shared(self.mailbox_capacity, self.overflow_policy)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(MAX_CLIENTS, MAILBOX_CAPACITY, OverflowPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::lock;

    #[test]
    fn last_slot_is_never_allocated() {
        let mut registry = Registry::default();
        for id in 0..(MAX_CLIENTS - 1) as ClientId {
            assert_eq!(registry.allocate(id), Allocation::Allocated(id as usize));
        }
        assert_eq!(registry.high_water(), MAX_CLIENTS - 1);

        // the MAX_CLIENTS-th Join
        assert_eq!(registry.allocate(1000), Allocation::Full);
        assert_eq!(registry.high_water(), MAX_CLIENTS - 1);
        assert_eq!(registry.usable_slots(), MAX_CLIENTS - 1);
    }

    #[test]
    fn reuses_lowest_inactive_slot() {
        let mut registry = Registry::default();
        for id in 10..15 {
            registry.allocate(id);
        }
        registry.release(13);
        registry.release(11);

        assert_eq!(registry.allocate(20), Allocation::Allocated(1));
        assert_eq!(registry.allocate(21), Allocation::Allocated(3));
        assert_eq!(registry.allocate(22), Allocation::Allocated(5));
        assert_eq!(registry.high_water(), 6);
    }

    #[test]
    fn full_table_accepts_again_after_release() {
        let mut registry = Registry::new(3, 128, OverflowPolicy::Truncate);
        registry.allocate(1);
        registry.allocate(2);
        assert_eq!(registry.allocate(3), Allocation::Full);

        registry.release(1);
        assert_eq!(registry.allocate(3), Allocation::Allocated(0));
    }

    #[test]
    fn duplicate_join_keeps_single_slot() {
        let mut registry = Registry::default();
        registry.allocate(7);
        assert_eq!(registry.allocate(7), Allocation::AlreadyActive(0));
        assert_eq!(registry.active_count(), 1);
        assert_eq!(registry.high_water(), 1);
    }

    #[test]
    fn release_of_absent_id_is_noop() {
        let mut registry = Registry::default();
        registry.allocate(1);
        assert_eq!(registry.release(99), None);
        assert_eq!(registry.release(1), Some(0));
        assert_eq!(registry.release(1), None);
        assert!(!registry.is_active(1));
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.high_water(), 1);
    }

    #[test]
    fn active_except_skips_sender_and_inactive() {
        let mut registry = Registry::default();
        for id in 1..=4 {
            registry.allocate(id);
        }
        registry.release(3);
        let targets: Vec<usize> = registry.active_except(2).collect();
        assert_eq!(targets, vec![0, 3]);
    }

    #[test]
    fn reused_slot_gets_fresh_mailbox() {
        let mut registry = Registry::default();
        registry.allocate(1);
        let mailbox = registry.mailbox_of(1).unwrap();
        lock(&mailbox).try_enqueue(b"stale");

        registry.release(1);
        assert!(registry.mailbox_of(1).is_none());

        registry.allocate(2);
        let fresh = registry.mailbox_of(2).unwrap();
        assert!(lock(&fresh).is_empty());
    }

    #[test]
    fn max_clients_is_clamped() {
        let registry = Registry::new(500, 128, OverflowPolicy::Drop);
        assert_eq!(registry.max_clients(), MAX_CLIENTS);
        assert_eq!(registry.usable_slots(), MAX_CLIENTS - 1);
    }

    #[test]
    fn single_slot_table_admits_nobody() {
        let mut registry = Registry::new(1, 128, OverflowPolicy::Truncate);
        assert_eq!(registry.allocate(1), Allocation::Full);
        assert_eq!(registry.high_water(), 0);
    }
}
