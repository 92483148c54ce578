//! Command dispatcher
//!
//! Single entry point for the four chatroom commands. Join, Leave and Send
//! run entirely under the registry lock, so they are totally ordered with
//! respect to each other. Receive holds the registry lock only long enough
//! to find the caller's mailbox and then drains it under the mailbox's own
//! lock, so polling never stalls a broadcast or a Join/Leave.

use log::{debug, info, warn};
use std::sync::Mutex;

use crate::config::RelayConfig;
use crate::protocol::{BUFF_LEN, ClientId, Command, Message, Outcome};
use crate::relay::lock;
use crate::relay::registry::{Allocation, Registry};
use crate::relay::stats::{DeliveryCounters, DeliveryReport, RelayStats};

pub struct Dispatcher {
    registry: Mutex<Registry>,
    counters: DeliveryCounters,
}

/// An [`Outcome`] together with what a Join did to the client table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub outcome: Outcome,
    /// Set for Join only.
    pub allocation: Option<Allocation>,
}

impl Dispatch {
    fn plain(outcome: Outcome) -> Self {
        Self {
            outcome,
            allocation: None,
        }
    }

    /// True when this very command activated a slot, as opposed to finding
    /// the id already Active.
    pub fn allocated(&self) -> bool {
        matches!(self.allocation, Some(Allocation::Allocated(_)))
    }
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Mutex::new(registry),
            counters: DeliveryCounters::default(),
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(Registry::new(
            config.max_clients,
            config.mailbox_capacity,
            config.overflow_policy,
        ))
    }

    /// Executes one command on the caller's thread. Never blocks beyond the
    /// bounded registry scan and fan-out.
    pub fn execute(&self, command: &Command) -> Outcome {
        self.dispatch(command).outcome
    }

    /// Like [`execute`](Self::execute), but also reports whether a Join
    /// allocated a slot or found the id already Active.
    pub fn dispatch(&self, command: &Command) -> Dispatch {
        match command {
            Command::Join { id, name } => self.join(*id, name),
            Command::Leave { id, name } => Dispatch::plain(self.leave(*id, name)),
            Command::Send { id, message } => Dispatch::plain(self.send(*id, message)),
            Command::Receive { id } => Dispatch::plain(self.receive(*id)),
        }
    }

    fn join(&self, id: ClientId, name: &str) -> Dispatch {
        let announcement = Message::announcement(name, "joined");
        let mut registry = lock(&self.registry);

        let allocation = registry.allocate(id);
        let outcome = match allocation {
            Allocation::Allocated(slot) => {
                info!(
                    "Client {} ({}) joined at slot {} ({}/{} clients)",
                    id,
                    name,
                    slot,
                    registry.active_count(),
                    registry.usable_slots()
                );
                self.broadcast(&registry, id, &announcement);
                Outcome::Joined
            }
            Allocation::AlreadyActive(slot) => {
                warn!("Client {} is already active at slot {}, join ignored", id, slot);
                Outcome::Joined
            }
            Allocation::Full => {
                warn!("Chatroom full, client {} ({}) rejected", id, name);
                Outcome::Full
            }
        };

        Dispatch {
            outcome,
            allocation: Some(allocation),
        }
    }

    fn leave(&self, id: ClientId, name: &str) -> Outcome {
        let departure = Message::announcement(name, "left");
        let mut registry = lock(&self.registry);

        if !registry.is_active(id) {
            debug!("Leave from inactive client {}, nothing to do", id);
            return Outcome::Left;
        }

        // Targets are taken before release so the leaver is still excluded.
        self.broadcast(&registry, id, &departure);
        if let Some(slot) = registry.release(id) {
            info!(
                "Client {} ({}) left slot {} ({}/{} clients)",
                id,
                name,
                slot,
                registry.active_count(),
                registry.usable_slots()
            );
        }
        Outcome::Left
    }

    fn send(&self, id: ClientId, message: &Message) -> Outcome {
        let registry = lock(&self.registry);

        if registry.is_active(id) {
            self.broadcast(&registry, id, message);
        } else {
            debug!("Send from inactive client {} ignored", id);
        }
        Outcome::Sent
    }

    fn receive(&self, id: ClientId) -> Outcome {
        let mailbox = lock(&self.registry).mailbox_of(id);
        let Some(mailbox) = mailbox else {
            return Outcome::NotFound;
        };

        let record = lock(&mailbox).try_dequeue_one(BUFF_LEN);
        match record {
            Some(bytes) => Outcome::Received(Message::new(&bytes)),
            None => Outcome::Empty,
        }
    }

    fn broadcast(&self, registry: &Registry, sender: ClientId, message: &Message) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if message.is_empty() {
            debug!("Empty line from {} not broadcast", sender);
            return report;
        }

        for slot in registry.active_except(sender) {
            if let Some(mailbox) = registry.mailbox_at(slot) {
                let accepted = lock(&mailbox).try_enqueue(message.as_bytes());
                report.record(accepted, message.len());
            }
        }

        if !report.is_lossless() {
            debug!(
                "Broadcast from {} reached {} mailboxes ({} truncated, {} dropped)",
                sender,
                report.targets(),
                report.truncated,
                report.dropped
            );
        }
        self.counters.absorb(&report);
        report
    }

    /// Releases every active client. Called once when the relay shuts down.
    pub fn close(&self) -> usize {
        let released = lock(&self.registry).release_all();
        info!("Chatroom closed, {} clients released", released);
        released
    }

    pub fn slot_of(&self, id: ClientId) -> Option<usize> {
        lock(&self.registry).slot_of(id)
    }

    pub fn stats(&self) -> RelayStats {
        let (delivered, truncated, dropped) = self.counters.load();
        let registry = lock(&self.registry);
        RelayStats {
            active_clients: registry.active_count(),
            high_water: registry.high_water(),
            usable_slots: registry.usable_slots(),
            delivered,
            truncated,
            dropped,
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}
