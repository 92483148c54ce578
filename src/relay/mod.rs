//! Chatroom core
//!
//! The client registry, the per-client mailboxes, and the dispatcher that
//! maps Join/Leave/Send/Receive onto them.

pub mod dispatcher;
pub mod mailbox;
pub mod registry;
pub mod stats;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use dispatcher::{Dispatch, Dispatcher};
pub use mailbox::{Mailbox, OverflowPolicy, SharedMailbox};
pub use registry::{Allocation, ClientEntry, Registry, SlotState};
pub use stats::{DeliveryReport, RelayStats};

/// Size limit of the client table. One slot stays reserved, so at most
/// `MAX_CLIENTS - 1` clients are Active at once.
pub const MAX_CLIENTS: usize = 20;

/// Default per-client mailbox budget in bytes.
pub const MAILBOX_CAPACITY: usize = 128;

/// Locks a relay mutex, taking over a poisoned lock as-is.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
