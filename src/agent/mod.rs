//! Client agent
//!
//! The client side of the relay protocol and the console loops a bot runs.

pub mod connection;
pub mod console;

pub use connection::RelayClient;
pub use console::{BotIdentity, client_id_for_pid, compose_line, read_messages, write_messages};

/// Address bots connect to when none is given.
pub const DEFAULT_RELAY_ADDR: &str = "127.0.0.1:7070";
