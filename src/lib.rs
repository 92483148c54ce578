//! Chatroom relay
//!
//! A bounded set of bots join a chatroom, broadcast short lines to each
//! other, and leave. The relay owns a fixed client table and one lossy
//! mailbox per client; bots reach it through a fixed-size record protocol.

pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod relay;
pub mod server;

pub use config::RelayConfig;
pub use relay::Dispatcher;
pub use server::Server;
