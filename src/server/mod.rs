//! Server core functionality
//!
//! Accepts relay connections over TCP and hands each one to the connection
//! handler.

pub mod core;

pub use self::core::Server;
