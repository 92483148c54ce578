//! Client connection management
//!
//! Handles relay connections and the session lifecycle of the ids joined
//! through them.

pub mod handler;
pub mod session;

pub use handler::handle_client;
pub use session::ConnectionSession;
