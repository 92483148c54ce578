//! Error handlers
//!
//! Provides error logging and the mapping from errors to wire status codes.

use crate::error::types::{ProtocolError, RelayError};
use crate::protocol::responses::STATUS_MALFORMED;
use log::error;

/// Handle a relay error
pub fn handle_error(err: &RelayError) {
    error!("Relay error: {}", err);
}

/// Convert a request decode failure to the status sent back for it
pub fn error_to_status(err: &ProtocolError) -> i32 {
    match err {
        ProtocolError::FrameTooShort { .. }
        | ProtocolError::UnknownCommand(_)
        | ProtocolError::UnexpectedStatus { .. }
        | ProtocolError::Rejected(_) => STATUS_MALFORMED,
    }
}
