//! Error types
//!
//! Defines the error types for the wire protocol and for the relay's outer
//! surfaces (server startup, client connections).

use std::fmt;
use std::io;

use crate::protocol::CommandCode;

/// Wire protocol errors
#[derive(Debug)]
pub enum ProtocolError {
    FrameTooShort { expected: usize, actual: usize },
    UnknownCommand(u8),
    UnexpectedStatus { command: CommandCode, status: i32 },
    Rejected(i32),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::FrameTooShort { expected, actual } => {
                write!(f, "Frame too short: expected {} bytes, got {}", expected, actual)
            }
            ProtocolError::UnknownCommand(code) => write!(f, "Unknown command code: {}", code),
            ProtocolError::UnexpectedStatus { command, status } => {
                write!(f, "Unexpected status {} for {:?}", status, command)
            }
            ProtocolError::Rejected(status) => {
                write!(f, "Request rejected by relay (status {})", status)
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

/// General relay error that encompasses all error types
#[derive(Debug)]
pub enum RelayError {
    Protocol(ProtocolError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Protocol(e) => write!(f, "Protocol error: {}", e),
            RelayError::Config(e) => write!(f, "Configuration error: {}", e),
            RelayError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Protocol(e) => Some(e),
            RelayError::Config(e) => Some(e),
            RelayError::IoError(e) => Some(e),
        }
    }
}

impl From<ProtocolError> for RelayError {
    fn from(error: ProtocolError) -> Self {
        RelayError::Protocol(error)
    }
}

impl From<config::ConfigError> for RelayError {
    fn from(error: config::ConfigError) -> Self {
        RelayError::Config(error)
    }
}

impl From<io::Error> for RelayError {
    fn from(error: io::Error) -> Self {
        RelayError::IoError(error)
    }
}
