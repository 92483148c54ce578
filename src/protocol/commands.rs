//! Module `commands`
//!
//! Defines the four chatroom commands, their wire identifiers, and the
//! outcomes the dispatcher hands back for them.

use crate::error::ProtocolError;
use crate::protocol::message::Message;

/// Opaque client identifier supplied by the client (its process id for bots).
pub type ClientId = i32;

/// Wire identifier of a command, carried in the first byte of a request frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandCode {
    Join = 1,
    Leave = 2,
    Send = 3,
    Receive = 4,
}

impl TryFrom<u8> for CommandCode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CommandCode::Join),
            2 => Ok(CommandCode::Leave),
            3 => Ok(CommandCode::Send),
            4 => Ok(CommandCode::Receive),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }
}

/// A request submitted to the relay.
///
/// Join and Leave carry the display name the relay uses to compose the
/// `"<name>: joined"` / `"<name>: left"` announcements. Send carries an
/// already formatted chat line that is broadcast verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join { id: ClientId, name: String },
    Leave { id: ClientId, name: String },
    Send { id: ClientId, message: Message },
    Receive { id: ClientId },
}

impl Command {
    pub fn client_id(&self) -> ClientId {
        match self {
            Command::Join { id, .. }
            | Command::Leave { id, .. }
            | Command::Send { id, .. }
            | Command::Receive { id } => *id,
        }
    }

    pub fn code(&self) -> CommandCode {
        match self {
            Command::Join { .. } => CommandCode::Join,
            Command::Leave { .. } => CommandCode::Leave,
            Command::Send { .. } => CommandCode::Send,
            Command::Receive { .. } => CommandCode::Receive,
        }
    }

    /// Bytes placed in the record's `msg` field when this command is framed.
    pub fn payload(&self) -> &[u8] {
        match self {
            Command::Join { name, .. } | Command::Leave { name, .. } => name.as_bytes(),
            Command::Send { message, .. } => message.as_bytes(),
            Command::Receive { .. } => &[],
        }
    }
}

/// Outcome of executing a command.
///
/// `Empty` is a normal result of polling an idle mailbox, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Joined,
    Full,
    Left,
    Sent,
    Received(Message),
    Empty,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_codes_match_wire_identifiers() {
        assert_eq!(CommandCode::try_from(1u8).unwrap(), CommandCode::Join);
        assert_eq!(CommandCode::try_from(4u8).unwrap(), CommandCode::Receive);
        assert!(matches!(
            CommandCode::try_from(9u8),
            Err(ProtocolError::UnknownCommand(9))
        ));
        assert!(CommandCode::try_from(0u8).is_err());
    }

    #[test]
    fn payload_follows_command_kind() {
        let join = Command::Join {
            id: 7,
            name: "alice".into(),
        };
        assert_eq!(join.payload(), b"alice");
        assert_eq!(join.code(), CommandCode::Join);

        let send = Command::Send {
            id: 7,
            message: Message::from_text("alice: hi"),
        };
        assert_eq!(send.payload(), b"alice: hi");
        assert_eq!(send.client_id(), 7);

        assert!(Command::Receive { id: 7 }.payload().is_empty());
    }
}
