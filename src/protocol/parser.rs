//! Request parsing
//!
//! Turns a raw request frame into a [`Command`].

use crate::error::ProtocolError;
use crate::protocol::commands::{Command, CommandCode};
use crate::protocol::message::Message;
use crate::protocol::record::{REQUEST_FRAME_LEN, Record};

/// Parses a `code ‖ id ‖ msg` request frame.
///
/// Join and Leave read the display name from `msg`; Send reads the chat
/// line; Receive ignores `msg`.
pub fn parse_request(frame: &[u8]) -> Result<Command, ProtocolError> {
    if frame.len() < REQUEST_FRAME_LEN {
        return Err(ProtocolError::FrameTooShort {
            expected: REQUEST_FRAME_LEN,
            actual: frame.len(),
        });
    }

    let code = CommandCode::try_from(frame[0])?;
    let record = Record::read_from(&frame[1..])?;
    let id = record.id;

    let command = match code {
        CommandCode::Join => Command::Join {
            id,
            name: record.text(),
        },
        CommandCode::Leave => Command::Leave {
            id,
            name: record.text(),
        },
        CommandCode::Send => Command::Send {
            id,
            message: Message::new(record.payload()),
        },
        CommandCode::Receive => Command::Receive { id },
    };
    Ok(command)
}
