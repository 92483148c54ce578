//! Relay response handling
//!
//! Defines the wire status codes and converts outcomes to and from response
//! frames.

use crate::error::ProtocolError;
use crate::protocol::commands::{ClientId, CommandCode, Outcome};
use crate::protocol::message::Message;
use crate::protocol::record::{
    RESPONSE_FRAME_LEN, Record, decode_response_frame, encode_response_frame,
};

/// Joined, Left and Sent.
pub const STATUS_SUCCESS: i32 = 1;
/// Receive found nothing queued. A positive status on Receive is the length
/// of the returned line.
pub const STATUS_EMPTY: i32 = 0;
pub const STATUS_FULL: i32 = -1;
pub const STATUS_NOT_FOUND: i32 = -2;
pub const STATUS_MALFORMED: i32 = -3;

/// Wire status for an outcome.
pub fn status_of(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Joined | Outcome::Left | Outcome::Sent => STATUS_SUCCESS,
        Outcome::Received(message) => message.len() as i32,
        Outcome::Empty => STATUS_EMPTY,
        Outcome::Full => STATUS_FULL,
        Outcome::NotFound => STATUS_NOT_FOUND,
    }
}

pub fn encode_response(id: ClientId, outcome: &Outcome) -> [u8; RESPONSE_FRAME_LEN] {
    let payload: &[u8] = match outcome {
        Outcome::Received(message) => message.as_bytes(),
        _ => &[],
    };
    encode_response_frame(status_of(outcome), &Record::new(id, payload))
}

/// Response for a request the relay could not decode.
pub fn encode_rejection(id: ClientId, status: i32) -> [u8; RESPONSE_FRAME_LEN] {
    encode_response_frame(status, &Record::new(id, &[]))
}

/// Interprets a response frame for the command that produced it.
///
/// The status word alone is ambiguous (`1` means Joined, Left or Sent), so the
/// caller supplies the command it sent.
pub fn decode_response(command: CommandCode, frame: &[u8]) -> Result<Outcome, ProtocolError> {
    let (status, record) = decode_response_frame(frame)?;

    if status == STATUS_MALFORMED {
        return Err(ProtocolError::Rejected(status));
    }

    let outcome = match (command, status) {
        (CommandCode::Join, STATUS_SUCCESS) => Outcome::Joined,
        (CommandCode::Join, STATUS_FULL) => Outcome::Full,
        (CommandCode::Leave, STATUS_SUCCESS) => Outcome::Left,
        (CommandCode::Send, STATUS_SUCCESS) => Outcome::Sent,
        (CommandCode::Receive, STATUS_EMPTY) => Outcome::Empty,
        (CommandCode::Receive, STATUS_NOT_FOUND) => Outcome::NotFound,
        (CommandCode::Receive, n) if n > 0 => {
            let payload = record.payload();
            let len = (n as usize).min(payload.len());
            Outcome::Received(Message::new(&payload[..len]))
        }
        (command, status) => return Err(ProtocolError::UnexpectedStatus { command, status }),
    };
    Ok(outcome)
}
