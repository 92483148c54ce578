//! Fixed-size wire records
//!
//! Every request and response carries a `{id, msg}` record: a little-endian
//! `i32` client id followed by a 64-byte message buffer. Requests prefix the
//! record with a one-byte command code, responses with an `i32` status.

use crate::error::ProtocolError;
use crate::protocol::commands::{ClientId, Command};

/// Size of the message buffer in a record.
pub const BUFF_LEN: usize = 64;

/// Usable payload bytes; the last byte is reserved for the NUL terminator.
pub const MAX_PAYLOAD_LEN: usize = BUFF_LEN - 1;

const ID_LEN: usize = std::mem::size_of::<i32>();

/// Encoded size of a `{id, msg}` record.
pub const RECORD_LEN: usize = ID_LEN + BUFF_LEN;

/// Command byte + record.
pub const REQUEST_FRAME_LEN: usize = 1 + RECORD_LEN;

/// Status word + record.
pub const RESPONSE_FRAME_LEN: usize = ID_LEN + RECORD_LEN;

/// The `{id, msg}` record shared by requests and responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: ClientId,
    pub msg: [u8; BUFF_LEN],
}

impl Record {
    /// Builds a record, copying at most [`MAX_PAYLOAD_LEN`] bytes of `payload`
    /// and zero-filling the rest so the buffer is always terminated.
    pub fn new(id: ClientId, payload: &[u8]) -> Self {
        let mut msg = [0u8; BUFF_LEN];
        let len = payload.len().min(MAX_PAYLOAD_LEN);
        msg[..len].copy_from_slice(&payload[..len]);
        Self { id, msg }
    }

    /// Payload bytes up to the first NUL, capped at [`MAX_PAYLOAD_LEN`].
    pub fn payload(&self) -> &[u8] {
        let end = self
            .msg
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(BUFF_LEN)
            .min(MAX_PAYLOAD_LEN);
        &self.msg[..end]
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.payload()).into_owned()
    }

    pub fn write_to(&self, buf: &mut [u8]) {
        buf[..ID_LEN].copy_from_slice(&self.id.to_le_bytes());
        buf[ID_LEN..RECORD_LEN].copy_from_slice(&self.msg);
    }

    pub fn read_from(buf: &[u8]) -> Result<Self, ProtocolError> {
        if buf.len() < RECORD_LEN {
            return Err(ProtocolError::FrameTooShort {
                expected: RECORD_LEN,
                actual: buf.len(),
            });
        }
        let id = read_i32(&buf[..ID_LEN]);
        let mut msg = [0u8; BUFF_LEN];
        msg.copy_from_slice(&buf[ID_LEN..RECORD_LEN]);
        Ok(Self { id, msg })
    }
}

/// Frames a command as `code ‖ id ‖ msg`.
pub fn encode_request(command: &Command) -> [u8; REQUEST_FRAME_LEN] {
    let mut frame = [0u8; REQUEST_FRAME_LEN];
    frame[0] = command.code() as u8;
    Record::new(command.client_id(), command.payload()).write_to(&mut frame[1..]);
    frame
}

/// Frames a response as `status ‖ id ‖ msg`.
pub fn encode_response_frame(status: i32, record: &Record) -> [u8; RESPONSE_FRAME_LEN] {
    let mut frame = [0u8; RESPONSE_FRAME_LEN];
    frame[..ID_LEN].copy_from_slice(&status.to_le_bytes());
    record.write_to(&mut frame[ID_LEN..]);
    frame
}

/// Splits a response frame into its status word and record.
pub fn decode_response_frame(frame: &[u8]) -> Result<(i32, Record), ProtocolError> {
    if frame.len() < RESPONSE_FRAME_LEN {
        return Err(ProtocolError::FrameTooShort {
            expected: RESPONSE_FRAME_LEN,
            actual: frame.len(),
        });
    }
    let status = read_i32(&frame[..ID_LEN]);
    let record = Record::read_from(&frame[ID_LEN..])?;
    Ok((status, record))
}

/// Client id of a request frame, readable even when its command byte is not.
pub fn peek_request_id(frame: &[u8]) -> Option<ClientId> {
    frame.get(1..1 + ID_LEN).map(read_i32)
}

fn read_i32(bytes: &[u8]) -> i32 {
    let mut word = [0u8; ID_LEN];
    word.copy_from_slice(bytes);
    i32::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::message::Message;

    #[test]
    fn frame_sizes() {
        assert_eq!(RECORD_LEN, 68);
        assert_eq!(REQUEST_FRAME_LEN, 69);
        assert_eq!(RESPONSE_FRAME_LEN, 72);
    }

    #[test]
    fn record_keeps_terminator() {
        let full = [b'a'; BUFF_LEN];
        let record = Record::new(3, &full);
        assert_eq!(record.msg[BUFF_LEN - 1], 0);
        assert_eq!(record.payload().len(), MAX_PAYLOAD_LEN);
    }

    #[test]
    fn unterminated_buffer_is_capped() {
        let mut buf = [0u8; RECORD_LEN];
        buf[ID_LEN..].fill(b'z');
        let record = Record::read_from(&buf).unwrap();
        assert_eq!(record.payload().len(), MAX_PAYLOAD_LEN);
    }

    #[test]
    fn request_layout() {
        let frame = encode_request(&Command::Send {
            id: -5,
            message: Message::from_text("bob: yo"),
        });
        assert_eq!(frame[0], 3);
        assert_eq!(peek_request_id(&frame), Some(-5));
        assert_eq!(&frame[5..12], b"bob: yo");
        assert!(frame[12..].iter().all(|&b| b == 0));
    }

    #[test]
    fn short_response_is_rejected() {
        let err = decode_response_frame(&[0u8; 10]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::FrameTooShort {
                expected: RESPONSE_FRAME_LEN,
                actual: 10
            }
        ));
    }
}
