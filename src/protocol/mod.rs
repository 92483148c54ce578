//! Relay protocol implementation
//!
//! Handles the four chatroom commands, fixed-size record framing, and
//! response status codes.

pub mod commands;
pub mod message;
pub mod parser;
pub mod record;
pub mod responses;

pub use commands::{ClientId, Command, CommandCode, Outcome};
pub use message::Message;
pub use parser::parse_request;
pub use record::{BUFF_LEN, MAX_PAYLOAD_LEN, REQUEST_FRAME_LEN, RESPONSE_FRAME_LEN, Record};
pub use responses::{decode_response, encode_rejection, encode_response};
