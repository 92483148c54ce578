//! Chat line payloads
//!
//! A [`Message`] is the opaque payload the relay moves between mailboxes. It
//! is bounded to [`MAX_PAYLOAD_LEN`] bytes so that it always fits a wire
//! record together with its NUL terminator.

use std::borrow::Cow;
use std::fmt;

use crate::protocol::record::MAX_PAYLOAD_LEN;

/// A bounded chat line, conventionally `"<sender-name>: <body>"`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Message {
    bytes: Vec<u8>,
}

impl Message {
    /// Builds a message from raw bytes, stopping at the first NUL and keeping
    /// at most [`MAX_PAYLOAD_LEN`] bytes.
    pub fn new(raw: &[u8]) -> Self {
        let end = raw
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(raw.len())
            .min(MAX_PAYLOAD_LEN);
        Self {
            bytes: raw[..end].to_vec(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes())
    }

    /// Composes the `"<name>: <event>"` line broadcast on join and leave.
    pub fn announcement(name: &str, event: &str) -> Self {
        Self::from_text(&format!("{name}: {event}"))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Text view for display; invalid UTF-8 (e.g. a line cut mid-character)
    /// is replaced rather than rejected.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message({:?})", self.text())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_nul_terminator() {
        let msg = Message::new(b"bob: hey\0garbage");
        assert_eq!(msg.as_bytes(), b"bob: hey");
    }

    #[test]
    fn long_lines_are_capped() {
        let long = "x".repeat(100);
        let msg = Message::from_text(&long);
        assert_eq!(msg.len(), MAX_PAYLOAD_LEN);
    }

    #[test]
    fn announcement_format() {
        assert_eq!(Message::announcement("alice", "joined").text(), "alice: joined");
        assert_eq!(Message::announcement("alice", "left").to_string(), "alice: left");
    }
}
