//! Relay client connection
//!
//! Speaks the fixed-size record protocol to a running relay. One request is
//! in flight at a time; every request gets exactly one response frame.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::error::RelayError;
use crate::protocol::record::encode_request;
use crate::protocol::{ClientId, Command, Message, Outcome, RESPONSE_FRAME_LEN, decode_response};

pub struct RelayClient {
    stream: TcpStream,
}

impl RelayClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, RelayError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Sends one command and waits for its response.
    pub async fn execute(&mut self, command: &Command) -> Result<Outcome, RelayError> {
        self.stream.write_all(&encode_request(command)).await?;

        let mut response = [0u8; RESPONSE_FRAME_LEN];
        self.stream.read_exact(&mut response).await?;

        Ok(decode_response(command.code(), &response)?)
    }

    pub async fn join(&mut self, id: ClientId, name: &str) -> Result<Outcome, RelayError> {
        self.execute(&Command::Join {
            id,
            name: name.to_string(),
        })
        .await
    }

    pub async fn leave(&mut self, id: ClientId, name: &str) -> Result<Outcome, RelayError> {
        self.execute(&Command::Leave {
            id,
            name: name.to_string(),
        })
        .await
    }

    pub async fn send(&mut self, id: ClientId, line: &str) -> Result<Outcome, RelayError> {
        self.execute(&Command::Send {
            id,
            message: Message::from_text(line),
        })
        .await
    }

    pub async fn receive(&mut self, id: ClientId) -> Result<Outcome, RelayError> {
        self.execute(&Command::Receive { id }).await
    }
}
