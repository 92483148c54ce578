use log::{debug, error, info, warn};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::client::session::ConnectionSession;
use crate::error::handlers::error_to_status;
use crate::protocol::record::peek_request_id;
use crate::protocol::{Command, REQUEST_FRAME_LEN, encode_rejection, encode_response, parse_request};
use crate::relay::Dispatcher;

/// Serves one relay connection using Tokio async runtime.
///
/// - Reads fixed-size request frames with `read_exact`.
/// - Executes each command against the shared `Dispatcher`.
/// - Answers every frame with one response frame; an undecodable frame gets a
///   Malformed status and the connection keeps going.
/// - On disconnect, issues Leave for ids whose slot was allocated through
///   this connection and never left.
pub async fn handle_client(stream: TcpStream, client_addr: SocketAddr, dispatcher: Arc<Dispatcher>) {
    let (mut read_half, mut write_half) = stream.into_split();
    let mut session = ConnectionSession::new(client_addr);
    let mut frame = [0u8; REQUEST_FRAME_LEN];

    loop {
        match read_half.read_exact(&mut frame).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                // Client closed the connection (possibly mid-frame)
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }

        let response = match parse_request(&frame) {
            Ok(command) => {
                debug!("Received from {}: {:?}", client_addr, command);
                let dispatch = dispatcher.dispatch(&command);
                session.record(&command, &dispatch);
                encode_response(command.client_id(), &dispatch.outcome)
            }
            Err(e) => {
                warn!("Malformed request from {}: {}", client_addr, e);
                let id = peek_request_id(&frame).unwrap_or_default();
                encode_rejection(id, error_to_status(&e))
            }
        };

        if let Err(e) = write_half.write_all(&response).await {
            error!("Failed to write to {}: {}", client_addr, e);
            break;
        }
    }

    for (id, name) in session.take_joined() {
        info!("Releasing client {} ({}) left behind by {}", id, name, session.peer_addr());
        dispatcher.execute(&Command::Leave { id, name });
    }

    let stats = dispatcher.stats();
    info!(
        "Client {} disconnected after {} requests ({}/{} clients, {} delivered, {} truncated, {} dropped)",
        session.peer_addr(),
        session.requests(),
        stats.active_clients,
        stats.usable_slots,
        stats.delivered,
        stats.truncated,
        stats.dropped
    );
}
