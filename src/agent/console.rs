//! Console front-end of a bot
//!
//! A write loop that prompts for lines and broadcasts them as
//! `"<name>: <line>"`, and a read loop that polls the bot's own mailbox and
//! prints whatever arrives. Typing `Bye!` (or closing stdin) leaves the
//! chatroom and stops both loops.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

use crate::agent::connection::RelayClient;
use crate::protocol::{ClientId, Message, Outcome};

/// Line that makes a bot leave the chatroom.
pub const FAREWELL: &str = "Bye!";

/// Pause between mailbox polls when nothing is queued.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Identity of the bot running the loops.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub id: ClientId,
    pub name: String,
}

/// Formats a chat line the way peers expect to see it; the result is cut to
/// the wire payload limit.
pub fn compose_line(name: &str, body: &str) -> Message {
    Message::from_text(&format!("{name}: {body}"))
}

/// Client id for a process id, or `None` when the pid does not fit.
pub fn client_id_for_pid(pid: u32) -> Option<ClientId> {
    ClientId::try_from(pid).ok()
}

pub fn is_farewell(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == FAREWELL
}

/// Polls the mailbox until `quit` is raised.
pub async fn read_messages(client: Arc<Mutex<RelayClient>>, bot: BotIdentity, quit: Arc<AtomicBool>) {
    while !quit.load(Ordering::Acquire) {
        let outcome = client.lock().await.receive(bot.id).await;

        match outcome {
            Ok(Outcome::Received(message)) => println!("{}", message),
            Ok(Outcome::Empty) => tokio::time::sleep(POLL_INTERVAL).await,
            Ok(_) | Err(_) => {
                if !quit.load(Ordering::Acquire) {
                    println!("{} - {} read failed", bot.name, bot.id);
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    }
}

/// Reads lines from stdin and sends them until the farewell line, then
/// leaves and raises `quit`.
pub async fn write_messages(client: Arc<Mutex<RelayClient>>, bot: BotIdentity, quit: Arc<AtomicBool>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !quit.load(Ordering::Acquire) {
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => FAREWELL.to_string(),
        };

        if is_farewell(&line) {
            let result = client.lock().await.leave(bot.id, &bot.name).await;
            if !matches!(result, Ok(Outcome::Left)) {
                println!("{} - {} leave chatroom failed", bot.name, bot.id);
            }
            quit.store(true, Ordering::Release);
            break;
        }

        let message = compose_line(&bot.name, &line);
        let result = client.lock().await.send(bot.id, &message.text()).await;
        if !matches!(result, Ok(Outcome::Sent)) {
            println!("{} - {} write failed", bot.name, bot.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MAX_PAYLOAD_LEN;

    #[test]
    fn lines_carry_sender_prefix() {
        assert_eq!(compose_line("alice", "hi").text(), "alice: hi");
    }

    #[test]
    fn long_lines_fit_one_record() {
        let line = compose_line("alice", &"z".repeat(200));
        assert_eq!(line.len(), MAX_PAYLOAD_LEN);
        assert!(line.text().starts_with("alice: zzz"));
    }

    #[test]
    fn pid_must_fit_client_id() {
        assert_eq!(client_id_for_pid(4242), Some(4242));
        assert_eq!(client_id_for_pid(i32::MAX as u32), Some(i32::MAX));
        assert_eq!(client_id_for_pid(i32::MAX as u32 + 1), None);
        assert_eq!(client_id_for_pid(u32::MAX), None);
    }

    #[test]
    fn farewell_detection() {
        assert!(is_farewell("Bye!"));
        assert!(is_farewell("Bye!\r\n"));
        assert!(!is_farewell("bye!"));
        assert!(!is_farewell("Bye! now"));
    }
}
