//! Connection session management
//!
//! Remembers which client ids joined through a connection so they can be
//! released when the connection goes away without a Leave. Only ids whose
//! slot this connection allocated are tracked; a Join that found the id
//! already Active belongs to whoever joined first.

use std::net::SocketAddr;

use crate::protocol::{ClientId, Command, Outcome};
use crate::relay::Dispatch;

/// Per-connection bookkeeping
pub struct ConnectionSession {
    peer_addr: SocketAddr,
    joined: Vec<(ClientId, String)>,
    requests: u64,
}

impl ConnectionSession {
    pub fn new(peer_addr: SocketAddr) -> Self {
        Self {
            peer_addr,
            joined: Vec::new(),
            requests: 0,
        }
    }

    /// Updates the joined set from a command and what executing it did.
    pub fn record(&mut self, command: &Command, dispatch: &Dispatch) {
        self.requests += 1;
        match (command, &dispatch.outcome) {
            (Command::Join { id, name }, Outcome::Joined) if dispatch.allocated() => {
                self.joined.push((*id, name.clone()));
            }
            (Command::Leave { id, .. }, Outcome::Left) => {
                self.joined.retain(|(joined, _)| joined != id);
            }
            _ => {}
        }
    }

    /// Ids still joined, emptying the session.
    pub fn take_joined(&mut self) -> Vec<(ClientId, String)> {
        std::mem::take(&mut self.joined)
    }

    pub fn joined_ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.joined.iter().map(|(id, _)| *id)
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Message;
    use crate::relay::Allocation;

    fn session() -> ConnectionSession {
        ConnectionSession::new("127.0.0.1:4000".parse().unwrap())
    }

    fn dispatched(outcome: Outcome, allocation: Option<Allocation>) -> Dispatch {
        Dispatch {
            outcome,
            allocation,
        }
    }

    fn join(id: ClientId, name: &str) -> Command {
        Command::Join {
            id,
            name: name.into(),
        }
    }

    #[test]
    fn tracks_join_and_leave() {
        let mut session = session();
        session.record(
            &join(1, "alice"),
            &dispatched(Outcome::Joined, Some(Allocation::Allocated(0))),
        );
        session.record(
            &join(1, "alice"),
            &dispatched(Outcome::Joined, Some(Allocation::AlreadyActive(0))),
        );
        session.record(
            &join(2, "bob"),
            &dispatched(Outcome::Joined, Some(Allocation::Allocated(1))),
        );
        assert_eq!(session.joined_ids().collect::<Vec<_>>(), vec![1, 2]);

        session.record(
            &Command::Leave {
                id: 1,
                name: "alice".into(),
            },
            &dispatched(Outcome::Left, None),
        );
        assert_eq!(session.take_joined(), vec![(2, "bob".to_string())]);
        assert_eq!(session.joined_ids().count(), 0);
        assert_eq!(session.requests(), 4);
        assert_eq!(session.peer_addr().port(), 4000);
    }

    #[test]
    fn failed_join_is_not_tracked() {
        let mut session = session();
        session.record(&join(1, "alice"), &dispatched(Outcome::Full, Some(Allocation::Full)));
        session.record(
            &Command::Send {
                id: 1,
                message: Message::from_text("alice: hi"),
            },
            &dispatched(Outcome::Sent, None),
        );
        assert!(session.take_joined().is_empty());
    }

    #[test]
    fn join_of_id_active_elsewhere_is_not_tracked() {
        let mut session = session();
        session.record(
            &join(1, "imposter"),
            &dispatched(Outcome::Joined, Some(Allocation::AlreadyActive(0))),
        );
        assert!(session.take_joined().is_empty());
    }
}
