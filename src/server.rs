//! RelayServer actor implementation
//!
//! The central actor that owns all state: the participant registry,
//! the name index, and the pairing relation. Uses the Actor pattern
//! with mpsc channels for message passing; connection handlers never
//! touch the registry directly, so every transition runs start to
//! finish before the next command is taken.

use std::net::SocketAddr;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::protocol::{ServerReply, LISTENER_SENTINEL};
use crate::registry::Registry;
use crate::types::ConnectionId;

/// Commands sent from connection handlers to the RelayServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection accepted
    Connect {
        connection_id: ConnectionId,
        addr: SocketAddr,
        sender: mpsc::UnboundedSender<ServerReply>,
    },
    /// Connection closed
    Disconnect { connection_id: ConnectionId },
    /// Rename request
    SetName {
        connection_id: ConnectionId,
        name: String,
    },
    /// Pairing request; the target may be the listen sentinel
    ConnectPeer {
        connection_id: ConnectionId,
        target: String,
    },
    /// Plain chat line to route
    Chat {
        connection_id: ConnectionId,
        text: String,
    },
    /// Name listing query
    ListNames { connection_id: ConnectionId },
    /// Own-name query
    OwnName { connection_id: ConnectionId },
    /// Peer-name query
    PeerName { connection_id: ConnectionId },
    /// Graceful disconnect request
    Quit { connection_id: ConnectionId },
    /// Control-prefixed line matching no command
    Invalid {
        connection_id: ConnectionId,
        line: String,
    },
}

/// The main RelayServer actor
///
/// Owns the registry and processes commands from connection handlers
/// one at a time. Replies are enqueued on the recipients' unbounded
/// channels, so no handler saturation can stall this loop.
pub struct RelayServer {
    /// All participant state; mutated only from this actor's loop
    registry: Registry,
    /// The server's listening address, echoed in the welcome banner
    local_addr: SocketAddr,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl RelayServer {
    /// Create a new RelayServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>, local_addr: SocketAddr) -> Self {
        Self {
            registry: Registry::new(),
            local_addr,
            receiver,
        }
    }

    /// Run the RelayServer event loop
    ///
    /// Continuously receives and processes commands until all senders
    /// are dropped.
    pub async fn run(mut self) {
        info!("RelayServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("RelayServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect {
                connection_id,
                addr,
                sender,
            } => {
                self.handle_connect(connection_id, addr, sender);
            }
            ServerCommand::Disconnect { connection_id } => {
                self.handle_disconnect(connection_id);
            }
            ServerCommand::SetName {
                connection_id,
                name,
            } => {
                self.handle_set_name(connection_id, name);
            }
            ServerCommand::ConnectPeer {
                connection_id,
                target,
            } => {
                self.handle_connect_peer(connection_id, target);
            }
            ServerCommand::Chat {
                connection_id,
                text,
            } => {
                self.handle_chat(connection_id, text);
            }
            ServerCommand::ListNames { connection_id } => {
                self.handle_list_names(connection_id);
            }
            ServerCommand::OwnName { connection_id } => {
                self.handle_own_name(connection_id);
            }
            ServerCommand::PeerName { connection_id } => {
                self.handle_peer_name(connection_id);
            }
            ServerCommand::Quit { connection_id } => {
                self.handle_quit(connection_id);
            }
            ServerCommand::Invalid {
                connection_id,
                line,
            } => {
                self.handle_invalid(connection_id, line);
            }
        }
    }

    /// Handle a new connection: register a default name, greet
    fn handle_connect(
        &mut self,
        connection_id: ConnectionId,
        addr: SocketAddr,
        sender: mpsc::UnboundedSender<ServerReply>,
    ) {
        let name = self.registry.register_default(connection_id, addr, sender);
        info!("Connection from {} registered as '{}'", addr, name);

        self.send_to(
            connection_id,
            ServerReply::Welcome {
                local_addr: self.local_addr,
            },
        );
        self.send_to(connection_id, ServerReply::DefaultName { name });

        debug!("Total participants: {}", self.registry.len());
    }

    /// Handle a closed connection
    ///
    /// Idempotent: a graceful quit removes the participant first, and
    /// the handler's trailing Disconnect then finds nothing to do.
    fn handle_disconnect(&mut self, connection_id: ConnectionId) {
        self.teardown_pairing(connection_id);

        let Some(participant) = self.registry.remove(connection_id) else {
            return;
        };
        info!("{} ('{}') has left", participant.addr, participant.name);

        debug!("Total participants: {}", self.registry.len());
    }

    /// Handle a rename request
    fn handle_set_name(&mut self, connection_id: ConnectionId, name: String) {
        match self.registry.rename(connection_id, &name) {
            Ok(old_name) => {
                info!("'{}' is now known as '{}'", old_name, name);
                self.send_to(connection_id, ServerReply::NameSet { name: name.clone() });

                // A rename never breaks a pairing; the peer just hears about it
                if let Some(peer_id) = self.registry.peer_of(connection_id) {
                    self.send_to(peer_id, ServerReply::PeerRenamed { name });
                }
            }
            Err(err) => {
                self.send_to(connection_id, err.into());
            }
        }
    }

    /// Handle a pairing request
    ///
    /// The one state-machine input. Branches, in match order: target is
    /// the current peer; target is the listen sentinel; target absent;
    /// target busy; target free. Whenever a paired requester asks for
    /// anything but its current peer, its pairing is torn down along
    /// the way.
    fn handle_connect_peer(&mut self, connection_id: ConnectionId, target: String) {
        let Some(requester) = self.registry.get(connection_id) else {
            return;
        };
        let current_peer_name = requester
            .peer
            .and_then(|peer_id| self.registry.get(peer_id))
            .map(|peer| peer.name.clone());

        // Asking for the peer you already have changes nothing
        if current_peer_name.as_deref() == Some(target.as_str()) {
            self.send_to(connection_id, ServerReply::AlreadyChatting { name: target });
            return;
        }

        // The sentinel means "back to listen mode"
        if target == LISTENER_SENTINEL {
            match self.teardown_pairing(connection_id) {
                Some(former) => {
                    self.send_to(connection_id, ServerReply::UnpairedToListen { former });
                }
                None => {
                    self.send_to(connection_id, ServerReply::NowListening);
                }
            }
            return;
        }

        let Some(target_id) = self.registry.lookup(&target) else {
            match current_peer_name {
                Some(former) => {
                    self.send_to(
                        connection_id,
                        ServerReply::PeerAbsentUnpairing { target, former },
                    );
                    self.teardown_pairing(connection_id);
                }
                None => {
                    self.send_to(connection_id, ServerReply::PeerAbsent { target });
                }
            }
            return;
        };

        let target_peer_name = self
            .registry
            .peer_of(target_id)
            .and_then(|id| self.registry.get(id))
            .map(|peer| peer.name.clone());

        if let Some(other) = target_peer_name {
            match current_peer_name {
                Some(former) => {
                    self.send_to(
                        connection_id,
                        ServerReply::PeerBusyUnpairing {
                            target,
                            other,
                            former,
                        },
                    );
                    self.teardown_pairing(connection_id);
                }
                None => {
                    self.send_to(connection_id, ServerReply::PeerBusy { target, other });
                }
            }
            return;
        }

        // Target is free; leave any current chat first, then pair up
        if let Some(former) = current_peer_name {
            self.send_to(connection_id, ServerReply::Unpairing { former });
            self.teardown_pairing(connection_id);
        }
        self.establish_pair(connection_id, target_id);
    }

    /// Handle a chat line: forward to the peer, or echo in listen mode
    fn handle_chat(&mut self, connection_id: ConnectionId, text: String) {
        let Some(participant) = self.registry.get(connection_id) else {
            return;
        };

        match participant.peer {
            Some(peer_id) => {
                let from = participant.name.clone();
                self.send_to(peer_id, ServerReply::Chat { from, text });
            }
            None => {
                self.send_to(connection_id, ServerReply::Echo { text });
            }
        }
    }

    /// Handle a name listing query
    fn handle_list_names(&mut self, connection_id: ConnectionId) {
        let names = self.registry.names();
        self.send_to(connection_id, ServerReply::Names { names });
    }

    /// Handle an own-name query
    fn handle_own_name(&mut self, connection_id: ConnectionId) {
        let Some(participant) = self.registry.get(connection_id) else {
            return;
        };
        let name = participant.name.clone();
        self.send_to(connection_id, ServerReply::OwnName { name });
    }

    /// Handle a peer-name query
    fn handle_peer_name(&mut self, connection_id: ConnectionId) {
        let Some(participant) = self.registry.get(connection_id) else {
            return;
        };

        match participant.peer.and_then(|peer_id| self.registry.get(peer_id)) {
            Some(peer) => {
                let name = peer.name.clone();
                self.send_to(connection_id, ServerReply::PeerName { name });
            }
            None => {
                self.send_to(connection_id, ServerReply::NoPeerName);
            }
        }
    }

    /// Handle a graceful quit: farewell first, then the usual teardown
    ///
    /// Removing the registry entry drops our end of the reply channel;
    /// the handler drains what is queued (farewell included) and closes
    /// the socket.
    fn handle_quit(&mut self, connection_id: ConnectionId) {
        let Some(participant) = self.registry.get(connection_id) else {
            return;
        };
        let name = participant.name.clone();

        self.send_to(connection_id, ServerReply::Farewell { name });
        self.handle_disconnect(connection_id);
    }

    /// Handle an unrecognized control line
    fn handle_invalid(&mut self, connection_id: ConnectionId, line: String) {
        self.send_to(connection_id, ServerReply::InvalidControl { line });
    }

    /// Helper: link two participants and confirm to each side
    ///
    /// Pairing a participant with itself sends both confirmations to
    /// the same channel.
    fn establish_pair(&mut self, a: ConnectionId, b: ConnectionId) {
        self.registry.pair(a, b);

        let a_name = self.registry.get(a).map(|p| p.name.clone());
        let b_name = self.registry.get(b).map(|p| p.name.clone());
        let (Some(a_name), Some(b_name)) = (a_name, b_name) else {
            return;
        };

        info!("'{}' and '{}' are now chatting", a_name, b_name);
        self.send_to(a, ServerReply::PairedWith { peer: b_name });
        self.send_to(b, ServerReply::PairedWith { peer: a_name });
    }

    /// Helper: break a participant's pairing, telling the peer left behind
    ///
    /// Returns the former peer's name, or None if the participant was
    /// listening (or unknown).
    fn teardown_pairing(&mut self, connection_id: ConnectionId) -> Option<String> {
        let name = self.registry.get(connection_id)?.name.clone();
        let peer_id = self.registry.unpair(connection_id)?;
        let peer_name = self.registry.get(peer_id).map(|peer| peer.name.clone());

        info!(
            "'{}' and '{}' stopped chatting",
            name,
            peer_name.as_deref().unwrap_or("?")
        );
        self.send_to(peer_id, ServerReply::PeerExited { name });
        peer_name
    }

    /// Helper: best-effort reply delivery
    ///
    /// A missing participant or a closed channel means the recipient is
    /// already gone; the reply is dropped.
    fn send_to(&self, connection_id: ConnectionId, reply: ServerReply) {
        if let Some(participant) = self.registry.get(connection_id) {
            let _ = participant.send(reply);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    struct TestConn {
        id: ConnectionId,
        rx: mpsc::UnboundedReceiver<ServerReply>,
    }

    impl TestConn {
        /// Everything queued so far
        fn drain(&mut self) -> Vec<ServerReply> {
            let mut replies = Vec::new();
            while let Ok(reply) = self.rx.try_recv() {
                replies.push(reply);
            }
            replies
        }

        fn closed(&mut self) -> bool {
            matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
        }
    }

    fn local_addr() -> SocketAddr {
        "127.0.0.1:50048".parse().unwrap()
    }

    fn test_server() -> RelayServer {
        let (_tx, rx) = mpsc::channel(8);
        RelayServer::new(rx, local_addr())
    }

    fn connect(server: &mut RelayServer) -> TestConn {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        server.handle_command(ServerCommand::Connect {
            connection_id: id,
            addr: "127.0.0.1:9999".parse().unwrap(),
            sender: tx,
        });
        TestConn { id, rx }
    }

    /// Connect and discard the greeting
    fn connect_quiet(server: &mut RelayServer) -> TestConn {
        let mut conn = connect(server);
        conn.drain();
        conn
    }

    fn request_peer(server: &mut RelayServer, conn: &TestConn, target: &str) {
        server.handle_command(ServerCommand::ConnectPeer {
            connection_id: conn.id,
            target: target.to_string(),
        });
    }

    #[test]
    fn test_connect_greets_with_default_name() {
        let mut server = test_server();
        let mut conn = connect(&mut server);

        assert_eq!(
            conn.drain(),
            vec![
                ServerReply::Welcome {
                    local_addr: local_addr()
                },
                ServerReply::DefaultName {
                    name: "DefaultName_0".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_pair_and_chat() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);

        request_peer(&mut server, &a, "DefaultName_1");
        assert_eq!(
            a.drain(),
            vec![ServerReply::PairedWith {
                peer: "DefaultName_1".to_string()
            }]
        );
        assert_eq!(
            b.drain(),
            vec![ServerReply::PairedWith {
                peer: "DefaultName_0".to_string()
            }]
        );

        server.handle_command(ServerCommand::Chat {
            connection_id: a.id,
            text: "hi".to_string(),
        });
        assert_eq!(
            b.drain(),
            vec![ServerReply::Chat {
                from: "DefaultName_0".to_string(),
                text: "hi".to_string()
            }]
        );
        // The sender sees nothing back when paired
        assert_eq!(a.drain(), vec![]);
    }

    #[test]
    fn test_listening_chat_echoes() {
        let mut server = test_server();
        let mut conn = connect_quiet(&mut server);

        server.handle_command(ServerCommand::Chat {
            connection_id: conn.id,
            text: "anyone?".to_string(),
        });
        assert_eq!(
            conn.drain(),
            vec![ServerReply::Echo {
                text: "anyone?".to_string()
            }]
        );
    }

    #[test]
    fn test_rename_notifies_peer() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);
        request_peer(&mut server, &a, "DefaultName_1");
        a.drain();
        b.drain();

        server.handle_command(ServerCommand::SetName {
            connection_id: a.id,
            name: "Alice".to_string(),
        });
        assert_eq!(
            a.drain(),
            vec![ServerReply::NameSet {
                name: "Alice".to_string()
            }]
        );
        assert_eq!(
            b.drain(),
            vec![ServerReply::PeerRenamed {
                name: "Alice".to_string()
            }]
        );
        // Still paired
        assert_eq!(server.registry.peer_of(a.id), Some(b.id));
    }

    #[test]
    fn test_rename_conflict_keeps_old_name() {
        let mut server = test_server();
        let a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);

        server.handle_command(ServerCommand::SetName {
            connection_id: a.id,
            name: "Alice".to_string(),
        });
        server.handle_command(ServerCommand::SetName {
            connection_id: b.id,
            name: "Alice".to_string(),
        });
        assert_eq!(
            b.drain(),
            vec![ServerReply::NameInUse {
                name: "Alice".to_string()
            }]
        );

        server.handle_command(ServerCommand::OwnName {
            connection_id: b.id,
        });
        assert_eq!(
            b.drain(),
            vec![ServerReply::OwnName {
                name: "DefaultName_1".to_string()
            }]
        );
    }

    #[test]
    fn test_sentinel_unpairs_both_sides() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);
        request_peer(&mut server, &a, "DefaultName_1");
        a.drain();
        b.drain();

        request_peer(&mut server, &a, LISTENER_SENTINEL);
        assert_eq!(
            a.drain(),
            vec![ServerReply::UnpairedToListen {
                former: "DefaultName_1".to_string()
            }]
        );
        assert_eq!(
            b.drain(),
            vec![ServerReply::PeerExited {
                name: "DefaultName_0".to_string()
            }]
        );
        assert_eq!(server.registry.peer_of(a.id), None);
        assert_eq!(server.registry.peer_of(b.id), None);
    }

    #[test]
    fn test_sentinel_while_listening() {
        let mut server = test_server();
        let mut conn = connect_quiet(&mut server);

        request_peer(&mut server, &conn, LISTENER_SENTINEL);
        assert_eq!(conn.drain(), vec![ServerReply::NowListening]);
    }

    #[test]
    fn test_absent_target_while_listening() {
        let mut server = test_server();
        let mut conn = connect_quiet(&mut server);

        request_peer(&mut server, &conn, "Ghost");
        assert_eq!(
            conn.drain(),
            vec![ServerReply::PeerAbsent {
                target: "Ghost".to_string()
            }]
        );
        assert_eq!(server.registry.peer_of(conn.id), None);
    }

    #[test]
    fn test_absent_target_drops_current_chat() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);
        request_peer(&mut server, &a, "DefaultName_1");
        a.drain();
        b.drain();

        request_peer(&mut server, &a, "Ghost");
        assert_eq!(
            a.drain(),
            vec![ServerReply::PeerAbsentUnpairing {
                target: "Ghost".to_string(),
                former: "DefaultName_1".to_string()
            }]
        );
        assert_eq!(
            b.drain(),
            vec![ServerReply::PeerExited {
                name: "DefaultName_0".to_string()
            }]
        );
        assert_eq!(server.registry.peer_of(a.id), None);
        assert_eq!(server.registry.peer_of(b.id), None);
    }

    #[test]
    fn test_busy_target_rejected() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let b = connect_quiet(&mut server);
        let mut c = connect_quiet(&mut server);
        request_peer(&mut server, &a, "DefaultName_1");
        a.drain();

        request_peer(&mut server, &c, "DefaultName_1");
        assert_eq!(
            c.drain(),
            vec![ServerReply::PeerBusy {
                target: "DefaultName_1".to_string(),
                other: "DefaultName_0".to_string()
            }]
        );
        assert_eq!(server.registry.peer_of(c.id), None);
        // The established pair is untouched
        assert_eq!(server.registry.peer_of(a.id), Some(b.id));
    }

    #[test]
    fn test_busy_target_drops_current_chat() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);
        let mut c = connect_quiet(&mut server);
        let mut d = connect_quiet(&mut server);
        request_peer(&mut server, &a, "DefaultName_1");
        request_peer(&mut server, &c, "DefaultName_3");
        a.drain();
        b.drain();
        c.drain();
        d.drain();

        request_peer(&mut server, &c, "DefaultName_0");
        assert_eq!(
            c.drain(),
            vec![ServerReply::PeerBusyUnpairing {
                target: "DefaultName_0".to_string(),
                other: "DefaultName_1".to_string(),
                former: "DefaultName_3".to_string()
            }]
        );
        assert_eq!(
            d.drain(),
            vec![ServerReply::PeerExited {
                name: "DefaultName_2".to_string()
            }]
        );
        assert_eq!(server.registry.peer_of(c.id), None);
        assert_eq!(server.registry.peer_of(d.id), None);
        assert_eq!(server.registry.peer_of(a.id), Some(b.id));
    }

    #[test]
    fn test_switching_to_free_target() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);
        let mut c = connect_quiet(&mut server);
        request_peer(&mut server, &a, "DefaultName_1");
        a.drain();
        b.drain();

        request_peer(&mut server, &a, "DefaultName_2");
        assert_eq!(
            a.drain(),
            vec![
                ServerReply::Unpairing {
                    former: "DefaultName_1".to_string()
                },
                ServerReply::PairedWith {
                    peer: "DefaultName_2".to_string()
                },
            ]
        );
        assert_eq!(
            b.drain(),
            vec![ServerReply::PeerExited {
                name: "DefaultName_0".to_string()
            }]
        );
        assert_eq!(
            c.drain(),
            vec![ServerReply::PairedWith {
                peer: "DefaultName_0".to_string()
            }]
        );
        assert_eq!(server.registry.peer_of(a.id), Some(c.id));
        assert_eq!(server.registry.peer_of(b.id), None);
    }

    #[test]
    fn test_requesting_current_peer_changes_nothing() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);
        request_peer(&mut server, &a, "DefaultName_1");
        a.drain();
        b.drain();

        request_peer(&mut server, &a, "DefaultName_1");
        assert_eq!(
            a.drain(),
            vec![ServerReply::AlreadyChatting {
                name: "DefaultName_1".to_string()
            }]
        );
        assert_eq!(b.drain(), vec![]);
        assert_eq!(server.registry.peer_of(a.id), Some(b.id));
    }

    #[test]
    fn test_self_pairing() {
        let mut server = test_server();
        let mut conn = connect_quiet(&mut server);

        request_peer(&mut server, &conn, "DefaultName_0");
        // Both confirmations land on the same channel
        assert_eq!(
            conn.drain(),
            vec![
                ServerReply::PairedWith {
                    peer: "DefaultName_0".to_string()
                },
                ServerReply::PairedWith {
                    peer: "DefaultName_0".to_string()
                },
            ]
        );
        assert_eq!(server.registry.peer_of(conn.id), Some(conn.id));

        // Self-paired is not listening: chat comes back as a forward
        server.handle_command(ServerCommand::Chat {
            connection_id: conn.id,
            text: "hello me".to_string(),
        });
        assert_eq!(
            conn.drain(),
            vec![ServerReply::Chat {
                from: "DefaultName_0".to_string(),
                text: "hello me".to_string()
            }]
        );
    }

    #[test]
    fn test_disconnect_notifies_peer() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        let mut b = connect_quiet(&mut server);
        request_peer(&mut server, &a, "DefaultName_1");
        a.drain();
        b.drain();

        server.handle_command(ServerCommand::Disconnect {
            connection_id: a.id,
        });
        assert_eq!(
            b.drain(),
            vec![ServerReply::PeerExited {
                name: "DefaultName_0".to_string()
            }]
        );
        assert_eq!(server.registry.peer_of(b.id), None);
        assert_eq!(server.registry.lookup("DefaultName_0"), None);
        assert_eq!(server.registry.len(), 1);
    }

    #[test]
    fn test_quit_sends_farewell_then_closes_channel() {
        let mut server = test_server();
        let mut conn = connect_quiet(&mut server);

        server.handle_command(ServerCommand::Quit {
            connection_id: conn.id,
        });
        assert_eq!(
            conn.drain(),
            vec![ServerReply::Farewell {
                name: "DefaultName_0".to_string()
            }]
        );
        assert!(conn.closed());
        assert!(server.registry.is_empty());

        // The handler's trailing Disconnect finds nothing to do
        server.handle_command(ServerCommand::Disconnect {
            connection_id: conn.id,
        });
        assert!(server.registry.is_empty());
    }

    #[test]
    fn test_list_names() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        connect_quiet(&mut server);
        connect_quiet(&mut server);

        server.handle_command(ServerCommand::ListNames {
            connection_id: a.id,
        });
        let replies = a.drain();
        let [ServerReply::Names { names }] = replies.as_slice() else {
            panic!("expected one Names reply, got {:?}", replies);
        };
        let mut names = names.clone();
        names.sort();
        assert_eq!(names, vec!["DefaultName_0", "DefaultName_1", "DefaultName_2"]);
    }

    #[test]
    fn test_peer_name_query() {
        let mut server = test_server();
        let mut a = connect_quiet(&mut server);
        connect_quiet(&mut server);

        server.handle_command(ServerCommand::PeerName {
            connection_id: a.id,
        });
        assert_eq!(a.drain(), vec![ServerReply::NoPeerName]);

        request_peer(&mut server, &a, "DefaultName_1");
        a.drain();
        server.handle_command(ServerCommand::PeerName {
            connection_id: a.id,
        });
        assert_eq!(
            a.drain(),
            vec![ServerReply::PeerName {
                name: "DefaultName_1".to_string()
            }]
        );
    }

    #[test]
    fn test_invalid_control_line() {
        let mut server = test_server();
        let mut conn = connect_quiet(&mut server);

        server.handle_command(ServerCommand::Invalid {
            connection_id: conn.id,
            line: "C0NTR0L:DO A FLIP".to_string(),
        });
        assert_eq!(
            conn.drain(),
            vec![ServerReply::InvalidControl {
                line: "C0NTR0L:DO A FLIP".to_string()
            }]
        );
    }
}
