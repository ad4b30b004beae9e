//! Participant struct definition
//!
//! Represents a connected participant with their state and communication
//! channel.

use std::net::SocketAddr;

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::protocol::ServerReply;
use crate::types::ConnectionId;

/// Connected participant information
///
/// Holds all state related to a connected participant: their current
/// name, remote address, reply channel, and the peer they are chatting
/// with (if any). The channel is unbounded so routing a line to a peer
/// is a plain enqueue; only the participant's own handler task writes
/// to its socket.
#[derive(Debug)]
pub struct Participant {
    /// Current registered name (starts as a synthesized default)
    pub name: String,
    /// Remote endpoint, for log lines
    pub addr: SocketAddr,
    /// Server → Client reply channel
    pub sender: mpsc::UnboundedSender<ServerReply>,
    /// The peer this participant is chatting with; None means listen mode
    pub peer: Option<ConnectionId>,
}

impl Participant {
    /// Create a new participant with the given name, address, and channel
    pub fn new(name: String, addr: SocketAddr, sender: mpsc::UnboundedSender<ServerReply>) -> Self {
        Self {
            name,
            addr,
            sender,
            peer: None,
        }
    }

    /// Send a reply to this participant
    ///
    /// Returns an error if the channel is closed (participant disconnected).
    pub fn send(&self, reply: ServerReply) -> Result<(), SendError> {
        self.sender.send(reply).map_err(|_| SendError::ChannelClosed)
    }

    /// Check whether this participant is in listen mode (has no peer)
    pub fn is_listening(&self) -> bool {
        self.peer.is_none()
    }
}
