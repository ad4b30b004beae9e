//! Shared participant registry
//!
//! Owns every connected participant plus the name index and the pairing
//! relation between them. All mutation happens through the server task,
//! one operation at a time, so every method can update both maps without
//! another caller observing the halfway point.

use std::collections::HashMap;
use std::net::SocketAddr;

use tokio::sync::mpsc;

use crate::error::RenameError;
use crate::participant::Participant;
use crate::protocol::{self, ServerReply};
use crate::types::ConnectionId;

/// Participant registry
///
/// Two maps kept bijective: every connection id appears under exactly
/// one name and every name points back at exactly one connection id.
#[derive(Debug, Default)]
pub struct Registry {
    /// All connected participants by connection id
    participants: HashMap<ConnectionId, Participant>,
    /// Name ownership index; values point into `participants`
    by_name: HashMap<String, ConnectionId>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered participants
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// True when nobody is registered
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Register a new participant under a synthesized default name
    ///
    /// Scans `DefaultName_<n>` upward from the current registry size
    /// until a free slot is found, so a default name abandoned by rename
    /// or disconnect can be reissued. Returns the assigned name.
    pub fn register_default(
        &mut self,
        id: ConnectionId,
        addr: SocketAddr,
        sender: mpsc::UnboundedSender<ServerReply>,
    ) -> String {
        let mut n = self.participants.len();
        let mut name = format!("DefaultName_{}", n);
        while self.by_name.contains_key(&name) {
            n += 1;
            name = format!("DefaultName_{}", n);
        }

        self.participants
            .insert(id, Participant::new(name.clone(), addr, sender));
        self.by_name.insert(name.clone(), id);
        name
    }

    /// Change a participant's name
    ///
    /// The candidate is trimmed first. Rejections, checked in order:
    /// the participant's current name, a reserved protocol keyword, a
    /// blank name, a name held by someone else. A rejection mutates
    /// nothing. Returns the replaced name on success.
    pub fn rename(&mut self, id: ConnectionId, new_name: &str) -> Result<String, RenameError> {
        let new_name = new_name.trim();
        let Some(participant) = self.participants.get_mut(&id) else {
            // Requester already removed; the rejection reply has nowhere to go
            return Err(RenameError::InUse(new_name.to_string()));
        };

        if participant.name == new_name {
            return Err(RenameError::SameName(new_name.to_string()));
        }
        if protocol::is_reserved(new_name) {
            return Err(RenameError::Reserved(new_name.to_string()));
        }
        if new_name.is_empty() {
            return Err(RenameError::Empty);
        }
        if self.by_name.contains_key(new_name) {
            return Err(RenameError::InUse(new_name.to_string()));
        }

        let old_name = std::mem::replace(&mut participant.name, new_name.to_string());
        self.by_name.remove(&old_name);
        self.by_name.insert(new_name.to_string(), id);
        Ok(old_name)
    }

    /// Resolve a name to its connection id
    pub fn lookup(&self, name: &str) -> Option<ConnectionId> {
        self.by_name.get(name).copied()
    }

    /// Get a participant by connection id
    pub fn get(&self, id: ConnectionId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// Remove a participant and release their name
    ///
    /// Idempotent: removing an unknown id returns None. Does not touch
    /// the pairing relation; callers unpair first.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Participant> {
        let participant = self.participants.remove(&id)?;
        self.by_name.remove(&participant.name);
        Some(participant)
    }

    /// Snapshot of all registered names, in no particular order
    pub fn names(&self) -> Vec<String> {
        self.by_name.keys().cloned().collect()
    }

    /// The peer a participant is chatting with, if any
    pub fn peer_of(&self, id: ConnectionId) -> Option<ConnectionId> {
        self.participants.get(&id)?.peer
    }

    /// Link two participants as chat peers
    ///
    /// Sets both peer links in one call. Pairing a participant with
    /// itself is allowed and leaves a single self-link.
    pub fn pair(&mut self, a: ConnectionId, b: ConnectionId) {
        if let Some(participant) = self.participants.get_mut(&a) {
            participant.peer = Some(b);
        }
        if let Some(participant) = self.participants.get_mut(&b) {
            participant.peer = Some(a);
        }
    }

    /// Break a participant's pairing, clearing both peer links
    ///
    /// Returns the former peer's id, or None if the participant was
    /// already listening (or unknown).
    pub fn unpair(&mut self, id: ConnectionId) -> Option<ConnectionId> {
        let peer_id = self.participants.get_mut(&id)?.peer.take()?;
        if let Some(peer) = self.participants.get_mut(&peer_id) {
            peer.peer = None;
        }
        Some(peer_id)
    }
}
