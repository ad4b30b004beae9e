//! Line protocol definitions
//!
//! Inbound lines parse into [`Request`]s; everything the server says back
//! is a [`ServerReply`] whose `Display` impl is the wire format. Control
//! commands ride ordinary lines behind the `C0NTR0L:` prefix.

use std::fmt;
use std::net::SocketAddr;

use crate::error::RenameError;

/// Prefix marking an inbound line as a control message.
pub const CONTROL_PREFIX: &str = "C0NTR0L:";

/// Name standing for "no peer". Clients request it to leave a chat;
/// replies use it to describe listen mode. Nobody may take it as a name.
pub const LISTENER_SENTINEL: &str = "Listener";

/// Control command tokens, matched as substrings of the control line.
pub const CMD_DISCONNECT: &str = "DISCONNECT FROM SERVER";
pub const CMD_SET_NAME: &str = "SET MY NAME=";
pub const CMD_SET_PEER: &str = "CONNECT TO PEER WITH NAME=";
pub const CMD_LIST_NAMES: &str = "GET CONNECTED CLIENT NAMES";
pub const CMD_OWN_NAME: &str = "GET MY NAME";
pub const CMD_PEER_NAME: &str = "GET MY PEER'S NAME";

/// Names nobody may claim: the sentinel plus every message-origin label
/// that appears at the start of a protocol line.
pub const RESERVED_NAMES: [&str; 7] = [
    LISTENER_SENTINEL,
    "SVR",
    "SVR LOG",
    CONTROL_PREFIX,
    "You",
    "LISTENER_MODE_ECHO",
    "GUI",
];

/// True if `name` collides with a protocol keyword.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Everything after the first occurrence of `token`, or None if absent.
fn value_after<'a>(line: &'a str, token: &str) -> Option<&'a str> {
    line.find(token).map(|idx| &line[idx + token.len()..])
}

/// Client → Server request
///
/// One decoded line maps to exactly one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Plain chat line (no control prefix); routed by pairing state
    Chat(String),
    /// Rename request; value is trimmed
    SetName(String),
    /// Pairing request; value deliberately NOT trimmed
    ConnectPeer(String),
    /// Query the list of registered names
    ListNames,
    /// Query the requester's own name
    OwnName,
    /// Query the current peer's name
    PeerName,
    /// Graceful disconnect request
    Quit,
    /// Control-prefixed line matching no command; carries the raw line
    Invalid(String),
}

impl Request {
    /// Parse one inbound line.
    ///
    /// Any line not starting with `C0NTR0L:` is chat. Control lines match
    /// command tokens as substrings, first hit wins in the order below;
    /// the value of an `=` command is everything after the first
    /// occurrence of its token.
    pub fn parse(line: &str) -> Self {
        if !line.starts_with(CONTROL_PREFIX) {
            return Request::Chat(line.to_string());
        }

        if line.contains(CMD_DISCONNECT) {
            Request::Quit
        } else if let Some(value) = value_after(line, CMD_SET_NAME) {
            Request::SetName(value.trim().to_string())
        } else if let Some(value) = value_after(line, CMD_SET_PEER) {
            Request::ConnectPeer(value.to_string())
        } else if line.contains(CMD_LIST_NAMES) {
            Request::ListNames
        } else if line.contains(CMD_OWN_NAME) {
            Request::OwnName
        } else if line.contains(CMD_PEER_NAME) {
            Request::PeerName
        } else {
            Request::Invalid(line.to_string())
        }
    }
}

/// Server → Client line
///
/// Every line the server emits, as data. `Display` renders the exact
/// wire text (without the trailing newline; the codec adds that).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerReply {
    /// Connection greeting, names the server's listening address
    Welcome { local_addr: SocketAddr },
    /// Announces the synthesized default name
    DefaultName { name: String },
    /// Acknowledges a graceful quit; the server closes after sending it
    Farewell { name: String },
    /// Answer to an own-name query
    OwnName { name: String },
    /// Answer to a peer-name query while paired
    PeerName { name: String },
    /// Answer to a peer-name query while listening
    NoPeerName,
    /// Answer to a name-listing query
    Names { names: Vec<String> },
    /// The control line matched no command
    InvalidControl { line: String },
    /// Rename succeeded
    NameSet { name: String },
    /// Rename rejected: already the requester's name
    NameIsCurrent { name: String },
    /// Rename rejected: protocol keyword
    NameReserved { name: String },
    /// Rename rejected: blank after trimming
    NameBlank,
    /// Rename rejected: held by another client
    NameInUse { name: String },
    /// Notice to the peer of a renamed client
    PeerRenamed { name: String },
    /// Pairing request named the current peer
    AlreadyChatting { name: String },
    /// Requester left its chat via the sentinel
    UnpairedToListen { former: String },
    /// Sentinel request while already listening
    NowListening,
    /// Pairing target not registered
    PeerAbsent { target: String },
    /// Pairing target not registered; requester's chat is dropped too
    PeerAbsentUnpairing { target: String, former: String },
    /// Pairing target already chatting with someone else
    PeerBusy { target: String, other: String },
    /// Pairing target busy; requester's chat is dropped too
    PeerBusyUnpairing {
        target: String,
        other: String,
        former: String,
    },
    /// Requester's chat is dropped before pairing anew
    Unpairing { former: String },
    /// Pairing established, names the new peer
    PairedWith { peer: String },
    /// Notice to the peer left behind by an exiting or unpairing client
    PeerExited { name: String },
    /// Listen-mode echo of a chat line
    Echo { text: String },
    /// Chat line forwarded from a paired client
    Chat { from: String, text: String },
}

impl fmt::Display for ServerReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerReply::Welcome { local_addr } => {
                write!(f, "SVR: Welcome from {}", local_addr)
            }
            ServerReply::DefaultName { name } => {
                write!(f, "SVR: You've been given the default name: {}", name)
            }
            ServerReply::Farewell { name } => {
                write!(f, "SVR: CLOSING CONNECTION. SEE YOU LATER, {}", name)
            }
            ServerReply::OwnName { name } => {
                write!(f, "SVR: Your name is: \"{}\"", name)
            }
            ServerReply::PeerName { name } => {
                write!(f, "SVR: Your peer's name is: {}", name)
            }
            ServerReply::NoPeerName => {
                write!(
                    f,
                    "SVR: You are not connected to another user; your peer's name is: {}",
                    LISTENER_SENTINEL
                )
            }
            ServerReply::Names { names } => {
                write!(
                    f,
                    "SVR: Clients connected to the server: {}",
                    names.join(", ")
                )
            }
            ServerReply::InvalidControl { line } => {
                write!(f, "SVR: \"{}\" is not a valid control message", line)
            }
            ServerReply::NameSet { name } => {
                write!(f, "SVR: Your username has been set to \"{}\"", name)
            }
            ServerReply::NameIsCurrent { name } => {
                write!(f, "SVR: The username \"{}\" is your current username.", name)
            }
            ServerReply::NameReserved { name } => {
                write!(f, "SVR: The username \"{}\" is reserved. Pick another.", name)
            }
            ServerReply::NameBlank => {
                write!(
                    f,
                    "SVR: Whitespace-only usernames are not permitted. Pick another."
                )
            }
            ServerReply::NameInUse { name } => {
                write!(
                    f,
                    "SVR: The username \"{}\" is already in use. Choose another.",
                    name
                )
            }
            ServerReply::PeerRenamed { name } => {
                write!(f, "SVR: Your peer has changed their name to: \"{}\".", name)
            }
            ServerReply::AlreadyChatting { name } => {
                write!(f, "SVR: You're already chatting with \"{}\".", name)
            }
            ServerReply::UnpairedToListen { former } => {
                write!(
                    f,
                    "SVR: Disconnected with \"{}\". You are now in listen mode.",
                    former
                )
            }
            ServerReply::NowListening => {
                write!(f, "SVR: You are now in listen mode.")
            }
            ServerReply::PeerAbsent { target } => {
                write!(
                    f,
                    "SVR: The desired client, \"{}\" is not connected to the server. Try again later.",
                    target
                )
            }
            ServerReply::PeerAbsentUnpairing { target, former } => {
                write!(
                    f,
                    "SVR: The desired client, \"{}\" is not connected to the server. Try again later. You are now being disconnected from \"{}\"",
                    target, former
                )
            }
            ServerReply::PeerBusy { target, other } => {
                write!(
                    f,
                    "SVR: The desired client, \"{}\" is chatting with the user \"{}\". Try again later.",
                    target, other
                )
            }
            ServerReply::PeerBusyUnpairing {
                target,
                other,
                former,
            } => {
                write!(
                    f,
                    "SVR: The desired client, \"{}\" is chatting with the user \"{}\". Try again later. You are now being disconnected from \"{}\"",
                    target, other, former
                )
            }
            ServerReply::Unpairing { former } => {
                write!(f, "SVR: You are now being disconnected from \"{}\"", former)
            }
            ServerReply::PairedWith { peer } => {
                write!(f, "SVR: You are now connected with \"{}\"", peer)
            }
            ServerReply::PeerExited { name } => {
                write!(
                    f,
                    "SVR: User \"{}\" has exited the chat. You are now in listen mode.",
                    name
                )
            }
            ServerReply::Echo { text } => {
                write!(f, "LISTENER_MODE_ECHO: {}", text)
            }
            ServerReply::Chat { from, text } => {
                write!(f, "{}: {}", from, text)
            }
        }
    }
}

/// Convert a rename rejection to the reply explaining it
impl From<RenameError> for ServerReply {
    fn from(err: RenameError) -> Self {
        match err {
            RenameError::SameName(name) => ServerReply::NameIsCurrent { name },
            RenameError::Reserved(name) => ServerReply::NameReserved { name },
            RenameError::Empty => ServerReply::NameBlank,
            RenameError::InUse(name) => ServerReply::NameInUse { name },
        }
    }
}
