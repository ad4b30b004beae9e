//! Error types for the relay server
//!
//! Defines connection-level errors and registry rename errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Connection-level errors
///
/// All of these are fatal for the connection they occur on: the handler
/// logs the error and drops the socket. None of them take the server down.
#[derive(Debug, Error)]
pub enum RelayError {
    /// IO error on the socket (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Received bytes that are not valid UTF-8 (fatal)
    #[error("invalid UTF-8 on the wire")]
    InvalidUtf8,

    /// A single line exceeded the framing limit (fatal)
    #[error("line exceeds maximum length of {0} bytes")]
    LineTooLong(usize),

    /// Channel send error (fatal - internal channel broken)
    #[error("channel send error")]
    ChannelSend,
}

/// Rename rejection reasons
///
/// Business errors for the registry's name update: the requester keeps
/// its current name and receives an explanatory reply. Each variant
/// carries what the reply wording needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenameError {
    /// Requested name is identical to the current one
    #[error("name {0:?} is already this client's name")]
    SameName(String),

    /// Requested name collides with a protocol keyword
    #[error("name {0:?} is reserved")]
    Reserved(String),

    /// Requested name is empty after trimming
    #[error("name is blank")]
    Empty,

    /// Requested name is held by another client
    #[error("name {0:?} is taken")]
    InUse(String),
}

/// Message send errors
///
/// Occurs when attempting to send messages through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
