//! Line-oriented TCP Chat Relay Library
//!
//! A plain-TCP chat relay where clients discover each other by name and
//! chat one-to-one, built with tokio using the Actor pattern for state
//! management. Messages are newline-delimited text; commands ride the
//! same lines behind a `C0NTR0L:` prefix.
//!
//! # Features
//! - Newline-delimited text framing (CRLF tolerated)
//! - Automatic default names (`DefaultName_0`, `DefaultName_1`, ...)
//! - Rename with uniqueness and reserved-word checks
//! - One-to-one peer pairing by name, with listen-mode echo for the unpaired
//! - Peer and name queries, connected-names listing
//! - Graceful quit and abrupt-disconnect cleanup
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` is the central actor owning the participant registry
//! - Every connection runs a `handler` task that talks to the actor over channels
//! - No locks anywhere - state is only ever touched from the actor's loop
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chatd::{RelayServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("0.0.0.0:50048").await.unwrap();
//!     let local_addr = listener.local_addr().unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RelayServer::new(cmd_rx, local_addr).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod codec;
pub mod error;
pub mod handler;
pub mod participant;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use codec::LineCodec;
pub use error::{RelayError, RenameError, SendError};
pub use handler::handle_connection;
pub use participant::Participant;
pub use protocol::{Request, ServerReply};
pub use registry::Registry;
pub use server::{RelayServer, ServerCommand};
pub use types::ConnectionId;
