//! TCP connection handler
//!
//! Handles individual client connections: line framing, request
//! parsing, and bidirectional communication with the RelayServer.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, warn};

use crate::codec::LineCodec;
use crate::error::RelayError;
use crate::protocol::{Request, ServerReply};
use crate::server::ServerCommand;
use crate::types::ConnectionId;

/// Handle a new TCP connection
///
/// Registers with the RelayServer, then pumps lines until the client
/// hangs up, the socket fails, or the server drops us after a graceful
/// quit. Inbound lines are forwarded one at a time, so each
/// connection's commands reach the server in arrival order.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), RelayError> {
    let peer_addr = stream.peer_addr()?;
    let mut framed = Framed::new(stream, LineCodec::new());

    let connection_id = ConnectionId::new();
    info!("Client {} connected from {}", connection_id, peer_addr);

    // Channel for server -> client replies; the server enqueues, only
    // this task ever writes to the socket
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<ServerReply>();

    // Register with the RelayServer
    if cmd_tx
        .send(ServerCommand::Connect {
            connection_id,
            addr: peer_addr,
            sender: reply_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", connection_id);
        return Err(RelayError::ChannelSend);
    }

    loop {
        tokio::select! {
            // Next line from the client
            line = framed.next() => {
                let line = match line {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        warn!("Connection error for {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        debug!("Client {} closed the connection", peer_addr);
                        break;
                    }
                };

                debug!("Received line from {}: {:?}", peer_addr, line);

                let cmd = request_to_command(connection_id, Request::parse(&line));
                if cmd_tx.send(cmd).await.is_err() {
                    debug!("Server closed, ending handler for {}", connection_id);
                    break;
                }
            }

            // Next queued reply from the server
            reply = reply_rx.recv() => {
                match reply {
                    Some(reply) => {
                        // Each line is flushed before the loop continues
                        if let Err(e) = framed.send(reply.to_string()).await {
                            warn!("Write failed for {}: {}", peer_addr, e);
                            break;
                        }
                    }
                    // Reply channel closed: the server removed us after
                    // a graceful quit
                    None => {
                        debug!("Server closed the reply channel for {}", connection_id);
                        break;
                    }
                }
            }
        }
    }

    // Idempotent: after a graceful quit there is nothing left to remove
    let _ = cmd_tx
        .send(ServerCommand::Disconnect { connection_id })
        .await;

    info!("Client {} disconnected", connection_id);

    Ok(())
}

/// Convert a parsed Request to a ServerCommand
fn request_to_command(connection_id: ConnectionId, request: Request) -> ServerCommand {
    match request {
        Request::Chat(text) => ServerCommand::Chat {
            connection_id,
            text,
        },
        Request::SetName(name) => ServerCommand::SetName {
            connection_id,
            name,
        },
        Request::ConnectPeer(target) => ServerCommand::ConnectPeer {
            connection_id,
            target,
        },
        Request::ListNames => ServerCommand::ListNames { connection_id },
        Request::OwnName => ServerCommand::OwnName { connection_id },
        Request::PeerName => ServerCommand::PeerName { connection_id },
        Request::Quit => ServerCommand::Quit { connection_id },
        Request::Invalid(line) => ServerCommand::Invalid {
            connection_id,
            line,
        },
    }
}
