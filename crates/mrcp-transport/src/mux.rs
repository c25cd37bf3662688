use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use mrcp_core::generator::generate;
use mrcp_core::parser::{MessageParser, ParseStatus};
use mrcp_core::{MessageVersion, MrcpMessage};
use mrcp_infra::task::{LayerTaskManager, TaskPriority};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::conn::{ChannelConn, Connection, ConnectionId};
use crate::error::{Error, Result};
use crate::transport::Transport;

/// A message read off some connection, tagged with which connection it
/// arrived on so the channel table can be updated.
#[derive(Debug)]
pub struct InboundFrame {
    pub connection_id: ConnectionId,
    pub peer_addr: SocketAddr,
    pub message: MrcpMessage,
}

const READ_BUF_SIZE: usize = 8192;
const WRITE_CHANNEL_CAPACITY: usize = 64;

/// Multiplexes MRCPv2 messages over a set of TCP (or TLS) connections.
///
/// Channels are looked up and, on first sight of a matching channel id on
/// any connection, bound to that connection — unconditionally, even if
/// the channel was already bound elsewhere. This mirrors the reference
/// connection table's `mrcp_connection_channel_associate`, which performs
/// the same unconditional migration; it is preserved here as existing
/// behavior rather than hardened, and is logged at `warn` when it
/// overwrites an existing binding so the rebind is visible operationally.
pub struct ConnectionMux {
    transport: Transport,
    connections: DashMap<ConnectionId, Arc<Connection>>,
    channels: DashMap<String, ChannelConn>,
    inbound_tx: mpsc::Sender<InboundFrame>,
    tasks: LayerTaskManager,
}

impl ConnectionMux {
    pub fn new(transport: Transport, inbound_tx: mpsc::Sender<InboundFrame>) -> Arc<Self> {
        Arc::new(ConnectionMux {
            transport,
            connections: DashMap::new(),
            channels: DashMap::new(),
            inbound_tx,
            tasks: LayerTaskManager::new("mrcp-transport"),
        })
    }

    /// Binds a listener and spawns the accept loop as a tracked task.
    pub async fn listen(self: Arc<Self>, addr: SocketAddr) -> Result<SocketAddr> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let mux = self.clone();
        self.tasks
            .spawn_tracked("accept-loop", TaskPriority::High, async move {
                mux.accept_loop(listener).await;
            })
            .await
            .map_err(|e| Error::Other(e.to_string()))?;
        Ok(local_addr)
    }

    async fn accept_loop(self: Arc<Self>, listener: TcpListener) {
        loop {
            let (mut stream, peer_addr) = match listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!("accept failed: {e}");
                    continue;
                }
            };
            if !self.has_pending_channel() {
                warn!("refusing connection from {peer_addr}: no pending channel invited it");
                let _ = stream.shutdown().await;
                continue;
            }
            let mux = self.clone();
            tokio::spawn(async move {
                if let Err(e) = mux.handle_connection(stream, peer_addr).await {
                    warn!("connection {peer_addr} ended: {e}");
                }
            });
        }
    }

    /// Whether a channel is sitting in the pending (null) connection,
    /// the only thing that makes an inbound accept welcome: the stack
    /// refuses traffic it did not invite.
    fn has_pending_channel(&self) -> bool {
        self.channels.iter().any(|entry| matches!(entry.value(), ChannelConn::Pending))
    }

    async fn handle_connection(self: Arc<Self>, stream: tokio::net::TcpStream, peer_addr: SocketAddr) -> Result<()> {
        let socket = self.transport.accept(stream).await?;
        let connection_id = ConnectionId::next();
        let (write_tx, mut write_rx) = mpsc::channel::<Bytes>(WRITE_CHANNEL_CAPACITY);
        let connection = Connection::new(connection_id, peer_addr, write_tx);
        self.connections.insert(connection_id, connection.clone());

        let (mut read_half, mut write_half) = tokio::io::split(socket);

        let writer = tokio::spawn(async move {
            while let Some(bytes) = write_rx.recv().await {
                if write_half.write_all(&bytes).await.is_err() {
                    break;
                }
            }
        });

        let mut parser = MessageParser::new(MessageVersion::V2);
        let mut read_buf = vec![0u8; READ_BUF_SIZE];
        loop {
            let n = read_half.read(&mut read_buf).await?;
            if n == 0 {
                break;
            }
            parser.feed(&read_buf[..n]);
            loop {
                match parser.poll() {
                    Ok((ParseStatus::Complete, Some(message))) => {
                        self.dispatch_inbound(connection_id, peer_addr, message).await;
                    }
                    Ok((ParseStatus::Complete, None)) => unreachable!(),
                    Ok((ParseStatus::Incomplete, _)) => break,
                    Ok((ParseStatus::Invalid, _)) | Err(_) => {
                        warn!("discarding unparseable bytes from {peer_addr}");
                        break;
                    }
                }
            }
        }

        self.connections.remove(&connection_id);
        writer.abort();
        Ok(())
    }

    /// Binds (migrating if necessary) the channel named by an inbound
    /// message's channel identifier, then forwards the message upstream.
    async fn dispatch_inbound(&self, connection_id: ConnectionId, peer_addr: SocketAddr, message: MrcpMessage) {
        if let Some(channel_id) = &message.channel_id {
            let key = channel_id.to_string();
            if let Some(connection) = self.connections.get(&connection_id) {
                let connection = connection.clone();
                match self.channels.get(&key).map(|e| e.value().clone()) {
                    Some(ChannelConn::Bound(existing)) if existing.id != connection_id => {
                        warn!(
                            channel = %key,
                            from = %existing.id,
                            to = %connection_id,
                            "channel migrated to a different connection"
                        );
                        existing.release();
                        connection.acquire();
                        self.channels.insert(key, ChannelConn::Bound(connection));
                    }
                    Some(ChannelConn::Bound(_)) => {}
                    Some(ChannelConn::Pending) | None => {
                        connection.acquire();
                        self.channels.insert(key, ChannelConn::Bound(connection));
                    }
                }
            }
        }

        let frame = InboundFrame { connection_id, peer_addr, message };
        if self.inbound_tx.send(frame).await.is_err() {
            debug!("inbound receiver dropped, discarding frame");
        }
    }

    /// Registers a channel as pending before any frame bearing its id has
    /// arrived (e.g. right after a channel is created from an offer).
    pub fn register_pending(&self, channel_id: impl Into<String>) {
        self.channels.entry(channel_id.into()).or_insert(ChannelConn::Pending);
    }

    pub fn channel_connection(&self, channel_id: &str) -> Option<Arc<Connection>> {
        self.channels.get(channel_id).and_then(|e| e.value().connection().cloned())
    }

    /// Serializes and writes a message on the connection currently bound
    /// to its channel.
    pub async fn send(&self, message: &MrcpMessage) -> Result<()> {
        let channel_key = message
            .channel_id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| Error::Other("message has no channel identifier to route on".to_string()))?;
        let connection = self
            .channel_connection(&channel_key)
            .ok_or_else(|| Error::NoConnection(channel_key))?;

        let mut buf = BytesMut::new();
        generate(message, &mut buf)?;
        connection
            .write_tx
            .send(buf.freeze())
            .await
            .map_err(|_| Error::Closed)
    }

    pub fn unbind_channel(&self, channel_id: &str) {
        if let Some((_, ChannelConn::Bound(connection))) = self.channels.remove(channel_id) {
            connection.release();
        }
    }
}
