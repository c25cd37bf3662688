use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        ConnectionId(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A live socket, reachable by its write half. The reader lives in the
/// mux's own per-connection task and reports frames back through the
/// shared event channel, so `Connection` itself only needs the sending
/// side.
///
/// `access_count` mirrors the channel-association invariant: it must
/// equal the number of channels currently bound to this connection. It
/// is incremented on bind and decremented when a channel is rebound or
/// the session tears down, and a connection is only eligible for closing
/// once it reaches zero.
pub struct Connection {
    pub id: ConnectionId,
    pub peer_addr: SocketAddr,
    pub write_tx: mpsc::Sender<Bytes>,
    access_count: AtomicUsize,
}

impl Connection {
    pub fn new(id: ConnectionId, peer_addr: SocketAddr, write_tx: mpsc::Sender<Bytes>) -> Arc<Self> {
        Arc::new(Connection {
            id,
            peer_addr,
            write_tx,
            access_count: AtomicUsize::new(0),
        })
    }

    pub fn acquire(&self) {
        self.access_count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn release(&self) -> usize {
        self.access_count.fetch_sub(1, Ordering::SeqCst) - 1
    }

    pub fn access_count(&self) -> usize {
        self.access_count.load(Ordering::SeqCst)
    }
}

/// Where a channel stands with respect to its transport connection.
///
/// A channel is created (on an incoming offer or an outgoing request)
/// before any socket has actually delivered a frame bearing its channel
/// identifier — `Pending` is the placeholder used in that window.
/// `Bound` records the connection a channel has actually been migrated
/// onto, which happens unconditionally the first time a frame carrying
/// a matching channel id arrives on some connection (see
/// `ConnectionMux::dispatch_inbound`).
#[derive(Clone)]
pub enum ChannelConn {
    Pending,
    Bound(Arc<Connection>),
}

impl ChannelConn {
    pub fn is_bound(&self) -> bool {
        matches!(self, ChannelConn::Bound(_))
    }

    pub fn connection(&self) -> Option<&Arc<Connection>> {
        match self {
            ChannelConn::Bound(conn) => Some(conn),
            ChannelConn::Pending => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_count_tracks_acquire_and_release() {
        let (tx, _rx) = mpsc::channel(1);
        let conn = Connection::new(ConnectionId::next(), "127.0.0.1:1234".parse().unwrap(), tx);
        conn.acquire();
        conn.acquire();
        assert_eq!(conn.access_count(), 2);
        assert_eq!(conn.release(), 1);
        assert_eq!(conn.access_count(), 1);
    }

    #[test]
    fn pending_has_no_connection() {
        let channel = ChannelConn::Pending;
        assert!(!channel.is_bound());
        assert!(channel.connection().is_none());
    }
}
