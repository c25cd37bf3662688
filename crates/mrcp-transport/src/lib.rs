//! # mrcp-transport
//!
//! MRCPv2's connection layer: a TCP (optionally TLS) listener multiplexing
//! many channels over a smaller set of long-lived connections, with
//! channels migrating onto whichever connection their first frame
//! actually arrives on.
//!
//! MRCPv1 has no connection layer of its own — it rides inside an RTSP
//! session that some other component owns — so this crate only speaks
//! for MRCPv2.

pub mod conn;
pub mod error;
pub mod mux;
pub mod transport;

pub use conn::{ChannelConn, Connection, ConnectionId};
pub use error::{Error, Result};
pub use mux::{ConnectionMux, InboundFrame};
pub use transport::Transport;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
