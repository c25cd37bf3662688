//! # mrcp-core
//!
//! Wire-level MRCP message model: start-lines, headers, channel
//! identifiers, a resumable parser and a two-pass generator, and the
//! method/event name tables a resource (synthesizer, recognizer) needs to
//! dispatch a parsed message.
//!
//! One parser and one generator handle both MRCPv1 (embedded in RTSP,
//! line-oriented, no length prefix) and MRCPv2 (TCP-framed, length-prefixed
//! start-line, `Channel-Identifier` header) — see [`version::MessageVersion`].
//!
//! This crate does not parse session descriptions (SDP); it models the
//! already-parsed descriptor fields a signaling layer hands it. See
//! `mrcp-session` for that boundary.

pub mod error;
pub mod generator;
pub mod header;
pub mod message;
pub mod parser;
pub mod resource;
pub mod version;

pub use error::{Error, Result};
pub use message::MrcpMessage;
pub use version::MessageVersion;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
