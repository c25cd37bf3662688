//! # mrcp-session
//!
//! Session-level orchestration on top of `mrcp-core`'s message model and
//! `mrcp-transport`'s connection multiplexing: session descriptors,
//! control channels, per-resource state machines, and the server/client
//! offer-answer negotiation that binds them together.
//!
//! Session descriptions (SDP or otherwise) are modeled here only as
//! already-parsed descriptor structs — this crate never parses session
//! description text, it negotiates over the structured fields a
//! signaling layer hands it (see [`signaling::SignalingAgent`]) and the
//! termination descriptors a media layer hands back (see
//! [`media::MediaPipeline`]).

pub mod channel;
pub mod client;
pub mod cleanup;
pub mod descriptor;
pub mod error;
pub mod media;
pub mod registry;
pub mod resource;
pub mod server;
pub mod session;
pub mod signaling;

pub use channel::MrcpChannel;
pub use client::ClientSession;
pub use cleanup::CleanupManager;
pub use descriptor::{ControlDescriptor, MediaDescriptor, SessionDescriptor};
pub use error::{Error, Result};
pub use media::MediaPipeline;
pub use registry::SessionRegistry;
pub use resource::{RecogStateMachine, StateMachine, SynthStateMachine, UpdateOutcome};
pub use server::ServerSession;
pub use session::{MrcpSession, SessionRole};
pub use signaling::SignalingAgent;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
