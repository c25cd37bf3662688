//! Per-resource request/response/event correlation and state tracking.
//!
//! Each resource type update()s itself from whichever of a request, a
//! response, or an event just crossed the channel, dispatching by
//! method/event id the way a resource's method table already names them
//! (see `mrcp_core::resource`). A state machine owns at most one
//! outstanding "active request" waiting on a response, and at most one
//! in-progress request a later event can correlate against by request id.

pub mod recog;
pub mod synth;

pub use recog::RecogStateMachine;
pub use synth::SynthStateMachine;

use mrcp_core::message::{RequestId, StartLine};
use mrcp_core::MrcpMessage;

/// Outcome of feeding a message through a state machine: whether it was
/// accepted given the current state, and the updated state's name for
/// logging/diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub accepted: bool,
    pub state: &'static str,
}

/// A resource's request/response/event state machine.
///
/// `update` is the single entry point: it is handed every message that
/// crosses a channel bound to this resource, already resolved
/// (`method_id`/`event_id` filled in) by `mrcp_core::resource::resolve_message`.
pub trait StateMachine: Send {
    fn update(&mut self, message: &MrcpMessage) -> UpdateOutcome;

    fn state_name(&self) -> &'static str;
}

/// Message direction as far as the state machine is concerned: a request
/// from the client updates state forward, a response to the client's own
/// `active_request` clears it, an event out of the resource correlates
/// against whichever request it continues.
pub(crate) enum Direction {
    Request,
    Response,
    Event,
}

pub(crate) fn direction_of(start_line: &StartLine) -> Direction {
    match start_line {
        StartLine::Request { .. } => Direction::Request,
        StartLine::Response { .. } => Direction::Response,
        StartLine::Event { .. } => Direction::Event,
    }
}

pub(crate) fn matches_request_id(tracked: Option<RequestId>, message: &MrcpMessage) -> bool {
    tracked == Some(message.request_id())
}
