use std::time::Instant;

use mrcp_core::message::ChannelId;
use mrcp_core::MrcpMessage;
use tracing::debug;

use crate::error::{Error, Result};
use crate::resource::{RecogStateMachine, StateMachine, SynthStateMachine, UpdateOutcome};

/// A single MRCP control channel: one resource's worth of method/event
/// traffic, bound to a channel identifier and backed by that resource's
/// state machine.
pub struct MrcpChannel {
    pub id: ChannelId,
    state_machine: Box<dyn StateMachine>,
    created_at: Instant,
}

impl MrcpChannel {
    /// Builds the state machine for `resource_name`, the only two this
    /// stack knows how to drive end to end.
    pub fn new(id: ChannelId) -> Result<Self> {
        let state_machine: Box<dyn StateMachine> = match id.resource_name.to_ascii_lowercase().as_str() {
            "speechsynth" => Box::new(SynthStateMachine::new()),
            "speechrecog" => Box::new(RecogStateMachine::new()),
            other => return Err(Error::UnknownResource(other.to_string())),
        };
        Ok(MrcpChannel { id, state_machine, created_at: Instant::now() })
    }

    pub fn resource_name(&self) -> &str {
        &self.id.resource_name
    }

    pub fn state_name(&self) -> &'static str {
        self.state_machine.state_name()
    }

    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Feeds a message through this channel's resource state machine.
    pub fn dispatch(&mut self, message: &MrcpMessage) -> UpdateOutcome {
        let outcome = self.state_machine.update(message);
        debug!(channel = %self.id, state = outcome.state, accepted = outcome.accepted, "channel dispatch");
        outcome
    }
}
