use std::collections::VecDeque;

use mrcp_core::message::StartLine;
use mrcp_core::MrcpMessage;
use tracing::{debug, warn};

use super::{direction_of, matches_request_id, Direction, StateMachine, UpdateOutcome};

/// Method ids, matching the order `mrcp_core::resource::synthesizer`
/// registers them in (array index is the wire method id).
mod method {
    pub const SET_PARAMS: u16 = 0;
    pub const GET_PARAMS: u16 = 1;
    pub const SPEAK: u16 = 2;
    pub const STOP: u16 = 3;
    pub const PAUSE: u16 = 4;
    pub const RESUME: u16 = 5;
    pub const BARGE_IN_OCCURRED: u16 = 6;
    pub const CONTROL: u16 = 7;
    pub const DEFINE_LEXICON: u16 = 8;
}

mod event {
    pub const SPEECH_MARKER: u16 = 0;
    pub const SPEAK_COMPLETE: u16 = 1;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthState {
    Idle,
    Speaking,
    Paused,
}

impl SynthState {
    fn name(self) -> &'static str {
        match self {
            SynthState::Idle => "IDLE",
            SynthState::Speaking => "SPEAKING",
            SynthState::Paused => "PAUSED",
        }
    }
}

/// Synthesizer resource state machine: tracks which `SPEAK` request is
/// currently producing audio (`speaker`), any further `SPEAK` requests
/// queued behind it, and the most recent request still awaiting its own
/// response (`active_request`).
pub struct SynthStateMachine {
    state: SynthState,
    active_request: Option<mrcp_core::message::RequestId>,
    speaker: Option<mrcp_core::message::RequestId>,
    queue: VecDeque<mrcp_core::message::RequestId>,
}

impl SynthStateMachine {
    pub fn new() -> Self {
        SynthStateMachine {
            state: SynthState::Idle,
            active_request: None,
            speaker: None,
            queue: VecDeque::new(),
        }
    }

    pub fn state(&self) -> SynthState {
        self.state
    }

    fn update_request(&mut self, message: &MrcpMessage, method_id: Option<u16>) -> bool {
        self.active_request = Some(message.request_id());
        match method_id {
            Some(method::SPEAK) => {
                if self.state == SynthState::Idle {
                    self.state = SynthState::Speaking;
                    self.speaker = Some(message.request_id());
                } else {
                    self.queue.push_back(message.request_id());
                }
                true
            }
            Some(method::STOP) | Some(method::BARGE_IN_OCCURRED) => {
                if self.state == SynthState::Idle {
                    return true;
                }
                self.speaker = None;
                self.queue.clear();
                self.state = SynthState::Idle;
                true
            }
            Some(method::PAUSE) => {
                if self.state != SynthState::Speaking {
                    return false;
                }
                self.state = SynthState::Paused;
                true
            }
            Some(method::RESUME) => {
                if self.state != SynthState::Paused {
                    return false;
                }
                self.state = SynthState::Speaking;
                true
            }
            Some(method::CONTROL) => self.state == SynthState::Speaking,
            Some(method::SET_PARAMS) | Some(method::GET_PARAMS) | Some(method::DEFINE_LEXICON) => true,
            _ => false,
        }
    }

    fn update_response(&mut self, message: &MrcpMessage) -> bool {
        if !matches_request_id(self.active_request, message) {
            warn!("synthesizer: response for request-id {} with no matching active request", message.request_id());
            return false;
        }
        self.active_request = None;
        true
    }

    fn update_event(&mut self, message: &MrcpMessage, event_id: Option<u16>) -> bool {
        if !matches_request_id(self.speaker, message) {
            warn!("synthesizer: event for request-id {} with no in-progress speak request", message.request_id());
            return false;
        }
        match event_id {
            Some(event::SPEECH_MARKER) => true,
            Some(event::SPEAK_COMPLETE) => {
                self.speaker = self.queue.pop_front();
                if self.speaker.is_none() {
                    self.state = SynthState::Idle;
                }
                true
            }
            _ => false,
        }
    }
}

impl Default for SynthStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine for SynthStateMachine {
    fn update(&mut self, message: &MrcpMessage) -> UpdateOutcome {
        let accepted = match direction_of(&message.start_line) {
            Direction::Request => {
                let method_id = match &message.start_line {
                    StartLine::Request { method_id, .. } => *method_id,
                    _ => None,
                };
                self.update_request(message, method_id)
            }
            Direction::Response => self.update_response(message),
            Direction::Event => {
                let event_id = match &message.start_line {
                    StartLine::Event { event_id, .. } => *event_id,
                    _ => None,
                };
                self.update_event(message, event_id)
            }
        };
        debug!(state = self.state.name(), accepted, "synthesizer state update");
        UpdateOutcome { accepted, state: self.state.name() }
    }

    fn state_name(&self) -> &'static str {
        self.state.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrcp_core::message::{ChannelId, RequestId};
    use mrcp_core::version::MessageVersion;

    fn request(method_name: &str, method_id: u16, request_id: u32) -> MrcpMessage {
        MrcpMessage::new(StartLine::Request {
            version: MessageVersion::V2,
            request_id: RequestId::new(request_id).unwrap(),
            method_id: Some(method_id),
            method_name: method_name.to_string(),
        })
        .with_channel_id(ChannelId::new("sess1", "speechsynth"))
    }

    #[test]
    fn speak_moves_idle_to_speaking() {
        let mut sm = SynthStateMachine::new();
        let outcome = sm.update(&request("SPEAK", method::SPEAK, 1));
        assert!(outcome.accepted);
        assert_eq!(sm.state(), SynthState::Speaking);
    }

    #[test]
    fn second_speak_queues_instead_of_replacing() {
        let mut sm = SynthStateMachine::new();
        sm.update(&request("SPEAK", method::SPEAK, 1));
        sm.update(&request("SPEAK", method::SPEAK, 2));
        assert_eq!(sm.state(), SynthState::Speaking);
        assert_eq!(sm.speaker, Some(RequestId::new(1).unwrap()));
        assert_eq!(sm.queue.len(), 1);
    }

    #[test]
    fn speak_complete_advances_queue() {
        let mut sm = SynthStateMachine::new();
        sm.update(&request("SPEAK", method::SPEAK, 1));
        sm.update(&request("SPEAK", method::SPEAK, 2));

        let mut complete = MrcpMessage::new(StartLine::Event {
            version: MessageVersion::V2,
            request_id: RequestId::new(1).unwrap(),
            event_id: Some(event::SPEAK_COMPLETE),
            event_name: "SPEAK-COMPLETE".to_string(),
            request_state: mrcp_core::message::RequestState::Complete,
        })
        .with_channel_id(ChannelId::new("sess1", "speechsynth"));
        complete.channel_id = Some(ChannelId::new("sess1", "speechsynth"));

        let outcome = sm.update(&complete);
        assert!(outcome.accepted);
        assert_eq!(sm.speaker, Some(RequestId::new(2).unwrap()));
        assert_eq!(sm.state(), SynthState::Speaking);
    }

    #[test]
    fn pause_requires_speaking_state() {
        let mut sm = SynthStateMachine::new();
        let outcome = sm.update(&request("PAUSE", method::PAUSE, 1));
        assert!(!outcome.accepted);
    }
}
