use mrcp_core::message::StartLine;
use mrcp_core::MrcpMessage;
use tracing::{debug, warn};

use super::{direction_of, matches_request_id, Direction, StateMachine, UpdateOutcome};

/// Method ids, matching the order `mrcp_core::resource::recognizer`
/// registers them in (array index is the wire method id).
mod method {
    pub const SET_PARAMS: u16 = 0;
    pub const GET_PARAMS: u16 = 1;
    pub const DEFINE_GRAMMAR: u16 = 2;
    pub const RECOGNIZE: u16 = 3;
    pub const GET_RESULT: u16 = 4;
    pub const START_INPUT_TIMERS: u16 = 5;
    pub const STOP: u16 = 6;
}

mod event {
    pub const START_OF_SPEECH: u16 = 0;
    pub const RECOGNITION_COMPLETE: u16 = 1;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecogState {
    Idle,
    Recognizing,
    Recognized,
}

impl RecogState {
    fn name(self) -> &'static str {
        match self {
            RecogState::Idle => "IDLE",
            RecogState::Recognizing => "RECOGNIZING",
            RecogState::Recognized => "RECOGNIZED",
        }
    }
}

/// Recognizer resource state machine: `recog` tracks the request id of
/// whichever `RECOGNIZE` is in progress, or whose result is sitting ready
/// to be fetched once `RECOGNITION-COMPLETE` has fired.
pub struct RecogStateMachine {
    state: RecogState,
    active_request: Option<mrcp_core::message::RequestId>,
    recog: Option<mrcp_core::message::RequestId>,
}

impl RecogStateMachine {
    pub fn new() -> Self {
        RecogStateMachine {
            state: RecogState::Idle,
            active_request: None,
            recog: None,
        }
    }

    pub fn state(&self) -> RecogState {
        self.state
    }

    fn update_request(&mut self, message: &MrcpMessage, method_id: Option<u16>) -> bool {
        self.active_request = Some(message.request_id());
        match method_id {
            Some(method::RECOGNIZE) => {
                if self.state != RecogState::Idle {
                    return false;
                }
                self.state = RecogState::Recognizing;
                self.recog = Some(message.request_id());
                true
            }
            Some(method::STOP) => {
                if self.state == RecogState::Idle {
                    return true;
                }
                self.state = RecogState::Idle;
                self.recog = None;
                true
            }
            Some(method::START_INPUT_TIMERS) => self.state == RecogState::Recognizing,
            Some(method::GET_RESULT) => {
                if self.state != RecogState::Recognized {
                    return false;
                }
                self.state = RecogState::Idle;
                self.recog = None;
                true
            }
            Some(method::SET_PARAMS) | Some(method::GET_PARAMS) | Some(method::DEFINE_GRAMMAR) => true,
            _ => false,
        }
    }

    fn update_response(&mut self, message: &MrcpMessage) -> bool {
        if !matches_request_id(self.active_request, message) {
            warn!("recognizer: response for request-id {} with no matching active request", message.request_id());
            return false;
        }
        self.active_request = None;
        true
    }

    fn update_event(&mut self, message: &MrcpMessage, event_id: Option<u16>) -> bool {
        if !matches_request_id(self.recog, message) {
            warn!("recognizer: event for request-id {} with no in-progress recognition request", message.request_id());
            return false;
        }
        match event_id {
            Some(event::START_OF_SPEECH) => self.state == RecogState::Recognizing,
            Some(event::RECOGNITION_COMPLETE) => {
                if self.state != RecogState::Recognizing {
                    return false;
                }
                self.state = RecogState::Recognized;
                true
            }
            _ => false,
        }
    }
}

impl Default for RecogStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine for RecogStateMachine {
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
        debug!(state = self.state.name(), accepted, "recognizer state update");
        UpdateOutcome { accepted, state: self.state.name() }
    }

    fn state_name(&self) -> &'static str {
        self.state.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrcp_core::message::{ChannelId, RequestId, RequestState};
    use mrcp_core::version::MessageVersion;

    fn request(method_name: &str, method_id: u16, request_id: u32) -> MrcpMessage {
        MrcpMessage::new(StartLine::Request {
            version: MessageVersion::V2,
            request_id: RequestId::new(request_id).unwrap(),
            method_id: Some(method_id),
            method_name: method_name.to_string(),
        })
        .with_channel_id(ChannelId::new("sess1", "speechrecog"))
    }

    fn event(event_name: &str, event_id: u16, request_id: u32) -> MrcpMessage {
        MrcpMessage::new(StartLine::Event {
            version: MessageVersion::V2,
            request_id: RequestId::new(request_id).unwrap(),
            event_id: Some(event_id),
            event_name: event_name.to_string(),
            request_state: RequestState::InProgress,
        })
        .with_channel_id(ChannelId::new("sess1", "speechrecog"))
    }

    #[test]
    fn recognize_moves_idle_to_recognizing() {
        let mut sm = RecogStateMachine::new();
        let outcome = sm.update(&request("RECOGNIZE", method::RECOGNIZE, 1));
        assert!(outcome.accepted);
        assert_eq!(sm.state(), RecogState::Recognizing);
    }

    #[test]
    fn recognition_complete_then_get_result_returns_to_idle() {
        let mut sm = RecogStateMachine::new();
        sm.update(&request("RECOGNIZE", method::RECOGNIZE, 1));
        let outcome = sm.update(&event("RECOGNITION-COMPLETE", event::RECOGNITION_COMPLETE, 1));
        assert!(outcome.accepted);
        assert_eq!(sm.state(), RecogState::Recognized);

        let outcome = sm.update(&request("GET-RESULT", method::GET_RESULT, 2));
        assert!(outcome.accepted);
        assert_eq!(sm.state(), RecogState::Idle);
    }

    #[test]
    fn event_with_mismatched_request_id_is_rejected() {
        let mut sm = RecogStateMachine::new();
        sm.update(&request("RECOGNIZE", method::RECOGNIZE, 1));
        let outcome = sm.update(&event("START-OF-SPEECH", event::START_OF_SPEECH, 99));
        assert!(!outcome.accepted);
    }
}
