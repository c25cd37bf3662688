use super::request_state::RequestState;
use crate::error::Error;
use crate::version::MessageVersion;
use std::fmt;

/// Request-id is monotonic per channel; 0 is reserved and never a valid id
/// for an actual request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u32);

impl RequestId {
    pub fn new(value: u32) -> Result<Self, Error> {
        if value == 0 {
            return Err(Error::Invalid("request-id 0 is reserved".to_string()));
        }
        Ok(RequestId(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three shapes an MRCP start-line can take.
///
/// `method_id`/`event_id` start as `None`: the wire grammar carries only
/// the method/event name, and the numeric id is resolved once the
/// message's channel identifies which resource's method table applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLine {
    Request {
        version: MessageVersion,
        request_id: RequestId,
        method_id: Option<u16>,
        method_name: String,
    },
    Response {
        version: MessageVersion,
        request_id: RequestId,
        status_code: u16,
        request_state: RequestState,
    },
    Event {
        version: MessageVersion,
        request_id: RequestId,
        event_id: Option<u16>,
        event_name: String,
        request_state: RequestState,
    },
}

impl StartLine {
    pub fn version(&self) -> MessageVersion {
        match self {
            StartLine::Request { version, .. }
            | StartLine::Response { version, .. }
            | StartLine::Event { version, .. } => *version,
        }
    }

    pub fn request_id(&self) -> RequestId {
        match self {
            StartLine::Request { request_id, .. }
            | StartLine::Response { request_id, .. }
            | StartLine::Event { request_id, .. } => *request_id,
        }
    }

    pub fn request_state(&self) -> Option<RequestState> {
        match self {
            StartLine::Request { .. } => None,
            StartLine::Response { request_state, .. } => Some(*request_state),
            StartLine::Event { request_state, .. } => Some(*request_state),
        }
    }

    /// Fills in `method_id`/`event_id` once a resource's method table has
    /// resolved the name carried on the wire. A no-op for `Response`.
    pub fn resolve_id(&mut self, id: u16) {
        match self {
            StartLine::Request { method_id, .. } => *method_id = Some(id),
            StartLine::Event { event_id, .. } => *event_id = Some(id),
            StartLine::Response { .. } => {}
        }
    }
}
