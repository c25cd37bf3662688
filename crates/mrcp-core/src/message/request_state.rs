use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// MRCP-level status carried on a response or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestState {
    Complete,
    InProgress,
    Pending,
}

impl RequestState {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestState::Complete => "COMPLETE",
            RequestState::InProgress => "IN-PROGRESS",
            RequestState::Pending => "PENDING",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLETE" => Ok(RequestState::Complete),
            "IN-PROGRESS" => Ok(RequestState::InProgress),
            "PENDING" => Ok(RequestState::Pending),
            other => Err(Error::Invalid(format!("unknown request-state: {other}"))),
        }
    }
}
