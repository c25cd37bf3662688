use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// `(session_id, resource_name)`, unique across the whole process.
///
/// Canonical wire form is `session_id@resource_name`: the session id is
/// case-sensitive, the resource name is case-insensitive (compared
/// lower-cased, stored as received).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId {
    pub session_id: String,
    pub resource_name: String,
}

impl ChannelId {
    pub fn new(session_id: impl Into<String>, resource_name: impl Into<String>) -> Self {
        ChannelId {
            session_id: session_id.into(),
            resource_name: resource_name.into(),
        }
    }

    /// Key used for hash-map lookups, where resource name must compare
    /// case-insensitively.
    pub fn lookup_key(&self) -> (String, String) {
        (self.session_id.clone(), self.resource_name.to_ascii_lowercase())
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.session_id, self.resource_name)
    }
}

impl FromStr for ChannelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (session_id, resource_name) = s
            .split_once('@')
            .ok_or_else(|| Error::InvalidChannelId(s.to_string()))?;
        if session_id.is_empty() || resource_name.is_empty() {
            return Err(Error::InvalidChannelId(s.to_string()));
        }
        Ok(ChannelId::new(session_id, resource_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_parse() {
        let id = ChannelId::new("a1b2c3d4e5f6a7b8", "speechsynth");
        let parsed: ChannelId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_missing_at_sign() {
        assert!("no-at-sign".parse::<ChannelId>().is_err());
    }

    #[test]
    fn rejects_empty_resource_name() {
        assert!("session@".parse::<ChannelId>().is_err());
    }

    #[test]
    fn lookup_key_lowercases_resource_name_only() {
        let id = ChannelId::new("SessionA", "SpeechSynth");
        assert_eq!(id.lookup_key(), ("SessionA".to_string(), "speechsynth".to_string()));
    }
}
