//! Session and media descriptors.
//!
//! These mirror what a signaling layer hands up after it has already
//! parsed an offer/answer body (SDP or otherwise) into structured fields —
//! this crate never parses session-description text itself, only holds
//! the resulting descriptors and negotiates over them.

use std::fmt;

/// Transport protocol a control channel runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proto {
    Tcp,
    Tls,
    Unknown,
}

/// Which side of the TCP/TLS connection a control channel actively connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupType {
    Active,
    Passive,
    Unknown,
}

/// Whether a control channel reuses an already-bound connection or opens a
/// new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    New,
    Existing,
    Unknown,
}

/// One MRCP control channel's half of an offer or answer.
///
/// `cmid` is the control-media identifier an audio/video media entry
/// refers back to when it shares a connection with a control channel
/// (the `mid` attribute pairing audio to control in a combined offer);
/// `id` is this entry's own position in the session descriptor's control
/// media list.
#[derive(Debug, Clone)]
pub struct ControlDescriptor {
    pub id: usize,
    pub proto: Proto,
    pub setup_type: SetupType,
    pub connection_type: ConnectionType,
    pub resource_name: String,
    pub session_id: String,
    pub cmid: usize,
}

impl ControlDescriptor {
    pub fn new(resource_name: impl Into<String>) -> Self {
        ControlDescriptor {
            id: 0,
            proto: Proto::Unknown,
            setup_type: SetupType::Unknown,
            connection_type: ConnectionType::Unknown,
            resource_name: resource_name.into(),
            session_id: String::new(),
            cmid: 0,
        }
    }
}

/// An audio or video media line. MRCP itself only cares that one exists
/// and which port/codec it settled on; the RTP payload never touches this
/// crate.
#[derive(Debug, Clone, Default)]
pub struct MediaDescriptor {
    pub id: usize,
    pub ip: String,
    pub port: u16,
    pub mid: Option<String>,
}

/// The full set of media this session's signaling layer has offered or
/// answered: zero or more control channels, plus audio/video media lines.
///
/// New entries are always appended; an entry's `id` is fixed at the
/// position it was appended to (`len() - 1` at the time of the push), and
/// is never renumbered by later inserts or removals.
#[derive(Debug, Clone, Default)]
pub struct SessionDescriptor {
    pub origin: String,
    pub ip: String,
    pub control_media: Vec<ControlDescriptor>,
    pub audio_media: Vec<MediaDescriptor>,
    pub video_media: Vec<MediaDescriptor>,
}

impl SessionDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a control channel descriptor, assigning its `id` to its
    /// final index.
    pub fn add_control_media(&mut self, mut descriptor: ControlDescriptor) -> usize {
        let id = self.control_media.len();
        descriptor.id = id;
        self.control_media.push(descriptor);
        id
    }

    pub fn control_media(&self, index: usize) -> Option<&ControlDescriptor> {
        self.control_media.get(index)
    }

    pub fn add_audio_media(&mut self, mut descriptor: MediaDescriptor) -> usize {
        let id = self.audio_media.len();
        descriptor.id = id;
        self.audio_media.push(descriptor);
        id
    }

    pub fn audio_media(&self, index: usize) -> Option<&MediaDescriptor> {
        self.audio_media.get(index)
    }

    pub fn add_video_media(&mut self, mut descriptor: MediaDescriptor) -> usize {
        let id = self.video_media.len();
        descriptor.id = id;
        self.video_media.push(descriptor);
        id
    }

    pub fn video_media(&self, index: usize) -> Option<&MediaDescriptor> {
        self.video_media.get(index)
    }

    pub fn media_count(&self) -> usize {
        self.control_media.len() + self.audio_media.len() + self.video_media.len()
    }
}

impl fmt::Display for SessionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[c:{} a:{} v:{}]",
            self.control_media.len(),
            self.audio_media.len(),
            self.video_media.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_media_ids_are_positional() {
        let mut descriptor = SessionDescriptor::new();
        let a = descriptor.add_control_media(ControlDescriptor::new("speechsynth"));
        let b = descriptor.add_control_media(ControlDescriptor::new("speechrecog"));
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(descriptor.control_media(1).unwrap().resource_name, "speechrecog");
    }

    #[test]
    fn ids_are_stable_once_assigned() {
        let mut descriptor = SessionDescriptor::new();
        descriptor.add_control_media(ControlDescriptor::new("speechsynth"));
        let id = descriptor.add_control_media(ControlDescriptor::new("speechrecog"));
        assert_eq!(descriptor.control_media(id).unwrap().id, id);
    }
}
