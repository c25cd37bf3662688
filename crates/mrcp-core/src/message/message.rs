use super::channel_id::ChannelId;
use super::start_line::{RequestId, StartLine};
use crate::header::{HeaderName, HeaderSection};
use crate::version::MessageVersion;
use bytes::Bytes;

/// A complete MRCP message: start-line, channel-identifier (absent for
/// MRCPv1, where the channel is implied by the RTSP session), generic
/// headers, and an opaque body.
///
/// The body is kept as raw bytes here; resource layers interpret it
/// against `Content-Type` (SSML, NLSML, DTMF grammars, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrcpMessage {
    pub start_line: StartLine,
    pub channel_id: Option<ChannelId>,
    pub headers: HeaderSection,
    pub body: Bytes,
}

impl MrcpMessage {
    pub fn new(start_line: StartLine) -> Self {
        MrcpMessage {
            start_line,
            channel_id: None,
            headers: HeaderSection::new(),
            body: Bytes::new(),
        }
    }

    pub fn version(&self) -> MessageVersion {
        self.start_line.version()
    }

    pub fn request_id(&self) -> RequestId {
        self.start_line.request_id()
    }

    pub fn with_channel_id(mut self, channel_id: ChannelId) -> Self {
        self.channel_id = Some(channel_id);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        if !body.is_empty() {
            self.headers
                .push(HeaderName::ContentLength, body.len().to_string());
        }
        self.body = body;
        self
    }

    pub fn content_length(&self) -> usize {
        self.headers.content_length().unwrap_or(0)
    }
}
