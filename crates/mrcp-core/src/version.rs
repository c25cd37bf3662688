use std::fmt;

/// Wire version of an MRCP message.
///
/// A single parser/generator is driven by this rather than split into two
/// codepaths: the only differences are whether the start-line carries a
/// length prefix and whether a Channel-Identifier header is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageVersion {
    /// Line-oriented, carried inside an RTSP ANNOUNCE body. No length prefix,
    /// no Channel-Identifier header.
    V1,
    /// Framed over TCP (optionally TLS) with a leading message-length and a
    /// `Channel-Identifier` header.
    V2,
}

impl MessageVersion {
    pub fn has_length_prefix(self) -> bool {
        matches!(self, MessageVersion::V2)
    }

    pub fn has_channel_identifier(self) -> bool {
        matches!(self, MessageVersion::V2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageVersion::V1 => "MRCP/1.0",
            MessageVersion::V2 => "MRCP/2.0",
        }
    }
}

impl fmt::Display for MessageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
