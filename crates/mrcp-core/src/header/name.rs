use std::fmt;

/// Generic (resource-agnostic) header fields, classified by id for O(1)
/// lookup. Resource-specific fields (Completion-Cause, Confidence-Threshold,
/// ...) are not modeled here — per the message codec's resource-specific
/// vtable, they stay `Other(name)` until a resource layer interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeaderName {
    ChannelIdentifier,
    ContentType,
    ContentId,
    ContentBase,
    ContentEncoding,
    ContentLength,
    CacheControl,
    LoggingTag,
    VendorSpecificParameters,
    Accept,
    ActiveRequestIdList,
    ProxySyncId,
    Other(String),
}

impl HeaderName {
    /// Classify a field name as received on the wire. Comparison is
    /// case-insensitive per RFC 6787's generic-header grammar.
    pub fn classify(name: &str) -> HeaderName {
        match name.to_ascii_lowercase().as_str() {
            "channel-identifier" => HeaderName::ChannelIdentifier,
            "content-type" => HeaderName::ContentType,
            "content-id" => HeaderName::ContentId,
            "content-base" => HeaderName::ContentBase,
            "content-encoding" => HeaderName::ContentEncoding,
            "content-length" => HeaderName::ContentLength,
            "cache-control" => HeaderName::CacheControl,
            "logging-tag" => HeaderName::LoggingTag,
            "vendor-specific-parameters" => HeaderName::VendorSpecificParameters,
            "accept" => HeaderName::Accept,
            "active-request-id-list" => HeaderName::ActiveRequestIdList,
            "proxy-sync-id" => HeaderName::ProxySyncId,
            _ => HeaderName::Other(name.to_string()),
        }
    }

    pub fn as_wire_str(&self) -> &str {
        match self {
            HeaderName::ChannelIdentifier => "Channel-Identifier",
            HeaderName::ContentType => "Content-Type",
            HeaderName::ContentId => "Content-Id",
            HeaderName::ContentBase => "Content-Base",
            HeaderName::ContentEncoding => "Content-Encoding",
            HeaderName::ContentLength => "Content-Length",
            HeaderName::CacheControl => "Cache-Control",
            HeaderName::LoggingTag => "Logging-Tag",
            HeaderName::VendorSpecificParameters => "Vendor-Specific-Parameters",
            HeaderName::Accept => "Accept",
            HeaderName::ActiveRequestIdList => "Active-Request-Id-List",
            HeaderName::ProxySyncId => "Proxy-Sync-Id",
            HeaderName::Other(name) => name,
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}
