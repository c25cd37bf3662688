use bytes::{Bytes, BytesMut};

use super::state::{ParseStatus, ParserState};
use super::stream::TextStream;
use crate::error::{Error, Result};
use crate::header::{HeaderName, HeaderSection};
use crate::message::channel_id::ChannelId;
use crate::message::message::MrcpMessage;
use crate::message::request_state::RequestState;
use crate::message::start_line::{RequestId, StartLine};
use crate::version::MessageVersion;

const MAX_LINE_LEN: usize = 8192;
const MAX_HEADERS: usize = 256;
const MAX_BODY_LEN: usize = 16 * 1024 * 1024;

/// Resumable parser, one instance per connection (MRCPv2) or per
/// transaction stream (MRCPv1). Bytes are appended as they arrive and
/// `poll` is called repeatedly until it reports anything but `Incomplete`.
///
/// A single implementation handles both protocol versions: the generic
/// shape (start-line, headers, body) is identical, only the start-line
/// grammar and the presence of a length prefix differ.
pub struct MessageParser {
    buf: BytesMut,
    state: ParserState,
    version: MessageVersion,
    partial: Option<PartialMessage>,
}

struct PartialMessage {
    start_line: StartLine,
    channel_id: Option<ChannelId>,
    headers: HeaderSection,
}

impl MessageParser {
    pub fn new(version: MessageVersion) -> Self {
        MessageParser {
            buf: BytesMut::new(),
            state: ParserState::ReadingStartLine,
            version,
            partial: None,
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Attempts to advance the parse as far as buffered bytes allow.
    /// Returns `Complete(message)` and drains consumed bytes, or
    /// `Incomplete`/`Invalid` without draining anything beyond a line
    /// that was fully consumed while parsing headers.
    pub fn poll(&mut self) -> Result<(ParseStatus, Option<MrcpMessage>)> {
        loop {
            match &self.state {
                ParserState::ReadingStartLine => {
                    let mut stream = TextStream::new(&self.buf);
                    let line = match stream.read_line() {
                        Some(line) => line,
                        None => {
                            if self.buf.len() > MAX_LINE_LEN {
                                return Err(Error::LineTooLong(self.buf.len()));
                            }
                            return Ok((ParseStatus::Incomplete, None));
                        }
                    };
                    let consumed = stream.position();
                    let start_line = parse_start_line(line, self.version)?;
                    let _ = self.buf.split_to(consumed);
                    self.partial = Some(PartialMessage {
                        start_line,
                        channel_id: None,
                        headers: HeaderSection::new(),
                    });
                    self.state = ParserState::ReadingHeaders;
                }
                ParserState::ReadingHeaders => {
                    let mut stream = TextStream::new(&self.buf);
                    let line = match stream.read_line() {
                        Some(line) => line,
                        None => {
                            if self.buf.len() > MAX_LINE_LEN {
                                return Err(Error::LineTooLong(self.buf.len()));
                            }
                            return Ok((ParseStatus::Incomplete, None));
                        }
                    };
                    let consumed = stream.position();
                    if line.is_empty() {
                        let _ = self.buf.split_to(consumed);
                        let partial = self.partial.as_ref().expect("headers require a start-line");
                        let remaining = partial.headers.content_length().unwrap_or(0);
                        if remaining > MAX_BODY_LEN {
                            return Err(Error::BodyTooLarge(remaining));
                        }
                        self.state = ParserState::ReadingBody { remaining };
                        continue;
                    }
                    let partial = self.partial.as_mut().expect("headers require a start-line");
                    if partial.headers.len() >= MAX_HEADERS {
                        return Err(Error::TooManyHeaders(partial.headers.len()));
                    }
                    let (name, value) = parse_header_line(line)?;
                    if name.eq_ignore_ascii_case("channel-identifier") {
                        partial.channel_id = Some(value.parse()?);
                    } else {
                        partial.headers.push(HeaderName::classify(name), value);
                    }
                    let _ = self.buf.split_to(consumed);
                }
                ParserState::ReadingBody { remaining } => {
                    let remaining = *remaining;
                    if self.buf.len() < remaining {
                        return Ok((ParseStatus::Incomplete, None));
                    }
                    let body = Bytes::copy_from_slice(&self.buf[..remaining]);
                    let _ = self.buf.split_to(remaining);
                    let partial = self.partial.take().expect("body requires a parsed header section");
                    let message = MrcpMessage {
                        start_line: partial.start_line,
                        channel_id: partial.channel_id,
                        headers: partial.headers,
                        body,
                    };
                    self.state = ParserState::ReadingStartLine;
                    return Ok((ParseStatus::Complete, Some(message)));
                }
            }
        }
    }
}

fn parse_start_line(line: &[u8], version: MessageVersion) -> Result<StartLine> {
    let line = std::str::from_utf8(line).map_err(Error::Utf8)?;
    let mut parts = line.split_whitespace();
    let version_token = parts.next().ok_or_else(|| Error::InvalidStartLine(line.to_string()))?;
    if !version_token.eq_ignore_ascii_case(version.as_str()) {
        return Err(Error::InvalidStartLine(format!(
            "expected {}, got {version_token}",
            version.as_str()
        )));
    }

    if version.has_length_prefix() {
        let _message_length: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::InvalidStartLine(line.to_string()))?;
    }

    let rest: Vec<&str> = parts.collect();
    match rest.len() {
        // status-code request-id request-state
        3 if rest[0].parse::<u16>().map(|c| c >= 100).unwrap_or(false) => {
            let status_code = rest[0].parse().unwrap();
            let request_id = RequestId::new(rest[1].parse().map_err(|_| Error::InvalidStartLine(line.to_string()))?)?;
            let request_state = rest[2].parse()?;
            Ok(StartLine::Response {
                version,
                request_id,
                status_code,
                request_state,
            })
        }
        // event-name request-id request-state
        3 => {
            let request_id = RequestId::new(rest[1].parse().map_err(|_| Error::InvalidStartLine(line.to_string()))?)?;
            let request_state = rest[2].parse()?;
            Ok(StartLine::Event {
                version,
                request_id,
                event_id: None,
                event_name: rest[0].to_string(),
                request_state,
            })
        }
        // method-name request-id
        2 => {
            let request_id = RequestId::new(rest[1].parse().map_err(|_| Error::InvalidStartLine(line.to_string()))?)?;
            Ok(StartLine::Request {
                version,
                request_id,
                method_id: None,
                method_name: rest[0].to_string(),
            })
        }
        _ => Err(Error::InvalidStartLine(line.to_string())),
    }
}

fn parse_header_line(line: &[u8]) -> Result<(&str, &str)> {
    let line = std::str::from_utf8(line).map_err(Error::Utf8)?;
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| Error::InvalidHeader(line.to_string()))?;
    Ok((name.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(bytes: &[u8], version: MessageVersion) -> Vec<MrcpMessage> {
        let mut parser = MessageParser::new(version);
        parser.feed(bytes);
        let mut out = Vec::new();
        loop {
            match parser.poll().unwrap() {
                (ParseStatus::Complete, Some(msg)) => out.push(msg),
                (ParseStatus::Incomplete, _) => break,
                (ParseStatus::Invalid, _) => panic!("unexpected invalid"),
                _ => unreachable!(),
            }
        }
        out
    }

    #[test]
    fn parses_v2_request_with_channel_id_and_body() {
        let raw = b"MRCP/2.0 95 SPEAK 1\r\nChannel-Identifier: 1234abcd@speechsynth\r\nContent-Type: application/ssml+xml\r\nContent-Length: 20\r\n\r\n<speak>hello</speak>";
        let messages = parse_all(raw, MessageVersion::V2);
        assert_eq!(messages.len(), 1);
        let msg = &messages[0];
        assert_eq!(msg.body.len(), 20);
        assert_eq!(msg.channel_id.as_ref().unwrap().resource_name, "speechsynth");
        match &msg.start_line {
            StartLine::Request { method_name, request_id, .. } => {
                assert_eq!(method_name, "SPEAK");
                assert_eq!(request_id.get(), 1);
            }
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn parses_v2_response_without_body() {
        let raw = b"MRCP/2.0 45 200 1 COMPLETE\r\nChannel-Identifier: 1234abcd@speechsynth\r\n\r\n";
        let messages = parse_all(raw, MessageVersion::V2);
        match &messages[0].start_line {
            StartLine::Response { status_code, request_state, .. } => {
                assert_eq!(*status_code, 200);
                assert_eq!(*request_state, RequestState::Complete);
            }
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[test]
    fn incomplete_buffer_yields_incomplete_not_error() {
        let mut parser = MessageParser::new(MessageVersion::V2);
        parser.feed(b"MRCP/2.0 95 SPEAK 1\r\nChannel-Identifier: a@b\r\n");
        let (status, msg) = parser.poll().unwrap();
        assert_eq!(status, ParseStatus::Incomplete);
        assert!(msg.is_none());
    }

    #[test]
    fn feeding_across_two_calls_completes_the_message() {
        let mut parser = MessageParser::new(MessageVersion::V1);
        parser.feed(b"MRCP/1.0 SPEAK 1\r\n");
        assert_eq!(parser.poll().unwrap().0, ParseStatus::Incomplete);
        parser.feed(b"Content-Length: 0\r\n\r\n");
        let (status, msg) = parser.poll().unwrap();
        assert_eq!(status, ParseStatus::Complete);
        assert!(msg.is_some());
    }

    #[test]
    fn parses_v1_without_length_prefix_or_channel_id() {
        let raw = b"MRCP/1.0 SPEAK 1\r\nContent-Length: 0\r\n\r\n";
        let messages = parse_all(raw, MessageVersion::V1);
        assert!(messages[0].channel_id.is_none());
    }

    #[test]
    fn rejects_mismatched_version_token() {
        let mut parser = MessageParser::new(MessageVersion::V2);
        parser.feed(b"MRCP/1.0 SPEAK 1\r\n");
        assert!(parser.poll().is_err());
    }
}
