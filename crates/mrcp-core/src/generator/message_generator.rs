use bytes::{BufMut, BytesMut};

use crate::error::{Error, Result};
use crate::message::message::MrcpMessage;
use crate::message::start_line::StartLine;

const CRLF: &str = "\r\n";

/// Generates the wire form of a message into a caller-supplied buffer.
///
/// MRCPv2's start-line carries the total message length as its second
/// token, which is only known once the rest of the message has been
/// written. Rather than measuring twice, this writes the start-line with
/// a placeholder, serializes headers and body, then backfills the
/// placeholder with the real length — a two-pass generate that still
/// does a single allocation.
pub fn generate(message: &MrcpMessage, out: &mut BytesMut) -> Result<()> {
    let version = message.version();
    let start_line_offset = out.len();

    let placeholder = if version.has_length_prefix() {
        Some(write_start_line_with_placeholder(message, out))
    } else {
        write_start_line(message, out);
        None
    };

    if let Some(channel_id) = &message.channel_id {
        write_header_line(out, "Channel-Identifier", &channel_id.to_string());
    }
    for (name, value) in message.headers.iter() {
        write_header_line(out, name.as_wire_str(), value);
    }
    out.put_slice(CRLF.as_bytes());
    out.put_slice(&message.body);

    if let Some((placeholder_start, placeholder_width)) = placeholder {
        let total_len = out.len() - start_line_offset;
        backfill_length(out, placeholder_start, placeholder_width, total_len)?;
    }

    Ok(())
}

fn push(out: &mut BytesMut, s: impl AsRef<str>) {
    out.put_slice(s.as_ref().as_bytes());
}

/// Writes the start-line for a version without a length prefix (MRCPv1).
fn write_start_line(message: &MrcpMessage, out: &mut BytesMut) {
    let version = message.version();
    match &message.start_line {
        StartLine::Request { request_id, method_name, .. } => {
            push(out, format!("{} {} {}", version.as_str(), method_name, request_id));
        }
        StartLine::Response { request_id, status_code, request_state, .. } => {
            push(out, format!("{} {} {} {}", version.as_str(), status_code, request_id, request_state));
        }
        StartLine::Event { request_id, event_name, request_state, .. } => {
            push(out, format!("{} {} {} {}", version.as_str(), event_name, request_id, request_state));
        }
    }
    push(out, CRLF);
}

/// Writes the start-line for MRCPv2 with a fixed-width placeholder for the
/// message length; returns `(byte offset of the placeholder, placeholder
/// width in bytes)` so it can be overwritten once the real length is known.
fn write_start_line_with_placeholder(message: &MrcpMessage, out: &mut BytesMut) -> (usize, usize) {
    const PLACEHOLDER_WIDTH: usize = 10;
    let version = message.version();
    push(out, format!("{} ", version.as_str()));
    let placeholder_start = out.len();
    out.put_slice(&b" ".repeat(PLACEHOLDER_WIDTH));
    out.put_u8(b' ');

    match &message.start_line {
        StartLine::Request { request_id, method_name, .. } => {
            push(out, format!("{} {}", method_name, request_id));
        }
        StartLine::Response { request_id, status_code, request_state, .. } => {
            push(out, format!("{} {} {}", status_code, request_id, request_state));
        }
        StartLine::Event { request_id, event_name, request_state, .. } => {
            push(out, format!("{} {} {}", event_name, request_id, request_state));
        }
    }
    push(out, CRLF);
    (placeholder_start, PLACEHOLDER_WIDTH)
}

fn backfill_length(out: &mut BytesMut, placeholder_start: usize, placeholder_width: usize, total_len: usize) -> Result<()> {
    let digits = total_len.to_string();
    if digits.len() > placeholder_width {
        return Err(Error::Truncated(total_len));
    }
    let padded = format!("{digits:>placeholder_width$}");
    out[placeholder_start..placeholder_start + placeholder_width].copy_from_slice(padded.as_bytes());
    Ok(())
}

fn write_header_line(out: &mut BytesMut, name: &str, value: &str) {
    push(out, name);
    push(out, ": ");
    push(out, value);
    push(out, CRLF);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HeaderName;
    use crate::message::{ChannelId, RequestId};
    use crate::version::MessageVersion;

    fn sample_request() -> MrcpMessage {
        MrcpMessage::new(StartLine::Request {
            version: MessageVersion::V2,
            request_id: RequestId::new(1).unwrap(),
            method_id: None,
            method_name: "SPEAK".to_string(),
        })
        .with_channel_id(ChannelId::new("1234abcd", "speechsynth"))
        .with_header(HeaderName::ContentType, "application/ssml+xml")
        .with_body(&b"<speak>hi</speak>"[..])
    }

    #[test]
    fn generates_v2_request_with_correct_length_prefix() {
        let message = sample_request();
        let mut out = BytesMut::new();
        generate(&message, &mut out).unwrap();
        let text = std::str::from_utf8(&out).unwrap();
        let first_line = text.lines().next().unwrap();
        let mut tokens = first_line.split_whitespace();
        assert_eq!(tokens.next().unwrap(), "MRCP/2.0");
        let declared_len: usize = tokens.next().unwrap().parse().unwrap();
        assert_eq!(declared_len, out.len());
    }

    #[test]
    fn generates_v1_without_length_prefix() {
        let message = MrcpMessage::new(StartLine::Request {
            version: MessageVersion::V1,
            request_id: RequestId::new(1).unwrap(),
            method_id: None,
            method_name: "SPEAK".to_string(),
        });
        let mut out = BytesMut::new();
        generate(&message, &mut out).unwrap();
        let text = std::str::from_utf8(&out).unwrap();
        assert!(text.starts_with("MRCP/1.0 SPEAK 1\r\n"));
    }

    #[test]
    fn round_trips_through_generate_and_parse() {
        use crate::parser::MessageParser;
        let message = sample_request();
        let mut out = BytesMut::new();
        generate(&message, &mut out).unwrap();
        let mut parser = MessageParser::new(MessageVersion::V2);
        parser.feed(&out);
        let (status, parsed) = parser.poll().unwrap();
        assert_eq!(status, crate::parser::ParseStatus::Complete);
        let parsed = parsed.unwrap();
        assert_eq!(parsed.channel_id, message.channel_id);
        assert_eq!(parsed.body, message.body);
    }
}
