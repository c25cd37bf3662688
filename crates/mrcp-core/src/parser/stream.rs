use bytes::{Buf, BytesMut};

/// A cursor over a growable byte buffer, used to navigate a message line by
/// line and field by field without copying until a line is actually taken.
///
/// Lines are CRLF-terminated; a bare LF is also accepted since lenient
/// line endings show up in the wild despite the grammar requiring CRLF.
pub struct TextStream<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> TextStream<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        TextStream { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Reads one CRLF- or LF-terminated line, advancing past the
    /// terminator. Returns `None` if no terminator has arrived yet.
    pub fn read_line(&mut self) -> Option<&'a [u8]> {
        let rest = &self.buf[self.pos..];
        let lf = rest.iter().position(|&b| b == b'\n')?;
        let line_end = if lf > 0 && rest[lf - 1] == b'\r' { lf - 1 } else { lf };
        let line = &rest[..line_end];
        self.pos += lf + 1;
        Some(line)
    }

    /// Reads a field up to (not including) `separator`, optionally
    /// skipping leading spaces, mirroring field-by-field line navigation.
    pub fn read_field(line: &'a [u8], separator: u8, skip_spaces: bool) -> (&'a [u8], &'a [u8]) {
        let line = if skip_spaces {
            let start = line.iter().position(|&b| b != b' ').unwrap_or(line.len());
            &line[start..]
        } else {
            line
        };
        match line.iter().position(|&b| b == separator) {
            Some(idx) => (&line[..idx], &line[idx + 1..]),
            None => (line, &line[line.len()..]),
        }
    }

    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn take_remaining(&mut self, n: usize) -> &'a [u8] {
        let end = (self.pos + n).min(self.buf.len());
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        slice
    }
}

/// Drains `n` consumed bytes off the front of an accumulation buffer once
/// a full message (or as much of one as was parsed) has been read.
pub fn drain_consumed(buf: &mut BytesMut, n: usize) {
    buf.advance(n);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_crlf_terminated_line() {
        let mut stream = TextStream::new(b"MRCP/2.0 123 SPEAK 1\r\nrest");
        let line = stream.read_line().unwrap();
        assert_eq!(line, b"MRCP/2.0 123 SPEAK 1");
        assert_eq!(stream.remaining(), b"rest");
    }

    #[test]
    fn reads_bare_lf_line() {
        let mut stream = TextStream::new(b"foo\nbar\n");
        assert_eq!(stream.read_line().unwrap(), b"foo");
        assert_eq!(stream.read_line().unwrap(), b"bar");
    }

    #[test]
    fn returns_none_without_terminator() {
        let mut stream = TextStream::new(b"no newline here");
        assert!(stream.read_line().is_none());
    }

    #[test]
    fn reads_field_skipping_spaces() {
        let (field, rest) = TextStream::read_field(b"Content-Type:  text/plain", b':', false);
        assert_eq!(field, b"Content-Type");
        let (value, _) = TextStream::read_field(rest, b'\0', true);
        assert_eq!(value, b"text/plain");
    }
}
