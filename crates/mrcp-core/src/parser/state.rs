/// Where a resumable parse currently stands. The parser is driven one
/// buffer append at a time; each call to `MessageParser::run` advances as
/// far as the available bytes allow and leaves the remainder for the next
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    ReadingStartLine,
    ReadingHeaders,
    ReadingBody { remaining: usize },
}

impl Default for ParserState {
    fn default() -> Self {
        ParserState::ReadingStartLine
    }
}

/// Outcome of a single parse attempt, mirroring the three-way result a
/// streaming parser needs to report back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    /// Not enough bytes buffered yet; call again once more data arrives.
    Incomplete,
    /// A full message was parsed; bytes it consumed have been drained.
    Complete,
    /// The buffered bytes could not form a valid message.
    Invalid,
}
