pub mod message_parser;
pub mod state;
pub mod stream;

pub use message_parser::MessageParser;
pub use state::{ParseStatus, ParserState};
pub use stream::TextStream;
