pub mod channel_id;
pub mod message;
pub mod request_state;
pub mod start_line;

pub use channel_id::ChannelId;
pub use message::MrcpMessage;
pub use request_state::RequestState;
pub use start_line::{RequestId, StartLine};
