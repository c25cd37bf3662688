pub mod message_generator;

pub use message_generator::generate;
