use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] mrcp_core::Error),

    #[error("connection closed")]
    Closed,

    #[error("no connection bound for channel {0}")]
    NoConnection(String),

    #[error("tls error: {0}")]
    Tls(String),

    #[error("{0}")]
    Other(String),
}
