use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("channel {0} not found")]
    ChannelNotFound(String),

    #[error("an offer is already in progress for session {0}")]
    OfferInProgress(String),

    #[error("no offer is in progress for session {0}")]
    NoOfferInProgress(String),

    #[error("codec error: {0}")]
    Codec(#[from] mrcp_core::Error),

    #[error("transport error: {0}")]
    Transport(#[from] mrcp_transport::Error),

    #[error("signaling error: {0}")]
    Signaling(String),

    #[error("media error: {0}")]
    Media(String),

    #[error("{0}")]
    Other(String),
}
