use thiserror::Error;

/// Errors raised by the ambient runtime (task substrate, lifecycle, config, logging).
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("component not ready: {0}")]
    ComponentNotReady(String),

    #[error("dependency error: {0}")]
    Dependency(String),

    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("task error: {0}")]
    Task(String),

    #[error("{0}")]
    Custom(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Error::Custom(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
