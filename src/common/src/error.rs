use std::{io, result};

pub type DsResult<T, E = DsError> = result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DsError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Toml(#[from] toml::de::Error),
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
    #[error("invalid qos value: {0}")]
    InvalidQos(u8),
    #[error("unknown qos label: {0}")]
    UnknownQosLabel(String),
    #[error("invalid topic: {0:?}")]
    InvalidTopic(String),
    #[error("invalid broker url {0:?}")]
    InvalidBrokerUrl(String),
    #[error("invalid client id {0:?}")]
    InvalidClientId(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidChannelValue { key: String, value: String },
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
}

impl DsError {
    /// Whether the error was caused by the caller's input rather than the environment.
    pub fn is_bad_request(&self) -> bool {
        !matches!(self, DsError::Io(_))
    }
}
