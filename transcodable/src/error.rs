//! Error types and helpers.
use {std::string::FromUtf8Error, thiserror::Error};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The single terminal failure a transformer pipeline can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// A transformer rejected its input. Carries the underlying cause.
    #[error("transform failed: {0}")]
    Transform(#[source] BoxError),
    /// An optional value was absent and no default was supplied.
    #[error("value not found")]
    ValueNotFound,
    /// Encoding produced bytes that are not valid UTF-8.
    #[error(transparent)]
    InvalidUtf8(#[from] FromUtf8Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Wrap an arbitrary cause as a transform failure.
    pub fn transform<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Transform(cause.into())
    }

    pub fn custom<T>(msg: T) -> Self
    where
        T: core::fmt::Display,
    {
        Self::Custom(msg.to_string())
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cold]
pub const fn value_not_found() -> Error {
    Error::ValueNotFound
}
