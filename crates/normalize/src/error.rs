//! Embedded-payload failures.
//!
//! None of these ever leave [`normalize`](crate::normalize). They are raised
//! inside a handler, logged at warn level, and replaced by that handler's
//! default text (or by passthrough for `WxLink`). They are public so the
//! parsing helpers can be exercised and matched on directly.
use thiserror::Error;

/// Why an embedded JSON payload could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PayloadError {
    /// The text is not JSON at all.
    #[error("invalid json payload: {0}")]
    InvalidJson(String),

    /// Valid JSON, but the handler needs an object.
    #[error("expected a json object, found {0}")]
    NotAnObject(&'static str),

    /// Valid JSON, but a chat-history body must be an array.
    #[error("expected a json array, found {0}")]
    NotAnArray(&'static str),
}
