use thiserror::Error;

/// Why a fetch attempt did not yield a usable body.
///
/// These never escape [`ContentFetcher::get`](crate::ContentFetcher::get);
/// they surface from [`HttpContentFetcher::try_get`](crate::HttpContentFetcher::try_get)
/// and in the warning logged right before the fallback is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchError {
    /// Empty, unparsable, or non-http(s) URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Connection, timeout, or body-read failure.
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("unexpected http status {0}")]
    Status(u16),
    /// 2xx response with nothing (or only whitespace) in it.
    #[error("response body is empty")]
    EmptyBody,
    /// Fetch settings are out of range.
    #[error("invalid fetch config: {0}")]
    InvalidConfig(String),
    /// The HTTP client itself could not be built.
    #[error("failed to build http client: {0}")]
    Client(String),
}

impl FetchError {
    /// True for failures a later attempt against the same URL might not hit.
    ///
    /// Nothing here retries; the flag only feeds logging.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request(_) => true,
            FetchError::Status(code) => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}
