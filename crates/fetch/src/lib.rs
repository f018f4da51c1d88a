//! Chat-history fetching
//!
//! Merged chat-history bundles do not carry their content inline. The capture
//! system uploads the bundle somewhere and hands us a URL; this crate turns
//! that URL into the JSON text the normalizer needs.
//!
//! The important part is the fallback. If the URL is empty or malformed, the
//! host is unreachable, the status is not 2xx, or the body is empty, we do not
//! error out. We hand back a fixed JSON array instead (see
//! [`fallback_payload`]), the same bytes every time, so normalization always
//! produces something and tests stay reproducible without a network.
//!
//! ## Fetchers
//!
//! - [`HttpContentFetcher`] - one bounded blocking GET per call, no retries.
//! - [`OfflineFetcher`] - never touches the network, always the fallback.
//! - [`StaticFetcher`] - returns a canned body; handy in tests.
//!
//! Everything implements [`ContentFetcher`], which is what the normalizer
//! takes as an injected capability.
//!
//! ## Example
//!
//! ```
//! use fetch::{fallback_payload, ContentFetcher, OfflineFetcher};
//!
//! let fetcher = OfflineFetcher;
//! assert_eq!(fetcher.get("https://example.invalid/history"), fallback_payload());
//! ```

mod config;
mod error;
mod fallback;
mod http;
mod stub;

use std::sync::Arc;

pub use crate::config::{FetchConfig, MAX_TIMEOUT_SECS};
pub use crate::error::FetchError;
pub use crate::fallback::{fallback_payload, FALLBACK_DATADESCS};
pub use crate::http::HttpContentFetcher;
pub use crate::stub::{OfflineFetcher, StaticFetcher};

/// Capability that resolves a URL to JSON text.
///
/// Implementations must not fail: anything that goes wrong is answered with
/// [`fallback_payload`]. The trait is object safe so callers can hold an
/// `Arc<dyn ContentFetcher>` and swap in a stub under test.
pub trait ContentFetcher: Send + Sync {
    /// Returns the body at `url`, or the fixed fallback payload.
    fn get(&self, url: &str) -> String;
}

impl<F: ContentFetcher + ?Sized> ContentFetcher for Arc<F> {
    fn get(&self, url: &str) -> String {
        (**self).get(url)
    }
}

impl<F: ContentFetcher + ?Sized> ContentFetcher for &F {
    fn get(&self, url: &str) -> String {
        (**self).get(url)
    }
}
