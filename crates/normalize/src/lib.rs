//! Chat record normalization
//!
//! Chat-capture exports hand us one record per message: a raw payload string
//! and a transport tag (`WxLink`, `WxVoice`, `WxPic`, ...). Payload shapes vary
//! wildly; some are plain text, most are JSON with fields that only make sense
//! per tag, some embed XML, and merged chat histories point at a URL. This
//! crate boils every record down to one display string and one category that
//! analytics and UIs can rely on.
//!
//! ## What we do here
//!
//! - **Dispatch on the tag** - [`TransportTag`] is a closed enum; unknown tags
//!   fall into `Other` and pass through untouched.
//! - **Sniff payload shapes** - `WxLink` JSON is tried against an ordered list
//!   of shape matchers ([`LINK_SHAPES`]); first match wins.
//! - **Fetch merged histories** - through an injected
//!   [`ContentFetcher`](fetch::ContentFetcher), which never fails.
//! - **Format call lengths and share titles** - [`format_duration`] and
//!   [`extract_title`].
//! - **Never fail** - bad JSON is logged and replaced with a per-tag default.
//!   [`normalize`] has no error path.
//!
//! ## Main entry point
//!
//! [`normalize`] is a pure function of `(raw_message, raw_type)` plus whatever
//! the fetcher returns. [`Message`] wraps it for the ingestion pipeline and
//! guarantees it runs at most once per record.
//!
//! ## Example
//!
//! ```
//! use fetch::OfflineFetcher;
//! use normalize::{normalize, CanonicalKind};
//!
//! let out = normalize(Some(r#"{"duration":3754}"#), "WxVoip", &OfflineFetcher);
//! assert_eq!(out.message.as_deref(), Some("这是一段时长为1小时02分种34秒的通话"));
//! assert_eq!(out.kind, CanonicalKind::VoiceCall);
//!
//! let out = normalize(Some("hello"), "unknown_tag", &OfflineFetcher);
//! assert_eq!(out.message.as_deref(), Some("hello"));
//! assert_eq!(out.kind.as_str(), "unknown_tag");
//! ```
use std::time::Instant;

use fetch::ContentFetcher;
use tracing::{debug, Level};

mod duration;
mod error;
mod handlers;
mod message;
mod payload;
mod types;
mod xml;

pub use crate::duration::format_duration;
pub use crate::error::PayloadError;
pub use crate::handlers::{
    CHAT_HISTORY_DEFAULT, CONTENT_SHARING_DEFAULT, MINI_PROGRAM_DEFAULT, PAYMENT_LINK_TEXT,
    PICTURE_TEXT, STICKER_TEXT, VOICE_CALL_DEFAULT, VOICE_DEFAULT,
};
pub use crate::message::Message;
pub use crate::payload::{
    match_link_payload, match_voice_payload, match_voip_payload, parse_history, parse_object,
    ShapeMatcher, SubPayload, CALL_LENGTH_MARKER, LINK_SHAPES, PAYMENT_TITLE_MARKER,
};
pub use crate::types::{CanonicalKind, Normalized, TransportTag};
pub use crate::xml::extract_title;

/// Normalizes one raw record into its canonical message and kind.
///
/// `raw_type` is matched exactly. A `None` message is only handled by the
/// picture and sticker rules (which ignore it anyway); every other tag passes
/// a `None` through unchanged. Only a `WxLink` merged-history payload calls
/// `fetcher`.
pub fn normalize(
    raw_message: Option<&str>,
    raw_type: &str,
    fetcher: &dyn ContentFetcher,
) -> Normalized {
    let start = Instant::now();
    let tag = TransportTag::parse(raw_type);

    let span = tracing::span!(Level::INFO, "normalize.normalize", tag = %tag);
    let _guard = span.enter();

    let normalized = dispatch(raw_message, &tag, fetcher);

    debug!(
        kind = %normalized.kind,
        passthrough = normalized.kind.is_passthrough(),
        canonical_len = normalized.text().len(),
        elapsed_micros = start.elapsed().as_micros(),
        "normalize_success"
    );
    normalized
}

fn dispatch(
    raw_message: Option<&str>,
    tag: &TransportTag,
    fetcher: &dyn ContentFetcher,
) -> Normalized {
    match (tag, raw_message) {
        (TransportTag::Picture, _) => handlers::picture(),
        (TransportTag::Sticker, _) => handlers::sticker(),
        (TransportTag::Link, Some(raw)) => handlers::link(raw, fetcher),
        (TransportTag::Voice, Some(raw)) => handlers::voice(raw),
        (TransportTag::Voip, Some(raw)) => handlers::voip(raw),
        (TransportTag::Link | TransportTag::Voice | TransportTag::Voip, None)
        | (TransportTag::Other(_), _) => Normalized::passthrough(raw_message, tag),
    }
}
