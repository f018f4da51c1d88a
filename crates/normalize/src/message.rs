//! The chat-record entity handed from ingestion to persistence.
use chrono::{DateTime, Utc};
use fetch::ContentFetcher;
use serde::Serialize;

use crate::normalize;
use crate::types::CanonicalKind;

/// One chat record with its raw and canonical views.
///
/// Raw fields can be supplied in either order. Once both the raw type and a
/// raw message (possibly `None`) are present, [`normalize_with`] fills the
/// canonical fields exactly once; every later call is a no-op and later raw
/// writes never reach the canonical side.
///
/// [`normalize_with`]: Message::normalize_with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    pub sender: String,
    pub chat_time: Option<DateTime<Utc>>,
    raw_message: Option<String>,
    raw_type: Option<String>,
    canonical_message: Option<String>,
    canonical_type: Option<CanonicalKind>,
    processed: bool,
    #[serde(skip)]
    message_supplied: bool,
}

impl Message {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            ..Self::default()
        }
    }

    /// Builds and normalizes a record in one step.
    pub fn ingest(
        sender: impl Into<String>,
        raw_message: Option<String>,
        raw_type: impl Into<String>,
        chat_time: Option<DateTime<Utc>>,
        fetcher: &dyn ContentFetcher,
    ) -> Self {
        let mut message = Self::new(sender);
        message.chat_time = chat_time;
        message.set_raw_message(raw_message).set_raw_type(raw_type);
        message.normalize_with(fetcher);
        message
    }

    pub fn set_raw_message(&mut self, raw_message: Option<String>) -> &mut Self {
        self.raw_message = raw_message;
        self.message_supplied = true;
        self
    }

    pub fn set_raw_type(&mut self, raw_type: impl Into<String>) -> &mut Self {
        self.raw_type = Some(raw_type.into());
        self
    }

    /// Both raw fields have been supplied.
    pub fn is_ready(&self) -> bool {
        self.message_supplied && self.raw_type.is_some()
    }

    /// Runs normalization if the record is ready and not yet processed.
    ///
    /// Returns `true` only on the call that actually normalized.
    pub fn normalize_with(&mut self, fetcher: &dyn ContentFetcher) -> bool {
        if self.processed {
            return false;
        }
        let Some(raw_type) = self.raw_type.as_deref().filter(|_| self.message_supplied) else {
            return false;
        };

        let normalized = normalize(self.raw_message.as_deref(), raw_type, fetcher);
        self.canonical_message = normalized.message;
        self.canonical_type = Some(normalized.kind);
        self.processed = true;
        true
    }

    pub fn raw_message(&self) -> Option<&str> {
        self.raw_message.as_deref()
    }

    pub fn raw_type(&self) -> Option<&str> {
        self.raw_type.as_deref()
    }

    pub fn canonical_message(&self) -> Option<&str> {
        self.canonical_message.as_deref()
    }

    pub fn canonical_type(&self) -> Option<&CanonicalKind> {
        self.canonical_type.as_ref()
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;
    use fetch::{OfflineFetcher, StaticFetcher};

    use super::*;
    use crate::handlers::{PICTURE_TEXT, VOICE_DEFAULT};

    struct CountingFetcher(AtomicUsize);

    impl ContentFetcher for CountingFetcher {
        fn get(&self, _url: &str) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            r#"[{"datadesc":"hi"}]"#.to_string()
        }
    }

    #[test]
    fn not_ready_until_both_fields_supplied() {
        let mut msg = Message::new("alice");
        assert!(!msg.normalize_with(&OfflineFetcher));

        msg.set_raw_type("WxPic");
        assert!(!msg.is_ready());
        assert!(!msg.normalize_with(&OfflineFetcher));
        assert_eq!(msg.canonical_message(), None);

        msg.set_raw_message(None);
        assert!(msg.is_ready());
        assert!(msg.normalize_with(&OfflineFetcher));
        assert_eq!(msg.canonical_message(), Some(PICTURE_TEXT));
        assert_eq!(msg.canonical_type(), Some(&CanonicalKind::Picture));
    }

    #[test]
    fn setter_order_does_not_matter() {
        let mut a = Message::new("s");
        a.set_raw_message(Some(r#"{"text":"你好"}"#.into()))
            .set_raw_type("WxVoice");
        a.normalize_with(&OfflineFetcher);

        let mut b = Message::new("s");
        b.set_raw_type("WxVoice")
            .set_raw_message(Some(r#"{"text":"你好"}"#.into()));
        b.normalize_with(&OfflineFetcher);

        assert_eq!(a, b);
        assert_eq!(a.canonical_message(), Some("你好"));
    }

    #[test]
    fn second_normalization_is_a_noop() {
        let fetcher = CountingFetcher(AtomicUsize::new(0));
        let mut msg = Message::ingest(
            "bob",
            Some(r#"{"type":"merged","content":"https://h"}"#.into()),
            "WxLink",
            None,
            &fetcher,
        );
        assert!(msg.is_processed());
        assert_eq!(msg.canonical_message(), Some("hi"));

        assert!(!msg.normalize_with(&fetcher));
        assert_eq!(fetcher.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn raw_writes_after_processing_leave_canonical_alone() {
        let mut msg = Message::ingest("c", Some("{}".into()), "WxVoice", None, &OfflineFetcher);
        assert_eq!(msg.canonical_message(), Some(VOICE_DEFAULT));

        msg.set_raw_type("WxPic").set_raw_message(Some("changed".into()));
        msg.normalize_with(&OfflineFetcher);

        assert_eq!(msg.raw_message(), Some("changed"));
        assert_eq!(msg.raw_type(), Some("WxPic"));
        assert_eq!(msg.canonical_message(), Some(VOICE_DEFAULT));
        assert_eq!(msg.canonical_type(), Some(&CanonicalKind::Voice));
    }

    #[test]
    fn sender_and_time_do_not_affect_output() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let fetcher = StaticFetcher::new("[]");
        let a = Message::ingest("x", Some("hello".into()), "Text", Some(t), &fetcher);
        let b = Message::ingest("y", Some("hello".into()), "Text", None, &fetcher);
        assert_eq!(a.canonical_message(), b.canonical_message());
        assert_eq!(a.canonical_type(), b.canonical_type());
    }

    #[test]
    fn serializes_with_string_kind() {
        let msg = Message::ingest("d", None, "WxCustomPic", None, &OfflineFetcher);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["canonical_type"], "Sticker");
        assert_eq!(json["raw_message"], serde_json::Value::Null);
        assert_eq!(json["processed"], true);
        assert!(json.get("message_supplied").is_none());
    }
}
