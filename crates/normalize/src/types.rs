//! Tags in, categories out.
//!
//! ```text
//! raw type tag ──► TransportTag ──► dispatch ──► Normalized
//!                   Link                          ├── message: Option<String>
//!                   Voice                         └── kind: CanonicalKind
//!                   Picture                             MiniProgram | ChatHistory
//!                   Sticker                             PaymentLink | LinkShare
//!                   Voip                                ContentSharing | Voice
//!                   Other(tag)                          Picture | Sticker
//!                                                       VoiceCall | Passthrough(tag)
//! ```
//!
//! Both enums serialize as their plain tag strings, so persisted records keep
//! the exact text the capture system and downstream readers expect.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport tag supplied by the chat-capture system.
///
/// Matching is exact and case-sensitive; anything unknown lands in
/// [`Other`](TransportTag::Other) and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransportTag {
    /// `WxLink`: link, mini-program, merged history, payment or content share.
    Link,
    /// `WxVoice`: voice clip, possibly with a transcript.
    Voice,
    /// `WxPic`: picture.
    Picture,
    /// `WxCustomPic`: custom sticker.
    Sticker,
    /// `WxVoip`: voice-call notice.
    Voip,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl TransportTag {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "WxLink" => TransportTag::Link,
            "WxVoice" => TransportTag::Voice,
            "WxPic" => TransportTag::Picture,
            "WxCustomPic" => TransportTag::Sticker,
            "WxVoip" => TransportTag::Voip,
            other => TransportTag::Other(other.to_string()),
        }
    }

    /// The tag exactly as the capture system spells it.
    pub fn as_str(&self) -> &str {
        match self {
            TransportTag::Link => "WxLink",
            TransportTag::Voice => "WxVoice",
            TransportTag::Picture => "WxPic",
            TransportTag::Sticker => "WxCustomPic",
            TransportTag::Voip => "WxVoip",
            TransportTag::Other(tag) => tag,
        }
    }
}

impl From<&str> for TransportTag {
    fn from(value: &str) -> Self {
        TransportTag::parse(value)
    }
}

impl From<String> for TransportTag {
    fn from(value: String) -> Self {
        match TransportTag::parse(&value) {
            TransportTag::Other(_) => TransportTag::Other(value),
            known => known,
        }
    }
}

impl From<TransportTag> for String {
    fn from(value: TransportTag) -> Self {
        match value {
            TransportTag::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TransportTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category attached to every normalized record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CanonicalKind {
    MiniProgram,
    ChatHistory,
    PaymentLink,
    LinkShare,
    ContentSharing,
    Voice,
    Picture,
    Sticker,
    VoiceCall,
    /// No rule applied; carries the raw tag unchanged.
    Passthrough(String),
}

impl CanonicalKind {
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalKind::MiniProgram => "MiniProgram",
            CanonicalKind::ChatHistory => "ChatHistory",
            CanonicalKind::PaymentLink => "PaymentLink",
            CanonicalKind::LinkShare => "LinkShare",
            CanonicalKind::ContentSharing => "ContentSharing",
            CanonicalKind::Voice => "Voice",
            CanonicalKind::Picture => "Picture",
            CanonicalKind::Sticker => "Sticker",
            CanonicalKind::VoiceCall => "VoiceCall",
            CanonicalKind::Passthrough(tag) => tag,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, CanonicalKind::Passthrough(_))
    }
}

impl From<String> for CanonicalKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "MiniProgram" => CanonicalKind::MiniProgram,
            "ChatHistory" => CanonicalKind::ChatHistory,
            "PaymentLink" => CanonicalKind::PaymentLink,
            "LinkShare" => CanonicalKind::LinkShare,
            "ContentSharing" => CanonicalKind::ContentSharing,
            "Voice" => CanonicalKind::Voice,
            "Picture" => CanonicalKind::Picture,
            "Sticker" => CanonicalKind::Sticker,
            "VoiceCall" => CanonicalKind::VoiceCall,
            _ => CanonicalKind::Passthrough(value),
        }
    }
}

impl From<CanonicalKind> for String {
    fn from(value: CanonicalKind) -> Self {
        match value {
            CanonicalKind::Passthrough(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CanonicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of normalizing one record.
///
/// `message` is only `None` when a null raw message was passed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalized {
    pub message: Option<String>,
    pub kind: CanonicalKind,
}

impl Normalized {
    pub(crate) fn new(message: impl Into<String>, kind: CanonicalKind) -> Self {
        Self {
            message: Some(message.into()),
            kind,
        }
    }

    /// Raw message and raw tag, both unchanged.
    pub(crate) fn passthrough(raw_message: Option<&str>, tag: &TransportTag) -> Self {
        Self {
            message: raw_message.map(str::to_string),
            kind: CanonicalKind::Passthrough(tag.as_str().to_string()),
        }
    }

    /// Canonical text, with a null passthrough read as empty.
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}
