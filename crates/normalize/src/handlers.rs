//! Per-tag handlers.
//!
//! Every handler returns a [`Normalized`] no matter what the payload looks
//! like. Malformed JSON is logged and replaced by the handler's default text;
//! for `WxLink` the default is passthrough.
use fetch::ContentFetcher;
use tracing::warn;

use crate::duration::format_duration;
use crate::payload::{
    match_link_payload, match_voice_payload, match_voip_payload, parse_history, parse_object,
    SubPayload, CALL_LENGTH_MARKER,
};
use crate::types::{CanonicalKind, Normalized, TransportTag};
use crate::xml::extract_title;

pub const MINI_PROGRAM_DEFAULT: &str = "小程序分享";
pub const CHAT_HISTORY_DEFAULT: &str = "合并的聊天记录";
pub const PAYMENT_LINK_TEXT: &str = "向商家付款的链接";
pub const CONTENT_SHARING_DEFAULT: &str = "内容分享";
pub const VOICE_DEFAULT: &str = "语音消息";
pub const PICTURE_TEXT: &str = "这里发送了一张图片";
pub const STICKER_TEXT: &str = "这里发送了一个表情包";
pub const VOICE_CALL_DEFAULT: &str = "这是一段通话";

pub(crate) fn picture() -> Normalized {
    Normalized::new(PICTURE_TEXT, CanonicalKind::Picture)
}

pub(crate) fn sticker() -> Normalized {
    Normalized::new(STICKER_TEXT, CanonicalKind::Sticker)
}

pub(crate) fn link(raw: &str, fetcher: &dyn ContentFetcher) -> Normalized {
    let obj = match parse_object(raw) {
        Ok(obj) => obj,
        Err(err) => {
            warn!(error = %err, "link_payload_passthrough");
            return Normalized::passthrough(Some(raw), &TransportTag::Link);
        }
    };

    match match_link_payload(&obj) {
        SubPayload::MiniProgram { content_xml } => {
            let title = extract_title(content_xml.as_deref());
            if title.is_empty() {
                Normalized::new(MINI_PROGRAM_DEFAULT, CanonicalKind::MiniProgram)
            } else {
                Normalized::new(title, CanonicalKind::MiniProgram)
            }
        }
        SubPayload::Merged { url } => chat_history(&url, fetcher),
        SubPayload::PaymentLink { .. } => {
            Normalized::new(PAYMENT_LINK_TEXT, CanonicalKind::PaymentLink)
        }
        SubPayload::LinkShare { title, desc } => {
            let text = match desc {
                Some(desc) => format!("{title}\n{desc}"),
                None => title,
            };
            Normalized::new(text, CanonicalKind::LinkShare)
        }
        SubPayload::ContentSharing { text } => Normalized::new(
            text.unwrap_or_else(|| CONTENT_SHARING_DEFAULT.to_string()),
            CanonicalKind::ContentSharing,
        ),
        _ => Normalized::passthrough(Some(raw), &TransportTag::Link),
    }
}

/// The only path that does I/O: resolve the bundle URL and join its entries.
fn chat_history(url: &str, fetcher: &dyn ContentFetcher) -> Normalized {
    let body = fetcher.get(url);
    match parse_history(&body) {
        Ok(descs) if !descs.is_empty() => {
            Normalized::new(descs.join("\n"), CanonicalKind::ChatHistory)
        }
        Ok(_) => Normalized::new(CHAT_HISTORY_DEFAULT, CanonicalKind::ChatHistory),
        Err(err) => {
            warn!(url, error = %err, "chat_history_default");
            Normalized::new(CHAT_HISTORY_DEFAULT, CanonicalKind::ChatHistory)
        }
    }
}

pub(crate) fn voice(raw: &str) -> Normalized {
    let text = match parse_object(raw) {
        Ok(obj) => match match_voice_payload(&obj) {
            SubPayload::VoiceText { text: Some(text) } if !text.is_empty() => text,
            _ => VOICE_DEFAULT.to_string(),
        },
        Err(err) => {
            warn!(error = %err, "voice_payload_default");
            VOICE_DEFAULT.to_string()
        }
    };
    Normalized::new(text, CanonicalKind::Voice)
}

pub(crate) fn voip(raw: &str) -> Normalized {
    let text = match parse_object(raw) {
        Ok(obj) => match match_voip_payload(&obj) {
            SubPayload::Voip {
                content: Some(content),
                ..
            } if content.contains(CALL_LENGTH_MARKER) => {
                format!("这是一段时长为{}的通话", after_first_space(&content))
            }
            SubPayload::Voip {
                duration: Some(seconds),
                ..
            } => format!("这是一段时长为{}的通话", format_duration(seconds)),
            _ => VOICE_CALL_DEFAULT.to_string(),
        },
        Err(err) => {
            warn!(error = %err, "voip_payload_default");
            VOICE_CALL_DEFAULT.to_string()
        }
    };
    Normalized::new(text, CanonicalKind::VoiceCall)
}

/// Everything after the first ASCII space; the whole string when there is none.
fn after_first_space(s: &str) -> &str {
    s.split_once(' ').map_or(s, |(_, rest)| rest)
}
