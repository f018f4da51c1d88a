//! The fixed payload handed back whenever a real fetch cannot complete.

/// `datadesc` values carried by [`fallback_payload`], in order.
pub const FALLBACK_DATADESCS: [&str; 3] = [
    "前12天是解决肥胖湿气根源 提升脾胃 分解湿气 产品服用方法",
    "[图片]",
    "注意事项",
];

const FALLBACK_JSON: &str = concat!(
    r#"[{"dataid":"5c0e1b7a9d3f4e21a8b6c0d2e4f61a01","#,
    r#""datadesc":"前12天是解决肥胖湿气根源 提升脾胃 分解湿气 产品服用方法"},"#,
    r#"{"dataid":"5c0e1b7a9d3f4e21a8b6c0d2e4f61a02","datadesc":"[图片]"},"#,
    r#"{"dataid":"5c0e1b7a9d3f4e21a8b6c0d2e4f61a03","datadesc":"注意事项"}]"#,
);

/// Deterministic stand-in for a merged chat-history body.
///
/// A JSON array of exactly three objects, each with an opaque `dataid` and a
/// `datadesc` from [`FALLBACK_DATADESCS`]. Identical on every call.
pub fn fallback_payload() -> &'static str {
    FALLBACK_JSON
}
