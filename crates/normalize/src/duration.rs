//! Call-length rendering for voice-call notices.

/// Renders `total_seconds` the way call notices display it.
///
/// With at least one full hour the output is `"{h}小时{mm}分种{ss}秒"`;
/// otherwise `"{m}分钟{ss}秒"`. Hours and the leading minutes are not padded.
/// The hour form spells minutes `分种`; downstream matching depends on that
/// exact text, so keep it.
///
/// ```
/// use normalize::format_duration;
///
/// assert_eq!(format_duration(65), "1分钟05秒");
/// assert_eq!(format_duration(3600), "1小时00分种00秒");
/// ```
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{hours}小时{minutes:02}分种{secs:02}秒")
    } else {
        format!("{minutes}分钟{secs:02}秒")
    }
}
