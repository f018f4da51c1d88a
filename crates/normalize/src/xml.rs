//! Title extraction from mini-program share XML.
//!
//! This is deliberately not an XML parser. Share cards carry a single
//! `<title>` element, sometimes CDATA-wrapped, and that is all we read.

const CDATA_OPEN: &str = "<title><![CDATA[";
const CDATA_CLOSE: &str = "]]></title>";
const PLAIN_OPEN: &str = "<title>";
const PLAIN_CLOSE: &str = "</title>";

/// Pulls the `<title>` text out of an XML fragment.
///
/// The CDATA form is tried first and only counts when its closing marker is
/// present; otherwise the plain element is tried. Content is trimmed.
/// Missing, blank, or title-less input yields an empty string.
///
/// ```
/// use normalize::extract_title;
///
/// assert_eq!(extract_title(None), "");
/// assert_eq!(extract_title(Some("<title>A</title>")), "A");
/// assert_eq!(extract_title(Some("<title><![CDATA[ 秋季养生 ]]></title>")), "秋季养生");
/// ```
pub fn extract_title(xml: Option<&str>) -> String {
    let Some(xml) = xml.filter(|x| !x.trim().is_empty()) else {
        return String::new();
    };

    between(xml, CDATA_OPEN, CDATA_CLOSE)
        .or_else(|| between(xml, PLAIN_OPEN, PLAIN_CLOSE))
        .map(|title| title.trim().to_string())
        .unwrap_or_default()
}

/// Text between the first `open` and the next `close` after it.
fn between<'a>(haystack: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = haystack.find(open)? + open.len();
    let rest = &haystack[start..];
    let end = rest.find(close)?;
    Some(&rest[..end])
}
