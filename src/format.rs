//! Display helpers shared by the index and detail pages. Every optional value
//! goes through [`format_metric`] so the "absent means empty" rule lives in one
//! place, and every piece of user text goes through [`escape_text`] or
//! [`escape_path_segment`] before it reaches a template.

use pulldown_cmark::escape;
use serde_json::Number;
use url::Url;

// Any base that can hold path segments works; only the encoded path is kept.
const SEGMENT_BASE: &str = "http://localhost/";

/// Formats an optional numeric value for display. Absent values render as
/// empty text, never as `0`, `null` or a placeholder. Numbers keep the form
/// they had in the data file (`1665` stays `1665`, `57.0` stays `57.0`).
pub fn format_metric(value: Option<&Number>) -> String {
    match value {
        Some(number) => number.to_string(),
        None => String::new(),
    }
}

/// Builds the long-form `YYYY年MM月DD日` label from an ISO date by fixed
/// positional slicing. Inputs of any other shape produce a garbled label
/// rather than an error.
pub fn date_label(date: &str) -> String {
    format!(
        "{}年{}月{}日",
        chars(date, 0, 4),
        chars(date, 5, 7),
        chars(date, 8, 10)
    )
}

// Slices by character position, yielding whatever is available.
fn chars(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end - start).collect()
}

/// Escapes text for use in HTML element content or a quoted attribute.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing to a String can't fail.
    let _ = escape::escape_html(&mut out, text);
    out
}

/// Encodes `segment` as exactly one relative URL path segment and escapes
/// the result for an HTML attribute. `%`, `#`, `?` and `/` are
/// percent-encoded, so a file name can't turn into an escape sequence, a
/// fragment, a query or an extra directory.
pub fn escape_path_segment(segment: &str) -> String {
    let mut url = Url::parse(SEGMENT_BASE).unwrap(); // should always succeed
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    escape_text(url.path().trim_start_matches('/'))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn number(json: &str) -> Number {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_format_metric() {
        assert_eq!("", format_metric(None));
        assert_eq!("28.8", format_metric(Some(&number("28.8"))));
        assert_eq!("1665", format_metric(Some(&number("1665"))));
        assert_eq!("57.0", format_metric(Some(&number("57.0"))));
    }

    #[test]
    fn test_date_label() {
        assert_eq!("2026年02月10日", date_label("2026-02-10"));
    }

    #[test]
    fn test_date_label_odd_shapes() {
        assert_eq!("2026年1-月日", date_label("2026-1-5"));
        assert_eq!("2026年月日", date_label("2026"));
        assert_eq!("年月日", date_label(""));
        assert_eq!("二〇二六年〇二月一〇日", date_label("二〇二六-〇二-一〇"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(
            "&lt;b&gt;fish &amp; chips&lt;/b&gt; &quot;large&quot;",
            escape_text(r#"<b>fish & chips</b> "large""#)
        );
        assert_eq!("奶茶+三明治", escape_text("奶茶+三明治"));
    }

    #[test]
    fn test_escape_path_segment() {
        assert_eq!("my%20photo.jpg", escape_path_segment("my photo.jpg"));
        assert_eq!("a&amp;b.jpg", escape_path_segment("a&b.jpg"));
        assert_eq!("2026-02-10", escape_path_segment("2026-02-10"));
    }

    #[test]
    fn test_escape_path_segment_reserved_characters() {
        assert_eq!("a%23b.jpg", escape_path_segment("a#b.jpg"));
        assert_eq!("50%25.jpg", escape_path_segment("50%.jpg"));
        assert_eq!("q%3F.jpg", escape_path_segment("q?.jpg"));
        assert_eq!("a%2Fb.jpg", escape_path_segment("a/b.jpg"));
        assert_eq!("%E7%85%A7%E7%89%87.jpg", escape_path_segment("照片.jpg"));
    }
}
