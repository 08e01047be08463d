//! Delimiter tokenizer.

use std::sync::LazyLock;

use regex::Regex;

/// `<!-- [/]ns:name [payload] [/]-->` for the `block` and `wp` namespaces.
///
/// The payload may not start with `/` so that `<!-- block:a /-->` reads as a
/// void block without a payload.
static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<!--\s*(/)?(?:block|wp):([a-z][a-z0-9_-]*(?:/[a-z][a-z0-9_-]*)?)(?:\s*([^\s/].*?))?\s*(/)?-->",
    )
    .unwrap()
});

/// Kind of block delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DelimiterKind {
    /// `<!-- ns:name payload -->`
    Open,
    /// `<!-- ns:name payload /-->`
    Void,
    /// `<!-- /ns:name -->`
    Close,
}

/// A block delimiter and its byte span in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Delimiter<'a> {
    pub kind: DelimiterKind,
    pub name: &'a str,
    pub payload: Option<&'a str>,
    pub start: usize,
    pub end: usize,
}

/// Find every block delimiter in `input`, in source order.
///
/// Comments that are not block delimiters are not returned and stay part of
/// the surrounding literal markup.
pub(crate) fn tokenize(input: &str) -> Vec<Delimiter<'_>> {
    DELIMITER_RE
        .captures_iter(input)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str();
            let kind = if caps.get(1).is_some() {
                DelimiterKind::Close
            } else if caps.get(4).is_some() {
                DelimiterKind::Void
            } else {
                DelimiterKind::Open
            };
            Some(Delimiter {
                kind,
                name,
                payload: caps.get(3).map(|m| m.as_str()),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}
