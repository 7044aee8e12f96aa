//! Fragment location within document text.
//!
//! [`locate`] walks a [`PatternSet`] in priority order and returns the span
//! claimed by the first candidate that verifies against the document: both
//! markers present in order (or the regex matching) and every anchor found
//! inside the span. Candidates that fail verification at one occurrence are
//! retried at later occurrences before the locator falls through to the next
//! pattern.

use crate::pattern::{FragmentPattern, Matcher, PatternSet};

/// A located fragment span.
///
/// Offsets are byte positions into the document text the span was located
/// in; `start..end` covers the markers and everything between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Offset of the first marker byte.
    pub start: usize,
    /// Offset one past the last marker byte.
    pub end: usize,
    /// Whitespace between the preceding newline and the start marker.
    /// Empty when the marker does not open its line.
    pub indent: String,
    /// Name of the winning pattern.
    pub pattern: String,
    /// Set when the winning pattern verified again later in the document.
    /// The first occurrence wins; the caller decides how loudly to warn.
    pub ambiguous: bool,
}

impl Located {
    /// The span's text within the document it was located in.
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }

    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a zero-width span. [`locate`] never returns one.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Locates the fragment in `text`, trying candidates in priority order.
///
/// Returns `None` when no candidate verifies anywhere in the document.
///
/// # Example
///
/// ```
/// use restitch_engine::{locate, FragmentPattern, PatternSet};
///
/// let doc = "intro\n  <!-- nav -->old<!-- /nav -->\nrest\n";
/// let patterns = PatternSet::new()
///     .with(FragmentPattern::markers("nav", "<!-- nav -->", "<!-- /nav -->"));
///
/// let span = locate(doc, &patterns).unwrap();
/// assert_eq!(span.text(doc), "<!-- nav -->old<!-- /nav -->");
/// assert_eq!(span.indent, "  ");
/// ```
pub fn locate(text: &str, patterns: &PatternSet) -> Option<Located> {
    patterns.iter().find_map(|p| locate_one(text, p))
}

fn locate_one(text: &str, pattern: &FragmentPattern) -> Option<Located> {
    let (start, end, ambiguous) = match pattern.matcher() {
        Matcher::Markers { start, end } => {
            let (s, e) = marker_span(text, 0, start, end, pattern)?;
            let again = marker_span(text, e, start, end, pattern).is_some();
            (s, e, again)
        }
        Matcher::Regex(re) => {
            // A zero-width match carries no fragment; skip it, or a regex
            // like `x*` would claim a span in every document.
            let mut hits = re
                .find_iter(text)
                .filter(|m| !m.is_empty() && pattern.anchors_hold(m.as_str()));
            let first = hits.next()?;
            let again = hits.next().is_some();
            (first.start(), first.end(), again)
        }
    };

    Some(Located {
        start,
        end,
        indent: leading_indent(text, start),
        pattern: pattern.name().to_string(),
        ambiguous,
    })
}

/// First verified marker span at or after `from`.
///
/// Each start occurrence is paired with the nearest end that follows it, so
/// a start marker nested inside a winning span is consumed by it rather than
/// opening a competing span. When anchors reject the pair, the scan resumes
/// at the next start occurrence.
fn marker_span(
    text: &str,
    from: usize,
    start: &str,
    end: &str,
    pattern: &FragmentPattern,
) -> Option<(usize, usize)> {
    // An empty marker side is found at every offset and would claim a span
    // in documents that carry no fragment at all; such a candidate never
    // matches.
    if start.is_empty() || end.is_empty() {
        return None;
    }
    let mut at = from;
    while let Some(rel) = text[at..].find(start) {
        let s = at + rel;
        let after = s + start.len();
        // No end marker after this start means none after any later start
        // either, so the candidate is exhausted.
        let e = after + text[after..].find(end)? + end.len();
        if pattern.anchors_hold(&text[s..e]) {
            return Some((s, e));
        }
        at = after;
    }
    None
}

fn leading_indent(text: &str, start: usize) -> String {
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &text[line_start..start];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix.to_string()
    } else {
        String::new()
    }
}
