//! Exact-span document rewriting.

use crate::locate::Located;

/// Replaces exactly the located span with `replacement`.
///
/// Every byte outside `span` is carried over untouched, so surrounding
/// content, surrounding whitespace, and anything else the locator did not
/// claim survive the rewrite byte for byte.
///
/// # Example
///
/// ```
/// use restitch_engine::{locate, splice, FragmentPattern, PatternSet};
///
/// let doc = "keep <b>old</b> keep";
/// let patterns = PatternSet::new().with(FragmentPattern::markers("b", "<b>", "</b>"));
/// let span = locate(doc, &patterns).unwrap();
///
/// assert_eq!(splice(doc, &span, "<b>new</b>"), "keep <b>new</b> keep");
/// ```
pub fn splice(document: &str, span: &Located, replacement: &str) -> String {
    let mut out = String::with_capacity(document.len() - span.len() + replacement.len());
    out.push_str(&document[..span.start]);
    out.push_str(replacement);
    out.push_str(&document[span.end..]);
    out
}
