//! Candidate patterns for recognizing an existing fragment.
//!
//! A shared fragment rarely keeps one shape across a whole document set.
//! Older documents carry earlier generations of the block, hand edits drift,
//! and some sets mix marker comments with bare markup. A [`PatternSet`] holds
//! the known shapes as an ordered list of [`FragmentPattern`]s, most specific
//! first, and the locator tries them in that order.
//!
//! Two matcher flavors cover the shapes seen in practice:
//!
//! - [`Matcher::Markers`]: literal start and end markers, typically comment
//!   sentinels like `<!-- nav:start -->`. The span runs from the start marker
//!   through the nearest end marker that follows it.
//! - [`Matcher::Regex`]: a compiled regex whose whole first match is the
//!   span, for legacy documents that predate sentinel comments.
//!
//! Both flavors accept interior anchors: substrings that must appear inside
//! the candidate span before it is accepted. Anchors keep a generic marker
//! pair from claiming an unrelated block that happens to share it.

use regex::Regex;

/// How a single candidate recognizes fragment boundaries.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Literal start and end markers. The span covers both markers and
    /// everything between them.
    Markers {
        /// Text that opens the fragment.
        start: String,
        /// Text that closes it. Paired with the nearest following `start`.
        end: String,
    },
    /// A compiled regex. The whole match is the span; multi-line shapes
    /// must opt into `(?s)` themselves.
    Regex(Regex),
}

/// A named candidate matcher plus the anchors that guard it.
#[derive(Debug, Clone)]
pub struct FragmentPattern {
    name: String,
    matcher: Matcher,
    anchors: Vec<String>,
}

impl FragmentPattern {
    /// Creates a marker-pair candidate.
    pub fn markers(
        name: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        FragmentPattern {
            name: name.into(),
            matcher: Matcher::Markers {
                start: start.into(),
                end: end.into(),
            },
            anchors: Vec::new(),
        }
    }

    /// Creates a regex candidate.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`regex::Error`] when `pattern` does not
    /// compile.
    pub fn regex(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(FragmentPattern {
            name: name.into(),
            matcher: Matcher::Regex(Regex::new(pattern)?),
            anchors: Vec::new(),
        })
    }

    /// Adds one interior anchor.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchors.push(anchor.into());
        self
    }

    /// Adds several interior anchors at once.
    pub fn with_anchors<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.anchors.extend(anchors.into_iter().map(Into::into));
        self
    }

    /// The candidate's name, used in reports and warnings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Which flavor this candidate is.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// True when every anchor occurs inside the candidate span text.
    pub(crate) fn anchors_hold(&self, span_text: &str) -> bool {
        self.anchors.iter().all(|a| span_text.contains(a.as_str()))
    }
}

/// Ordered set of candidates, most specific first.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<FragmentPattern>,
}

impl PatternSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        PatternSet::default()
    }

    /// Appends a candidate. Earlier candidates take priority.
    pub fn push(&mut self, pattern: FragmentPattern) {
        self.patterns.push(pattern);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, pattern: FragmentPattern) -> Self {
        self.push(pattern);
        self
    }

    /// Candidates in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &FragmentPattern> {
        self.patterns.iter()
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when the set holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl FromIterator<FragmentPattern> for PatternSet {
    fn from_iter<I: IntoIterator<Item = FragmentPattern>>(iter: I) -> Self {
        PatternSet {
            patterns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_must_all_hold() {
        let pattern = FragmentPattern::markers("nav", "<nav>", "</nav>")
            .with_anchor("class=\"menu\"")
            .with_anchor("</ul>");

        assert!(pattern.anchors_hold("<nav class=\"menu\"><ul></ul></nav>"));
        assert!(!pattern.anchors_hold("<nav class=\"menu\"></nav>"));
    }

    #[test]
    fn pattern_without_anchors_always_holds() {
        let pattern = FragmentPattern::markers("nav", "<nav>", "</nav>");
        assert!(pattern.anchors_hold(""));
    }

    #[test]
    fn regex_candidate_rejects_bad_source() {
        assert!(FragmentPattern::regex("broken", "(unclosed").is_err());
    }

    #[test]
    fn set_preserves_insertion_order() {
        let set = PatternSet::new()
            .with(FragmentPattern::markers("v2", "<!-- a -->", "<!-- b -->"))
            .with(FragmentPattern::markers("v1", "<nav>", "</nav>"));

        let names: Vec<&str> = set.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["v2", "v1"]);
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn matcher_flavor_is_inspectable() {
        let markers = FragmentPattern::markers("m", "<a>", "</a>");
        assert!(matches!(markers.matcher(), Matcher::Markers { .. }));

        let regex = FragmentPattern::regex("r", "a+").unwrap();
        assert!(matches!(regex.matcher(), Matcher::Regex(_)));
    }

    #[test]
    fn set_collects_from_an_iterator() {
        let set: PatternSet = vec![
            FragmentPattern::markers("a", "<a>", "</a>"),
            FragmentPattern::markers("b", "<b>", "</b>"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }
}
