//! Per-document page context.
//!
//! The canonical template is shared; what varies per document is small:
//! which entry is active there, a handful of slot overrides, and whether the
//! fragment is even expected to exist yet. [`PageContext`] carries that, and
//! [`ContextMap`] keys it by document name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Slot values personalizing the canonical fragment for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContext {
    /// Key of the entry rendered as active in this document, if any.
    #[serde(default)]
    pub active: Option<String>,
    /// Slot overrides merged over the template defaults.
    #[serde(default)]
    pub vars: serde_json::Map<String, serde_json::Value>,
    /// The fragment may legitimately be absent from this document, for
    /// example right before it is provisioned for the first time. A
    /// not-found outcome here is reported but does not fail the run.
    #[serde(default)]
    pub provision: bool,
}

impl PageContext {
    /// Creates a context with no active entry and no overrides.
    pub fn new() -> Self {
        PageContext::default()
    }

    /// Marks `key` as the entry shown active in this document.
    pub fn with_active(mut self, key: impl Into<String>) -> Self {
        self.active = Some(key.into());
        self
    }

    /// Sets one slot override.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Tolerates a missing fragment in this document.
    pub fn provisioned(mut self) -> Self {
        self.provision = true;
        self
    }
}

/// Context lookup keyed by document name.
///
/// Iteration order is the sorted document name order, so batches derived
/// from the map run deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextMap {
    pages: BTreeMap<String, PageContext>,
}

impl ContextMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        ContextMap::default()
    }

    /// Sets the context for `document`, replacing any earlier one.
    pub fn insert(&mut self, document: impl Into<String>, context: PageContext) {
        self.pages.insert(document.into(), context);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, document: impl Into<String>, context: PageContext) -> Self {
        self.insert(document, context);
        self
    }

    /// The context configured for `document`, if any.
    pub fn get(&self, document: &str) -> Option<&PageContext> {
        self.pages.get(document)
    }

    /// Document names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Number of documents with a context.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True when no document has a context.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl FromIterator<(String, PageContext)> for ContextMap {
    fn from_iter<I: IntoIterator<Item = (String, PageContext)>>(iter: I) -> Self {
        ContextMap {
            pages: iter.into_iter().collect(),
        }
    }
}
