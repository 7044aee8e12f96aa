//! Error types for fragment synchronization.
//!
//! Every variant maps to exactly one per-document outcome bucket, so a
//! failure on one document never aborts the batch: the orchestrator folds
//! the error into that document's [`DocumentOutcome`] and moves on.
//!
//! [`DocumentOutcome`]: crate::DocumentOutcome

use thiserror::Error;

/// Failure while synchronizing a single document.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No candidate pattern located the fragment in the document.
    #[error("no candidate pattern matched")]
    FragmentNotFound,

    /// The document has no page context, or rendering hit an unresolved
    /// slot with no declared default.
    #[error("context missing: {0}")]
    ContextMissing(String),

    /// A pattern matched more than once. The first occurrence wins; this
    /// is surfaced as a warning, never as a failed document.
    #[error("pattern '{pattern}' matched more than once, first occurrence used")]
    AmbiguousMatch {
        /// Name of the pattern that matched repeatedly.
        pattern: String,
    },

    /// Rendering failed for a reason other than an unresolved slot, such
    /// as a syntax error in the template source.
    #[error("template render failed: {0}")]
    Render(String),

    /// Reading or persisting the document failed. The original text is
    /// left untouched on disk.
    #[error("{action} failed: {source}")]
    Persistence {
        /// What the store was doing, `"read"` or `"write"`.
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// True for variants that are reported but do not fail the document.
    pub fn is_warning(&self) -> bool {
        matches!(self, SyncError::AmbiguousMatch { .. })
    }
}

impl From<minijinja::Error> for SyncError {
    fn from(err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::UndefinedError => SyncError::ContextMissing(err.to_string()),
            _ => SyncError::Render(err.to_string()),
        }
    }
}
