//! Per-document outcomes and the batch summary.
//!
//! Every document a run touches is classified into exactly one
//! [`OutcomeKind`]; nothing a single document does can abort the batch. The
//! [`Summary`] aggregates the outcomes and answers the one question scripts
//! care about, [`Summary::exit_ok`].

use serde::Serialize;

/// Classification of one document's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    /// The fragment was replaced with its canonical rendering. In check
    /// mode this means a rewrite is pending, not that one happened.
    Updated,
    /// The fragment already matches its canonical rendering.
    AlreadyCanonical,
    /// No candidate pattern located the fragment.
    FragmentNotFound,
    /// The document has no page context, or a slot stayed unresolved.
    NoContext,
    /// Reading or persisting the document failed.
    WriteError,
}

impl OutcomeKind {
    /// True for the kinds counted as errors in the summary.
    pub fn is_error(self) -> bool {
        matches!(self, OutcomeKind::NoContext | OutcomeKind::WriteError)
    }

    /// Short human label for reports.
    pub fn label(self) -> &'static str {
        match self {
            OutcomeKind::Updated => "updated",
            OutcomeKind::AlreadyCanonical => "canonical",
            OutcomeKind::FragmentNotFound => "not found",
            OutcomeKind::NoContext => "no context",
            OutcomeKind::WriteError => "write error",
        }
    }
}

/// One document's outcome plus an optional diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    /// Document name as given to the run.
    pub document: String,
    pub kind: OutcomeKind,
    /// Pattern names, warnings, or error detail; absent when there is
    /// nothing worth saying beyond the kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DocumentOutcome {
    /// Creates an outcome with no diagnostic.
    pub fn new(document: impl Into<String>, kind: OutcomeKind) -> Self {
        DocumentOutcome {
            document: document.into(),
            kind,
            message: None,
        }
    }

    /// Attaches a diagnostic message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Aggregated result of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Documents processed.
    pub total: usize,
    /// Fragments rewritten (or pending rewrite in check mode).
    pub updated: usize,
    /// Documents already canonical.
    pub skipped: usize,
    /// Documents where no pattern matched.
    pub not_found: usize,
    /// Documents hitting context or persistence failures.
    pub errors: usize,
    /// Not-found documents that were not flagged for provisioning. These
    /// are the ones that fail [`exit_ok`](Self::exit_ok).
    pub required_missing: usize,
    /// True when the run compared without writing.
    pub check: bool,
    /// Per-document outcomes in run order.
    pub outcomes: Vec<DocumentOutcome>,
}

impl Summary {
    /// Creates an empty summary; `check` records whether the run writes.
    pub fn new(check: bool) -> Self {
        Summary {
            total: 0,
            updated: 0,
            skipped: 0,
            not_found: 0,
            errors: 0,
            required_missing: 0,
            check,
            outcomes: Vec::new(),
        }
    }

    /// Folds one outcome into the counts.
    ///
    /// `tolerated_missing` marks a not-found outcome on a document whose
    /// context says the fragment may legitimately be absent; it is ignored
    /// for every other kind.
    pub fn record(&mut self, outcome: DocumentOutcome, tolerated_missing: bool) {
        self.total += 1;
        match outcome.kind {
            OutcomeKind::Updated => self.updated += 1,
            OutcomeKind::AlreadyCanonical => self.skipped += 1,
            OutcomeKind::FragmentNotFound => {
                self.not_found += 1;
                if !tolerated_missing {
                    self.required_missing += 1;
                }
            }
            OutcomeKind::NoContext | OutcomeKind::WriteError => self.errors += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Outcomes of one kind, in run order.
    pub fn of_kind(&self, kind: OutcomeKind) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(move |o| o.kind == kind)
    }

    /// True when the run needs no attention: no errors and no document
    /// missing a fragment it was expected to have.
    pub fn exit_ok(&self) -> bool {
        self.errors == 0 && self.required_missing == 0
    }
}
