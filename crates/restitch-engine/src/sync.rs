//! The batch orchestrator.
//!
//! [`SyncEngine`] owns the four moving parts of a run: the document store,
//! the candidate patterns, the canonical template, and the per-document
//! contexts. [`run`](SyncEngine::run) folds over the document list one
//! document at a time; each document flows through read, locate, render,
//! compare, splice, persist, and whatever goes wrong folds into that
//! document's outcome. One bad document never stops the rest of the batch.

use crate::context::ContextMap;
use crate::error::SyncError;
use crate::guard::needs_update;
use crate::locate::locate;
use crate::outcome::{DocumentOutcome, OutcomeKind, Summary};
use crate::pattern::PatternSet;
use crate::rewrite::splice;
use crate::store::DocumentStore;
use crate::template::{reindent, FragmentTemplate};

/// Knobs for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Compare only: classify every document but write nothing back.
    pub check: bool,
}

/// Synchronizes one fragment across a set of documents.
pub struct SyncEngine {
    store: Box<dyn DocumentStore>,
    patterns: PatternSet,
    template: FragmentTemplate,
    contexts: ContextMap,
    options: SyncOptions,
}

impl SyncEngine {
    /// Wires an engine over `store` with default options.
    pub fn new(
        store: Box<dyn DocumentStore>,
        patterns: PatternSet,
        template: FragmentTemplate,
        contexts: ContextMap,
    ) -> Self {
        SyncEngine {
            store,
            patterns,
            template,
            contexts,
            options: SyncOptions::default(),
        }
    }

    /// Sets the run options.
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the batch over `documents` in the given order.
    ///
    /// Documents are processed sequentially against a single store, so two
    /// runs over the same inputs produce the same outcomes in the same
    /// order.
    pub fn run(&mut self, documents: &[String]) -> Summary {
        let mut summary = Summary::new(self.options.check);
        for name in documents {
            let tolerated = self
                .contexts
                .get(name)
                .map(|context| context.provision)
                .unwrap_or(false);
            let outcome = self.sync_document(name);
            summary.record(outcome, tolerated);
        }
        summary
    }

    /// Synchronizes a single document and classifies what happened.
    pub fn sync_document(&mut self, name: &str) -> DocumentOutcome {
        let text = match self.store.read(name) {
            Ok(text) => text,
            Err(source) => {
                let err = SyncError::Persistence {
                    action: "read",
                    source,
                };
                return DocumentOutcome::new(name, OutcomeKind::WriteError)
                    .with_message(err.to_string());
            }
        };

        let Some(span) = locate(&text, &self.patterns) else {
            let provision = self
                .contexts
                .get(name)
                .map(|context| context.provision)
                .unwrap_or(false);
            let message = if provision {
                "no candidate pattern matched, provisioning pending".to_string()
            } else {
                SyncError::FragmentNotFound.to_string()
            };
            return DocumentOutcome::new(name, OutcomeKind::FragmentNotFound)
                .with_message(message);
        };

        let Some(context) = self.contexts.get(name) else {
            let err = SyncError::ContextMissing(format!("no page context for '{name}'"));
            return DocumentOutcome::new(name, OutcomeKind::NoContext)
                .with_message(err.to_string());
        };

        let rendered = match self.template.render(name, context) {
            Ok(rendered) => reindent(&rendered, &span.indent),
            // Unresolved slots and broken template source both leave this
            // document without a usable rendering.
            Err(err) => {
                return DocumentOutcome::new(name, OutcomeKind::NoContext)
                    .with_message(err.to_string())
            }
        };

        let warning = span.ambiguous.then(|| {
            SyncError::AmbiguousMatch {
                pattern: span.pattern.clone(),
            }
            .to_string()
        });

        if !needs_update(span.text(&text), &rendered) {
            let outcome = DocumentOutcome::new(name, OutcomeKind::AlreadyCanonical);
            return match warning {
                Some(warning) => outcome.with_message(warning),
                None => outcome,
            };
        }

        let next = splice(&text, &span, &rendered);
        if !self.options.check {
            if let Err(source) = self.store.write(name, &next) {
                let err = SyncError::Persistence {
                    action: "write",
                    source,
                };
                return DocumentOutcome::new(name, OutcomeKind::WriteError)
                    .with_message(err.to_string());
            }
        }

        let mut message = format!("pattern '{}'", span.pattern);
        if let Some(warning) = warning {
            message.push_str("; ");
            message.push_str(&warning);
        }
        DocumentOutcome::new(name, OutcomeKind::Updated).with_message(message)
    }
}
