//! Fragment synchronization engine.
//!
//! A document set that shares a hand-maintained fragment, typically a
//! navigation block repeated across static pages, drifts: someone edits one
//! copy, forgets five others, and the set slowly disagrees with itself.
//! This crate keeps one fragment canonical across many documents by
//! locating each document's copy, rendering the canonical form for that
//! document, and splicing it over the old copy only when the two actually
//! differ.
//!
//! # Pipeline
//!
//! Each document flows through five stages, every stage usable on its own:
//!
//! | Stage | Entry point | Job |
//! |-------|-------------|-----|
//! | Locate | [`locate`] | find the fragment span via ordered [`PatternSet`] candidates |
//! | Render | [`FragmentTemplate::render`] | produce the canonical form for one document |
//! | Guard | [`needs_update`] | skip rewrites that would only churn whitespace |
//! | Rewrite | [`splice`] | replace exactly the located span |
//! | Persist | [`DocumentStore`] | atomic whole-document replacement |
//!
//! [`SyncEngine`] drives the pipeline over a whole document list and folds
//! the results into a [`Summary`]. Failures stay per-document: a missing
//! fragment, an unresolved slot, or an unwritable file classifies that one
//! document and the batch keeps going.
//!
//! # Example
//!
//! ```
//! use restitch_engine::{
//!     ContextMap, DirStore, FragmentPattern, FragmentTemplate, PageContext, PatternSet,
//!     SyncEngine,
//! };
//!
//! let dir = tempfile::tempdir()?;
//! std::fs::write(
//!     dir.path().join("a.html"),
//!     "<body>\n<!-- nav:start -->stale<!-- nav:end -->\n</body>\n",
//! )?;
//!
//! let patterns = PatternSet::new().with(FragmentPattern::markers(
//!     "nav",
//!     "<!-- nav:start -->",
//!     "<!-- nav:end -->",
//! ));
//! let template = FragmentTemplate::new("<!-- nav:start -->{{ title }}<!-- nav:end -->");
//! let contexts =
//!     ContextMap::new().with("a.html", PageContext::new().with_var("title", "Home"));
//!
//! let store = DirStore::new(dir.path());
//! let mut engine = SyncEngine::new(Box::new(store), patterns, template, contexts);
//! let summary = engine.run(&["a.html".to_string()]);
//!
//! assert_eq!(summary.updated, 1);
//! assert!(summary.exit_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Running the same engine again reports the document as already canonical
//! and writes nothing; rewrites happen only for substantive differences.
//!
//! # Fragment shapes
//!
//! Document sets accumulate fragment generations. A [`PatternSet`] lists
//! every known shape, most specific first; each [`FragmentPattern`] is
//! either a marker pair or a regex, optionally guarded by interior anchors
//! that must appear inside the span. The first candidate to verify wins,
//! so adding a new generation's markers ahead of the old ones migrates a
//! set incrementally.

mod context;
mod error;
mod guard;
mod locate;
mod outcome;
mod pattern;
mod rewrite;
mod store;
mod sync;
mod template;

pub use context::{ContextMap, PageContext};
pub use error::SyncError;
pub use guard::{canonical_eq, needs_update};
pub use locate::{locate, Located};
pub use outcome::{DocumentOutcome, OutcomeKind, Summary};
pub use pattern::{FragmentPattern, Matcher, PatternSet};
pub use rewrite::splice;
pub use store::{DirStore, DocumentStore};
pub use sync::{SyncEngine, SyncOptions};
pub use template::{reindent, FragmentTemplate};
