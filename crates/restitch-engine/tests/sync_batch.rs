//! End-to-end batch runs over a real directory store.

use std::fs;
use std::path::Path;

use restitch_engine::{
    ContextMap, DirStore, FragmentPattern, FragmentTemplate, OutcomeKind, PageContext, PatternSet,
    SyncEngine, SyncOptions,
};

// ============================================================================
// Fixtures
// ============================================================================

const NAV_TEMPLATE: &str = "<!-- NAV -->\n\
<ul class=\"nav\">\n\
{% for entry in entries %}  <li{% if entry.key == active %} class=\"active\"{% endif %}><a href=\"{{ entry.href }}\">{{ entry.label }}</a></li>\n\
{% endfor %}</ul>\n\
<!-- /NAV -->";

fn nav_patterns() -> PatternSet {
    PatternSet::new().with(FragmentPattern::markers("nav", "<!-- NAV -->", "<!-- /NAV -->"))
}

fn nav_template(entries: serde_json::Value) -> FragmentTemplate {
    FragmentTemplate::new(NAV_TEMPLATE).with_default("entries", entries)
}

fn abc_entries() -> serde_json::Value {
    serde_json::json!([
        { "key": "a", "href": "a.html", "label": "A" },
        { "key": "b", "href": "b.html", "label": "B" },
        { "key": "c", "href": "c.html", "label": "C" },
    ])
}

fn page_with_nav(active_label: &str) -> String {
    format!(
        "<html>\n<body>\n  <!-- NAV -->\n  <ul class=\"nav\">\n    \
         <li><a href=\"a.html\">A</a></li>\n    \
         <li><a href=\"b.html\">B</a></li>\n  </ul>\n  <!-- /NAV -->\n  \
         <main>{active_label} body</main>\n</body>\n</html>\n"
    )
}

fn write_doc(root: &Path, name: &str, text: &str) {
    fs::write(root.join(name), text).unwrap();
}

fn read_doc(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(name)).unwrap()
}

fn doc_list(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// ============================================================================
// Canonical rewrite scenarios
// ============================================================================

/// A fragment listing entries A and B, with B active in context and a
/// template that now carries entry C, must come back as A, B active, C,
/// with everything around the fragment untouched.
#[test]
fn stale_nav_gains_entry_and_active_marking() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "b.html", &page_with_nav("B"));

    let contexts = ContextMap::new().with("b.html", PageContext::new().with_active("b"));
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        nav_patterns(),
        nav_template(abc_entries()),
        contexts,
    );

    let summary = engine.run(&doc_list(&["b.html"]));
    assert_eq!(summary.updated, 1);
    assert!(summary.exit_ok());

    let expected = r#"<html>
<body>
  <!-- NAV -->
  <ul class="nav">
    <li><a href="a.html">A</a></li>
    <li class="active"><a href="b.html">B</a></li>
    <li><a href="c.html">C</a></li>
  </ul>
  <!-- /NAV -->
  <main>B body</main>
</body>
</html>
"#;
    assert_eq!(read_doc(dir.path(), "b.html"), expected);
}

#[test]
fn active_marking_is_exclusive_per_document() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.html", "b.html", "c.html"] {
        write_doc(dir.path(), name, &page_with_nav(name));
    }

    let contexts = ContextMap::new()
        .with("a.html", PageContext::new().with_active("a"))
        .with("b.html", PageContext::new().with_active("b"))
        .with("c.html", PageContext::new().with_active("c"));
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        nav_patterns(),
        nav_template(abc_entries()),
        contexts,
    );

    let summary = engine.run(&doc_list(&["a.html", "b.html", "c.html"]));
    assert_eq!(summary.updated, 3);

    for (name, own_href) in [
        ("a.html", "href=\"a.html\""),
        ("b.html", "href=\"b.html\""),
        ("c.html", "href=\"c.html\""),
    ] {
        let text = read_doc(dir.path(), name);
        assert_eq!(text.matches("class=\"active\"").count(), 1, "{name}");
        let active_line = text
            .lines()
            .find(|l| l.contains("class=\"active\""))
            .unwrap();
        assert!(active_line.contains(own_href), "{name}: {active_line}");
    }
}

#[test]
fn content_outside_the_fragment_survives_byte_for_byte() {
    let dir = tempfile::tempdir().unwrap();
    let before = page_with_nav("B");
    write_doc(dir.path(), "b.html", &before);

    let contexts = ContextMap::new().with("b.html", PageContext::new().with_active("b"));
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        nav_patterns(),
        nav_template(abc_entries()),
        contexts,
    );
    engine.run(&doc_list(&["b.html"]));

    let after = read_doc(dir.path(), "b.html");
    let prefix = before.split("<!-- NAV -->").next().unwrap();
    let suffix = before.rsplit("<!-- /NAV -->").next().unwrap();
    assert!(after.starts_with(prefix));
    assert!(after.ends_with(suffix));
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn second_run_changes_no_bytes() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.html", "b.html"] {
        write_doc(dir.path(), name, &page_with_nav(name));
    }

    let contexts = ContextMap::new()
        .with("a.html", PageContext::new().with_active("a"))
        .with("b.html", PageContext::new().with_active("b"));
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        nav_patterns(),
        nav_template(abc_entries()),
        contexts,
    );

    let first = engine.run(&doc_list(&["a.html", "b.html"]));
    assert_eq!(first.updated, 2);

    let snapshot_a = read_doc(dir.path(), "a.html");
    let snapshot_b = read_doc(dir.path(), "b.html");

    let second = engine.run(&doc_list(&["a.html", "b.html"]));
    assert_eq!(second.updated, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(read_doc(dir.path(), "a.html"), snapshot_a);
    assert_eq!(read_doc(dir.path(), "b.html"), snapshot_b);
}

#[test]
fn trailing_whitespace_alone_is_not_worth_a_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    // Canonical content, except two lines grew trailing spaces.
    let doc = "<!-- NAV -->  \n<ul class=\"nav\">\n  \
         <li class=\"active\"><a href=\"a.html\">A</a></li>   \n</ul>\n<!-- /NAV -->\n";
    write_doc(dir.path(), "a.html", doc);

    let entries = serde_json::json!([{ "key": "a", "href": "a.html", "label": "A" }]);
    let contexts = ContextMap::new().with("a.html", PageContext::new().with_active("a"));
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        nav_patterns(),
        nav_template(entries),
        contexts,
    );

    let summary = engine.run(&doc_list(&["a.html"]));
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.updated, 0);
    assert_eq!(read_doc(dir.path(), "a.html"), doc);
}

// ============================================================================
// Pattern generations
// ============================================================================

#[test]
fn legacy_shape_migrates_to_current_markers() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = "<body>\n<nav class=\"menu\"><a href=\"a.html\">A</a></nav>\n</body>\n";
    write_doc(dir.path(), "a.html", legacy);

    let patterns = PatternSet::new()
        .with(FragmentPattern::markers("current", "<!-- NAV -->", "<!-- /NAV -->"))
        .with(
            FragmentPattern::regex("legacy", r#"(?s)<nav class="menu">.*?</nav>"#).unwrap(),
        );
    let contexts = ContextMap::new().with("a.html", PageContext::new().with_active("a"));
    let entries = serde_json::json!([{ "key": "a", "href": "a.html", "label": "A" }]);
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        patterns,
        nav_template(entries),
        contexts,
    );

    let first = engine.run(&doc_list(&["a.html"]));
    assert_eq!(first.updated, 1);
    assert!(first.outcomes[0]
        .message
        .as_ref()
        .unwrap()
        .contains("pattern 'legacy'"));

    let migrated = read_doc(dir.path(), "a.html");
    assert!(migrated.contains("<!-- NAV -->"));
    assert!(!migrated.contains("<nav class=\"menu\">"));

    // The rewritten shape now satisfies the first candidate.
    let second = engine.run(&doc_list(&["a.html"]));
    assert_eq!(second.skipped, 1);
    assert!(second.outcomes[0].message.is_none());
}

// ============================================================================
// Partial batches
// ============================================================================

/// Three good documents, one without the fragment, one without context:
/// the batch finishes, counts stay exact, and only the good three change.
#[test]
fn batch_survives_bad_documents() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.html", "b.html", "c.html"] {
        write_doc(dir.path(), name, &page_with_nav(name));
    }
    write_doc(dir.path(), "plain.html", "<html><body>no nav here</body></html>\n");
    write_doc(dir.path(), "orphan.html", &page_with_nav("orphan"));

    let contexts = ContextMap::new()
        .with("a.html", PageContext::new().with_active("a"))
        .with("b.html", PageContext::new().with_active("b"))
        .with("c.html", PageContext::new().with_active("c"))
        .with("plain.html", PageContext::new().with_active("a"));
    // orphan.html deliberately has no context entry.
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        nav_patterns(),
        nav_template(abc_entries()),
        contexts,
    );

    let names = ["a.html", "b.html", "plain.html", "orphan.html", "c.html"];
    let orphan_before = read_doc(dir.path(), "orphan.html");
    let summary = engine.run(&doc_list(&names));

    assert_eq!(summary.total, 5);
    assert_eq!(summary.updated, 3);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.errors, 1);
    assert!(!summary.exit_ok());

    let by_name = |n: &str| summary.outcomes.iter().find(|o| o.document == n).unwrap();
    assert_eq!(by_name("plain.html").kind, OutcomeKind::FragmentNotFound);
    assert_eq!(by_name("orphan.html").kind, OutcomeKind::NoContext);
    assert_eq!(by_name("c.html").kind, OutcomeKind::Updated);

    // Failed documents keep their bytes.
    assert_eq!(
        read_doc(dir.path(), "plain.html"),
        "<html><body>no nav here</body></html>\n"
    );
    assert_eq!(read_doc(dir.path(), "orphan.html"), orphan_before);
}

#[test]
fn provisioned_documents_keep_the_run_green() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "a.html", &page_with_nav("A"));
    write_doc(dir.path(), "fresh.html", "<html><body>not stitched yet</body></html>\n");

    let contexts = ContextMap::new()
        .with("a.html", PageContext::new().with_active("a"))
        .with("fresh.html", PageContext::new().with_active("c").provisioned());
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        nav_patterns(),
        nav_template(abc_entries()),
        contexts,
    );

    let summary = engine.run(&doc_list(&["a.html", "fresh.html"]));

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.required_missing, 0);
    assert!(summary.exit_ok());
}

// ============================================================================
// Check mode
// ============================================================================

#[test]
fn check_mode_classifies_but_never_writes() {
    let dir = tempfile::tempdir().unwrap();
    let before = page_with_nav("B");
    write_doc(dir.path(), "b.html", &before);

    let contexts = ContextMap::new().with("b.html", PageContext::new().with_active("b"));
    let mut engine = SyncEngine::new(
        Box::new(DirStore::new(dir.path())),
        nav_patterns(),
        nav_template(abc_entries()),
        contexts,
    )
    .with_options(SyncOptions { check: true });

    let summary = engine.run(&doc_list(&["b.html"]));

    assert!(summary.check);
    assert_eq!(summary.updated, 1);
    assert_eq!(read_doc(dir.path(), "b.html"), before);
}
