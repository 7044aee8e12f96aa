//! Canonical fragment rendering.
//!
//! One [`FragmentTemplate`] describes the fragment's canonical form for the
//! whole document set. Rendering combines three layers of slot values, later
//! layers winning:
//!
//! 1. template-level defaults declared with [`with_default`],
//! 2. the document's [`PageContext`] vars,
//! 3. the reserved keys `page` (the document name) and `active` (the active
//!    entry key, `none` when the context declares no active entry).
//!
//! `active` is always defined, so templates can write
//! `{% if entry.key == active %}` without guarding against an undefined
//! name. Every other slot must resolve through layers 1 or 2: an unresolved
//! slot fails the render with [`SyncError::ContextMissing`] instead of
//! silently emitting an empty string into documents.
//!
//! [`with_default`]: FragmentTemplate::with_default

use std::fmt;

use minijinja::{Environment, UndefinedBehavior, Value};

use crate::context::PageContext;
use crate::error::SyncError;

/// The canonical form of the shared fragment.
pub struct FragmentTemplate {
    env: Environment<'static>,
    source: String,
    defaults: serde_json::Map<String, serde_json::Value>,
}

impl FragmentTemplate {
    /// Creates a template from MiniJinja source.
    pub fn new(source: impl Into<String>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        FragmentTemplate {
            env,
            source: source.into(),
            defaults: serde_json::Map::new(),
        }
    }

    /// Declares a default value for one slot.
    pub fn with_default(
        mut self,
        slot: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.defaults.insert(slot.into(), value.into());
        self
    }

    /// Declares defaults for several slots at once.
    pub fn with_defaults(mut self, defaults: serde_json::Map<String, serde_json::Value>) -> Self {
        self.defaults.extend(defaults);
        self
    }

    /// The raw template source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Renders the canonical fragment for one document.
    ///
    /// # Errors
    ///
    /// [`SyncError::ContextMissing`] when a slot stays unresolved after all
    /// three layers, [`SyncError::Render`] for any other template failure.
    ///
    /// # Example
    ///
    /// ```
    /// use restitch_engine::{FragmentTemplate, PageContext};
    ///
    /// let template = FragmentTemplate::new(
    ///     "{% for key in entries %}{{ key }}{% if key == active %}*{% endif %};{% endfor %}",
    /// )
    /// .with_default("entries", serde_json::json!(["home", "orders"]));
    ///
    /// let ctx = PageContext::new().with_active("orders");
    /// assert_eq!(template.render("orders.html", &ctx).unwrap(), "home;orders*;");
    /// ```
    pub fn render(&self, page: &str, context: &PageContext) -> Result<String, SyncError> {
        let mut slots = self.defaults.clone();
        for (name, value) in &context.vars {
            slots.insert(name.clone(), value.clone());
        }
        slots.insert(
            "page".to_string(),
            serde_json::Value::String(page.to_string()),
        );
        slots.insert(
            "active".to_string(),
            match &context.active {
                Some(key) => serde_json::Value::String(key.clone()),
                None => serde_json::Value::Null,
            },
        );

        let rendered = self.env.render_str(&self.source, Value::from_serialize(&slots))?;
        Ok(rendered)
    }
}

impl fmt::Debug for FragmentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentTemplate")
            .field("source_len", &self.source.len())
            .field("defaults", &self.defaults.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Prefixes `indent` to every line after the first.
///
/// The first line inherits the document's own indentation because the span
/// starts at the marker, after any leading whitespace. Blank lines stay
/// blank rather than collecting trailing indent.
pub fn reindent(text: &str, indent: &str) -> String {
    if indent.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + indent.len() * 8);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(indent);
            }
        }
        out.push_str(line);
    }
    out
}
