//! Run spec loading.
//!
//! One YAML file describes a whole run: the fragment's known shapes, its
//! canonical template, and the per-document contexts.
//!
//! ```yaml
//! root: site/
//! patterns:
//!   - name: current
//!     start: "<!-- NAV -->"
//!     end: "<!-- /NAV -->"
//!   - name: legacy
//!     regex: '(?s)<nav class="menu">.*?</nav>'
//!     anchors: ["</ul>"]
//! template:
//!   file: nav.tmpl
//!   slots:
//!     entries:
//!       - { key: home, href: index.html, label: Home }
//!       - { key: orders, href: orders.html, label: Orders }
//! pages:
//!   index.html:
//!     active: home
//!   orders.html:
//!     active: orders
//!   checkout.html:
//!     active: orders
//!     provision: true
//! ```
//!
//! `documents` may name an explicit subset; when absent, the run covers
//! every page listed under `pages`, in sorted order. Relative paths in the
//! spec resolve against the spec file's own directory, so a run behaves
//! the same from any working directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use restitch_engine::{ContextMap, FragmentPattern, FragmentTemplate, Matcher, PatternSet};

/// Everything one run needs, as read from the spec file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSpec {
    /// Directory document names resolve against. Relative to the spec
    /// file's directory; defaults to that directory itself.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Explicit document list; empty means every page with a context.
    #[serde(default)]
    pub documents: Vec<String>,
    pub patterns: Vec<PatternSpec>,
    pub template: TemplateSpec,
    #[serde(default)]
    pub pages: ContextMap,
}

/// One candidate shape: either a marker pair or a regex, never both.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSpec {
    pub name: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default)]
    pub anchors: Vec<String>,
}

/// Template source plus slot defaults.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateSpec {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub inline: Option<String>,
    #[serde(default)]
    pub slots: serde_json::Map<String, serde_json::Value>,
}

impl RunSpec {
    /// Reads and parses the spec file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid YAML for this
    /// shape, or declares no patterns at all.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading run spec {}", path.display()))?;
        let spec: RunSpec = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing run spec {}", path.display()))?;
        if spec.patterns.is_empty() {
            bail!("run spec {} declares no patterns", path.display());
        }
        Ok(spec)
    }

    /// Compiles the pattern list, keeping spec order as priority order.
    ///
    /// Degenerate candidates are refused here rather than silently never
    /// matching: an empty marker string, or a regex that matches the empty
    /// string, would otherwise claim a span in documents that carry no
    /// fragment at all.
    pub fn build_patterns(&self) -> Result<PatternSet> {
        let mut set = PatternSet::new();
        for spec in &self.patterns {
            let pattern = match (&spec.start, &spec.end, &spec.regex) {
                (Some(start), Some(end), None) => {
                    if start.is_empty() || end.is_empty() {
                        bail!("pattern '{}': markers must be non-empty", spec.name);
                    }
                    FragmentPattern::markers(spec.name.as_str(), start.as_str(), end.as_str())
                }
                (None, None, Some(regex)) => {
                    let pattern = FragmentPattern::regex(spec.name.as_str(), regex)
                        .with_context(|| format!("pattern '{}'", spec.name))?;
                    if let Matcher::Regex(re) = pattern.matcher() {
                        if re.is_match("") {
                            bail!(
                                "pattern '{}': regex must not match the empty string",
                                spec.name
                            );
                        }
                    }
                    pattern
                }
                _ => bail!(
                    "pattern '{}': declare either start and end markers or a regex",
                    spec.name
                ),
            };
            set.push(pattern.with_anchors(spec.anchors.iter().cloned()));
        }
        Ok(set)
    }

    /// Builds the template from its file or inline source, with defaults.
    pub fn build_template(&self, base: &Path) -> Result<FragmentTemplate> {
        let source = match (&self.template.file, &self.template.inline) {
            (Some(file), None) => {
                let path = base.join(file);
                fs::read_to_string(&path)
                    .with_context(|| format!("reading template {}", path.display()))?
            }
            (None, Some(inline)) => inline.clone(),
            _ => bail!("template: declare exactly one of file or inline"),
        };
        Ok(FragmentTemplate::new(source).with_defaults(self.template.slots.clone()))
    }

    /// Documents named explicitly, or every page with a context.
    pub fn document_list(&self) -> Vec<String> {
        if self.documents.is_empty() {
            self.pages.names().map(str::to_string).collect()
        } else {
            self.documents.clone()
        }
    }

    /// The run's root directory. A command-line override wins; otherwise
    /// the spec's `root` resolves against `base`, falling back to `base`.
    pub fn resolve_root(&self, base: &Path, override_root: Option<&Path>) -> PathBuf {
        match override_root {
            Some(root) => root.to_path_buf(),
            None => match &self.root {
                Some(root) => base.join(root),
                None => base.to_path_buf(),
            },
        }
    }
}
