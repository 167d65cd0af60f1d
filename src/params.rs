//! Conversion parameters and configuration resolution
//!
//! A render job is driven by a flat, insertion-ordered string map merged from
//! preset defaults and per-instance front-matter directives. Global keys
//! (`width`, `invert-color`, `invert-shade`, `mix-multiplier`, `mix-mode`,
//! `inline`) steer the whole job; `{tag}-{fill|stroke}` keys carry
//! comma-separated override tokens for one element/axis pair.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors from loading preset definitions
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to read preset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse preset TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown preset: {0}")]
    Unknown(String),
}

/// Per-tag-per-axis override token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Skip,
    OriginalColors,
    KeepColor,
    KeepShade,
    KeepAll,
    InvertColor,
    InvertShade,
    InvertAll,
    Implicit,
}

impl Directive {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "skip" => Some(Directive::Skip),
            "original-colors" => Some(Directive::OriginalColors),
            "keep-color" => Some(Directive::KeepColor),
            "keep-shade" => Some(Directive::KeepShade),
            "keep-all" => Some(Directive::KeepAll),
            "invert-color" => Some(Directive::InvertColor),
            "invert-shade" => Some(Directive::InvertShade),
            "invert-all" => Some(Directive::InvertAll),
            "implicit" => Some(Directive::Implicit),
            _ => None,
        }
    }
}

/// Parsed token list for one `{tag}-{axis}` key. Unknown tokens are ignored,
/// matching the lenient handling of hand-written front matter.
#[derive(Debug, Clone, Default)]
pub struct DirectiveSet {
    tokens: Vec<Directive>,
}

impl DirectiveSet {
    pub fn parse(value: &str) -> Self {
        Self {
            tokens: value
                .split(',')
                .filter_map(|t| Directive::parse(t.trim()))
                .collect(),
        }
    }

    pub fn contains(&self, directive: Directive) -> bool {
        self.tokens.contains(&directive)
    }
}

/// Blend strategy for nearest-match fallback colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixMode {
    /// Weighted average of the source channels and the theme variable
    Mix,
    /// Theme variable plus the scaled signed delta
    #[default]
    Delta,
}

/// Flat parameter map for one render job, insertion-ordered
///
/// Read-only once the rewriter starts; `set` replaces an existing value in
/// place so later directives override earlier ones without reordering.
#[derive(Debug, Clone, Default)]
pub struct RenderParams {
    entries: Vec<(String, String)>,
}

impl RenderParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when the key is present with a non-empty, non-`"0"` value
    pub fn is_enabled(&self, key: &str) -> bool {
        matches!(self.get(key), Some(v) if !v.is_empty() && v != "0")
    }

    /// Override tokens for one tag/axis pair, e.g. `ellipse-fill`
    pub fn directives(&self, tag: &str, axis: &str) -> DirectiveSet {
        self.get(&format!("{tag}-{axis}"))
            .map(DirectiveSet::parse)
            .unwrap_or_default()
    }

    /// Blend multiplier, when configured with a usable positive value.
    /// Unparsable values disable blending rather than failing the job.
    pub fn mix_multiplier(&self) -> Option<f32> {
        self.get("mix-multiplier")
            .and_then(|v| v.parse::<f32>().ok())
            .filter(|m| *m > 0.0)
    }

    pub fn mix_mode(&self) -> MixMode {
        match self.get("mix-mode") {
            Some("mix") => MixMode::Mix,
            _ => MixMode::Delta,
        }
    }
}

impl FromIterator<(String, String)> for RenderParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

/// Built-in presets, recoverable by name from front matter. The TOML shape
/// doubles as the user preset file format.
const DEFAULT_PRESETS: &str = r#"
[presets.math-graph]
ellipse-fill = "keep-shade"
text-fill = "keep-shade"

[presets.default-latex]
inverted = "true"
width = "100%"
doc-start = "\\documentclass[preview,class=article]{standalone}"
doc-end = "\\end{document}"

[presets.default-tikz]
inverted = "true"
width = "100%"
doc-start = "\\documentclass[tikz]{standalone}\\usepackage{tikz}\\begin{document}"
doc-end = "\\end{document}"

[presets.default-plantuml]
inverted = "true"
width = "100%"
doc-start = "@startuml"
doc-end = "@enduml"
"#;

#[derive(Deserialize)]
struct TomlPresets {
    presets: BTreeMap<String, BTreeMap<String, String>>,
}

/// Named parameter bundles applied before per-instance directives
#[derive(Debug, Clone)]
pub struct PresetTable {
    presets: BTreeMap<String, BTreeMap<String, String>>,
}

impl PresetTable {
    /// The built-in presets
    pub fn builtin() -> Self {
        let parsed: TomlPresets =
            toml::from_str(DEFAULT_PRESETS).expect("built-in presets must parse");
        Self {
            presets: parsed.presets,
        }
    }

    /// Built-in presets extended with definitions from a user TOML file;
    /// same-named user presets replace built-ins wholesale.
    pub fn with_file(path: &Path) -> Result<Self, PresetError> {
        let content = std::fs::read_to_string(path)?;
        let parsed: TomlPresets = toml::from_str(&content)?;
        let mut table = Self::builtin();
        table.presets.extend(parsed.presets);
        Ok(table)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Merge a preset's entries into `params`. An unknown name is a silent
    /// no-op, as front matter referencing a missing preset always was; the
    /// return value lets strict callers (the CLI) reject it instead.
    pub fn apply(&self, name: &str, params: &mut RenderParams) -> bool {
        match self.presets.get(name) {
            Some(entries) => {
                for (key, value) in entries {
                    params.set(key.clone(), value.clone());
                }
                true
            }
            None => false,
        }
    }
}

/// Result of splitting front matter off a diagram source
#[derive(Debug, Clone)]
pub struct FrontMatter {
    /// The source with the front-matter block removed and any
    /// `doc-start`/`doc-end` wrapper applied
    pub source: String,
    pub params: RenderParams,
}

/// Apply a block of `key: value` directive lines to `params`.
///
/// A bare key (no `:`) gets the value `"1"`; `preset: <name>` merges that
/// preset's entries at this position so later lines can still override them.
pub fn apply_directive_block(block: &str, presets: &PresetTable, params: &mut RenderParams) {
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (line, "1"),
        };
        if name == "preset" {
            presets.apply(value, params);
        } else {
            params.set(name, value);
        }
    }
}

/// Split an optional leading `---`-delimited front-matter block off `source`
/// and merge its directives over `params` (which usually already carries a
/// per-type default preset).
pub fn resolve_front_matter(
    source: &str,
    presets: &PresetTable,
    mut params: RenderParams,
) -> FrontMatter {
    let mut body = source;

    if let Some(rest) = source.strip_prefix("---") {
        if let Some(end) = rest.find("---") {
            apply_directive_block(&rest[..end], presets, &mut params);
            body = &rest[end + 3..];
        }
    }

    let mut cleaned = body.trim_matches('\n').to_string();

    if let Some(doc_start) = params.get("doc-start") {
        cleaned = format!("{doc_start}\n{cleaned}");
    }
    if let Some(doc_end) = params.get("doc-end") {
        cleaned = format!("{cleaned}\n{doc_end}");
    }

    FrontMatter {
        source: cleaned,
        params,
    }
}
