//! svg-recolor - theme-aware recoloring for rendered SVG diagrams
//!
//! Takes the raw SVG output of an external renderer (Graphviz, a LaTeX
//! toolchain, a diagram DSL) and rewrites its paint attributes into CSS
//! theme-variable references, so one rendered image follows the host
//! document's light/dark theme. Per-element override directives, Manhattan
//! nearest-neighbor fallback matching, paint inheritance through nested
//! groups and per-instance identifier namespacing are all handled in a
//! single rewriting pass.
//!
//! # Example
//!
//! ```rust
//! use svg_recolor::{recolor, RenderParams};
//!
//! let svg = r##"<svg><rect fill="#8B0000"/></svg>"##;
//! let out = recolor(svg, &RenderParams::new(), "a1b2").unwrap();
//! assert!(out.contains("fill:var(--g-dark-red);"));
//! ```

pub mod color;
pub mod namespace;
pub mod palette;
pub mod params;
pub mod resolver;
pub mod rewrite;
pub mod taxonomy;
pub mod tree;

use thiserror::Error;

pub use color::RgbColor;
pub use params::{
    apply_directive_block, resolve_front_matter, Directive, FrontMatter, MixMode, PresetError,
    PresetTable, RenderParams,
};
pub use resolver::{PaintKind, ResolvedPaint, Resolver};
pub use taxonomy::{Taxonomy, ThemeVar};

/// Errors that abort a render job
///
/// Unresolvable colors are deliberately absent: they degrade to literal
/// passthrough instead of failing the job.
#[derive(Debug, Error)]
pub enum RecolorError {
    /// The renderer output is not well-formed markup
    #[error("failed to parse svg markup: {0}")]
    Parse(#[from] roxmltree::Error),

    /// Well-formed markup, but the root element is not `<svg>`
    #[error("expected an <svg> root element, found <{found}>")]
    NotSvg { found: String },
}

/// Recolor a rendered SVG with a resolver built on the spot.
///
/// `instance_hash` is the job's uniqueness salt (typically a content hash of
/// the diagram source); identifiers in `<defs>` and their references are
/// suffixed with it so co-embedded copies of one diagram stay independent.
/// An empty hash disables namespacing.
pub fn recolor(
    raw_svg: &str,
    params: &RenderParams,
    instance_hash: &str,
) -> Result<String, RecolorError> {
    recolor_with(&Resolver::new(), raw_svg, params, instance_hash)
}

/// Recolor with a shared [`Resolver`]. The resolver is immutable after
/// construction, so hosts rendering many code blocks can build one and reuse
/// it across jobs (and threads).
pub fn recolor_with(
    resolver: &Resolver,
    raw_svg: &str,
    params: &RenderParams,
    instance_hash: &str,
) -> Result<String, RecolorError> {
    let mut root = tree::parse(raw_svg)?;
    rewrite::rewrite_tree(&mut root, resolver, params, instance_hash);
    Ok(tree::serialize(&root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recolor_smoke() {
        let out = recolor(
            r##"<svg><rect fill="#8B0000"/></svg>"##,
            &RenderParams::new(),
            "",
        )
        .unwrap();
        assert_eq!(out, r#"<svg><rect style="fill:var(--g-dark-red);"/></svg>"#);
    }

    #[test]
    fn test_recolor_propagates_parse_failure() {
        let err = recolor("<svg", &RenderParams::new(), "").unwrap_err();
        assert!(matches!(err, RecolorError::Parse(_)));
        // the message is meant for a diagnostic block in the host
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_shared_resolver() {
        let resolver = Resolver::new();
        let params = RenderParams::new();
        let a = recolor_with(&resolver, "<svg><rect fill=\"red\"/></svg>", &params, "a").unwrap();
        let b = recolor_with(&resolver, "<svg><rect fill=\"red\"/></svg>", &params, "b").unwrap();
        assert_eq!(a, b);
    }
}
