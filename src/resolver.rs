//! Color classification
//!
//! Resolves an arbitrary paint string to its theme variable: exact alias
//! lookup first, Manhattan-distance nearest neighbor second. Resolution never
//! fails; a string nothing matches comes back as `Unknown` and the caller
//! keeps the literal value.

use crate::color::{self, RgbColor, SignedRgb};
use crate::taxonomy::{Taxonomy, ThemeVar};

/// Classification of a resolved paint value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintKind {
    Color,
    Shade,
    Unknown,
}

/// Result of classifying one paint value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPaint {
    /// Matched theme variable, if any
    pub variable: Option<ThemeVar>,
    pub kind: PaintKind,
    /// Manhattan distance to the matched entry; 0 for exact matches
    pub delta: u32,
    /// Signed per-channel difference `source - matched`, present only for
    /// nearest-neighbor matches
    pub delta_color: Option<SignedRgb>,
    /// The source value as RGB, when it parses as a hex code
    pub source_color: Option<RgbColor>,
}

impl ResolvedPaint {
    fn unknown(source_color: Option<RgbColor>) -> Self {
        Self {
            variable: None,
            kind: PaintKind::Unknown,
            delta: 0,
            delta_color: None,
            source_color,
        }
    }
}

fn kind_of(var: ThemeVar) -> PaintKind {
    if var.is_shade() {
        PaintKind::Shade
    } else {
        PaintKind::Color
    }
}

/// Classifies paint strings against a [`Taxonomy`]
///
/// Immutable after construction; share one across jobs (and threads) or
/// build one per call, whichever the host prefers.
#[derive(Debug, Clone)]
pub struct Resolver {
    taxonomy: Taxonomy,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            taxonomy: Taxonomy::new(),
        }
    }

    pub fn with_taxonomy(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Resolve a canonicalized paint string (see [`color::canonicalize`]).
    ///
    /// With `find_closest` disabled only exact alias matches are reported;
    /// this backs the `original-colors` directive.
    pub fn resolve(&self, canonical: &str, find_closest: bool) -> ResolvedPaint {
        let key = canonical.to_lowercase();
        let source_color = RgbColor::from_hex(&key);

        let exact = self
            .taxonomy
            .hues
            .lookup(&key)
            .or_else(|| self.taxonomy.shades.lookup(&key));
        if let Some(var) = exact {
            return ResolvedPaint {
                variable: Some(var),
                kind: kind_of(var),
                delta: 0,
                delta_color: None,
                source_color,
            };
        }

        let (Some(source), true) = (source_color, find_closest) else {
            return ResolvedPaint::unknown(source_color);
        };

        // One scan, hue entries before shade entries; the strict comparison
        // makes the first-seen entry win ties. That ordering is arbitrary but
        // part of the determinism contract.
        let mut best: Option<(u32, RgbColor, ThemeVar)> = None;
        for &(entry_rgb, var) in self
            .taxonomy
            .hues
            .hex_entries()
            .iter()
            .chain(self.taxonomy.shades.hex_entries())
        {
            let delta = color::color_distance(source, entry_rgb);
            if best.map_or(true, |(min, _, _)| delta < min) {
                best = Some((delta, entry_rgb, var));
            }
        }

        match best {
            Some((delta, matched, var)) => ResolvedPaint {
                variable: Some(var),
                kind: kind_of(var),
                delta,
                delta_color: Some(color::color_delta(source, matched)),
                source_color,
            },
            None => ResolvedPaint::unknown(source_color),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
