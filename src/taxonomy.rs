//! Theme variable taxonomy
//!
//! Maps the color vocabulary that external renderers actually emit (SVG named
//! colors and their canonical hex codes) onto a fixed set of semantic theme
//! variables. The variables are split into two tables: hue colors (seven
//! families, each with a dark/neutral/light slot) and shades (a grayscale
//! ramp from near-white to near-black, plus one unclassified gray).
//!
//! A variable is a tagged value, not a string: inversion flips the polarity
//! field and the CSS name is derived at the serialization boundary. This
//! keeps `invert(invert(v)) == v` structural rather than an artifact of
//! substring replacement.

use std::collections::HashMap;
use std::fmt;

use crate::color::RgbColor;

/// Hue family of a themed color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HueFamily {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Cyan,
    Orange,
}

impl HueFamily {
    pub const ALL: [HueFamily; 7] = [
        HueFamily::Red,
        HueFamily::Green,
        HueFamily::Blue,
        HueFamily::Yellow,
        HueFamily::Purple,
        HueFamily::Cyan,
        HueFamily::Orange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HueFamily::Red => "red",
            HueFamily::Green => "green",
            HueFamily::Blue => "blue",
            HueFamily::Yellow => "yellow",
            HueFamily::Purple => "purple",
            HueFamily::Cyan => "cyan",
            HueFamily::Orange => "orange",
        }
    }
}

/// Light/dark polarity of a hue slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Light,
    Neutral,
    Dark,
}

impl Polarity {
    fn flipped(self) -> Self {
        match self {
            Polarity::Light => Polarity::Dark,
            Polarity::Neutral => Polarity::Neutral,
            Polarity::Dark => Polarity::Light,
        }
    }
}

/// Which end of the grayscale ramp a shade sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadePolarity {
    Light,
    Dark,
}

impl ShadePolarity {
    fn flipped(self) -> Self {
        match self {
            ShadePolarity::Light => ShadePolarity::Dark,
            ShadePolarity::Dark => ShadePolarity::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShadePolarity::Light => "light",
            ShadePolarity::Dark => "dark",
        }
    }
}

/// Intensity step of a shade slot, from the extreme end inward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadeLevel {
    Hard100,
    Base100,
    Soft100,
    Step90,
    Step80,
    Step70,
    Step60,
}

impl ShadeLevel {
    pub const ALL: [ShadeLevel; 7] = [
        ShadeLevel::Hard100,
        ShadeLevel::Base100,
        ShadeLevel::Soft100,
        ShadeLevel::Step90,
        ShadeLevel::Step80,
        ShadeLevel::Step70,
        ShadeLevel::Step60,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            ShadeLevel::Hard100 => "100-hard",
            ShadeLevel::Base100 => "100",
            ShadeLevel::Soft100 => "100-soft",
            ShadeLevel::Step90 => "90",
            ShadeLevel::Step80 => "80",
            ShadeLevel::Step70 => "70",
            ShadeLevel::Step60 => "60",
        }
    }
}

/// A semantic theme variable slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeVar {
    Hue {
        family: HueFamily,
        polarity: Polarity,
    },
    Shade {
        polarity: ShadePolarity,
        level: ShadeLevel,
    },
    /// The one gray with no light/dark classification
    Gray,
}

impl ThemeVar {
    /// True for grayscale slots (including [`ThemeVar::Gray`])
    pub fn is_shade(self) -> bool {
        !matches!(self, ThemeVar::Hue { .. })
    }

    /// Flip the light/dark polarity. Neutral hues and the unclassified gray
    /// are fixed points, so `invert` is an involution on every variable.
    pub fn invert(self) -> Self {
        match self {
            ThemeVar::Hue { family, polarity } => ThemeVar::Hue {
                family,
                polarity: polarity.flipped(),
            },
            ThemeVar::Shade { polarity, level } => ThemeVar::Shade {
                polarity: polarity.flipped(),
                level,
            },
            ThemeVar::Gray => ThemeVar::Gray,
        }
    }

    /// Bare slot name without any variable prefix, e.g. `dark-red` or
    /// `light100-hard`
    pub fn slot_name(self) -> String {
        match self {
            ThemeVar::Hue { family, polarity } => match polarity {
                Polarity::Light => format!("light-{}", family.name()),
                Polarity::Neutral => family.name().to_string(),
                Polarity::Dark => format!("dark-{}", family.name()),
            },
            ThemeVar::Shade { polarity, level } => {
                format!("{}{}", polarity.name(), level.suffix())
            }
            ThemeVar::Gray => "gray".to_string(),
        }
    }

    /// CSS custom property name consumed by the embedding stylesheet
    pub fn css_name(self) -> String {
        format!("--g-{}", self.slot_name())
    }
}

impl fmt::Display for ThemeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_name())
    }
}

const fn hue(family: HueFamily, polarity: Polarity) -> ThemeVar {
    ThemeVar::Hue { family, polarity }
}

const fn shade(polarity: ShadePolarity, level: ShadeLevel) -> ThemeVar {
    ThemeVar::Shade { polarity, level }
}

// Alias tables. Each entry lists the renderer-visible spellings of one slot;
// hex aliases (entries starting with '#') additionally join the
// nearest-neighbor table, in declaration order.

#[rustfmt::skip]
const HUE_ALIASES: &[(&[&str], ThemeVar)] = &[
    // dark colors
    (&["darkred", "#8B0000", "firebrick", "#B22222", "maroon", "#800000",
       "brown", "#A52A2A"],                          hue(HueFamily::Red, Polarity::Dark)),
    (&["darkmagenta", "#8B008B", "darkviolet", "#9400D3", "darkorchid", "#9932CC",
       "blueviolet", "#8A2BE2", "indigo", "#4B0082"], hue(HueFamily::Purple, Polarity::Dark)),
    (&["darkgreen", "#006400"],                      hue(HueFamily::Green, Polarity::Dark)),
    (&["darkblue", "#00008B", "midnightblue", "#191970",
       "navy", "#000080"],                           hue(HueFamily::Blue, Polarity::Dark)),
    (&["chocolate", "#D2691E"],                      hue(HueFamily::Orange, Polarity::Dark)),
    (&["goldenrod", "#DAA520", "darkgoldenrod", "#B8860B"],
                                                     hue(HueFamily::Yellow, Polarity::Dark)),
    (&["darkcyan", "#008B8B", "lightseagreen", "#20B2AA",
       "teal", "#008080"],                           hue(HueFamily::Cyan, Polarity::Dark)),

    // neutral colors
    (&["red", "#FF0000", "tomato", "#FF6347"],       hue(HueFamily::Red, Polarity::Neutral)),
    (&["purple", "#800080", "mediumpurple", "#9370DB",
       "magenta", "#FF00FF"],                        hue(HueFamily::Purple, Polarity::Neutral)),
    (&["green", "#008000"],                          hue(HueFamily::Green, Polarity::Neutral)),
    (&["blue", "#0000FF"],                           hue(HueFamily::Blue, Polarity::Neutral)),
    (&["darkorange", "#FF8C00"],                     hue(HueFamily::Orange, Polarity::Neutral)),
    (&["yellow", "#FFFF00"],                         hue(HueFamily::Yellow, Polarity::Neutral)),
    (&["cyan", "aqua", "#00FFFF"],                   hue(HueFamily::Cyan, Polarity::Neutral)),

    // light colors
    (&["lightcoral", "#F08080", "salmon", "#FA8072", "pink", "#FFC0CB",
       "lightsalmon", "#FFA07A", "indianred", "#CD5C5C"],
                                                     hue(HueFamily::Red, Polarity::Light)),
    (&["plum", "#DDA0DD", "violet", "#EE82EE", "orchid", "#DA70D6",
       "mediumorchid", "#BA55D3"],                   hue(HueFamily::Purple, Polarity::Light)),
    (&["lightgreen", "#90EE90", "palegreen", "#98FB98"],
                                                     hue(HueFamily::Green, Polarity::Light)),
    (&["powderblue", "#B0E0E6", "lightblue", "#ADD8E6", "skyblue", "#87CEEB",
       "lightskyblue", "#87CEFA"],                   hue(HueFamily::Blue, Polarity::Light)),
    (&["orange", "#FFA500", "coral", "#FF7F50"],     hue(HueFamily::Orange, Polarity::Light)),
    (&["gold", "#FFD700"],                           hue(HueFamily::Yellow, Polarity::Light)),
    (&["paleturquoise", "#AFEEEE", "aquamarine", "#7FFFD4"],
                                                     hue(HueFamily::Cyan, Polarity::Light)),
];

#[rustfmt::skip]
const SHADE_ALIASES: &[(&[&str], ThemeVar)] = &[
    (&["ghostwhite", "#F8F8FF"],                shade(ShadePolarity::Light, ShadeLevel::Hard100)),
    (&["white", "#FFFFFF"],                     shade(ShadePolarity::Light, ShadeLevel::Base100)),
    (&["seashell", "#FFF5EE"],                  shade(ShadePolarity::Light, ShadeLevel::Soft100)),
    (&["snow", "#FFFAFA"],                      shade(ShadePolarity::Light, ShadeLevel::Step90)),
    (&["whitesmoke", "#F5F5F5"],                shade(ShadePolarity::Light, ShadeLevel::Step80)),
    (&["lightgray", "lightgrey", "#D3D3D3"],    shade(ShadePolarity::Light, ShadeLevel::Step70)),
    (&["silver", "#C0C0C0"],                    shade(ShadePolarity::Light, ShadeLevel::Step60)),

    // dark100-hard has no alias of its own; nothing renderers emit is darker
    // than plain black
    (&["black", "#000000"],                     shade(ShadePolarity::Dark, ShadeLevel::Base100)),
    (&["dimgray", "dimgrey", "#696969"],        shade(ShadePolarity::Dark, ShadeLevel::Soft100)),
    (&["darkslategray", "darkslategrey", "#2F4F4F"],
                                                shade(ShadePolarity::Dark, ShadeLevel::Step90)),
    (&["slategray", "slategrey", "#708090"],    shade(ShadePolarity::Dark, ShadeLevel::Step80)),
    (&["lightslategray", "lightslategrey", "#778899"],
                                                shade(ShadePolarity::Dark, ShadeLevel::Step70)),
    (&["gray", "grey", "#808080"],              shade(ShadePolarity::Dark, ShadeLevel::Step60)),
    (&["darkgray", "darkgrey", "#A9A9A9"],      ThemeVar::Gray),
];

/// One lookup table: exact aliases plus hex entries in declaration order
#[derive(Debug, Clone)]
pub struct ColorTable {
    by_name: HashMap<String, ThemeVar>,
    hex_entries: Vec<(RgbColor, ThemeVar)>,
}

impl ColorTable {
    fn build(aliases: &[(&[&str], ThemeVar)]) -> Self {
        let mut by_name = HashMap::new();
        let mut hex_entries = Vec::new();
        for (names, var) in aliases {
            for name in *names {
                if name.starts_with('#') {
                    if let Some(rgb) = RgbColor::from_hex(name) {
                        hex_entries.push((rgb, *var));
                    }
                }
                by_name.insert(name.to_lowercase(), *var);
            }
        }
        Self {
            by_name,
            hex_entries,
        }
    }

    /// Exact lookup by lowercased alias or hex spelling
    pub fn lookup(&self, key: &str) -> Option<ThemeVar> {
        self.by_name.get(key).copied()
    }

    /// Hex entries in declaration order, for nearest-neighbor scans. The
    /// order is part of the tie-break contract and must not be re-sorted.
    pub fn hex_entries(&self) -> &[(RgbColor, ThemeVar)] {
        &self.hex_entries
    }
}

/// The two classification tables, built once and shared read-only
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub hues: ColorTable,
    pub shades: ColorTable,
}

impl Taxonomy {
    /// Build both tables from the static alias data. Pure and deterministic;
    /// callers that want to share one across jobs build it once and pass it
    /// by reference.
    pub fn new() -> Self {
        Self {
            hues: ColorTable::build(HUE_ALIASES),
            shades: ColorTable::build(SHADE_ALIASES),
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_names() {
        assert_eq!(hue(HueFamily::Red, Polarity::Dark).css_name(), "--g-dark-red");
        assert_eq!(hue(HueFamily::Red, Polarity::Neutral).css_name(), "--g-red");
        assert_eq!(hue(HueFamily::Cyan, Polarity::Light).css_name(), "--g-light-cyan");
        assert_eq!(
            shade(ShadePolarity::Light, ShadeLevel::Hard100).css_name(),
            "--g-light100-hard"
        );
        assert_eq!(
            shade(ShadePolarity::Dark, ShadeLevel::Soft100).css_name(),
            "--g-dark100-soft"
        );
        assert_eq!(
            shade(ShadePolarity::Dark, ShadeLevel::Step60).css_name(),
            "--g-dark60"
        );
        assert_eq!(ThemeVar::Gray.css_name(), "--g-gray");
    }

    #[test]
    fn test_invert_flips_polarity() {
        let light_red = hue(HueFamily::Red, Polarity::Light);
        assert_eq!(light_red.invert(), hue(HueFamily::Red, Polarity::Dark));
        assert_eq!(
            shade(ShadePolarity::Light, ShadeLevel::Step70).invert(),
            shade(ShadePolarity::Dark, ShadeLevel::Step70)
        );
    }

    #[test]
    fn test_invert_is_involution() {
        for (_, var) in HUE_ALIASES.iter().chain(SHADE_ALIASES.iter()) {
            assert_eq!(var.invert().invert(), *var);
        }
    }

    #[test]
    fn test_invert_fixed_points() {
        assert_eq!(ThemeVar::Gray.invert(), ThemeVar::Gray);
        let neutral = hue(HueFamily::Blue, Polarity::Neutral);
        assert_eq!(neutral.invert(), neutral);
    }

    #[test]
    fn test_table_lookup() {
        let taxonomy = Taxonomy::new();
        assert_eq!(
            taxonomy.hues.lookup("darkred"),
            Some(hue(HueFamily::Red, Polarity::Dark))
        );
        assert_eq!(
            taxonomy.hues.lookup("#8b0000"),
            Some(hue(HueFamily::Red, Polarity::Dark))
        );
        assert_eq!(
            taxonomy.shades.lookup("white"),
            Some(shade(ShadePolarity::Light, ShadeLevel::Base100))
        );
        assert_eq!(taxonomy.shades.lookup("darkgray"), Some(ThemeVar::Gray));
        assert_eq!(taxonomy.hues.lookup("notacolor"), None);
    }

    #[test]
    fn test_hex_entries_keep_declaration_order() {
        let taxonomy = Taxonomy::new();
        let first = taxonomy.hues.hex_entries()[0];
        assert_eq!(first.0, RgbColor::new(0x8b, 0, 0));
        assert_eq!(first.1, hue(HueFamily::Red, Polarity::Dark));
        let first_shade = taxonomy.shades.hex_entries()[0];
        assert_eq!(first_shade.1, shade(ShadePolarity::Light, ShadeLevel::Hard100));
    }
}
