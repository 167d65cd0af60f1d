//! Theme palette stylesheet generation
//!
//! Produces the CSS that gives every theme variable a concrete value: `:root`
//! declarations for the base palette slots, per-theme mappings that bind each
//! `--g-<name>` to a slot (light mode binds to the *inverted* slot, which is
//! what makes dark-on-light diagrams readable without re-rendering), and the
//! `keep-color`/`keep-shade` rules that pin an element to the dark-theme
//! binding regardless of the active theme.
//!
//! Every variable is emitted together with `_r`/`_g`/`_b` channel companions
//! so the rewriter's blend expressions can do per-channel arithmetic.

use crate::color::RgbColor;
use crate::taxonomy::{HueFamily, Polarity, ShadeLevel, ShadePolarity, ThemeVar};

// Base palette constants (gruvbox-derived): neutral, light, dark per family.
#[rustfmt::skip]
const HUE_PALETTE: &[(HueFamily, &str, &str, &str)] = &[
    (HueFamily::Red,    "#cc241d", "#fb4934", "#9d0006"),
    (HueFamily::Green,  "#98971a", "#b8bb26", "#79740e"),
    (HueFamily::Yellow, "#d79921", "#fabd2f", "#b57614"),
    (HueFamily::Blue,   "#458588", "#83a598", "#076678"),
    (HueFamily::Purple, "#b16286", "#d3869b", "#8f3f71"),
    (HueFamily::Cyan,   "#689d6a", "#8ec07c", "#427b58"),
    (HueFamily::Orange, "#d65d0e", "#fe8019", "#af3a03"),
];

#[rustfmt::skip]
const SHADE_PALETTE: &[(ShadePolarity, ShadeLevel, &str)] = &[
    (ShadePolarity::Light, ShadeLevel::Hard100, "#f9f5d7"),
    (ShadePolarity::Light, ShadeLevel::Base100, "#fbf1c7"),
    (ShadePolarity::Light, ShadeLevel::Soft100, "#f2e5bc"),
    (ShadePolarity::Light, ShadeLevel::Step90,  "#ebdbb2"),
    (ShadePolarity::Light, ShadeLevel::Step80,  "#d5c4a1"),
    (ShadePolarity::Light, ShadeLevel::Step70,  "#bdae93"),
    (ShadePolarity::Light, ShadeLevel::Step60,  "#a89984"),
    (ShadePolarity::Dark,  ShadeLevel::Step60,  "#7c6f64"),
    (ShadePolarity::Dark,  ShadeLevel::Step70,  "#665c54"),
    (ShadePolarity::Dark,  ShadeLevel::Step80,  "#504945"),
    (ShadePolarity::Dark,  ShadeLevel::Step90,  "#3c3836"),
    (ShadePolarity::Dark,  ShadeLevel::Soft100, "#32302f"),
    (ShadePolarity::Dark,  ShadeLevel::Base100, "#282828"),
    (ShadePolarity::Dark,  ShadeLevel::Hard100, "#1d2021"),
];

const GRAY_HEX: &str = "#928374";

const BASE_CSS: &str = "/* proper sizing */

.dynamic-svg svg {
    max-width: 100%;
    height: auto;
}
";

fn theme_slot(var: ThemeVar) -> String {
    format!("--theme-{}", var.slot_name())
}

/// Declare a variable with its literal value and channel companions
fn declaration(name: &str, hex: &str) -> String {
    let rgb = RgbColor::from_hex(hex).expect("palette constants must be valid hex");
    format!(
        "  {name}_r: {};\n  {name}_g: {};\n  {name}_b: {};\n  {name}: {hex};\n\n",
        rgb.r, rgb.g, rgb.b
    )
}

/// Bind a variable (and its channels) to another via `var()`
fn mapping(target: &str, source: &str) -> String {
    format!(
        "  {target}: var({source});\n  {target}_r: var({source}_r);\n  \
         {target}_g: var({source}_g);\n  {target}_b: var({source}_b);\n\n"
    )
}

/// Generate the complete theme stylesheet. Deterministic: iteration follows
/// the static palette tables.
pub fn generate_css() -> String {
    let mut root_decls = String::from(":root {\n");
    let mut combined = String::from(
        "/* theme-independent slots */\n.theme-dark, .theme-light {\n",
    );
    let mut light_theme = String::from(
        "/* inverted bindings for light mode */\n.theme-light {\n",
    );
    let mut dark_colors = String::from(
        "/* direct bindings for dark mode, pinned by .keep-color */\n.theme-dark, .keep-color {\n",
    );
    let mut dark_shades = String::from(
        "/* direct bindings for dark mode, pinned by .keep-shade */\n.theme-dark, .keep-shade {\n",
    );

    combined.push_str(&declaration("--g-gray", GRAY_HEX));

    for &(family, neutral, light, dark) in HUE_PALETTE {
        for (polarity, hex) in [
            (Polarity::Neutral, neutral),
            (Polarity::Light, light),
            (Polarity::Dark, dark),
        ] {
            let var = ThemeVar::Hue { family, polarity };
            let slot = theme_slot(var);
            root_decls.push_str(&declaration(&slot, hex));
            if polarity == Polarity::Neutral {
                combined.push_str(&declaration(&var.css_name(), hex));
            } else {
                dark_colors.push_str(&mapping(&var.css_name(), &slot));
                light_theme.push_str(&mapping(&var.css_name(), &theme_slot(var.invert())));
            }
        }
    }

    for &(polarity, level, hex) in SHADE_PALETTE {
        let var = ThemeVar::Shade { polarity, level };
        let slot = theme_slot(var);
        root_decls.push_str(&declaration(&slot, hex));
        dark_shades.push_str(&mapping(&var.css_name(), &slot));
        light_theme.push_str(&mapping(&var.css_name(), &theme_slot(var.invert())));
    }

    for block in [
        &mut root_decls,
        &mut combined,
        &mut light_theme,
        &mut dark_colors,
        &mut dark_shades,
    ] {
        block.push_str("}\n");
    }

    format!("{BASE_CSS}\n{root_decls}\n{combined}\n{light_theme}\n{dark_colors}\n{dark_shades}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_declarations_with_channels() {
        let css = generate_css();
        assert!(css.contains("--theme-dark-red: #9d0006;"));
        assert!(css.contains("--theme-dark-red_r: 157;"));
        assert!(css.contains("--theme-dark-red_g: 0;"));
        assert!(css.contains("--theme-dark-red_b: 6;"));
        assert!(css.contains("--theme-light100-hard: #f9f5d7;"));
        assert!(css.contains("--theme-dark100-hard: #1d2021;"));
    }

    #[test]
    fn test_light_mode_binds_inverted_slots() {
        let css = generate_css();
        assert!(css.contains("--g-light-red: var(--theme-dark-red);"));
        assert!(css.contains("--g-dark-red: var(--theme-light-red);"));
        assert!(css.contains("--g-light100: var(--theme-dark100);"));
    }

    #[test]
    fn test_dark_mode_binds_direct_slots() {
        let css = generate_css();
        assert!(css.contains("--g-light-red: var(--theme-light-red);"));
        assert!(css.contains("--g-dark90: var(--theme-dark90);"));
    }

    #[test]
    fn test_neutral_and_gray_are_theme_independent() {
        let css = generate_css();
        assert!(css.contains("--g-red: #cc241d;"));
        assert!(css.contains("--g-gray: #928374;"));
        // neutral slots are not rebound per theme
        assert!(!css.contains("--g-red: var("));
        assert!(!css.contains("--g-gray: var("));
    }

    #[test]
    fn test_every_engine_variable_is_bound() {
        let css = generate_css();
        let taxonomy = crate::taxonomy::Taxonomy::new();
        for (_, var) in taxonomy
            .hues
            .hex_entries()
            .iter()
            .chain(taxonomy.shades.hex_entries())
        {
            let name = var.css_name();
            assert!(css.contains(&format!("{name}: ")), "missing binding for {name}");
            assert!(css.contains(&format!("{name}_r: ")), "missing channels for {name}");
        }
    }

    #[test]
    fn test_pinning_classes_present() {
        let css = generate_css();
        assert!(css.contains(".theme-dark, .keep-color {"));
        assert!(css.contains(".theme-dark, .keep-shade {"));
    }
}
