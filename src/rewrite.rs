//! SVG tree walker and paint rewriter
//!
//! A single depth-first pass over the parsed document. For every element on
//! the themed-tag allow-list the walker decides, per style axis (fill,
//! stroke), which paint value applies: an explicit attribute, the implicit
//! black default, or nothing because an ancestor already painted that axis.
//! The value is then classified and rewritten to a theme-variable reference
//! in the element's `style` attribute. `<defs>` subtrees are handed to the
//! identifier namespacer instead of being recolored.

use crate::color::{canonicalize, RgbColor, SignedRgb};
use crate::namespace;
use crate::params::{Directive, DirectiveSet, MixMode, RenderParams};
use crate::resolver::{ResolvedPaint, Resolver};
use crate::taxonomy::ThemeVar;
use crate::tree::SvgElement;

/// Tags that participate in theme mapping. Anything else is left untouched
/// structurally, though its children are still visited.
const THEMED_TAGS: &[&str] = &[
    "text", "path", "rect", "circle", "ellipse", "line", "polyline", "polygon", "g", "use",
    "switch",
];

/// Tags that draw on their own and therefore default to a black fill even
/// with no fill attribute. Containers (`g`, `use`, `switch`) are only
/// processed when they carry an explicit paint.
const DRAW_TAGS: &[&str] = &[
    "text", "path", "rect", "circle", "ellipse", "line", "polyline", "polygon",
];

const IMPLICIT_PAINT: &str = "black";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Fill,
    Stroke,
}

impl Axis {
    const ALL: [Axis; 2] = [Axis::Fill, Axis::Stroke];

    fn attr_name(self) -> &'static str {
        match self {
            Axis::Fill => "fill",
            Axis::Stroke => "stroke",
        }
    }
}

/// Style axes already painted somewhere up the ancestor chain. Passed down
/// the recursion by value; a child sees the union of its parent's set and
/// whatever the parent itself emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HandledAxes {
    fill: bool,
    stroke: bool,
}

impl HandledAxes {
    fn contains(self, axis: Axis) -> bool {
        match axis {
            Axis::Fill => self.fill,
            Axis::Stroke => self.stroke,
        }
    }

    fn insert(&mut self, axis: Axis) {
        match axis {
            Axis::Fill => self.fill = true,
            Axis::Stroke => self.stroke = true,
        }
    }
}

/// Rewrite a parsed document in place.
///
/// Reads the global directives off `params` once, then walks the children of
/// the root `<svg>`. With `inline` set this reduces to the `width` style on
/// the root, which makes a second run over the output a pass-through.
pub fn rewrite_tree(root: &mut SvgElement, resolver: &Resolver, params: &RenderParams, hash: &str) {
    if let Some(width) = params.get("width").filter(|w| !w.is_empty()) {
        let decl = format!("width: {width};");
        let style = match root.attr("style") {
            Some(existing) if !existing.is_empty() && !existing.contains(&decl) => {
                format!("{decl} {existing}")
            }
            Some(existing) if existing.contains(&decl) => existing.to_string(),
            _ => decl,
        };
        root.set_attr("style", style);
    }

    if params.is_enabled("inline") {
        return;
    }

    let rewriter = Rewriter {
        resolver,
        params,
        hash,
        mix: params.mix_multiplier().map(|m| (m, params.mix_mode())),
        invert_color: params.is_enabled("invert-color"),
        invert_shade: params.is_enabled("invert-shade"),
    };
    for child in root.child_elements_mut() {
        rewriter.walk(child, HandledAxes::default());
    }
}

struct Rewriter<'a> {
    resolver: &'a Resolver,
    params: &'a RenderParams,
    hash: &'a str,
    mix: Option<(f32, MixMode)>,
    invert_color: bool,
    invert_shade: bool,
}

impl Rewriter<'_> {
    fn walk(&self, el: &mut SvgElement, inherited: HandledAxes) {
        if el.tag == "defs" {
            namespace::namespace_defs(el, self.hash);
            return;
        }

        namespace::rewrite_references(el, self.hash);

        let mut handled = inherited;
        if THEMED_TAGS.contains(&el.tag.as_str()) {
            handled = self.rewrite_element(el, inherited);
        }

        for child in el.child_elements_mut() {
            self.walk(child, handled);
        }
    }

    /// Process one allow-listed element; returns the handled-axis set its
    /// children inherit.
    fn rewrite_element(&self, el: &mut SvgElement, inherited: HandledAxes) -> HandledAxes {
        let mut handled = inherited;
        let mut decls = String::new();
        let mut classes: Vec<&'static str> = Vec::new();

        for axis in Axis::ALL {
            let attr_name = axis.attr_name();
            let tokens = self.params.directives(&el.tag, attr_name);

            let literal = match el.attr(attr_name) {
                Some(value) => value.to_string(),
                None => {
                    let implicit = (axis == Axis::Fill && DRAW_TAGS.contains(&el.tag.as_str()))
                        || tokens.contains(Directive::Implicit);
                    if !implicit || inherited.contains(axis) {
                        continue;
                    }
                    IMPLICIT_PAINT.to_string()
                }
            };
            el.remove_attr(attr_name);
            handled.insert(axis);

            let canonical = canonicalize(&literal);

            if tokens.contains(Directive::Skip) {
                push_decl(&mut decls, attr_name, &canonical);
                continue;
            }

            let resolved = self
                .resolver
                .resolve(&canonical, !tokens.contains(Directive::OriginalColors));
            let Some(variable) = resolved.variable else {
                push_decl(&mut decls, attr_name, &canonical);
                continue;
            };

            if tokens.contains(Directive::KeepColor) || tokens.contains(Directive::KeepAll) {
                classes.push("keep-color");
            }
            if tokens.contains(Directive::KeepShade) || tokens.contains(Directive::KeepAll) {
                classes.push("keep-shade");
            }

            let variable = self.apply_inversion(variable, &tokens);
            let value = self.paint_value(variable, &resolved);
            push_decl(&mut decls, attr_name, &value);
        }

        let mut style = retained_declarations(el.attr("style"));
        style.push_str(&decls);
        el.set_attr("style", style);

        if !classes.is_empty() {
            let mut class_list: Vec<String> = el
                .attr("class")
                .map(|c| c.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            for class in classes {
                if !class_list.iter().any(|existing| existing == class) {
                    class_list.push(class.to_string());
                }
            }
            el.set_attr("class", class_list.join(" "));
        }

        handled
    }

    /// Inversion is the XOR of the per-axis token and the job-level
    /// directive for the resolved kind; double inversion cancels.
    fn apply_inversion(&self, variable: ThemeVar, tokens: &DirectiveSet) -> ThemeVar {
        let is_shade = variable.is_shade();
        let local = tokens.contains(Directive::InvertAll)
            || (tokens.contains(Directive::InvertColor) && !is_shade)
            || (tokens.contains(Directive::InvertShade) && is_shade);
        let global = if is_shade {
            self.invert_shade
        } else {
            self.invert_color
        };
        if local != global {
            variable.invert()
        } else {
            variable
        }
    }

    /// The final CSS value for one axis: a direct `var()` reference, or a
    /// blend expression when the match was approximate and mixing is on.
    fn paint_value(&self, variable: ThemeVar, resolved: &ResolvedPaint) -> String {
        if let Some((multiplier, mode)) = self.mix {
            if resolved.delta > 0 {
                match mode {
                    MixMode::Mix => {
                        if let Some(source) = resolved.source_color {
                            return mix_expression(variable, source, multiplier);
                        }
                    }
                    MixMode::Delta => {
                        if let Some(delta) = resolved.delta_color {
                            return delta_expression(variable, delta, multiplier);
                        }
                    }
                }
            }
        }
        format!("var({})", variable.css_name())
    }
}

fn push_decl(decls: &mut String, name: &str, value: &str) {
    decls.push_str(name);
    decls.push(':');
    decls.push_str(value);
    decls.push(';');
}

/// Declarations from a pre-existing style attribute, minus fill/stroke so
/// the rewritten paint wins
fn retained_declarations(style: Option<&str>) -> String {
    let mut kept = String::new();
    let Some(style) = style else {
        return kept;
    };
    for decl in style.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let property = decl.split(':').next().unwrap_or_default().trim();
        if property == "fill" || property == "stroke" {
            continue;
        }
        kept.push_str(decl);
        kept.push(';');
    }
    kept
}

/// `theme channel + scaled signed delta`, clamped per channel
fn delta_expression(variable: ThemeVar, delta: SignedRgb, multiplier: f32) -> String {
    let name = variable.css_name();
    format!(
        "rgb(clamp(0, calc(var({name}_r) + {}), 255), \
         clamp(0, calc(var({name}_g) + {}), 255), \
         clamp(0, calc(var({name}_b) + {}), 255))",
        delta.r as f32 * multiplier,
        delta.g as f32 * multiplier,
        delta.b as f32 * multiplier,
    )
}

/// Weighted average of the literal source channels and the theme channels
fn mix_expression(variable: ThemeVar, source: RgbColor, multiplier: f32) -> String {
    let name = variable.css_name();
    let inverse = 1.0 - multiplier;
    format!(
        "rgb(clamp(0, calc({} + {inverse} * var({name}_r)), 255), \
         clamp(0, calc({} + {inverse} * var({name}_g)), 255), \
         clamp(0, calc({} + {inverse} * var({name}_b)), 255))",
        source.r as f32 * multiplier,
        source.g as f32 * multiplier,
        source.b as f32 * multiplier,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{parse, serialize};
    use pretty_assertions::assert_eq;

    fn run(svg: &str, params: &[(&str, &str)], hash: &str) -> String {
        let resolver = Resolver::new();
        let params: RenderParams = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut root = parse(svg).unwrap();
        rewrite_tree(&mut root, &resolver, &params, hash);
        serialize(&root)
    }

    #[test]
    fn test_exact_fill_becomes_variable() {
        let out = run(r##"<svg><rect fill="#8B0000"/></svg>"##, &[], "");
        assert_eq!(out, r#"<svg><rect style="fill:var(--g-dark-red);"/></svg>"#);
    }

    #[test]
    fn test_named_fill_becomes_variable() {
        let out = run(r#"<svg><ellipse fill="white"/></svg>"#, &[], "");
        assert_eq!(out, r#"<svg><ellipse style="fill:var(--g-light100);"/></svg>"#);
    }

    #[test]
    fn test_implicit_black_fill() {
        let out = run("<svg><path d=\"M0 0\"/></svg>", &[], "");
        assert_eq!(
            out,
            r#"<svg><path d="M0 0" style="fill:var(--g-dark100);"/></svg>"#
        );
    }

    #[test]
    fn test_stroke_not_implicit_by_default() {
        let out = run(r#"<svg><rect fill="red"/></svg>"#, &[], "");
        assert!(!out.contains("stroke"));
    }

    #[test]
    fn test_implicit_token_enables_stroke_default() {
        let out = run(
            r#"<svg><rect fill="red"/></svg>"#,
            &[("rect-stroke", "implicit")],
            "",
        );
        assert!(out.contains("stroke:var(--g-dark100);"));
    }

    #[test]
    fn test_paint_inheritance_suppresses_default() {
        let out = run(r#"<svg><g fill="red"><rect/><rect fill="blue"/></g></svg>"#, &[], "");
        assert_eq!(
            out,
            concat!(
                r#"<svg><g style="fill:var(--g-red);">"#,
                r#"<rect style=""/>"#,
                r#"<rect style="fill:var(--g-blue);"/>"#,
                r#"</g></svg>"#
            )
        );
    }

    #[test]
    fn test_inheritance_accumulates_through_levels() {
        let out = run(
            r#"<svg><g fill="red"><g stroke="blue"><path d="M0 0"/></g></g></svg>"#,
            &[],
            "",
        );
        // the path sees both axes handled: no implicit fill, no stroke
        assert!(out.contains(r#"<path d="M0 0" style=""/>"#));
    }

    #[test]
    fn test_unknown_color_passes_through() {
        let out = run(r#"<svg><rect fill="notacolor"/></svg>"#, &[], "");
        assert!(out.contains(r#"style="fill:notacolor;""#));
    }

    #[test]
    fn test_rgb_percentages_canonicalized() {
        let out = run(r#"<svg><rect fill="rgb(100%,100%,100%)"/></svg>"#, &[], "");
        assert!(out.contains("fill:var(--g-light100);"));
    }

    #[test]
    fn test_skip_keeps_literal() {
        let out = run(
            r##"<svg><rect fill="#8B0000"/></svg>"##,
            &[("rect-fill", "skip")],
            "",
        );
        assert!(out.contains(r##"style="fill:#8B0000;""##));
    }

    #[test]
    fn test_original_colors_disables_fallback() {
        let out = run(
            r##"<svg><rect fill="#7F0000"/></svg>"##,
            &[("rect-fill", "original-colors")],
            "",
        );
        assert!(out.contains(r##"style="fill:#7F0000;""##));
    }

    #[test]
    fn test_keep_shade_class_and_variable() {
        let out = run(
            r#"<svg><ellipse fill="silver"/></svg>"#,
            &[("ellipse-fill", "keep-shade")],
            "",
        );
        assert!(out.contains(r#"class="keep-shade""#));
        assert!(out.contains("fill:var(--g-light60);"));
    }

    #[test]
    fn test_keep_all_adds_both_classes() {
        let out = run(
            r#"<svg><ellipse fill="silver"/></svg>"#,
            &[("ellipse-fill", "keep-all")],
            "",
        );
        assert!(out.contains(r#"class="keep-color keep-shade""#));
    }

    #[test]
    fn test_local_invert() {
        let out = run(
            r#"<svg><rect fill="lightblue"/></svg>"#,
            &[("rect-fill", "invert-all")],
            "",
        );
        assert!(out.contains("fill:var(--g-dark-blue);"));
    }

    #[test]
    fn test_global_invert_color() {
        let out = run(
            r#"<svg><rect fill="lightcoral"/></svg>"#,
            &[("invert-color", "1")],
            "",
        );
        assert!(out.contains("fill:var(--g-dark-red);"));
    }

    #[test]
    fn test_global_invert_only_touches_matching_kind() {
        let out = run(
            r#"<svg><rect fill="white" stroke="lightblue"/></svg>"#,
            &[("invert-color", "1")],
            "",
        );
        assert!(out.contains("fill:var(--g-light100);"));
        assert!(out.contains("stroke:var(--g-dark-blue);"));
    }

    #[test]
    fn test_local_and_global_invert_cancel() {
        let out = run(
            r#"<svg><rect fill="lightcoral"/></svg>"#,
            &[("invert-color", "1"), ("rect-fill", "invert-color")],
            "",
        );
        assert!(out.contains("fill:var(--g-light-red);"));
    }

    #[test]
    fn test_invert_fixed_point_for_neutral() {
        let out = run(
            r#"<svg><rect fill="red"/></svg>"#,
            &[("invert-color", "1")],
            "",
        );
        assert!(out.contains("fill:var(--g-red);"));
    }

    #[test]
    fn test_mix_delta_expression() {
        let out = run(
            r##"<svg><rect fill="#7F0000"/></svg>"##,
            &[("mix-multiplier", "0.5")],
            "",
        );
        // #7f0000 matches maroon (dark-red) at distance 1, delta r = -1
        assert!(out.contains("fill:rgb(clamp(0, calc(var(--g-dark-red_r) + -0.5), 255)"));
        assert!(out.contains("var(--g-dark-red_g) + 0"));
        assert!(!out.contains("fill:var("));
    }

    #[test]
    fn test_mix_mode_mix_expression() {
        let out = run(
            r##"<svg><rect fill="#7F0000"/></svg>"##,
            &[("mix-multiplier", "0.5"), ("mix-mode", "mix")],
            "",
        );
        // source channel 0x7f scaled by the multiplier
        assert!(out.contains("fill:rgb(clamp(0, calc(63.5 + 0.5 * var(--g-dark-red_r)), 255)"));
    }

    #[test]
    fn test_mix_ignored_for_exact_match() {
        let out = run(
            r##"<svg><rect fill="#8B0000"/></svg>"##,
            &[("mix-multiplier", "0.5")],
            "",
        );
        assert!(out.contains("fill:var(--g-dark-red);"));
    }

    #[test]
    fn test_width_applied_to_root() {
        let out = run(r#"<svg><rect fill="red"/></svg>"#, &[("width", "100%")], "");
        assert!(out.starts_with(r#"<svg style="width: 100%;">"#));
    }

    #[test]
    fn test_inline_skips_recoloring() {
        let svg = r##"<svg><defs><clipPath id="c"/></defs><rect fill="#8B0000"/></svg>"##;
        let out = run(svg, &[("inline", "1")], "f00d");
        assert_eq!(out, svg);
    }

    #[test]
    fn test_defs_namespaced_not_recolored() {
        let svg = concat!(
            r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink">"#,
            r#"<defs><linearGradient id="grad"><stop stop-color="red"/></linearGradient></defs>"#,
            r##"<circle fill="url(#grad)" xlink:href="#grad"/></svg>"##
        );
        let out = run(svg, &[], "f00d");
        assert!(out.contains(r#"id="grad-f00d""#));
        assert!(out.contains(r#"stop-color="red""#));
        assert!(out.contains(r##"xlink:href="#grad-f00d""##));
    }

    #[test]
    fn test_clip_path_reference_namespaced() {
        let out = run(
            r##"<svg><g clip-path="url(#c0)"><path d="M0 0" fill="none"/></g></svg>"##,
            &[],
            "beef",
        );
        assert!(out.contains(r#"clip-path="url(#c0-beef)""#));
    }

    #[test]
    fn test_existing_style_non_paint_kept() {
        let out = run(
            r#"<svg><rect style="opacity:0.5;fill:green" fill="red"/></svg>"#,
            &[],
            "",
        );
        assert!(out.contains(r#"style="opacity:0.5;fill:var(--g-red);""#));
    }

    #[test]
    fn test_non_member_tag_untouched() {
        let out = run(r#"<svg><foreignObject fill="red"><rect/></foreignObject></svg>"#, &[], "");
        // the foreignObject keeps its attribute, its rect child is still themed
        assert!(out.contains(r#"<foreignObject fill="red">"#));
        assert!(out.contains(r#"<rect style="fill:var(--g-dark100);"/>"#));
    }
}
