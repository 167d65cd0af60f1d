//! Per-instance identifier namespacing
//!
//! The same diagram embedded twice in one document renders to two SVGs whose
//! `<defs>` carry identical `id` values; whichever the host inserts second
//! silently hijacks the first one's gradient, marker and clip-path lookups.
//! Suffixing every definition id and fragment reference with the job's
//! instance hash keeps co-embedded copies independent.
//!
//! Suffixing is idempotent per hash: an identifier that already ends in
//! `-{hash}` is left alone, so a job re-run over already-suffixed output
//! cannot stack suffixes.

use crate::tree::SvgElement;

/// Append `-{hash}` to an identifier unless it already carries it
pub fn suffix_id(id: &str, hash: &str) -> String {
    if hash.is_empty() {
        return id.to_string();
    }
    let suffix = format!("-{hash}");
    if id.ends_with(&suffix) {
        id.to_string()
    } else {
        format!("{id}{suffix}")
    }
}

/// Namespace a `<defs>` subtree: suffix every descendant `id` and rewrite
/// fragment references between definitions (gradient chains via
/// `xlink:href`).
pub fn namespace_defs(defs: &mut SvgElement, hash: &str) {
    if hash.is_empty() {
        return;
    }
    for child in defs.child_elements_mut() {
        namespace_defs_element(child, hash);
    }
}

fn namespace_defs_element(el: &mut SvgElement, hash: &str) {
    if let Some(id) = el.attr("id") {
        let suffixed = suffix_id(id, hash);
        el.set_attr("id", suffixed);
    }
    rewrite_references(el, hash);
    for child in el.child_elements_mut() {
        namespace_defs_element(child, hash);
    }
}

/// Rewrite one element's outgoing fragment references (`xlink:href="#name"`,
/// `clip-path="url(#name)"`) to the namespaced form
pub fn rewrite_references(el: &mut SvgElement, hash: &str) {
    if hash.is_empty() {
        return;
    }

    if let Some(target) = el.attr("xlink:href").and_then(|v| v.strip_prefix('#')) {
        let rewritten = format!("#{}", suffix_id(target, hash));
        el.set_attr("xlink:href", rewritten);
    }

    if let Some(target) = el
        .attr("clip-path")
        .and_then(|v| v.strip_prefix("url(#"))
        .and_then(|v| v.strip_suffix(')'))
    {
        let rewritten = format!("url(#{})", suffix_id(target, hash));
        el.set_attr("clip-path", rewritten);
    }
}
