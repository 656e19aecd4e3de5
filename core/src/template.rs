//! `{{placeholder}}` substitution.
//!
//! One routine backs both endpoint URL expansion and final page rendering.
//! Placeholders are `{{name}}` with optional inner whitespace, where `name`
//! is made of ASCII alphanumerics, `_`, `-` and `.`. A placeholder with no
//! replacement is left as literal text. Replacement values are inserted
//! verbatim and never rescanned.

use mosaic_types::{Params, RenderContext};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Replace every `{{name}}` for which `lookup` returns a value.
pub fn substitute<'a, F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let inner = &rest[start + OPEN.len()..];
        let Some(end) = inner.find(CLOSE) else {
            break;
        };

        let name = inner[..end].trim();
        out.push_str(&rest[..start]);

        if !is_placeholder_name(name) {
            // Not a placeholder; keep the braces and rescan from just after them
            // so `{{a {{b}}` still substitutes `b`.
            out.push_str(OPEN);
            rest = inner;
            continue;
        }

        let whole = &rest[start..start + OPEN.len() + end + CLOSE.len()];
        match lookup(name) {
            Some(value) => out.push_str(value),
            None => out.push_str(whole),
        }
        rest = &inner[end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// Expand an endpoint URL with per-invocation parameters.
#[must_use]
pub fn expand_url(url: &str, params: Option<&Params>) -> String {
    match params {
        Some(params) => substitute(url, |key| params.get(key).map(String::as_str)),
        None => substitute(url, |_| None),
    }
}

/// Render a page template from an envelope's combine output.
///
/// A [`RenderContext::Body`] fills only `{{body}}`; a field mapping fills each
/// of its keys.
#[must_use]
pub fn render(template: &str, context: &RenderContext) -> String {
    substitute(template, |key| context.get(key))
}

/// Placeholder names referenced by a template, in order of appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let inner = &rest[start + OPEN.len()..];
        let Some(end) = inner.find(CLOSE) else {
            break;
        };
        let name = inner[..end].trim();
        if is_placeholder_name(name) {
            names.push(name);
            rest = &inner[end + CLOSE.len()..];
        } else {
            rest = inner;
        }
    }

    names
}
