//! Applies a parsed directive to a renderer.

use super::{Directive, Fallback};
use crate::annotation::DisplayMode;
use crate::dialect::Dialect;
use crate::renderer::Renderer;

/// Produce the markup for `directive`, updating the renderer's current type.
///
/// 1. A type-only directive enters that type and returns its scope opener.
/// 2. Otherwise the specialized fallback for the current type is used if its
///    property is valid there, else the first valid global fallback.
/// 3. The chosen property is emitted as an attribute marker; if its expected
///    type is one the vocabulary allows, that type is entered and its scope
///    opener appended.
///
/// Returns an empty string when no fallback applies.
pub fn plan<D: Dialect>(directive: &Directive, renderer: &mut Renderer<'_, D>) -> String {
    if !renderer.is_enabled() {
        return String::new();
    }

    if let Some(set_type) = directive.set_type.as_deref() {
        renderer.set_type(set_type);
        if !directive.has_fallbacks() {
            return renderer.display_scope();
        }
    }

    let vocabulary = renderer.vocabulary();
    let current_type = renderer.type_name().to_owned();
    let is_valid = |fallback: &&Fallback| vocabulary.is_property_in_type(&current_type, &fallback.property);

    let chosen = directive
        .specialized_for(&current_type)
        .filter(is_valid)
        .or_else(|| directive.global_fallbacks().iter().find(is_valid));

    let Some(fallback) = chosen else {
        tracing::debug!(type_name = %current_type, "No directive property applies");
        return String::new();
    };

    let mut html = renderer
        .property(&fallback.property)
        .display_as(DisplayMode::Inline);

    if let Some(expected) = fallback.expected_type.as_deref()
        && vocabulary
            .expected_types(&current_type, &fallback.property)
            .iter()
            .any(|t| t == expected)
    {
        renderer.set_type(expected);
        html.push(' ');
        html.push_str(&renderer.display_scope());
    }

    html
}
