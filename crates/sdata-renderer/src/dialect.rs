//! Dialect trait for annotation syntax.

use std::fmt::Write;

/// Markup primitives of a structured data dialect.
///
/// Implementors only define how a property marker and a scope opener look;
/// the container primitives are built from those two by default. All
/// decision logic is shared in [`Annotation`](crate::Annotation).
pub trait Dialect {
    /// Name used to select the dialect in configuration.
    const NAME: &'static str;

    /// Attribute marking a property, e.g. `itemprop='name'`.
    fn html_property(property: &str) -> String;

    /// Attributes opening a scope of `type_name`.
    fn html_scope(type_name: &str) -> String;

    /// Wrap `content` in a `<span>` carrying the given property and scope.
    ///
    /// With `invert` set the property attribute precedes the scope, which is
    /// the order used when the span opens a nested scope for its property.
    fn html_span(
        content: &str,
        property: Option<&str>,
        scope: Option<&str>,
        invert: bool,
    ) -> String {
        html_tag::<Self>("span", content, property, scope, invert)
    }

    /// Wrap `content` in a `<div>` carrying the given property and scope.
    fn html_div(content: &str, property: Option<&str>, scope: Option<&str>, invert: bool) -> String {
        html_tag::<Self>("div", content, property, scope, invert)
    }

    /// Self-closing `<meta>` tag carrying `content` as a machine value.
    fn html_meta(content: &str, property: Option<&str>, scope: Option<&str>) -> String {
        html_tag::<Self>("meta", content, property, scope, false)
    }
}

/// Build a tag whose attributes are the dialect's scope and property markers.
fn html_tag<D: Dialect + ?Sized>(
    tag: &str,
    content: &str,
    property: Option<&str>,
    scope: Option<&str>,
    invert: bool,
) -> String {
    let property = property.filter(|p| !p.is_empty()).map(D::html_property);
    let scope = scope.filter(|s| !s.is_empty()).map(D::html_scope);

    let (first, second) = if invert {
        (property, scope)
    } else {
        (scope, property)
    };

    let mut out = String::with_capacity(content.len() + 64);
    out.push('<');
    out.push_str(tag);
    for attrs in [first, second].into_iter().flatten() {
        out.push(' ');
        out.push_str(&attrs);
    }

    if tag == "meta" {
        write!(out, " content='{}'/>", escape_attr(content)).unwrap();
    } else {
        write!(out, ">{content}</{tag}>").unwrap();
    }
    out
}

/// Escape a value for a single-quoted attribute.
fn escape_attr(value: &str) -> String {
    value.replace('\'', "&#39;")
}
