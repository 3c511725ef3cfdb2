//! Single-use annotation and the display decision procedure.

use sdata_vocab::{ExpectedDisplay, ROOT_TYPE};

use crate::dialect::Dialect;
use crate::renderer::{Renderer, resolve_type};
use crate::sanitize::sanitize_property;

/// Forced display mode for [`Annotation::display_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Attribute-only property marker.
    Inline,
    /// Content wrapped in a `<span>`.
    Span,
    /// Content wrapped in a `<div>`.
    Div,
    /// Machine value in a `<meta>` tag.
    Meta,
}

/// One annotation request against a [`Renderer`].
///
/// Built with the chained setters and consumed by one of the `display`
/// methods, so nothing carries over to the next annotation.
///
/// The property is kept only if it is valid for the renderer's type; the
/// fallback property only if it is valid for the fallback type.
#[derive(Debug)]
pub struct Annotation<'a, D: Dialect> {
    renderer: &'a Renderer<'a, D>,
    property: Option<String>,
    content: Option<String>,
    machine_content: Option<String>,
    fallback_type: Option<String>,
    fallback_property: Option<String>,
}

impl<'a, D: Dialect> Annotation<'a, D> {
    pub(crate) fn new(renderer: &'a Renderer<'a, D>) -> Self {
        Self {
            renderer,
            property: None,
            content: None,
            machine_content: None,
            fallback_type: None,
            fallback_property: None,
        }
    }

    /// Set the property, if it exists on the current type.
    #[must_use]
    pub fn property(mut self, property: &str) -> Self {
        if !self.renderer.is_enabled() {
            return self;
        }
        let property = sanitize_property(property);
        if self
            .renderer
            .vocabulary()
            .is_property_in_type(self.renderer.type_name(), &property)
        {
            self.property = Some(property);
        } else {
            tracing::debug!(
                type_name = self.renderer.type_name(),
                property = %property,
                "Property not available for type"
            );
        }
        self
    }

    /// Set a fallback type and property used when the primary property is
    /// missing or invalid.
    #[must_use]
    pub fn fallback(mut self, type_name: &str, property: &str) -> Self {
        if !self.renderer.is_enabled() {
            return self;
        }
        let vocabulary = self.renderer.vocabulary();
        let fallback_type = resolve_type(vocabulary, type_name);
        let property = sanitize_property(property);
        self.fallback_property = vocabulary
            .is_property_in_type(&fallback_type, &property)
            .then_some(property);
        self.fallback_type = Some(fallback_type);
        self
    }

    /// Set the human-readable content.
    #[must_use]
    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_owned());
        self.machine_content = None;
        self
    }

    /// Set the human-readable content and a machine-readable value.
    ///
    /// The machine value is preferred inside metadata tags; the human value
    /// is always the visible text.
    #[must_use]
    pub fn content_with_machine(mut self, content: &str, machine_content: &str) -> Self {
        self.content = Some(content.to_owned());
        self.machine_content = Some(machine_content.to_owned());
        self
    }

    /// Property accepted for the current type.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Human-readable content.
    #[must_use]
    pub fn content_value(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Machine-readable content.
    #[must_use]
    pub fn machine_content(&self) -> Option<&str> {
        self.machine_content.as_deref()
    }

    /// Fallback type, after validation.
    #[must_use]
    pub fn fallback_type(&self) -> Option<&str> {
        self.fallback_type.as_deref()
    }

    /// Fallback property accepted for the fallback type.
    #[must_use]
    pub fn fallback_property(&self) -> Option<&str> {
        self.fallback_property.as_deref()
    }

    /// Render with the display mode inferred from the vocabulary.
    #[must_use]
    pub fn display(self) -> String {
        self.render(None, false)
    }

    /// Render with a forced display mode.
    #[must_use]
    pub fn display_as(self, mode: DisplayMode) -> String {
        self.render(Some(mode), false)
    }

    /// Render the annotation.
    ///
    /// Decision order:
    /// 1. Disabled renderer: the content (empty if `suppress_when_disabled`).
    /// 2. Valid property: forced `mode`, or the vocabulary's expected display.
    /// 3. Valid fallback property: the same, scoped to the fallback type.
    /// 4. Fallback type alone: a scope opener for it.
    /// 5. Otherwise the content, or an empty string.
    #[must_use]
    pub fn render(self, mode: Option<DisplayMode>, suppress_when_disabled: bool) -> String {
        let base = match &self.content {
            Some(content) if !suppress_when_disabled => content.as_str(),
            _ => "",
        };

        if !self.renderer.is_enabled() {
            return base.to_owned();
        }

        if let Some(property) = self.property.as_deref() {
            return match mode {
                Some(mode) => self.render_forced(mode, base, property),
                None => self.render_auto(base, property),
            };
        }

        if let Some(fallback_property) = self.fallback_property.as_deref() {
            let fallback_type = self.fallback_type.as_deref().unwrap_or(ROOT_TYPE);
            return match mode {
                Some(mode) => self.render_fallback_forced(mode, base, fallback_type, fallback_property),
                None => self.render_fallback_auto(fallback_type, fallback_property),
            };
        }

        if let Some(fallback_type) = self.fallback_type.as_deref() {
            return D::html_scope(fallback_type);
        }

        base.to_owned()
    }

    fn machine_or<'s>(&'s self, content: &'s str) -> &'s str {
        self.machine_content.as_deref().unwrap_or(content)
    }

    fn render_forced(&self, mode: DisplayMode, base: &str, property: &str) -> String {
        match mode {
            DisplayMode::Inline => D::html_property(property),
            DisplayMode::Span => D::html_span(base, Some(property), None, false),
            DisplayMode::Div => D::html_div(base, Some(property), None, false),
            DisplayMode::Meta => D::html_meta(self.machine_or(base), Some(property), None),
        }
    }

    fn render_auto(&self, base: &str, property: &str) -> String {
        let type_name = self.renderer.type_name();
        match self
            .renderer
            .vocabulary()
            .expected_display(type_name, property)
        {
            ExpectedDisplay::Nested => self.render_nested(base, type_name, property),
            ExpectedDisplay::Meta => match self.content.as_deref() {
                Some(content) => {
                    let mut html = D::html_meta(self.machine_or(content), Some(property), None);
                    html.push_str(content);
                    html
                }
                None => D::html_property(property),
            },
            ExpectedDisplay::Normal => match self.content.as_deref() {
                Some(content) => D::html_span(content, Some(property), None, false),
                None => D::html_property(property),
            },
        }
    }

    /// Open a nested scope for a property whose value is another type.
    ///
    /// An explicit fallback type wins over the vocabulary's first guess when
    /// it is one of the property's expected types. Without content the scope
    /// is left open for the surrounding markup to close.
    fn render_nested(&self, base: &str, type_name: &str, property: &str) -> String {
        let expected = self
            .renderer
            .vocabulary()
            .expected_types(type_name, property);

        let (nested_type, nested_property) = match self.fallback_type.as_deref() {
            Some(fallback) if expected.iter().any(|t| t == fallback) => {
                (fallback, self.fallback_property.as_deref())
            }
            _ => (expected.first().map_or(ROOT_TYPE, String::as_str), None),
        };

        match self.content.as_deref() {
            Some(content) => {
                let inner = match nested_property {
                    Some(inner) => D::html_span(content, Some(inner), None, false),
                    None => base.to_owned(),
                };
                D::html_span(&inner, Some(property), Some(nested_type), true)
            }
            None => {
                let mut html = D::html_property(property);
                html.push(' ');
                html.push_str(&D::html_scope(nested_type));
                if let Some(inner) = nested_property {
                    html.push(' ');
                    html.push_str(&D::html_property(inner));
                }
                html
            }
        }
    }

    fn render_fallback_forced(
        &self,
        mode: DisplayMode,
        base: &str,
        fallback_type: &str,
        fallback_property: &str,
    ) -> String {
        match mode {
            DisplayMode::Inline => scoped_property::<D>(fallback_type, fallback_property),
            DisplayMode::Span => {
                D::html_span(base, Some(fallback_property), Some(fallback_type), false)
            }
            DisplayMode::Div => {
                D::html_div(base, Some(fallback_property), Some(fallback_type), false)
            }
            DisplayMode::Meta => D::html_meta(
                self.machine_or(base),
                Some(fallback_property),
                Some(fallback_type),
            ),
        }
    }

    /// Automatic display for a fallback. Never nests further: the fallback
    /// is already one level below the current scope.
    fn render_fallback_auto(&self, fallback_type: &str, fallback_property: &str) -> String {
        let Some(content) = self.content.as_deref() else {
            return scoped_property::<D>(fallback_type, fallback_property);
        };

        match self
            .renderer
            .vocabulary()
            .expected_display(fallback_type, fallback_property)
        {
            ExpectedDisplay::Meta => D::html_meta(
                self.machine_or(content),
                Some(fallback_property),
                Some(fallback_type),
            ),
            ExpectedDisplay::Normal | ExpectedDisplay::Nested => {
                let inner = D::html_span(content, Some(fallback_property), None, false);
                D::html_span(&inner, None, Some(fallback_type), false)
            }
        }
    }
}

/// Scope opener followed by a property marker.
fn scoped_property<D: Dialect>(type_name: &str, property: &str) -> String {
    format!("{} {}", D::html_scope(type_name), D::html_property(property))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sdata_vocab::Vocabulary;

    use super::*;
    use crate::{Microdata, Rdfa};

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_json(
            r#"{
                "Thing": {
                    "extends": null,
                    "properties": {
                        "name": { "expectedTypes": ["Text"] },
                        "url": { "expectedTypes": ["URL"] }
                    }
                },
                "CreativeWork": {
                    "extends": "Thing",
                    "properties": {
                        "datePublished": { "expectedTypes": ["Date"] },
                        "interactionCount": { "expectedTypes": ["Text"] },
                        "author": { "expectedTypes": ["Person", "Organization"] }
                    }
                },
                "Movie": {
                    "extends": "CreativeWork",
                    "properties": { "director": { "expectedTypes": ["Person"] } }
                },
                "Event": {
                    "extends": "Thing",
                    "properties": { "startDate": { "expectedTypes": ["Date"] } }
                },
                "Person": { "extends": "Thing", "properties": {} },
                "Organization": {
                    "extends": "Thing",
                    "properties": { "legalName": { "expectedTypes": ["Text"] } }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_normal_property_with_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(
            renderer.property("name").content("Alice").display(),
            "<span itemprop='name'>Alice</span>"
        );
    }

    #[test]
    fn test_normal_property_without_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(renderer.property("name").display(), "itemprop='name'");
    }

    #[test]
    fn test_meta_property_with_machine_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "CreativeWork");
        assert_eq!(
            renderer
                .property("datePublished")
                .content_with_machine("Jan 2020", "2020-01-01")
                .display(),
            "<meta itemprop='datePublished' content='2020-01-01'/>Jan 2020"
        );
    }

    #[test]
    fn test_meta_property_without_machine_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Rdfa>::new(&vocabulary, "CreativeWork");
        assert_eq!(
            renderer.property("datePublished").content("2020").display(),
            "<meta property='datePublished' content='2020'/>2020"
        );
    }

    #[test]
    fn test_interaction_count_is_meta() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Movie");
        assert_eq!(
            renderer
                .property("interactionCount")
                .content_with_machine("5 views", "UserViews:5")
                .display(),
            "<meta itemprop='interactionCount' content='UserViews:5'/>5 views"
        );
    }

    #[test]
    fn test_nested_without_content_opens_scope() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Movie");
        assert_eq!(
            renderer.property("director").display(),
            "itemprop='director' itemscope itemtype='https://schema.org/Person'"
        );
    }

    #[test]
    fn test_nested_with_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Movie");
        assert_eq!(
            renderer.property("director").content("James").display(),
            "<span itemprop='director' itemscope itemtype='https://schema.org/Person'>James</span>"
        );
    }

    #[test]
    fn test_nested_prefers_explicit_fallback_type() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Movie");
        assert_eq!(
            renderer
                .property("author")
                .fallback("Organization", "legalName")
                .content("ACME")
                .display(),
            "<span itemprop='author' itemscope itemtype='https://schema.org/Organization'>\
             <span itemprop='legalName'>ACME</span></span>"
        );
    }

    #[test]
    fn test_nested_fallback_without_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Rdfa>::new(&vocabulary, "Movie");
        assert_eq!(
            renderer
                .property("author")
                .fallback("Organization", "legalName")
                .display(),
            "property='author' vocab='https://schema.org' typeof='Organization' property='legalName'"
        );
    }

    #[test]
    fn test_nested_ignores_unrelated_fallback_type() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Movie");
        assert_eq!(
            renderer
                .property("author")
                .fallback("Event", "startDate")
                .display(),
            "itemprop='author' itemscope itemtype='https://schema.org/Person'"
        );
    }

    #[test]
    fn test_forced_modes() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(
            renderer.property("name").content("A").display_as(DisplayMode::Span),
            "<span itemprop='name'>A</span>"
        );
        assert_eq!(
            renderer.property("name").content("A").display_as(DisplayMode::Div),
            "<div itemprop='name'>A</div>"
        );
        assert_eq!(
            renderer
                .property("name")
                .content_with_machine("A", "a")
                .display_as(DisplayMode::Meta),
            "<meta itemprop='name' content='a'/>"
        );
        assert_eq!(
            renderer.property("name").content("A").display_as(DisplayMode::Inline),
            "itemprop='name'"
        );
    }

    #[test]
    fn test_invalid_property_stays_unset() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        let annotation = renderer.property("director");
        assert_eq!(annotation.property_name(), None);
        assert_eq!(annotation.content("x").display(), "x");
    }

    #[test]
    fn test_property_is_sanitized() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(renderer.property(" Name ").property_name(), Some("name"));
    }

    #[test]
    fn test_fallback_property_invalid_is_cleared() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        let annotation = renderer.fallback("event", "director");
        assert_eq!(annotation.fallback_type(), Some("Event"));
        assert_eq!(annotation.fallback_property(), None);
    }

    #[test]
    fn test_fallback_unknown_type_is_root() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        let annotation = renderer.fallback("Spaceship", "name");
        assert_eq!(annotation.fallback_type(), Some(ROOT_TYPE));
        assert_eq!(annotation.fallback_property(), Some("name"));
    }

    #[test]
    fn test_fallback_normal_with_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(
            renderer
                .property("director")
                .fallback("Organization", "legalName")
                .content("ACME")
                .display(),
            "<span itemscope itemtype='https://schema.org/Organization'>\
             <span itemprop='legalName'>ACME</span></span>"
        );
    }

    #[test]
    fn test_fallback_meta_with_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Rdfa>::new(&vocabulary, "Person");
        assert_eq!(
            renderer
                .fallback("Event", "startDate")
                .content_with_machine("May 1st", "2021-05-01")
                .display(),
            "<meta vocab='https://schema.org' typeof='Event' property='startDate' content='2021-05-01'/>"
        );
    }

    #[test]
    fn test_fallback_without_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(
            renderer.fallback("Event", "startDate").display(),
            "itemscope itemtype='https://schema.org/Event' itemprop='startDate'"
        );
    }

    #[test]
    fn test_fallback_forced_modes() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(
            renderer
                .fallback("Event", "startDate")
                .content("x")
                .display_as(DisplayMode::Span),
            "<span itemscope itemtype='https://schema.org/Event' itemprop='startDate'>x</span>"
        );
        assert_eq!(
            renderer
                .fallback("Event", "startDate")
                .display_as(DisplayMode::Inline),
            "itemscope itemtype='https://schema.org/Event' itemprop='startDate'"
        );
    }

    #[test]
    fn test_fallback_type_only_opens_scope() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(
            renderer.fallback("Event", "").display(),
            "itemscope itemtype='https://schema.org/Event'"
        );
    }

    #[test]
    fn test_nothing_set_returns_content() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        assert_eq!(renderer.content("plain").display(), "plain");
        assert_eq!(renderer.annotate().display(), "");
    }

    #[test]
    fn test_disabled_passes_content_through() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::disabled(&vocabulary);
        assert_eq!(renderer.property("name").content("Alice").display(), "Alice");
        assert_eq!(
            renderer.property("name").content("Alice").render(None, true),
            ""
        );
    }

    #[test]
    fn test_annotations_do_not_share_state() {
        let vocabulary = vocabulary();
        let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
        let first = renderer.property("name").content("Alice").display();
        let second = renderer.annotate().display();
        assert_eq!(first, "<span itemprop='name'>Alice</span>");
        assert_eq!(second, "");
    }
}
