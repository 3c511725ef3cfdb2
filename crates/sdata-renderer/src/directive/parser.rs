//! Directive attribute parsing.
//!
//! Parses `Type Type.property.Expected property.Expected ...` strings.

use std::collections::HashMap;

/// One parsed token: `Type.property.Expected`, `Type`, `property`, ...
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveParam {
    /// Leading type segment.
    pub type_name: Option<String>,
    /// Property segment.
    pub property: Option<String>,
    /// Expected type following the property.
    pub expected_type: Option<String>,
}

impl DirectiveParam {
    /// Parse a single token.
    ///
    /// Segments past the third are ignored, as is any segment whose case
    /// does not fit its position.
    ///
    /// ```
    /// use sdata_renderer::directive::DirectiveParam;
    ///
    /// let param = DirectiveParam::parse("Movie.director.Person");
    /// assert_eq!(param.type_name.as_deref(), Some("Movie"));
    /// assert_eq!(param.property.as_deref(), Some("director"));
    /// assert_eq!(param.expected_type.as_deref(), Some("Person"));
    /// ```
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let mut segments = token.trim().split('.');
        let mut param = Self::default();

        let Some(first) = segments.next().filter(|s| !s.is_empty()) else {
            return param;
        };

        if is_type_segment(first) {
            param.type_name = Some(first.to_owned());
            if let Some(property) = segments.next().filter(|s| is_property_segment(s)) {
                param.property = Some(property.to_owned());
                param.expected_type = segments
                    .next()
                    .filter(|s| is_type_segment(s))
                    .map(str::to_owned);
            }
        } else {
            param.property = Some(first.to_owned());
            param.expected_type = segments
                .next()
                .filter(|s| is_type_segment(s))
                .map(str::to_owned);
        }

        param
    }
}

/// A property to try, optionally followed by a type to enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    /// Property name.
    pub property: String,
    /// Type to open a scope for after the property.
    pub expected_type: Option<String>,
}

/// Parsed directive attribute.
///
/// # Example
///
/// ```
/// use sdata_renderer::directive::Directive;
///
/// let directive = Directive::parse("Event Place.event.Event location.Place name");
/// assert_eq!(directive.set_type.as_deref(), Some("Event"));
/// assert_eq!(directive.specialized_for("Place").unwrap().property, "event");
/// assert_eq!(directive.global_fallbacks().len(), 2);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Type to enter, from the first type-only token.
    pub set_type: Option<String>,
    specialized: HashMap<String, Fallback>,
    global: Vec<Fallback>,
}

impl Directive {
    /// Parse a directive attribute value.
    ///
    /// - The first type-only token becomes [`set_type`](Self::set_type).
    /// - `Type.property[.Expected]` tokens become specialized fallbacks; only
    ///   the first one per type is kept.
    /// - `property[.Expected]` tokens become global fallbacks in insertion
    ///   order; a repeated property updates its expected type in place.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut directive = Self::default();

        for token in value.split_whitespace() {
            let param = DirectiveParam::parse(token);
            match (param.type_name, param.property) {
                (Some(type_name), None) => {
                    if directive.set_type.is_none() {
                        directive.set_type = Some(type_name);
                    }
                }
                (None, Some(property)) => {
                    directive.push_global(property, param.expected_type);
                }
                (Some(type_name), Some(property)) => {
                    directive
                        .specialized
                        .entry(type_name)
                        .or_insert(Fallback {
                            property,
                            expected_type: param.expected_type,
                        });
                }
                (None, None) => {}
            }
        }

        directive
    }

    fn push_global(&mut self, property: String, expected_type: Option<String>) {
        if let Some(existing) = self.global.iter_mut().find(|f| f.property == property) {
            existing.expected_type = expected_type;
        } else {
            self.global.push(Fallback {
                property,
                expected_type,
            });
        }
    }

    /// Specialized fallback registered for `type_name`.
    #[must_use]
    pub fn specialized_for(&self, type_name: &str) -> Option<&Fallback> {
        self.specialized.get(type_name)
    }

    /// Global fallbacks in the order they were first seen.
    #[must_use]
    pub fn global_fallbacks(&self) -> &[Fallback] {
        &self.global
    }

    /// Whether any fallback, specialized or global, was given.
    #[must_use]
    pub fn has_fallbacks(&self) -> bool {
        !self.specialized.is_empty() || !self.global.is_empty()
    }
}

fn is_type_segment(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_uppercase())
}

fn is_property_segment(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_lowercase())
}
