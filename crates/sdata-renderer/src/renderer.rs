//! Renderer holding the current scope type.

use std::marker::PhantomData;

use sdata_vocab::{ROOT_TYPE, Vocabulary};

use crate::annotation::Annotation;
use crate::dialect::Dialect;
use crate::sanitize::sanitize_type;

/// Renderer for one dialect over a shared vocabulary.
///
/// Holds only the current type and whether output is enabled. Properties,
/// content and fallbacks are collected on an [`Annotation`] created from
/// the renderer and consumed by its `display` call.
///
/// The current type is always a type known to the vocabulary or
/// [`ROOT_TYPE`].
#[derive(Debug)]
pub struct Renderer<'v, D: Dialect> {
    vocabulary: &'v Vocabulary,
    type_name: String,
    enabled: bool,
    _dialect: PhantomData<D>,
}

impl<'v, D: Dialect> Renderer<'v, D> {
    /// Create an enabled renderer scoped to `type_name`.
    ///
    /// An empty or unknown type falls back to [`ROOT_TYPE`].
    #[must_use]
    pub fn new(vocabulary: &'v Vocabulary, type_name: &str) -> Self {
        Self {
            vocabulary,
            type_name: resolve_type(vocabulary, type_name),
            enabled: true,
            _dialect: PhantomData,
        }
    }

    /// Create a pass-through renderer that only emits raw content.
    #[must_use]
    pub fn disabled(vocabulary: &'v Vocabulary) -> Self {
        Self {
            enabled: false,
            ..Self::new(vocabulary, ROOT_TYPE)
        }
    }

    /// Enable or disable output.
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Whether output is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Change the current type.
    ///
    /// The name is sanitized; unknown types fall back to [`ROOT_TYPE`].
    /// Ignored while output is disabled.
    pub fn set_type(&mut self, type_name: &str) -> &mut Self {
        if self.enabled {
            self.type_name = resolve_type(self.vocabulary, type_name);
        }
        self
    }

    /// Current type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Vocabulary this renderer validates against.
    #[must_use]
    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocabulary
    }

    /// Scope opener for the current type, or an empty string when disabled.
    #[must_use]
    pub fn display_scope(&self) -> String {
        if !self.enabled {
            return String::new();
        }
        D::html_scope(&self.type_name)
    }

    /// Start an empty annotation.
    #[must_use]
    pub fn annotate(&self) -> Annotation<'_, D> {
        Annotation::new(self)
    }

    /// Start an annotation for `property`.
    #[must_use]
    pub fn property(&self, property: &str) -> Annotation<'_, D> {
        self.annotate().property(property)
    }

    /// Start an annotation with a fallback type and property.
    #[must_use]
    pub fn fallback(&self, type_name: &str, property: &str) -> Annotation<'_, D> {
        self.annotate().fallback(type_name, property)
    }

    /// Start an annotation carrying only human-readable content.
    #[must_use]
    pub fn content(&self, content: &str) -> Annotation<'_, D> {
        self.annotate().content(content)
    }
}

/// Sanitize a type name and validate it against the vocabulary.
pub(crate) fn resolve_type(vocabulary: &Vocabulary, type_name: &str) -> String {
    let sanitized = sanitize_type(type_name);
    if sanitized.is_empty() {
        return ROOT_TYPE.to_owned();
    }
    if vocabulary.is_type_available(&sanitized) {
        sanitized
    } else {
        tracing::debug!(type_name = %sanitized, "Unknown type, using {ROOT_TYPE}");
        ROOT_TYPE.to_owned()
    }
}
