//! Vocabulary loading and inheritance-aware lookups.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::error::VocabularyError;
use crate::schema::{ExpectedDisplay, PropertySchema, TypeSchema};

/// Root type every unknown type falls back to.
pub const ROOT_TYPE: &str = "Thing";

/// Schema.org subset shipped with the crate.
const BUNDLED_DATA: &str = include_str!("../data/types.json");

/// Parsed on first access; racing callers block until the single parse ends.
static BUNDLED: LazyLock<Result<Arc<Vocabulary>, String>> = LazyLock::new(|| {
    let vocabulary = Vocabulary::from_json(BUNDLED_DATA).map_err(|e| e.to_string())?;
    tracing::debug!(type_count = vocabulary.types.len(), "Loaded bundled vocabulary");
    Ok(Arc::new(vocabulary))
});

/// Immutable type graph.
///
/// Built once and shared by reference (or [`Arc`]) with every renderer.
/// Lookups of unknown types or properties return `false` or an empty list.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    types: BTreeMap<String, TypeSchema>,
}

impl Vocabulary {
    /// Parse a vocabulary from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::Parse`] if the document is malformed.
    pub fn from_json(data: &str) -> Result<Self, VocabularyError> {
        let types: BTreeMap<String, TypeSchema> = serde_json::from_str(data)?;
        Ok(Self::from_types(types.into_iter().map(|(name, mut schema)| {
            schema.name = name;
            schema
        })))
    }

    /// Load a vocabulary from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::Io`] if the file cannot be read and
    /// [`VocabularyError::Parse`] if it is malformed.
    pub fn from_path(path: &Path) -> Result<Self, VocabularyError> {
        let data = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let vocabulary = Self::from_json(&data)?;
        tracing::debug!(
            path = %path.display(),
            type_count = vocabulary.types.len(),
            "Loaded vocabulary"
        );
        Ok(vocabulary)
    }

    /// Build a vocabulary from already constructed type records.
    pub fn from_types(types: impl IntoIterator<Item = TypeSchema>) -> Self {
        let types = types
            .into_iter()
            .map(|schema| (schema.name.clone(), schema))
            .collect();
        Self { types }
    }

    /// Process-wide bundled vocabulary.
    ///
    /// Parsed on first call; later calls share the same instance.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::Bundled`] if the bundled data is malformed.
    pub fn bundled() -> Result<Arc<Self>, VocabularyError> {
        match &*BUNDLED {
            Ok(vocabulary) => Ok(Arc::clone(vocabulary)),
            Err(message) => Err(VocabularyError::Bundled(message.clone())),
        }
    }

    /// All types keyed by name.
    #[must_use]
    pub fn types(&self) -> &BTreeMap<String, TypeSchema> {
        &self.types
    }

    /// Names of all available types, sorted.
    pub fn available_types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Look up a type record.
    #[must_use]
    pub fn type_schema(&self, name: &str) -> Option<&TypeSchema> {
        self.types.get(name)
    }

    /// Check whether a type is declared.
    #[must_use]
    pub fn is_type_available(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Walk the inheritance chain of `name`, starting with the type itself.
    ///
    /// Yields nothing for an unknown type. The walk stops at a parent that
    /// is not declared and never visits more records than the vocabulary
    /// holds, so a cyclic `extends` cannot loop forever.
    #[must_use]
    pub fn ancestors<'a>(&'a self, name: &str) -> Ancestors<'a> {
        Ancestors {
            vocabulary: self,
            next: self.types.get(name),
            remaining: self.types.len(),
        }
    }

    /// Find the declaration of `property` on `type_name` or its ancestors.
    #[must_use]
    pub fn property_schema(&self, type_name: &str, property: &str) -> Option<&PropertySchema> {
        self.ancestors(type_name)
            .find_map(|schema| schema.properties.get(property))
    }

    /// Check whether `property` is declared on `type_name` or an ancestor.
    #[must_use]
    pub fn is_property_in_type(&self, type_name: &str, property: &str) -> bool {
        self.property_schema(type_name, property).is_some()
    }

    /// Expected types of `property`, resolved through inheritance.
    ///
    /// Empty if the property is not found anywhere in the chain.
    #[must_use]
    pub fn expected_types(&self, type_name: &str, property: &str) -> &[String] {
        self.property_schema(type_name, property)
            .map(|schema| schema.expected_types.as_slice())
            .unwrap_or_default()
    }

    /// Display mode derived from the primary expected type of `property`.
    #[must_use]
    pub fn expected_display(&self, type_name: &str, property: &str) -> ExpectedDisplay {
        let primary = self
            .property_schema(type_name, property)
            .and_then(PropertySchema::primary_type);
        ExpectedDisplay::classify(primary, property)
    }
}

/// Iterator over a type and its ancestors.
#[derive(Debug)]
pub struct Ancestors<'a> {
    vocabulary: &'a Vocabulary,
    next: Option<&'a TypeSchema>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TypeSchema;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next.take()?;
        let vocabulary = self.vocabulary;
        self.next = current.extends.as_deref().and_then(|parent| {
            let schema = vocabulary.types.get(parent);
            if schema.is_none() {
                tracing::debug!(type_name = %current.name, parent, "Unknown parent type");
            }
            schema
        });
        Some(current)
    }
}
