//! Type and property schema records.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Property that is always rendered as machine-readable metadata,
/// regardless of its expected type.
const META_PROPERTY: &str = "interactionCount";

/// A type declared by the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TypeSchema {
    /// Type name, filled in from the vocabulary key after loading.
    #[serde(skip)]
    pub name: String,
    /// Parent type, if any.
    #[serde(default, deserialize_with = "non_empty")]
    pub extends: Option<String>,
    /// Properties declared directly on this type.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
}

/// A property declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    /// Expected value types; the first entry is the primary one.
    #[serde(default)]
    pub expected_types: Vec<String>,
}

impl PropertySchema {
    /// The primary expected type.
    #[must_use]
    pub fn primary_type(&self) -> Option<&str> {
        self.expected_types.first().map(String::as_str)
    }
}

/// How a property value should be rendered when no display mode is forced.
///
/// - `Normal`: `itemprop="name"`
/// - `Nested`: `itemprop="director" itemscope itemtype="https://schema.org/Person"`
/// - `Meta`: `<meta itemprop="datePublished" content="1991-05-01"/>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedDisplay {
    /// Plain text value.
    Normal,
    /// Reference to another structured type.
    Nested,
    /// Machine-readable value carried by a metadata tag.
    Meta,
}

impl ExpectedDisplay {
    /// Classify a property by its primary expected type.
    ///
    /// A property without any expected type is treated as plain text.
    #[must_use]
    pub fn classify(primary_type: Option<&str>, property: &str) -> Self {
        if property == META_PROPERTY {
            return Self::Meta;
        }
        match primary_type {
            Some("Date" | "DateTime") => Self::Meta,
            Some("Text" | "URL" | "Boolean" | "Number") | None => Self::Normal,
            Some(_) => Self::Nested,
        }
    }
}

/// Treat `""` the same as a missing parent.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
