//! Document rewriting engine.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use sdata_renderer::directive::{Directive, plan};
use sdata_renderer::{Dialect, Microdata, Rdfa, Renderer};
use sdata_vocab::{ROOT_TYPE, Vocabulary};

use crate::error::EngineError;
use crate::source::SourceRewriter;

/// Attribute suffix used when none is configured: `data-sd`.
pub const DEFAULT_SUFFIX: &str = "sd";

/// Output dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Semantic {
    /// Microdata (`itemprop`, `itemscope`, `itemtype`).
    #[default]
    Microdata,
    /// RDFa Lite 1.1 (`property`, `vocab`, `typeof`).
    Rdfa,
}

impl Semantic {
    /// Configuration name of the dialect.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Microdata => Microdata::NAME,
            Self::Rdfa => Rdfa::NAME,
        }
    }
}

impl FromStr for Semantic {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        if name == Microdata::NAME {
            Ok(Self::Microdata)
        } else if name == Rdfa::NAME {
            Ok(Self::Rdfa)
        } else {
            Err(EngineError::UnknownSemantic(name))
        }
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a directive attribute is located in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Substitution {
    /// Pair each element, in document order, with the next occurrence of
    /// its attribute after the previous substitution.
    #[default]
    Anchored,
    /// Replace the first textual occurrence anywhere in the document.
    FirstMatch,
}

/// Rewrites `data-<suffix>` directives into structured data markup.
///
/// Each [`parse`](Self::parse) call starts from a fresh renderer scoped to
/// [`ROOT_TYPE`]; within one document the current type flows from directive
/// to directive in document order.
#[derive(Debug, Clone)]
pub struct Engine {
    semantic: Semantic,
    suffixes: Vec<String>,
    vocabulary: Arc<Vocabulary>,
    substitution: Substitution,
    enabled: bool,
}

impl Engine {
    /// Create an engine for the named semantic (`microdata` or `rdfa`).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSemantic`] for any other name.
    pub fn new(semantic: &str, vocabulary: Arc<Vocabulary>) -> Result<Self, EngineError> {
        Ok(Self::with_semantic(semantic.parse()?, vocabulary))
    }

    /// Create an engine over the bundled vocabulary.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown semantic or if the bundled vocabulary
    /// cannot be loaded.
    pub fn with_bundled(semantic: &str) -> Result<Self, EngineError> {
        let semantic = semantic.parse()?;
        Ok(Self::with_semantic(semantic, Vocabulary::bundled()?))
    }

    /// Create an engine for an already parsed semantic.
    #[must_use]
    pub fn with_semantic(semantic: Semantic, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            semantic,
            suffixes: vec![DEFAULT_SUFFIX.to_owned()],
            vocabulary,
            substitution: Substitution::default(),
            enabled: true,
        }
    }

    /// Add suffixes (builder form of [`add_suffixes`](Self::add_suffixes)).
    #[must_use]
    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_suffixes(suffixes);
        self
    }

    /// Select how attributes are located in the source.
    #[must_use]
    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    /// Active semantic.
    #[must_use]
    pub fn semantic(&self) -> Semantic {
        self.semantic
    }

    /// Switch to another semantic.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSemantic`] for an unknown name; the
    /// current semantic is kept.
    pub fn set_semantic(&mut self, semantic: &str) -> Result<&mut Self, EngineError> {
        self.semantic = semantic.parse()?;
        Ok(self)
    }

    /// Shared vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// Substitution mode.
    #[must_use]
    pub fn substitution(&self) -> Substitution {
        self.substitution
    }

    /// Enable or disable output. A disabled engine strips directive
    /// attributes without adding annotations.
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Whether output is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured suffixes, in lookup order.
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Add a suffix.
    ///
    /// The suffix is trimmed and lowercased. Empty and duplicate suffixes are
    /// ignored, as are suffixes that cannot form an attribute name.
    pub fn add_suffix(&mut self, suffix: &str) -> &mut Self {
        let suffix = suffix.trim().to_lowercase();
        if suffix.is_empty() || self.suffixes.contains(&suffix) {
            return self;
        }
        if !is_valid_suffix(&suffix) {
            tracing::warn!(suffix = %suffix, "Ignoring invalid attribute suffix");
            return self;
        }
        self.suffixes.push(suffix);
        self
    }

    /// Add several suffixes.
    pub fn add_suffixes<I, S>(&mut self, suffixes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for suffix in suffixes {
            self.add_suffix(suffix.as_ref());
        }
        self
    }

    /// Remove a suffix.
    pub fn remove_suffix(&mut self, suffix: &str) -> &mut Self {
        let suffix = suffix.trim().to_lowercase();
        self.suffixes.retain(|s| *s != suffix);
        self
    }

    /// Rewrite every directive attribute in `html`.
    ///
    /// Malformed markup is tolerated. Elements whose attribute cannot be
    /// located in the source text are left unchanged.
    #[must_use]
    pub fn parse(&self, html: &str) -> String {
        match self.semantic {
            Semantic::Microdata => self.rewrite::<Microdata>(html),
            Semantic::Rdfa => self.rewrite::<Rdfa>(html),
        }
    }

    fn rewrite<D: Dialect>(&self, html: &str) -> String {
        let Some(selector) = self.selector() else {
            return html.to_owned();
        };

        // Parse errors are collected on the document and deliberately ignored.
        let document = Html::parse_document(html);

        let mut renderer = if self.enabled {
            Renderer::<D>::new(&self.vocabulary, ROOT_TYPE)
        } else {
            Renderer::<D>::disabled(&self.vocabulary)
        };
        let mut rewriter = SourceRewriter::new(self.substitution, html);
        let mut replaced = 0usize;

        for element in document.select(&selector) {
            let Some((suffix, value)) = self.node_directive(element) else {
                continue;
            };

            let fragment = plan(&Directive::parse(value), &mut renderer);

            if rewriter.replace(suffix, value, &fragment) {
                replaced += 1;
            } else {
                tracing::warn!(
                    suffix,
                    value,
                    "Directive attribute not found in source, left unchanged"
                );
            }
        }

        tracing::debug!(
            semantic = D::NAME,
            replaced,
            parse_errors = document.errors.len(),
            "Rewrote document"
        );
        rewriter.finish()
    }

    /// First configured suffix present on the element, with its value.
    fn node_directive<'e>(&self, element: ElementRef<'e>) -> Option<(&str, &'e str)> {
        self.suffixes.iter().find_map(|suffix| {
            element
                .value()
                .attr(&format!("data-{suffix}"))
                .map(|value| (suffix.as_str(), value))
        })
    }

    /// Selector matching any configured directive attribute.
    fn selector(&self) -> Option<Selector> {
        if self.suffixes.is_empty() {
            return None;
        }
        let query = self
            .suffixes
            .iter()
            .map(|suffix| format!("[data-{suffix}]"))
            .collect::<Vec<_>>()
            .join(", ");
        match Selector::parse(&query) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Invalid directive selector");
                None
            }
        }
    }
}

/// Suffixes must be usable inside an attribute name and a CSS selector.
fn is_valid_suffix(suffix: &str) -> bool {
    suffix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn engine(semantic: &str) -> Engine {
        Engine::with_bundled(semantic).unwrap()
    }

    #[test]
    fn test_semantic_from_str() {
        assert_eq!(" MicroData ".parse::<Semantic>().unwrap(), Semantic::Microdata);
        assert_eq!("RDFa".parse::<Semantic>().unwrap(), Semantic::Rdfa);
        let err = "json-ld".parse::<Semantic>().unwrap_err();
        assert!(matches!(err, EngineError::UnknownSemantic(ref s) if s == "json-ld"));
    }

    #[test]
    fn test_unknown_semantic_rejected() {
        let vocabulary = Vocabulary::bundled().unwrap();
        assert!(Engine::new("opengraph", vocabulary).is_err());
    }

    #[test]
    fn test_set_semantic_keeps_current_on_error() {
        let mut engine = engine("rdfa");
        assert!(engine.set_semantic("nope").is_err());
        assert_eq!(engine.semantic(), Semantic::Rdfa);
        engine.set_semantic("microdata").unwrap();
        assert_eq!(engine.semantic(), Semantic::Microdata);
    }

    #[test]
    fn test_default_suffix() {
        assert_eq!(engine("microdata").suffixes(), ["sd".to_owned()]);
    }

    #[test]
    fn test_add_suffix_normalizes_and_dedupes() {
        let mut engine = engine("microdata");
        engine
            .add_suffix(" MD ")
            .add_suffix("md")
            .add_suffix("sd")
            .add_suffix("")
            .add_suffix("bad suffix")
            .add_suffix("x]");
        assert_eq!(engine.suffixes(), ["sd".to_owned(), "md".to_owned()]);
    }

    #[test]
    fn test_remove_suffix() {
        let mut engine = engine("microdata").with_suffixes(["md", "rdfa-x"]);
        engine.remove_suffix("SD").remove_suffix("missing");
        assert_eq!(engine.suffixes(), ["md".to_owned(), "rdfa-x".to_owned()]);
    }

    #[test]
    fn test_no_suffixes_returns_input() {
        let mut engine = engine("microdata");
        engine.remove_suffix("sd");
        let html = r#"<div data-sd="Movie"></div>"#;
        assert_eq!(engine.parse(html), html);
    }

    #[test]
    fn test_first_configured_suffix_wins() {
        let engine = engine("microdata").with_suffixes(["md"]);
        let html = r#"<div data-md="Person" data-sd="Movie"></div>"#;
        assert_eq!(
            engine.parse(html),
            r#"<div data-md="Person" itemscope itemtype='https://schema.org/Movie'></div>"#
        );
    }

    #[test]
    fn test_disabled_strips_attributes() {
        let mut engine = engine("microdata");
        engine.set_enabled(false);
        assert_eq!(
            engine.parse(r#"<div data-sd="Movie"><b data-sd="name">x</b></div>"#),
            "<div ><b >x</b></div>"
        );
    }

    #[test]
    fn test_document_without_directives_is_unchanged() {
        let html = "<html><body><p>Hello</p></body></html>";
        assert_eq!(engine("rdfa").parse(html), html);
    }
}
