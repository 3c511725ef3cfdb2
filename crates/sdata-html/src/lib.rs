//! HTML rewriter for structured data directives.
//!
//! Scans a document for `data-<suffix>` attributes (`data-sd` by default),
//! parses each value as a [directive](sdata_renderer::directive), and
//! replaces the attribute with Microdata or RDFa Lite markup.
//!
//! The document is parsed tolerantly with `scraper`; malformed markup never
//! aborts the pass. Only the directive attributes are rewritten, the rest of
//! the source text is left byte-for-byte intact.
//!
//! # Example
//!
//! ```
//! use sdata_html::Engine;
//!
//! let engine = Engine::with_bundled("microdata").unwrap();
//! let html = engine.parse(r#"<div data-sd="Movie"><h1 data-sd="name">Alien</h1></div>"#);
//! assert_eq!(
//!     html,
//!     "<div itemscope itemtype='https://schema.org/Movie'><h1 itemprop='name'>Alien</h1></div>"
//! );
//! ```

mod engine;
mod error;
mod source;

pub use engine::{DEFAULT_SUFFIX, Engine, Semantic, Substitution};
pub use error::EngineError;
