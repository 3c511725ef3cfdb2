//! Schema.org type graph for structured data annotation.
//!
//! This crate loads a static vocabulary of types, their single-inheritance
//! chain (`extends`), and the properties each type declares together with
//! the expected value types of every property.
//!
//! # Data format
//!
//! ```json
//! {
//!   "Thing":  { "extends": null,    "properties": { "name": { "expectedTypes": ["Text"] } } },
//!   "Person": { "extends": "Thing", "properties": { "knows": { "expectedTypes": ["Person"] } } }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use sdata_vocab::{ExpectedDisplay, Vocabulary};
//!
//! let vocabulary = Vocabulary::bundled().unwrap();
//! assert!(vocabulary.is_property_in_type("Movie", "name"));
//! assert_eq!(
//!     vocabulary.expected_display("Movie", "director"),
//!     ExpectedDisplay::Nested
//! );
//! ```

mod error;
mod schema;
mod vocabulary;

pub use error::VocabularyError;
pub use schema::{ExpectedDisplay, PropertySchema, TypeSchema};
pub use vocabulary::{Ancestors, ROOT_TYPE, Vocabulary};
