//! Structured data annotation renderer with pluggable dialects.
//!
//! This crate turns a (type, property, content) triple into Microdata or
//! RDFa Lite markup, consulting a [`Vocabulary`](sdata_vocab::Vocabulary)
//! to decide whether a value is plain text, a nested scope, or metadata.
//!
//! # Architecture
//!
//! The decision procedure lives in [`Annotation::render`] and is written
//! once against the [`Dialect`] trait. Dialect-specific syntax is limited
//! to five primitives:
//! - [`Microdata`]: `itemprop` / `itemscope` / `itemtype`
//! - [`Rdfa`]: `property` / `vocab` / `typeof`
//!
//! A [`Renderer`] only holds the current type and the output switch. Each
//! annotation is a short-lived [`Annotation`] value consumed by its
//! `display` call, so no per-annotation state survives between calls.
//!
//! The [`directive`] module parses the `data-*` attribute mini-language and
//! plans the renderer calls for it.
//!
//! # Example
//!
//! ```
//! use sdata_renderer::{Microdata, Renderer};
//! use sdata_vocab::Vocabulary;
//!
//! let vocabulary = Vocabulary::bundled().unwrap();
//! let renderer = Renderer::<Microdata>::new(&vocabulary, "Person");
//!
//! let html = renderer.property("name").content("Alice").display();
//! assert_eq!(html, "<span itemprop='name'>Alice</span>");
//! ```

mod annotation;
mod dialect;
pub mod directive;
mod microdata;
mod rdfa;
mod renderer;
mod sanitize;

pub use annotation::{Annotation, DisplayMode};
pub use dialect::Dialect;
pub use microdata::Microdata;
pub use rdfa::Rdfa;
pub use renderer::Renderer;
pub use sanitize::{sanitize_property, sanitize_type};
