//! Directive mini-language for `data-*` attributes.
//!
//! A directive is a whitespace-separated list of tokens. Each token has up
//! to three dot-separated segments whose role is decided by the case of
//! their first character: uppercase is a type, lowercase a property.
//!
//! | Token                       | Meaning                                    |
//! |-----------------------------|--------------------------------------------|
//! | `Type`                      | enter a scope of `Type`                    |
//! | `Type.property`             | specialized fallback for `Type`            |
//! | `Type.property.Expected`    | ... then open a scope of `Expected`        |
//! | `property`                  | global fallback                            |
//! | `property.Expected`         | ... then open a scope of `Expected`        |
//!
//! # Processing
//!
//! 1. **Parsing** ([`Directive::parse`]): tokens are folded into an optional
//!    type to enter, specialized fallbacks keyed by type, and ordered global
//!    fallbacks.
//! 2. **Planning** ([`plan`]): the directive is applied to a
//!    [`Renderer`](crate::Renderer), choosing the first property valid for
//!    its current type.
//!
//! # Example
//!
//! ```
//! use sdata_renderer::directive::{Directive, plan};
//! use sdata_renderer::{Microdata, Renderer};
//! use sdata_vocab::Vocabulary;
//!
//! let vocabulary = Vocabulary::bundled().unwrap();
//! let mut renderer = Renderer::<Microdata>::new(&vocabulary, "");
//!
//! let scope = plan(&Directive::parse("Movie"), &mut renderer);
//! assert_eq!(scope, "itemscope itemtype='https://schema.org/Movie'");
//!
//! let director = plan(&Directive::parse("director.Person"), &mut renderer);
//! assert_eq!(
//!     director,
//!     "itemprop='director' itemscope itemtype='https://schema.org/Person'"
//! );
//! assert_eq!(renderer.type_name(), "Person");
//! ```

mod parser;
mod planner;

pub use parser::{Directive, DirectiveParam, Fallback};
pub use planner::plan;
