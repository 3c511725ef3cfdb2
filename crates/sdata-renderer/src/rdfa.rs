//! RDFa Lite 1.1 dialect.

use crate::dialect::Dialect;

/// RDFa Lite output: `property`, `vocab`, `typeof`.
///
/// ```
/// use sdata_renderer::{Dialect, Rdfa};
///
/// assert_eq!(Rdfa::html_property("name"), "property='name'");
/// assert_eq!(
///     Rdfa::html_scope("Movie"),
///     "vocab='https://schema.org' typeof='Movie'"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Rdfa;

impl Dialect for Rdfa {
    const NAME: &'static str = "rdfa";

    fn html_property(property: &str) -> String {
        format!("property='{property}'")
    }

    fn html_scope(type_name: &str) -> String {
        format!("vocab='https://schema.org' typeof='{type_name}'")
    }
}
