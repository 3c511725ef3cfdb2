//! Microdata dialect.

use crate::dialect::Dialect;

/// Microdata output: `itemprop`, `itemscope`, `itemtype`.
///
/// ```
/// use sdata_renderer::{Dialect, Microdata};
///
/// assert_eq!(Microdata::html_property("name"), "itemprop='name'");
/// assert_eq!(
///     Microdata::html_scope("Movie"),
///     "itemscope itemtype='https://schema.org/Movie'"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Microdata;

impl Dialect for Microdata {
    const NAME: &'static str = "microdata";

    fn html_property(property: &str) -> String {
        format!("itemprop='{property}'")
    }

    fn html_scope(type_name: &str) -> String {
        format!("itemscope itemtype='https://schema.org/{type_name}'")
    }
}
