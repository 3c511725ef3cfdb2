//! Type and property name normalization.

/// Trim a type name and capitalize its first character.
///
/// ```
/// use sdata_renderer::sanitize_type;
///
/// assert_eq!(sanitize_type("  movie "), "Movie");
/// ```
#[must_use]
pub fn sanitize_type(name: &str) -> String {
    map_first(name.trim(), |c| c.to_ascii_uppercase())
}

/// Trim a property name and lowercase its first character.
///
/// ```
/// use sdata_renderer::sanitize_property;
///
/// assert_eq!(sanitize_property(" DatePublished"), "datePublished");
/// ```
#[must_use]
pub fn sanitize_property(name: &str) -> String {
    map_first(name.trim(), |c| c.to_ascii_lowercase())
}

fn map_first(s: &str, f: impl FnOnce(char) -> char) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(s.len());
            out.push(f(first));
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_type() {
        assert_eq!(sanitize_type("movie"), "Movie");
        assert_eq!(sanitize_type("\tLocalBusiness\n"), "LocalBusiness");
        assert_eq!(sanitize_type(""), "");
        assert_eq!(sanitize_type("   "), "");
    }

    #[test]
    fn test_sanitize_property() {
        assert_eq!(sanitize_property("Name"), "name");
        assert_eq!(sanitize_property(" datePublished "), "datePublished");
        assert_eq!(sanitize_property(""), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in ["movie", " Movie ", "éclair", "1st", "", "x"] {
            let once = sanitize_type(input);
            assert_eq!(sanitize_type(&once), once, "type {input:?}");

            let once = sanitize_property(input);
            assert_eq!(sanitize_property(&once), once, "property {input:?}");
        }
    }

    #[test]
    fn test_non_ascii_first_char_kept() {
        assert_eq!(sanitize_type("éclair"), "éclair");
    }
}
