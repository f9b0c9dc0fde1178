//! Location key normalisation.
//!
//! Caches and the history store use keys verbatim, so every caller must
//! derive them through [`normalize_key`].

/// Separator between the words of a multi-word location.
pub const KEY_SEPARATOR: char = '_';

/// Uppercase `name` and join its words with [`KEY_SEPARATOR`].
///
/// `" new  york "` becomes `"NEW_YORK"`.
pub fn normalize_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(&KEY_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word() {
        assert_eq!(normalize_key("Rome"), "ROME");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_key("  new \t york "), "NEW_YORK");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(normalize_key("   "), "");
    }

    #[test]
    fn test_non_ascii() {
        assert_eq!(normalize_key("São Paulo"), "SÃO_PAULO");
    }
}
