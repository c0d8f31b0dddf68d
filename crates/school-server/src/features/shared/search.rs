//! Case-insensitive substring search for list queries
//!
//! Patterns are matched with `LIKE $n ESCAPE '\'`, so user input has its
//! wildcards escaped before being wrapped in `%...%`.

/// Lowercased `%term%` pattern, or `None` for a blank search
pub fn contains_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    Some(format!("%{}%", escape_like(&term.to_lowercase())))
}

pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(contains_pattern(None), None);
        assert_eq!(contains_pattern(Some("   ")), None);
    }

    #[test]
    fn test_pattern_is_lowercased_and_trimmed() {
        assert_eq!(contains_pattern(Some(" ADM-12 ")).as_deref(), Some("%adm-12%"));
    }

    #[test]
    fn test_wildcards_are_escaped() {
        assert_eq!(contains_pattern(Some("%")).as_deref(), Some(r"%\%%"));
        assert_eq!(contains_pattern(Some("a_b")).as_deref(), Some(r"%a\_b%"));
        assert_eq!(escape_like(r"c:\x"), r"c:\\x");
    }
}
