//! Search input policy

/// What a search keystroke should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Empty input: show the full list again
    ReloadAll,
    /// A single character: withhold the request, leave the list alone
    Skip,
    /// Two or more characters: run the search
    Query(String),
}

/// Map raw search input onto an action
///
/// Input is trimmed first. Length is counted in characters.
pub fn search_action(raw: &str) -> SearchAction {
    let query = raw.trim();
    match query.chars().count() {
        0 => SearchAction::ReloadAll,
        1 => SearchAction::Skip,
        _ => SearchAction::Query(query.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(search_action(""), SearchAction::ReloadAll);
        assert_eq!(search_action("   "), SearchAction::ReloadAll);
        assert_eq!(search_action("a"), SearchAction::Skip);
        assert_eq!(search_action(" a "), SearchAction::Skip);
        assert_eq!(search_action("ab"), SearchAction::Query("ab".to_string()));
        assert_eq!(
            search_action("  day 1 "),
            SearchAction::Query("day 1".to_string())
        );
    }

    #[test]
    fn test_multibyte_single_char_is_skipped() {
        assert_eq!(search_action("é"), SearchAction::Skip);
        assert_eq!(search_action("日記"), SearchAction::Query("日記".to_string()));
    }
}
