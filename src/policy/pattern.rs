//! Glob-style pattern matching for capability names
//!
//! Patterns are matched case-sensitively. A `*` token matches any
//! (possibly empty) run of characters; everything else is literal.
//! Patterns with several `*` tokens are handled by segment scanning,
//! which behaves identically on the single-wildcard patterns the policy
//! format promises.

/// Match `text` against a glob `pattern`
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == text;
    }

    // The pattern contains at least one '*', so splitting yields at
    // least two segments.
    let segments: Vec<&str> = pattern.split('*').collect();
    let first = segments[0];
    let last = segments[segments.len() - 1];
    let middle = &segments[1..segments.len() - 1];

    let mut rest = match text.strip_prefix(first) {
        Some(rest) => rest,
        None => return false,
    };

    // Middle segments match greedily left to right; position within the
    // remainder does not matter, only order.
    for segment in middle {
        if segment.is_empty() {
            continue;
        }
        match rest.find(segment) {
            Some(idx) => rest = &rest[idx + segment.len()..],
            None => return false,
        }
    }

    last.is_empty() || rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(glob_match("read_file", "read_file"));
        assert!(!glob_match("read_file", "read_files"));
        assert!(!glob_match("read_file", "read"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!glob_match("Read", "read"));
        assert!(!glob_match("read*", "Read_file"));
    }

    #[test]
    fn test_wildcard_positions() {
        // Trailing
        assert!(glob_match("github_*", "github_search"));
        assert!(glob_match("github_*", "github_"));
        assert!(!glob_match("github_*", "gitlab_search"));

        // Leading
        assert!(glob_match("*_search", "github_search"));
        assert!(!glob_match("*_search", "github_list"));

        // Inner
        assert!(glob_match("get_*_info", "get_user_info"));
        assert!(glob_match("get_*_info", "get__info"));
        assert!(!glob_match("get_*_info", "get_user_data"));
    }

    #[test]
    fn test_wildcard_only() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("*", ""));
    }

    #[test]
    fn test_multiple_wildcards() {
        assert!(glob_match("a*b*c", "a-x-b-y-c"));
        assert!(glob_match("a*b*c", "abc"));
        assert!(!glob_match("a*b*c", "acb"));
        assert!(glob_match("**", "anything"));
    }

    #[test]
    fn test_empty_text() {
        assert!(!glob_match("a", ""));
        assert!(glob_match("", ""));
        assert!(!glob_match("", "a"));
    }

    #[test]
    fn test_overlap_does_not_double_count() {
        // The final segment must sit after the middle match, not overlap it
        assert!(glob_match("*ab*ab", "xabab"));
        assert!(!glob_match("*ab*ab", "xab"));
    }
}
