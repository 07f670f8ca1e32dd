//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let end = crate::util::floor_char_boundary(s, target);
        format!("{}...", &s[..end])
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces.
///
/// Used to render multi-line SQL on a single progress line.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "café" is 5 bytes; cutting inside 'é' backs up to "caf"
        assert_eq!(truncate("café au lait", 7), "caf...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(
            single_line("SELECT name\n  FROM board_games\n WHERE in_stock > 0"),
            "SELECT name FROM board_games WHERE in_stock > 0"
        );
    }
}
