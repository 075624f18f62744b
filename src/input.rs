//! Lenient numeric input parsing
//!
//! Values typed into a visualizer are parsed the way a browser `parseInt`
//! does: surrounding whitespace is ignored, an optional sign and the leading
//! run of digits are taken, and anything after them is discarded. Input with
//! no leading digits is not a number and is rejected.

/// Parse the leading integer of `text`, if any
pub fn parse_number(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let sign_len = match trimmed.as_bytes().first() {
        Some(b'-' | b'+') => 1,
        _ => 0,
    };

    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }

    trimmed[..sign_len + digits_len].parse().ok()
}

/// Parse a comma separated list, dropping entries that are not numbers
pub fn parse_list(text: &str) -> Vec<i64> {
    text.split(',').filter_map(parse_number).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("  -7 "), Some(-7));
        assert_eq!(parse_number("+3"), Some(3));
        assert_eq!(parse_number("12abc"), Some(12));
        assert_eq!(parse_number("3.9"), Some(3));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_parse_number_limits() {
        assert_eq!(parse_number("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_number("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_number("9223372036854775808"), None);
    }

    #[test]
    fn test_parse_list_drops_garbage() {
        assert_eq!(parse_list("5, 3,x, 8 ,,1"), vec![5, 3, 8, 1]);
        assert!(parse_list("").is_empty());
    }
}
