//! Command argument parsing.

use regex::Regex;
use std::sync::OnceLock;

fn amount_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\d+(?:\.\d{1,2})?$").expect("Invalid amount regex pattern"))
}

/// Digits with an optional one- or two-digit fraction; `,` counts as the decimal point.
///
/// Anything else, including negative numbers and exponents, is `None`.
pub fn parse_amount(token: &str) -> Option<f64> {
    let cleaned = token.trim().replace(',', ".");
    if !amount_regex().is_match(&cleaned) {
        return None;
    }
    cleaned.parse().ok()
}

/// Non-empty trimmed remainder of a command.
pub fn parse_query(args: &str) -> Option<String> {
    let query = args.trim();
    (!query.is_empty()).then(|| query.to_string())
}

/// First whitespace-separated argument, if any.
pub fn first_arg(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_integers_and_short_fractions() {
        assert_eq!(parse_amount("12"), Some(12.0));
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount("0.01"), Some(0.01));
        assert_eq!(parse_amount(" 7 "), Some(7.0));
    }

    #[test]
    fn test_parse_amount_rejects_everything_else() {
        for token in ["12.555", "abc", "", "-1", "1e3", ".5", "5.", "1.2.3", "12,55,1"] {
            assert_eq!(parse_amount(token), None, "token {token:?}");
        }
    }

    #[test]
    fn test_parse_query_trims_and_rejects_empty() {
        assert_eq!(parse_query("  what is rust "), Some("what is rust".to_string()));
        assert_eq!(parse_query("   "), None);
    }

    #[test]
    fn test_first_arg() {
        assert_eq!(first_arg(" 10 extra"), Some("10"));
        assert_eq!(first_arg(""), None);
    }
}
