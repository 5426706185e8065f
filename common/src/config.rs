//! Environment lookup helpers used by both binaries.

use std::env;
use std::str::FromStr;

/// Load `.env` (silently ignores a missing file).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Non-empty value of `key`, if set.
pub fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

pub fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// Parsed value of `key`; unset or unparseable values fall back to `default`.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_opt(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma-separated list in `key`, trimmed, empty entries removed.
pub fn env_list(key: &str) -> Option<Vec<String>> {
    env_opt(key).map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_falls_back_on_garbage() {
        env::set_var("PRICEWATCH_TEST_PARSE_GARBAGE", "ten");
        assert_eq!(env_parse("PRICEWATCH_TEST_PARSE_GARBAGE", 10u64), 10);
    }

    #[test]
    fn test_env_parse_reads_value() {
        env::set_var("PRICEWATCH_TEST_PARSE_VALUE", " 42 ");
        assert_eq!(env_parse("PRICEWATCH_TEST_PARSE_VALUE", 10u64), 42);
    }

    #[test]
    fn test_env_opt_treats_blank_as_unset() {
        env::set_var("PRICEWATCH_TEST_BLANK", "   ");
        assert_eq!(env_opt("PRICEWATCH_TEST_BLANK"), None);
        assert_eq!(env_or("PRICEWATCH_TEST_BLANK", "fallback"), "fallback");
    }

    #[test]
    fn test_env_list_splits_and_trims() {
        env::set_var("PRICEWATCH_TEST_LIST", "n/a, dohodou ,,negotiable");
        assert_eq!(
            env_list("PRICEWATCH_TEST_LIST"),
            Some(vec![
                "n/a".to_string(),
                "dohodou".to_string(),
                "negotiable".to_string()
            ])
        );
    }
}
