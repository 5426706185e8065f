//! Raw price string -> numeric value.
//!
//! Listing sites format prices inconsistently ("1 250 Kč", "299 €",
//! "Dohodou"). The default strip rule removes every non-digit, which also
//! removes decimal separators: "12.50" and "1250" both become 1250. Sites
//! that publish decimals can configure a rule that keeps the separator.

use regex::Regex;

/// Strings meaning "no price" (compared trimmed and lowercased).
pub const DEFAULT_SENTINELS: &[&str] = &[
    "n/a",
    "n_a",
    "by agreement",
    "negotiable",
    "dohodou",
    "v textu",
];

/// Characters removed before parsing.
pub const DEFAULT_STRIP_PATTERN: &str = "[^0-9]";

#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    sentinels: Vec<String>,
    strip: Regex,
}

impl PriceNormalizer {
    /// Builds a normalizer from a sentinel list and a strip pattern.
    pub fn new<S: AsRef<str>>(sentinels: &[S], strip_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            sentinels: sentinels
                .iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
            strip: Regex::new(strip_pattern)?,
        })
    }

    /// Converts `raw` into a price, or `None` when it carries no usable value.
    pub fn normalize(&self, raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let lowered = trimmed.to_lowercase();
        if self.sentinels.iter().any(|s| *s == lowered) {
            return None;
        }

        let cleaned = self.strip.replace_all(trimmed, "");
        if cleaned.is_empty() {
            return None;
        }

        cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self {
            sentinels: DEFAULT_SENTINELS.iter().map(|s| s.to_string()).collect(),
            strip: Regex::new(DEFAULT_STRIP_PATTERN).expect("default strip pattern is valid"),
        }
    }
}
