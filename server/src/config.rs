//! Ingestion server configuration, read from the environment.

use pricewatch_common::config::{env_list, env_opt, env_or, env_parse, load_dotenv};

use crate::price::{PriceNormalizer, DEFAULT_SENTINELS, DEFAULT_STRIP_PATTERN};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub influx: InfluxConfig,
    /// Titles longer than this are cut before they become tag values.
    pub title_max_chars: usize,
    pub price: PriceConfig,
}

#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub url: String,
    pub token: Option<String>,
    pub org: String,
    pub bucket: String,
    pub measurement: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct PriceConfig {
    pub sentinels: Vec<String>,
    pub strip_pattern: String,
}

impl PriceConfig {
    pub fn build(&self) -> Result<PriceNormalizer, regex::Error> {
        PriceNormalizer::new(&self.sentinels, &self.strip_pattern)
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            sentinels: DEFAULT_SENTINELS.iter().map(|s| s.to_string()).collect(),
            strip_pattern: DEFAULT_STRIP_PATTERN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads `.env` and reads every setting, falling back to defaults.
    pub fn from_env() -> Self {
        load_dotenv();

        let price_defaults = PriceConfig::default();
        Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8001"),
            influx: InfluxConfig {
                url: env_or("INFLUX_URL", "http://influxdb:8086"),
                token: env_opt("INFLUX_TOKEN"),
                org: env_or("INFLUX_ORG", "pricewatch"),
                bucket: env_or("INFLUX_BUCKET", "prices"),
                measurement: env_or("INFLUX_MEASUREMENT", "item_prices"),
                timeout_secs: env_parse("STORAGE_TIMEOUT_SECS", 10),
            },
            title_max_chars: env_parse("TITLE_MAX_CHARS", 255),
            price: PriceConfig {
                sentinels: env_list("PRICE_SENTINELS").unwrap_or(price_defaults.sentinels),
                strip_pattern: env_or("PRICE_STRIP_PATTERN", &price_defaults.strip_pattern),
            },
        }
    }
}
