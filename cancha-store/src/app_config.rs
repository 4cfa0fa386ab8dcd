use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: Option<RedisConfig>,
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_slot_lock_seconds")]
    pub slot_lock_seconds: u64,
    #[serde(default = "default_full_refund_notice_hours")]
    pub full_refund_notice_hours: i64,
    #[serde(default)]
    pub partial_refund_notice_hours: i64,
    #[serde(default = "default_low_price_below")]
    pub low_price_below: i64,
    #[serde(default = "default_high_price_above")]
    pub high_price_above: i64,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            slot_lock_seconds: default_slot_lock_seconds(),
            full_refund_notice_hours: default_full_refund_notice_hours(),
            partial_refund_notice_hours: 0,
            low_price_below: default_low_price_below(),
            high_price_above: default_high_price_above(),
        }
    }
}

fn default_slot_lock_seconds() -> u64 { 900 }
fn default_full_refund_notice_hours() -> i64 { 24 }
fn default_low_price_below() -> i64 { 9000 }
fn default_high_price_above() -> i64 { 15000 }

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON file with facilities and slot listings; demo fixtures when unset
    pub seed_path: Option<String>,
    /// Days of demo slots generated from today
    #[serde(default = "default_demo_days")]
    pub demo_days: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            demo_days: default_demo_days(),
        }
    }
}

fn default_demo_days() -> u32 { 7 }

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `CANCHA_SERVER__PORT=8080` sets `server.port`
            .add_source(config::Environment::with_prefix("CANCHA").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
