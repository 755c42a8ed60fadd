// src/config.rs
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use log::warn;

use crate::services::depreciation::{DEFAULT_REFERENCE_MILES, DEFAULT_REFERENCE_PRICE};
use crate::services::normalizer::NormalizerThresholds;
use crate::services::render::DEFAULT_MAX_IMGS;
use crate::BoxError;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_OUTPUT_DIR: &str = "renders";
pub const DEFAULT_LABEL: &str = "Subaru Forester";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub max_imgs: i64,
    pub reference_price: f64,
    pub reference_miles: u64,
    pub label: String,
    pub thresholds: NormalizerThresholds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_imgs: DEFAULT_MAX_IMGS,
            reference_price: DEFAULT_REFERENCE_PRICE,
            reference_miles: DEFAULT_REFERENCE_MILES,
            label: DEFAULT_LABEL.to_string(),
            thresholds: NormalizerThresholds::default(),
        }
    }
}

/// Read `key`, falling back to `default` when unset. A value that is set but
/// does not parse is an error.
fn var_or<T>(key: &str, default: T) -> Result<T, BoxError>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.trim()
            .parse::<T>()
            .map_err(|e| format!("{} must be a valid value, got '{}': {}", key, raw, e).into()),
        Err(_) => {
            warn!("${} not set, defaulting to {}", key, default);
            Ok(default)
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();

        Ok(Self {
            port: var_or("PORT", defaults.port)?,
            output_dir: PathBuf::from(var_or("OUTPUT_DIR", DEFAULT_OUTPUT_DIR.to_string())?),
            user_agent: var_or("USER_AGENT", defaults.user_agent)?,
            max_imgs: var_or("MAX_IMGS", defaults.max_imgs)?,
            reference_price: var_or("REFERENCE_PRICE", defaults.reference_price)?,
            reference_miles: var_or("REFERENCE_MILES", defaults.reference_miles)?,
            label: var_or("LABEL", defaults.label)?,
            thresholds: NormalizerThresholds {
                cents_price: var_or("CENTS_PRICE_THRESHOLD", defaults.thresholds.cents_price)?,
                thousands_miles: var_or("THOUSANDS_MILES_THRESHOLD", defaults.thresholds.thousands_miles)?,
                thousands_price: var_or("THOUSANDS_PRICE_THRESHOLD", defaults.thresholds.thousands_price)?,
            },
        })
    }
}
