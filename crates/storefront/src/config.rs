//! Environment-driven configuration for storefront hosts.

use std::path::PathBuf;

use thiserror::Error;

use storefront_cart::PricingPolicy;
use storefront_catalog::http::DEFAULT_BASE_URL;
use storefront_core::{Money, UserId};
use storefront_observability::LogFormat;

pub const API_URL_VAR: &str = "STOREFRONT_API_URL";
pub const USER_ID_VAR: &str = "STOREFRONT_USER_ID";
pub const STATE_PATH_VAR: &str = "STOREFRONT_STATE_PATH";
pub const FREE_SHIPPING_THRESHOLD_VAR: &str = "STOREFRONT_FREE_SHIPPING_THRESHOLD";
pub const SHIPPING_FEE_VAR: &str = "STOREFRONT_SHIPPING_FEE";
pub const TAX_RATE_BPS_VAR: &str = "STOREFRONT_TAX_RATE_BPS";
pub const LOG_FORMAT_VAR: &str = "STOREFRONT_LOG_FORMAT";

pub const DEFAULT_USER_ID: UserId = UserId::new(1);
pub const DEFAULT_STATE_PATH: &str = ".storefront/state.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    pub api_url: String,
    pub user_id: UserId,
    pub state_path: PathBuf,
    pub pricing: PricingPolicy,
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID,
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            pricing: PricingPolicy::default(),
            log_format: LogFormat::Json,
        }
    }
}

impl StorefrontConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup. Unset or blank
    /// variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_url = get(API_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let user_id = match get(USER_ID_VAR) {
            Some(raw) => raw
                .parse::<UserId>()
                .map_err(|e| invalid(USER_ID_VAR, &raw, e))?,
            None => defaults.user_id,
        };

        let state_path = get(STATE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.state_path);

        let mut pricing = defaults.pricing;
        if let Some(raw) = get(FREE_SHIPPING_THRESHOLD_VAR) {
            pricing.free_shipping_threshold = parse_money(FREE_SHIPPING_THRESHOLD_VAR, &raw)?;
        }
        if let Some(raw) = get(SHIPPING_FEE_VAR) {
            pricing.shipping_fee = parse_money(SHIPPING_FEE_VAR, &raw)?;
        }
        if let Some(raw) = get(TAX_RATE_BPS_VAR) {
            pricing.tax_rate_bps = raw
                .parse::<u32>()
                .map_err(|e| invalid(TAX_RATE_BPS_VAR, &raw, e))?;
        }

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| invalid(LOG_FORMAT_VAR, &raw, e))?,
            None => defaults.log_format,
        };

        Ok(Self {
            api_url,
            user_id,
            state_path,
            pricing,
            log_format,
        })
    }
}

fn parse_money(var: &'static str, raw: &str) -> Result<Money, ConfigError> {
    let amount = raw.parse::<f64>().map_err(|e| invalid(var, raw, e))?;
    Money::from_decimal(amount).map_err(|e| invalid(var, raw, e))
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
