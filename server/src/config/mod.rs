use std::env;
use std::fs;
use std::str::FromStr;

use rust_decimal::Decimal;
use ticket_pricing::PricingPolicy;

use crate::utils::error::AppError;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MINOR_UNITS: u32 = 2;
const DEFAULT_FREE_ACTIVE_EVENT_LIMIT: u32 = 3;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Decimal places a currency can express; anything beyond this is not money.
const MAX_MINOR_UNITS: u32 = 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub production: bool,
    pub cors_allowed_origins: Vec<String>,
    pub currency_minor_units: u32,
    pub free_active_event_limit: u32,
    pub pricing_policy: PricingPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("DATABASE_URL must be set".to_string()))?;

        let production = lookup("RUST_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let currency_minor_units =
            parse_var(&lookup, "CURRENCY_MINOR_UNITS", DEFAULT_MINOR_UNITS)?;
        if currency_minor_units > MAX_MINOR_UNITS {
            return Err(AppError::ConfigError(format!(
                "CURRENCY_MINOR_UNITS must be at most {}, got {}",
                MAX_MINOR_UNITS, currency_minor_units
            )));
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_var(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            port: parse_var(&lookup, "SERVER_PORT", DEFAULT_PORT)?,
            production,
            cors_allowed_origins,
            currency_minor_units,
            free_active_event_limit: parse_var(
                &lookup,
                "FREE_ACTIVE_EVENT_LIMIT",
                DEFAULT_FREE_ACTIVE_EVENT_LIMIT,
            )?,
            pricing_policy: load_pricing_policy(&lookup)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::ConfigError(format!("{} has invalid value '{}': {}", name, raw, e))),
        None => Ok(default),
    }
}

fn parse_optional<F, T>(lookup: &F, name: &str) -> Result<Option<T>, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim().parse().map_err(|e| {
                AppError::ConfigError(format!("{} has invalid value '{}': {}", name, raw, e))
            })
        })
        .transpose()
}

/// Starts from the policy file (or the built-in schedule), applies the
/// individual overrides and validates the result.
fn load_pricing_policy<F>(lookup: &F) -> Result<PricingPolicy, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut policy = match lookup("PRICING_POLICY_PATH") {
        Some(path) => {
            let raw = fs::read_to_string(&path).map_err(|e| {
                AppError::ConfigError(format!("failed to read pricing policy {}: {}", path, e))
            })?;
            let policy: PricingPolicy = serde_json::from_str(&raw).map_err(|e| {
                AppError::ConfigError(format!("failed to parse pricing policy {}: {}", path, e))
            })?;
            tracing::info!(path = %path, "Loaded pricing policy from file");
            policy
        }
        None => PricingPolicy::default(),
    };

    if let Some(rate) = parse_optional::<_, Decimal>(lookup, "PRICING_PROCESSOR_FEE_RATE")? {
        policy.processor_fee_rate = rate;
    }
    if let Some(floor) = parse_optional::<_, Decimal>(lookup, "PRICING_MIN_PERCENTAGE")? {
        policy.min_percentage = floor;
    }
    if let Some(fee) = parse_optional::<_, Decimal>(lookup, "PRICING_MIN_PLATFORM_FEE")? {
        policy.min_platform_fee = fee;
    }

    policy
        .validate()
        .map_err(|e| AppError::ConfigError(e.to_string()))?;

    Ok(policy)
}
