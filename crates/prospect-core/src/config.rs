use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_DISCOVERY_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-flash-preview";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("PROSPECT_ENV", "development"))?;
    let bind_addr = parse_addr("PROSPECT_BIND_ADDR", "127.0.0.1:3000")?;
    let log_level = or_default("PROSPECT_LOG_LEVEL", "info");

    let gemini_base_url = or_default("PROSPECT_GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
    let discovery_model = or_default("PROSPECT_DISCOVERY_MODEL", DEFAULT_DISCOVERY_MODEL);
    let analysis_model = or_default("PROSPECT_ANALYSIS_MODEL", DEFAULT_ANALYSIS_MODEL);

    let discovery_limit = parse_u32("PROSPECT_DISCOVERY_LIMIT", "20")?;
    if discovery_limit == 0 {
        return Err(invalid(
            "PROSPECT_DISCOVERY_LIMIT",
            "must be at least 1".to_string(),
        ));
    }

    let request_timeout_secs = parse_u64("PROSPECT_REQUEST_TIMEOUT_SECS", "120")?;
    let max_retries = parse_u32("PROSPECT_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("PROSPECT_RETRY_BACKOFF_BASE_MS", "1000")?;

    let batch_size = parse_usize("PROSPECT_BATCH_SIZE", "3")?;
    if batch_size == 0 {
        return Err(invalid("PROSPECT_BATCH_SIZE", "must be at least 1".to_string()));
    }
    let analysis_timeout_secs = parse_u64("PROSPECT_ANALYSIS_TIMEOUT_SECS", "0")?;

    Ok(AppConfig {
        gemini_api_key,
        env,
        bind_addr,
        log_level,
        gemini_base_url,
        discovery_model,
        analysis_model,
        discovery_limit,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        batch_size,
        analysis_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PROSPECT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
