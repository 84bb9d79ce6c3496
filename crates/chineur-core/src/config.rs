use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let request_timeout_secs = parse_u64("CHINEUR_REQUEST_TIMEOUT_SECS", "25")?;
    let throttle_ms = parse_u64("CHINEUR_THROTTLE_MS", "1000")?;
    let webdriver_url = or_default("CHINEUR_WEBDRIVER_URL", "http://localhost:4444");
    let patterns_path = PathBuf::from(or_default(
        "CHINEUR_PATTERNS_PATH",
        "./config/attributes.yaml",
    ));

    if request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "CHINEUR_REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        request_timeout_secs,
        throttle_ms,
        webdriver_url,
        patterns_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
