use std::path::PathBuf;

/// Runtime settings shared across the pipeline, sourced from `CHINEUR_*`
/// environment variables with sensible defaults (see [`crate::config`]).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bound on a single lightweight fetch, seconds.
    pub request_timeout_secs: u64,
    /// Minimum spacing between consecutive requests to the origin,
    /// milliseconds.
    pub throttle_ms: u64,
    /// WebDriver endpoint used by the rendering strategy.
    pub webdriver_url: String,
    /// Attribute pattern registry file.
    pub patterns_path: PathBuf,
}
