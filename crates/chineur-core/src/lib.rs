//! Core domain types for the chineur listing scanner: the [`Listing`]
//! record, the attribute pattern registry and detector, the valuation
//! engine, geographic primitives, and application configuration shared by
//! the scraper and CLI crates.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod geo;
pub mod listing;
pub mod patterns;
pub mod valuation;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_km, GeoPoint};
pub use listing::{normalize_price_amount, Listing, MINOR_UNIT_THRESHOLD, SOURCE_NAME};
pub use patterns::{
    detect, load_patterns, AttributePattern, PatternError, PatternSet, PatternsFile,
};
pub use valuation::{valuate, ValuationParams};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read patterns file {path}: {source}")]
    PatternsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse patterns file: {0}")]
    PatternsFileParse(#[from] serde_yaml::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
