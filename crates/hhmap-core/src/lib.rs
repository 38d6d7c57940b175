use thiserror::Error;

pub mod app_config;
mod config;
pub mod deals;
pub mod declutter;
pub mod geo;
pub mod rank;
pub mod schedule;
pub mod venue;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_km, BoundingBox, Coordinates};
pub use venue::{DealEntry, ScheduleEntry, Venue};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
