use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`
/// needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = match or_default("HHMAP_ENV", "development").as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        "development" => Environment::Development,
        other => {
            return Err(ConfigError::InvalidEnvVar {
                var: "HHMAP_ENV".to_string(),
                reason: format!("unknown environment \"{other}\""),
            })
        }
    };

    Ok(AppConfig {
        database_url: require("DATABASE_URL")?,
        env,
        bind_addr: parse_addr("HHMAP_BIND_ADDR", "0.0.0.0:8080")?,
        log_level: or_default("HHMAP_LOG_LEVEL", "info"),
        db_max_connections: parse_u32("HHMAP_DB_MAX_CONNECTIONS", "10")?,
        db_min_connections: parse_u32("HHMAP_DB_MIN_CONNECTIONS", "1")?,
        db_acquire_timeout_secs: parse_u64("HHMAP_DB_ACQUIRE_TIMEOUT_SECS", "10")?,
        rate_limit_max_requests: parse_usize("HHMAP_RATE_LIMIT_MAX_REQUESTS", "120")?,
        rate_limit_window_secs: parse_u64("HHMAP_RATE_LIMIT_WINDOW_SECS", "60")?,
    })
}
