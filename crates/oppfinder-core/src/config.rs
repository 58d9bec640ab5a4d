use crate::app_config::{AppConfig, Environment, RedditCredentials, RedditSettings};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid. A missing `DATABASE_URL` is
/// only reported by [`AppConfig::require_database_url`].
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
/// Returns `ConfigError` if a value is invalid. A missing `DATABASE_URL` is
/// only reported by [`AppConfig::require_database_url`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

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

    let database_url = lookup("DATABASE_URL").ok();
    let env = parse_environment(&or_default("OPPFINDER_ENV", "development"));
    let bind_addr = parse_addr("OPPFINDER_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("OPPFINDER_LOG_LEVEL", "info");
    let fixtures_path = PathBuf::from(or_default(
        "OPPFINDER_FIXTURES_PATH",
        "./config/fixtures.yaml",
    ));

    let db_max_connections = parse_u32("OPPFINDER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("OPPFINDER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("OPPFINDER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let reddit_credentials = match (
        lookup("REDDIT_CLIENT_ID").ok(),
        lookup("REDDIT_CLIENT_SECRET").ok(),
        lookup("REDDIT_USER_AGENT").ok(),
    ) {
        (Some(client_id), Some(client_secret), Some(user_agent)) => Some(RedditCredentials {
            client_id,
            client_secret,
            user_agent,
        }),
        (None, None, None) => None,
        _ => {
            return Err(invalid(
                "REDDIT_CLIENT_ID",
                "REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET and REDDIT_USER_AGENT must be set together"
                    .to_string(),
            ))
        }
    };

    let reddit = RedditSettings {
        limit_per_subreddit: parse_u32("OPPFINDER_REDDIT_LIMIT_PER_SUBREDDIT", "100")?,
        request_delay_ms: parse_u64("OPPFINDER_REDDIT_REQUEST_DELAY_MS", "1000")?,
        timeout_secs: parse_u64("OPPFINDER_REDDIT_TIMEOUT_SECS", "30")?,
    };

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        fixtures_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        reddit_credentials,
        reddit,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
