use crate::app_config::{AppConfig, Environment, GeoConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
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
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
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

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_flag(&or_default(var, default)).ok_or_else(|| {
            invalid(var, "expected one of true/false/1/0/yes/no".to_string())
        })
    };

    let parse_coord = |var: &str| -> Result<Option<f64>, ConfigError> {
        optional(var)
            .map(|raw| raw.parse::<f64>().map_err(|e| invalid(var, e.to_string())))
            .transpose()
    };

    let env = parse_environment(&or_default("PETFINDER_ENV", "development"))?;

    let bind_addr = or_default("PETFINDER_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PETFINDER_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PETFINDER_LOG_LEVEL", "info");
    let public_dir = PathBuf::from(or_default("PETFINDER_PUBLIC_DIR", "./public"));
    let catalog_path = optional("PETFINDER_CATALOG_PATH").map(PathBuf::from);

    let dog_api_base = or_default("PETFINDER_DOG_API_BASE", "https://api.thedogapi.com/v1");
    let cat_api_base = or_default("PETFINDER_CAT_API_BASE", "https://api.thecatapi.com/v1");
    let dog_image_cdn = or_default(
        "PETFINDER_DOG_IMAGE_CDN",
        "https://cdn2.thedogapi.com/images",
    );
    let cat_image_cdn = or_default(
        "PETFINDER_CAT_IMAGE_CDN",
        "https://cdn2.thecatapi.com/images",
    );
    let api_key = optional("PETFINDER_API_KEY");

    let per_species_limit = parse_usize("PETFINDER_PER_SPECIES_LIMIT", "2")?;
    let image_search_enabled = parse_bool("PETFINDER_IMAGE_SEARCH", "true")?;
    let image_search_limit = parse_u32("PETFINDER_IMAGE_SEARCH_LIMIT", "10")?;

    let http_timeout_secs = parse_u64("PETFINDER_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PETFINDER_USER_AGENT", "petfinder/0.1 (adoption-board)");
    let http_max_retries = parse_u32("PETFINDER_HTTP_MAX_RETRIES", "0")?;
    let http_retry_backoff_secs = parse_u64("PETFINDER_HTTP_RETRY_BACKOFF_SECS", "1")?;

    let geo = GeoConfig {
        latitude: parse_coord("PETFINDER_GEO_LATITUDE")?,
        longitude: parse_coord("PETFINDER_GEO_LONGITUDE")?,
        high_accuracy: parse_bool("PETFINDER_GEO_HIGH_ACCURACY", "true")?,
        timeout_secs: parse_u64("PETFINDER_GEO_TIMEOUT_SECS", "10")?,
        max_age_secs: parse_u64("PETFINDER_GEO_MAX_AGE_SECS", "60")?,
    };

    let cache_name = or_default("PETFINDER_CACHE_NAME", "petfinder-v3");
    if cache_name.trim().is_empty() {
        return Err(invalid(
            "PETFINDER_CACHE_NAME",
            "cache name must be non-empty".to_string(),
        ));
    }
    let offline_strict_install = parse_bool("PETFINDER_OFFLINE_STRICT_INSTALL", "false")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        public_dir,
        catalog_path,
        dog_api_base,
        cat_api_base,
        dog_image_cdn,
        cat_image_cdn,
        api_key,
        per_species_limit,
        image_search_enabled,
        image_search_limit,
        http_timeout_secs,
        user_agent,
        http_max_retries,
        http_retry_backoff_secs,
        geo,
        cache_name,
        offline_strict_install,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PETFINDER_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
