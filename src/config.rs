//! Startup configuration parsed from environment variables.
//!
//! Everything is read once in `main` into an [`AppConfig`] that is shared
//! through `AppState`. Parsing goes through a lookup function so tests can
//! feed a fixed map instead of mutating the process environment.

use grid::consts::DEFAULT_MAX_IMAGE_BYTES;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_ADS_PER_USER: usize = 3;
pub const DEFAULT_STORAGE_BUCKET: &str = "billboard";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} names {target}, which is not set")]
    MissingSecret { var: &'static str, target: String },
}

/// Blob store endpoint. Present only when `STORAGE_BASE_URL` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub base_url: String,
    pub bucket: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Ads one non-admin user may hold at once.
    pub max_ads_per_user: usize,
    pub max_image_bytes: usize,
    pub storage: Option<StorageConfig>,
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `MAX_ADS_PER_USER`: default 3
    /// - `MAX_IMAGE_BYTES`: default 2 MiB
    /// - `STORAGE_BASE_URL`: uploads are disabled when absent
    /// - `STORAGE_BUCKET`: default `billboard`
    /// - `STORAGE_API_KEY_ENV`: names the env var holding the storage key
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing database URL, an unparseable
    /// port, or a storage key variable that points nowhere.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            port,
            db_max_connections: env_parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            max_ads_per_user: env_parse(&lookup, "MAX_ADS_PER_USER", DEFAULT_MAX_ADS_PER_USER),
            max_image_bytes: env_parse(&lookup, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES),
            storage: storage_config(&lookup)?,
        })
    }
}

fn env_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn storage_config<F>(lookup: &F) -> Result<Option<StorageConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(base_url) = lookup("STORAGE_BASE_URL").filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    let bucket = lookup("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_owned());
    let api_key = match lookup("STORAGE_API_KEY_ENV") {
        Some(target) => {
            let key = lookup(&target).ok_or_else(|| ConfigError::MissingSecret { var: "STORAGE_API_KEY_ENV", target })?;
            Some(key)
        }
        None => None,
    };

    Ok(Some(StorageConfig { base_url: base_url.trim_end_matches('/').to_owned(), bucket, api_key }))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
