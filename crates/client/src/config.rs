//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ITX_API_BASE_URL` - Product API endpoint (default: the public ITX
//!   service)
//! - `ITX_CACHE_TTL_SECS` - Response cache TTL in seconds (default: 3600)
//! - `ITX_CACHE_DIR` - Directory for the file-backed store (default:
//!   `$HOME/.itx-store`)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::cache::DEFAULT_TTL;

/// Public product API this store front-ends.
pub const DEFAULT_BASE_URL: &str = "https://itx-frontend-test.onrender.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the product API.
    pub base_url: Url,
    /// How long cached GET responses stay valid.
    pub cache_ttl: Duration,
    /// Directory backing the persistent key-value store.
    pub cache_dir: PathBuf,
}

impl StoreConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable does not parse (bad URL,
    /// non-numeric TTL).
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = match optional_env("ITX_API_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|err| {
                ConfigError::InvalidEnvVar("ITX_API_BASE_URL".to_owned(), err.to_string())
            })?,
            None => default_base_url(),
        };

        let cache_ttl = match optional_env("ITX_CACHE_TTL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|err| {
                    ConfigError::InvalidEnvVar("ITX_CACHE_TTL_SECS".to_owned(), err.to_string())
                })?,
            None => DEFAULT_TTL,
        };

        let cache_dir = optional_env("ITX_CACHE_DIR")
            .map_or_else(default_cache_dir, PathBuf::from);

        Ok(Self {
            base_url,
            cache_ttl,
            cache_dir,
        })
    }

    /// Configuration pointing at `base_url` with the default TTL; handy for
    /// tests and embedding.
    #[must_use]
    pub fn for_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            cache_ttl: DEFAULT_TTL,
            cache_dir: default_cache_dir(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::for_base_url(default_base_url())
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn default_cache_dir() -> PathBuf {
    env::var_os("HOME")
        .map_or_else(env::temp_dir, PathBuf::from)
        .join(".itx-store")
}

/// Read a variable, treating unset and empty the same way.
fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
