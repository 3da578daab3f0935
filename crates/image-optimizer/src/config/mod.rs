use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub response: ResponseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory transformed images are cached in
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Comma-separated host suffixes that may be fetched, or `*` for any host
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: String,
}

/// Outbound fetch configuration for source images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Total time allowed for a source fetch, including the body
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub timeout: Duration,
    /// Upper bound on a source image body in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Bounds on resized output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Largest width or height a resolution may ask for
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// Largest width times height a resolution may ask for
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Cache-Control header sent with every served image
    #[serde(default = "default_cache_control")]
    pub cache_control: String,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Storage defaults
fn default_output_directory() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIRECTORY)
}

fn default_allowed_domains() -> String {
    DEFAULT_ALLOWED_DOMAINS.to_string()
}

// Fetch defaults
fn default_fetch_timeout() -> Duration {
    Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
}

fn default_max_body_size() -> u64 {
    DEFAULT_MAX_BODY_SIZE
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

// Transform defaults
fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_PIXELS
}

fn default_cache_control() -> String {
    DEFAULT_CACHE_CONTROL.to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_domains: default_allowed_domains(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            max_body_size: default_max_body_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            max_pixels: default_max_pixels(),
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            cache_control: default_cache_control(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }
}
