/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Storage defaults
pub const DEFAULT_OUTPUT_DIRECTORY: &str = ".";

// Security defaults
pub const DEFAULT_ALLOWED_DOMAINS: &str = "*";

// Fetch defaults
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_BODY_SIZE: u64 = 100 * 1024 * 1024; // 100MB

// Transform defaults
pub const DEFAULT_MAX_DIMENSION: u32 = 32_768;
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000; // 100 megapixels

// Response defaults
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
