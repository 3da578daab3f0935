//! On-demand image transformation proxy
//!
//! Fetches a source image, converts it to JPEG, PNG or lossless WebP at an
//! optional target resolution and caches the result on disk under a digest of
//! the request parameters, so repeated requests never refetch or re-encode.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod utils;
pub mod web;

pub use config::Config;
pub use errors::{AppError, AppResult, TransformError, TransformResult};
pub use services::ImageOptimizer;
pub use web::WebServer;
