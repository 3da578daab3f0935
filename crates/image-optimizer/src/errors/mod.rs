//! Centralized error handling for the image optimizer
//!
//! # Error Categories
//!
//! - **Transform Errors**: everything that ends a single optimize request
//!   (allow-list, fetch, decode, resolution, encode, cache store)
//! - **Application Errors**: configuration and startup wiring failures
//!
//! # Usage
//!
//! ```rust
//! use image_optimizer::errors::{TransformError, TransformResult};
//!
//! fn example_function(url: &str) -> TransformResult<()> {
//!     if url.is_empty() {
//!         return Err(TransformError::invalid_request("url is required"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for per-request transform Results
pub type TransformResult<T> = Result<T, TransformError>;
