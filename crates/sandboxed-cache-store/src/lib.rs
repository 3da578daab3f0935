//! # Sandboxed Cache Store
//!
//! A flat, sandboxed file store for content-addressed cache entries.
//!
//! Every entry is a single file directly inside a base directory. Entry names
//! are validated so nothing can escape that directory, and writes go through a
//! temporary file plus rename so a partially written entry is never visible.
//!
//! There is no eviction or retention: entries are immutable once
//! written and live until removed out of band.
//!
//! ## Basic Usage
//!
//! ```rust
//! use sandboxed_cache_store::CacheStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CacheStore::builder()
//!     .base_directory("/var/cache/images")
//!     .build()
//!     .await?;
//!
//! if !store.exists("5d41402abc4b2a76.png").await? {
//!     store.write("5d41402abc4b2a76.png", b"...").await?;
//! }
//! let bytes = store.read("5d41402abc4b2a76.png").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod security;
pub mod store;

pub use error::{CacheStoreError, Result};
pub use store::{CacheStore, CacheStoreBuilder};
