//! Domain types shared by the services and web layers

pub mod format;
pub mod media;
pub mod request;

pub use format::OutputFormat;
pub use media::{CacheStatus, DecodedImage, Dimensions, OptimizedImage};
pub use request::{CacheEntryName, CacheKey, OptimizeQuery, TransformRequest};
