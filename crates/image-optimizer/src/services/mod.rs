//! Transform pipeline services
//!
//! Leaves first: key derivation, allow-list, source fetching, resolution
//! planning and transcoding, bound together by [`ImageOptimizer`].

pub mod allowlist;
pub mod fetcher;
pub mod key_deriver;
pub mod optimizer;
pub mod resolution;
pub mod transcoder;

pub use allowlist::DomainAllowList;
pub use fetcher::{HttpImageSource, ImageSource};
pub use key_deriver::derive_key;
pub use optimizer::ImageOptimizer;
pub use resolution::{ResolutionLimits, ResolutionSpec};
