//! Utility modules for the image optimizer

pub mod url;

pub use url::UrlUtils;
