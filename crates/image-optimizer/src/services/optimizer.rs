//! Per-request transform pipeline
//!
//! allow-list → key → cache lookup → (miss) fetch → decode → plan → encode →
//! store → serve. Every failure ends the request; nothing is retried.
//!
//! There is no per-key locking. Concurrent misses for the same key each run
//! the full pipeline and the last write wins; the store's rename keeps every
//! reader on a complete file and the bytes are identical anyway.

use bytes::Bytes;
use sandboxed_cache_store::CacheStore;
use std::sync::Arc;
use std::time::Instant;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use super::allowlist::DomainAllowList;
use super::fetcher::{HttpImageSource, ImageSource};
use super::key_deriver::derive_key;
use super::resolution::{ResolutionLimits, ResolutionSpec};
use super::transcoder;
use crate::config::Config;
use crate::errors::{AppResult, TransformError, TransformResult};
use crate::models::{CacheEntryName, CacheKey, CacheStatus, OptimizedImage, OutputFormat, TransformRequest};
use crate::utils::url::UrlUtils;

#[derive(Clone)]
pub struct ImageOptimizer {
    allow_list: Arc<DomainAllowList>,
    store: CacheStore,
    source: Arc<dyn ImageSource>,
    limits: ResolutionLimits,
}

impl ImageOptimizer {
    pub fn new(allow_list: DomainAllowList, store: CacheStore, source: Arc<dyn ImageSource>) -> Self {
        Self {
            allow_list: Arc::new(allow_list),
            store,
            source,
            limits: ResolutionLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ResolutionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Wire up the HTTP source and the cache store from configuration
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        let store = CacheStore::builder()
            .base_directory(&config.storage.output_directory)
            .build()
            .await?;
        let source = HttpImageSource::new(&config.fetch)?;

        Ok(Self::new(
            DomainAllowList::parse(&config.security.allowed_domains),
            store,
            Arc::new(source),
        )
        .with_limits(ResolutionLimits::from(&config.transform)))
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn allow_list(&self) -> &DomainAllowList {
        &self.allow_list
    }

    /// Run one request through the pipeline
    pub async fn optimize(&self, request: &TransformRequest) -> TransformResult<OptimizedImage> {
        let log_url = UrlUtils::obfuscate_credentials(&request.source_url);

        if !self.allow_list.is_permitted(&request.source_url) {
            return Err(TransformError::forbidden(log_url));
        }

        let resolution = ResolutionSpec::parse(&request.resolution)?;
        if let Some(spec) = &resolution {
            spec.check_sides(&self.limits)?;
        }
        let key = derive_key(request);

        if let Some(entry) = self.lookup(&key, request.output).await? {
            debug!(url = %log_url, entry = %entry, "Cache hit");
            return self.serve(entry, CacheStatus::Hit).await;
        }

        let started = Instant::now();
        let decoded = self.source.fetch(&request.source_url).await?;
        let format = request.output.unwrap_or(decoded.detected_format);
        let entry = key.entry_name(format);
        let native = (decoded.width(), decoded.height());

        let quality = request.quality;
        let limits = self.limits;
        let encoded = tokio::task::spawn_blocking(move || {
            let dimensions = resolution
                .map(|spec| spec.plan(decoded.width(), decoded.height(), &limits))
                .transpose()?;
            transcoder::encode(&decoded.image, format, quality, dimensions)
        })
        .await
        .map_err(|e| TransformError::encode(format.as_ref(), e))??;

        self.store.write(entry.to_string(), &encoded).await?;

        info!(
            url = %log_url,
            entry = %entry,
            format = %format,
            detected = request.output.is_none(),
            native_width = native.0,
            native_height = native.1,
            bytes = encoded.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Cached transformed image"
        );

        self.serve(entry, CacheStatus::Miss).await
    }

    /// Find an existing entry for `key`
    ///
    /// With an explicit output there is exactly one candidate. With none, the
    /// candidates are probed in `jpeg`, `png`, `webp` order.
    async fn lookup(
        &self,
        key: &CacheKey,
        output: Option<OutputFormat>,
    ) -> TransformResult<Option<CacheEntryName>> {
        let candidates: Vec<OutputFormat> = match output {
            Some(format) => vec![format],
            None => OutputFormat::iter().collect(),
        };

        for format in candidates {
            let entry = key.entry_name(format);
            if self.store.exists(entry.to_string()).await? {
                return Ok(Some(entry));
            }
        }

        Ok(None)
    }

    async fn serve(&self, entry: CacheEntryName, cache_status: CacheStatus) -> TransformResult<OptimizedImage> {
        let name = entry.to_string();
        let data = self.store.read(&name).await.inspect_err(|e| {
            warn!(entry = %name, error = %e, "Failed to read cache entry");
        })?;

        Ok(OptimizedImage {
            data: Bytes::from(data),
            format: entry.format(),
            cache_status,
            entry_name: name,
        })
    }
}
