//! Core cache store implementation.

use crate::{
    error::{CacheStoreError, Result},
    security::validate_entry_name,
};

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::fs;

/// Flat, write-atomic file store rooted at a base directory.
///
/// Cloning is cheap; all clones share the same base directory.
#[derive(Clone, Debug)]
pub struct CacheStore {
    base_dir: Arc<PathBuf>,
}

impl CacheStore {
    /// Create a new builder for configuring the store.
    #[must_use]
    pub fn builder() -> CacheStoreBuilder {
        CacheStoreBuilder::new()
    }

    /// The directory entries are stored in.
    pub fn base_directory(&self) -> &Path {
        &self.base_dir
    }

    /// Returns `true` iff a regular file with exactly this name exists.
    ///
    /// # Errors
    /// Returns an error if the name is invalid or the metadata lookup fails
    /// for a reason other than the file being absent.
    pub async fn exists<N: AsRef<str>>(&self, name: N) -> Result<bool> {
        let path = self.entry_path(name)?;

        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheStoreError::Io(e)),
        }
    }

    /// Read an entry's bytes.
    ///
    /// # Errors
    /// Returns [`CacheStoreError::NotFound`] if the entry is absent and
    /// [`CacheStoreError::Io`] for any other read failure.
    pub async fn read<N: AsRef<str>>(&self, name: N) -> Result<Vec<u8>> {
        let name = name.as_ref();
        let path = self.entry_path(name)?;

        fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CacheStoreError::NotFound {
                    name: name.to_string(),
                }
            } else {
                CacheStoreError::Io(e)
            }
        })
    }

    /// Write an entry, replacing any existing file of the same name.
    ///
    /// Bytes land in a hidden temporary file first and are renamed into place,
    /// so a reader sees either the previous entry, nothing, or the complete new
    /// entry. Concurrent writers of the same name race; the last rename wins.
    ///
    /// # Errors
    /// Returns an error if the name is invalid or any filesystem step fails.
    /// The temporary file is removed on failure.
    pub async fn write<N: AsRef<str>, C: AsRef<[u8]>>(&self, name: N, contents: C) -> Result<()> {
        let name = name.as_ref();
        let target = self.entry_path(name)?;
        let temp = self
            .base_dir
            .join(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()));

        if let Err(e) = fs::write(&temp, contents.as_ref()).await {
            let _ = fs::remove_file(&temp).await;
            return Err(CacheStoreError::Io(e));
        }

        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(CacheStoreError::Io(e));
        }

        tracing::debug!(
            entry = name,
            size_bytes = contents.as_ref().len(),
            "Cache entry written"
        );

        Ok(())
    }

    /// Resolve the on-disk path of an entry.
    ///
    /// # Errors
    /// Returns [`CacheStoreError::InvalidName`] if the name is not a plain file name.
    pub fn entry_path<N: AsRef<str>>(&self, name: N) -> Result<PathBuf> {
        let name = name.as_ref();
        validate_entry_name(name)?;
        Ok(self.base_dir.join(name))
    }
}

/// Builder for [`CacheStore`].
#[derive(Debug, Default)]
pub struct CacheStoreBuilder {
    base_directory: Option<PathBuf>,
}

impl CacheStoreBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the base directory for entry storage.
    #[must_use]
    pub fn base_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.base_directory = Some(path.into());
        self
    }

    /// Build the `CacheStore`, creating the base directory if needed.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Base directory is not set
    /// - Base directory cannot be created
    pub async fn build(self) -> Result<CacheStore> {
        let base_dir = self
            .base_directory
            .ok_or_else(|| CacheStoreError::Configuration {
                message: "Base directory is required".to_string(),
            })?;

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| CacheStoreError::DirectoryCreation {
                path: base_dir.clone(),
                source: e,
            })?;

        tracing::info!("CacheStore initialized - base_dir: {:?}", base_dir);

        Ok(CacheStore {
            base_dir: Arc::new(base_dir),
        })
    }
}
