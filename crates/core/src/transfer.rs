//! Transfer orchestrator
//!
//! Drives the two symmetric flows: backup (local tree -> bucket prefix)
//! and restore (bucket prefix -> local tree). Each is a straight
//! enumerate-then-transfer pass with no retries at this layer; per-item
//! failure handling is decided once, up front, by [`ErrorPolicy`].

use std::fs;
use std::path::Path;

use crate::archive;
use crate::config::TransferConfig;
use crate::error::{Error, Result};
use crate::lister;
use crate::path::{ensure_trailing_slash, join_key, strip_key_prefix};
use crate::traits::{Item, ObjectStore};
use crate::walker;

/// What to do when a single item fails during restore.
///
/// Backup always aborts on the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole invocation on the first per-item failure
    Abort,
    /// Log the failure as a warning and continue with the next item
    SkipAndWarn,
}

impl ErrorPolicy {
    fn from_config(config: &TransferConfig) -> Self {
        if config.ignore_errors {
            ErrorPolicy::SkipAndWarn
        } else {
            ErrorPolicy::Abort
        }
    }
}

/// Backup driver: one invocation, one normalized config, one store.
pub struct Backup<'a> {
    store: &'a dyn ObjectStore,
    config: TransferConfig,
}

impl<'a> Backup<'a> {
    /// Normalizes the config; see [`TransferConfig::normalized`].
    pub fn new(store: &'a dyn ObjectStore, config: TransferConfig) -> Self {
        Self {
            store,
            config: config.normalized(),
        }
    }

    /// Run the backup to completion.
    ///
    /// Compressed mode produces exactly one archive and one upload;
    /// enumeration and exclusion filtering do not apply. A single-file
    /// override uploads exactly that file. Otherwise the local tree is
    /// enumerated and uploaded item by item, aborting on the first
    /// failure.
    pub async fn run(&self) -> Result<()> {
        tracing::info!(path = %self.config.path, dest = %self.config.dest, "backing up data");

        if self.config.compress {
            return self.backup_compressed().await;
        }
        if let Some(file) = &self.config.file {
            let source = Path::new(&self.config.path).join(file);
            let target = join_key(&self.config.dest, file);
            return self.upload(&source, &target).await;
        }
        self.backup_tree().await
    }

    async fn backup_compressed(&self) -> Result<()> {
        let source_dir = Path::new(&self.config.path);
        let output = archive::archive_output_path(source_dir, self.config.timestamp);

        archive::compress(source_dir, &output)?;

        let base = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = join_key(&self.config.dest, &base);
        self.upload(&output, &target).await?;

        tracing::info!(path = %self.config.path, dest = %self.config.dest, "backup completed");
        Ok(())
    }

    async fn backup_tree(&self) -> Result<()> {
        let items = walker::walk(Path::new(&self.config.path), self.config.recursive)?;

        for item in &items {
            if self.config.is_excluded(item.base_name()) {
                tracing::warn!(file = %item.key, "excluding file");
                continue;
            }
            if item.is_dir {
                continue;
            }

            let source = Path::new(&self.config.path).join(&item.key);
            let target = join_key(&self.config.dest, &item.key);
            self.upload(&source, &target).await?;
        }

        tracing::info!(path = %self.config.path, dest = %self.config.dest, "backup completed");
        Ok(())
    }

    async fn upload(&self, source: &Path, key: &str) -> Result<()> {
        let data = fs::read(source).map_err(|e| Error::Transfer {
            key: key.to_string(),
            message: format!("failed to read {}: {e}", source.display()),
        })?;

        let content_type = mime_guess::from_path(source)
            .first()
            .map(|m| m.essence_str().to_string());

        tracing::info!(
            file = %source.display(),
            size = %humansize::format_size(data.len() as u64, humansize::BINARY),
            target = %key,
            "uploading file"
        );

        self.store
            .put_object(key, data, content_type.as_deref())
            .await
    }
}

/// Restore driver: one invocation, one normalized config, one store.
pub struct Restore<'a> {
    store: &'a dyn ObjectStore,
    config: TransferConfig,
    policy: ErrorPolicy,
}

impl<'a> Restore<'a> {
    /// Normalizes the config for restore; see
    /// [`TransferConfig::normalized_for_restore`].
    pub fn new(store: &'a dyn ObjectStore, config: TransferConfig) -> Self {
        let config = config.normalized_for_restore();
        let policy = ErrorPolicy::from_config(&config);
        Self {
            store,
            config,
            policy,
        }
    }

    /// Run the restore to completion.
    ///
    /// The destination directory is created first. A single-file override
    /// downloads exactly one object, optionally decompressing it (fatal
    /// on failure in that path). Otherwise the remote prefix is
    /// enumerated and downloaded item by item under the configured error
    /// policy.
    pub async fn run(&self) -> Result<()> {
        tracing::info!(path = %self.config.path, dest = %self.config.dest, "restoring data");

        fs::create_dir_all(&self.config.dest)?;

        if let Some(file) = &self.config.file {
            return self.restore_single_file(file).await;
        }
        self.restore_prefix().await
    }

    async fn restore_single_file(&self, file: &str) -> Result<()> {
        let key = join_key(&self.config.path, file);
        let dest = Path::new(&self.config.dest).join(file);

        self.download(&key, &dest).await?;

        if self.config.decompress && archive::is_archive(&dest) {
            archive::decompress(&dest, Path::new(&self.config.dest))?;
            tracing::info!(file, "decompressed file");
        }

        tracing::info!(file, "restore completed");
        Ok(())
    }

    async fn restore_prefix(&self) -> Result<()> {
        let items = lister::list(self.store, &self.config.path, self.config.recursive).await?;
        let prefix = ensure_trailing_slash(&self.config.path);

        for item in &items {
            match self.restore_item(item, &prefix).await {
                Ok(()) => {}
                Err(err) if self.policy == ErrorPolicy::SkipAndWarn && err.is_recoverable() => {
                    tracing::warn!(key = %item.key, error = %err, "ignoring error");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(path = %self.config.path, dest = %self.config.dest, "restore completed");
        Ok(())
    }

    async fn restore_item(&self, item: &Item, prefix: &str) -> Result<()> {
        if self.config.is_excluded(item.base_name()) {
            tracing::warn!(file = %item.key, "excluding file");
            return Ok(());
        }
        if item.is_dir {
            return Ok(());
        }

        let relative = strip_key_prefix(&item.key, prefix);
        let dest = Path::new(&self.config.dest).join(relative);

        self.download(&item.key, &dest).await?;

        if self.config.decompress && archive::is_archive(&dest) {
            archive::decompress(&dest, Path::new(&self.config.dest))?;
            tracing::info!(file = %item.key, "decompressed file");
        }

        tracing::info!(file = %item.key, "downloaded file");
        Ok(())
    }

    /// Download one object to `dest`, creating parent directories.
    ///
    /// An existing destination is skipped (not an error) unless force is
    /// set.
    async fn download(&self, key: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        if !self.config.force && dest.exists() {
            tracing::warn!(
                file = %dest.display(),
                "file already exists, use --force to overwrite, skipping download"
            );
            return Ok(());
        }

        let data = self.store.get_object(key).await?;
        fs::write(dest, &data).map_err(|e| Error::Transfer {
            key: key.to_string(),
            message: format!("failed to write {}: {e}", dest.display()),
        })
    }
}

/// Check that the configured bucket exists before any transfer is
/// attempted.
pub async fn ensure_bucket(store: &dyn ObjectStore, bucket: &str) -> Result<()> {
    match store.bucket_exists().await {
        Ok(true) => Ok(()),
        Ok(false) => Err(Error::Connectivity(format!(
            "bucket {bucket} does not exist"
        ))),
        Err(e) => Err(Error::Connectivity(format!(
            "failed to check bucket {bucket}: {e}"
        ))),
    }
}
