//! Generic RocksDB storage parameterized by subsystem.
//!
//! Provides `Storage<S>` that owns the database handle and block cache while
//! the subsystem decides which column families exist.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::Result;
use rocksdb::{Options, DB};

use super::config::BlockCacheConfig;
use super::handle::{DatabaseHandle, StorageMode, StorageOptions};
use super::subsystem::{DbAccess, StorageSubsystem};

// ============================================================================
// Storage<S>
// ============================================================================

/// Generic RocksDB storage parameterized by subsystem.
///
/// The database is opened by `ready()` and released when the storage is
/// closed or dropped, whichever happens first.
///
/// # Example
///
/// ```ignore
/// pub type Storage = rocksdb::Storage<localstore::Subsystem>;
///
/// let mut storage = localstore::Storage::readonly(path);
/// storage.ready()?;
/// let db = storage.db_access()?;
/// ```
pub struct Storage<S: StorageSubsystem> {
    db_path: PathBuf,
    db_options: Options,
    db: Option<DatabaseHandle>,
    mode: StorageMode,
    block_cache: Option<rocksdb::Cache>,
    block_cache_config: BlockCacheConfig,
    _marker: PhantomData<S>,
}

impl<S: StorageSubsystem> Storage<S> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a new Storage instance in read-only mode.
    ///
    /// Multiple read-only instances can access the same database simultaneously.
    pub fn readonly(db_path: &Path) -> Self {
        Self::with_mode(db_path, StorageMode::ReadOnly, StorageOptions::default_for_readonly())
    }

    /// Create a new Storage instance in read-write mode.
    ///
    /// Only one read-write instance can access the database at a time.
    pub fn readwrite(db_path: &Path) -> Self {
        Self::with_mode(db_path, StorageMode::ReadWrite, StorageOptions::default_for_readwrite())
    }

    fn with_mode(db_path: &Path, mode: StorageMode, db_options: Options) -> Self {
        Self {
            db_path: PathBuf::from(db_path),
            db_options,
            db: None,
            mode,
            block_cache: None,
            block_cache_config: BlockCacheConfig::default(),
            _marker: PhantomData,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the block cache configuration.
    ///
    /// Must be called before `ready()` to take effect.
    pub fn with_block_cache_config(mut self, config: BlockCacheConfig) -> Self {
        self.block_cache_config = config;
        self
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Open the database.
    ///
    /// This method:
    /// 1. Validates the database path
    /// 2. Creates the shared block cache
    /// 3. Gets column family descriptors from the subsystem
    /// 4. Opens the database in the configured mode
    #[tracing::instrument(skip(self), fields(subsystem = S::NAME, path = ?self.db_path))]
    pub fn ready(&mut self) -> Result<()> {
        if self.db.is_some() {
            return Ok(());
        }

        // Validate path
        match self.db_path.try_exists() {
            Err(e) => return Err(e.into()),
            Ok(true) => {
                if self.db_path.is_file() {
                    return Err(anyhow::anyhow!(
                        "Path is a file: {}",
                        self.db_path.display()
                    ));
                }
            }
            Ok(false) => {
                if self.mode == StorageMode::ReadOnly {
                    return Err(anyhow::anyhow!(
                        "Path does not exist: {}",
                        self.db_path.display()
                    ));
                }
            }
        }

        // Create shared block cache
        let cache = rocksdb::Cache::new_lru_cache(self.block_cache_config.cache_size_bytes);

        tracing::debug!(
            subsystem = S::NAME,
            cache_mb = self.block_cache_config.cache_size_bytes / (1024 * 1024),
            "[{}] Created block cache",
            S::NAME
        );

        // Get CF descriptors from subsystem
        let cf_descriptors = S::cf_descriptors(&cache, &self.block_cache_config);
        self.block_cache = Some(cache);

        tracing::debug!(
            subsystem = S::NAME,
            cf_count = cf_descriptors.len(),
            "[{}] Built CF descriptors",
            S::NAME
        );

        // Open database based on mode
        let handle = match self.mode {
            StorageMode::ReadOnly => DatabaseHandle::ReadOnly(DB::open_cf_descriptors_read_only(
                &self.db_options,
                &self.db_path,
                cf_descriptors,
                false,
            )?),
            StorageMode::ReadWrite => DatabaseHandle::ReadWrite(DB::open_cf_descriptors(
                &self.db_options,
                &self.db_path,
                cf_descriptors,
            )?),
        };
        self.db = Some(handle);

        tracing::info!(subsystem = S::NAME, mode = ?self.mode, "[{}] Ready", S::NAME);
        Ok(())
    }

    // =========================================================================
    // Database Access
    // =========================================================================

    /// Read access to the opened database.
    pub fn db_access(&self) -> Result<&dyn DbAccess> {
        self.db
            .as_ref()
            .map(|h| h.as_db() as &dyn DbAccess)
            .ok_or_else(|| anyhow::anyhow!("[{}] Storage is not ready", S::NAME))
    }

    /// Get the DB for writing (only in readwrite mode).
    pub fn writable_db(&self) -> Result<&DB> {
        self.db
            .as_ref()
            .and_then(|h| h.as_writable_db())
            .ok_or_else(|| anyhow::anyhow!("[{}] Not in readwrite mode or not ready", S::NAME))
    }

    /// Check if storage was opened for writing.
    pub fn is_read_write(&self) -> bool {
        self.db
            .as_ref()
            .map(|h| h.is_read_write())
            .unwrap_or(false)
    }

    /// Get the database path.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Get list of column family names for this subsystem.
    pub fn column_families(&self) -> &'static [&'static str] {
        S::COLUMN_FAMILIES
    }

    /// Close the database.
    pub fn close(&mut self) -> Result<()> {
        let handle = self
            .db
            .take()
            .ok_or_else(|| anyhow::anyhow!("[{}] Storage is not ready", S::NAME))?;
        drop(handle);
        self.block_cache = None;
        tracing::debug!(subsystem = S::NAME, "[{}] Closed", S::NAME);
        Ok(())
    }
}
