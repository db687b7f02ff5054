//! Database handle types for RocksDB storage.
//!
//! - `DatabaseHandle`: Enum wrapping read-only and read-write DB instances
//! - `StorageMode`: Configuration for how the database should be opened
//! - `StorageOptions`: Default RocksDB options per access mode

use rocksdb::{Options, DB};

// ============================================================================
// DatabaseHandle
// ============================================================================

/// Handle for a read-only or read-write DB.
///
/// Audits always use `ReadOnly`. `ReadWrite` exists for building stores
/// (fixtures, tooling) and is never opened by the audit path.
pub enum DatabaseHandle {
    /// Read-only database access
    ReadOnly(DB),
    /// Read-write access
    ReadWrite(DB),
}

impl DatabaseHandle {
    /// Get the DB reference regardless of mode.
    pub fn as_db(&self) -> &DB {
        match self {
            DatabaseHandle::ReadOnly(db) | DatabaseHandle::ReadWrite(db) => db,
        }
    }

    /// Get the DB reference if it was opened for writing.
    pub fn as_writable_db(&self) -> Option<&DB> {
        match self {
            DatabaseHandle::ReadWrite(db) => Some(db),
            DatabaseHandle::ReadOnly(_) => None,
        }
    }

    /// Check if this is a read-write handle.
    pub fn is_read_write(&self) -> bool {
        matches!(self, DatabaseHandle::ReadWrite(_))
    }
}

// ============================================================================
// StorageMode
// ============================================================================

/// Storage access mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Read-only access - the store must already exist
    ReadOnly,
    /// Read-write access, creating the store and column families if missing
    ReadWrite,
}

// ============================================================================
// StorageOptions
// ============================================================================

/// Default RocksDB options factory for each storage mode.
pub struct StorageOptions;

impl StorageOptions {
    /// Default options for read-write mode.
    ///
    /// Settings:
    /// - `error_if_exists`: false (allow opening existing DBs)
    /// - `create_if_missing`: true (create new DBs)
    /// - `create_missing_column_families`: true (auto-create CFs)
    pub fn default_for_readwrite() -> Options {
        let mut options = Options::default();
        options.set_error_if_exists(false);
        options.create_if_missing(true);
        options.create_missing_column_families(true);
        options
    }

    /// Default options for read-only mode.
    ///
    /// Settings:
    /// - `error_if_exists`: false
    /// - `create_if_missing`: false (DB must exist)
    /// - `create_missing_column_families`: false (a missing index is fatal)
    /// - `advise_random_on_open`: false (audits are sequential scans)
    pub fn default_for_readonly() -> Options {
        let mut options = Options::default();
        options.set_error_if_exists(false);
        options.create_if_missing(false);
        options.create_missing_column_families(false);
        options.set_advise_random_on_open(false);
        options
    }
}
