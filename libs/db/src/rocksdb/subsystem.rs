//! StorageSubsystem trait and read access abstraction.
//!
//! - `DbAccess`: Object-safe read operations used by index handles
//! - `StorageSubsystem`: Trait defining a subsystem's column families

use anyhow::Result;
use rocksdb::{Cache, ColumnFamilyDescriptor, DB};

use super::config::BlockCacheConfig;

/// Raw entry yielded by [`DbAccess::iterator_cf`].
pub type RawEntry = (Box<[u8]>, Box<[u8]>);

// ============================================================================
// DbAccess Trait
// ============================================================================

/// Abstraction over the opened DB for read operations.
///
/// Index handles only see this trait, so they work the same against a
/// read-only or read-write instance.
pub trait DbAccess: Send + Sync {
    /// Get a value by key from a column family.
    fn get_cf(&self, cf_name: &str, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Get a column family handle by name.
    fn cf_handle(&self, name: &str) -> Option<&rocksdb::ColumnFamily>;

    /// Create an iterator over a column family in ascending key order.
    fn iterator_cf(
        &self,
        cf_name: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<RawEntry>> + '_>>;
}

impl DbAccess for DB {
    fn get_cf(&self, cf_name: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = DB::cf_handle(self, cf_name)
            .ok_or_else(|| anyhow::anyhow!("Column family not found: {}", cf_name))?;
        Ok(DB::get_cf(self, cf, key)?)
    }

    fn cf_handle(&self, name: &str) -> Option<&rocksdb::ColumnFamily> {
        DB::cf_handle(self, name)
    }

    fn iterator_cf(
        &self,
        cf_name: &str,
    ) -> Result<Box<dyn Iterator<Item = Result<RawEntry>> + '_>> {
        let cf = DB::cf_handle(self, cf_name)
            .ok_or_else(|| anyhow::anyhow!("Column family not found: {}", cf_name))?;
        Ok(Box::new(
            DB::iterator_cf(self, cf, rocksdb::IteratorMode::Start)
                .map(|item| item.map_err(|e| anyhow::anyhow!("Iterator error: {}", e))),
        ))
    }
}

// ============================================================================
// StorageSubsystem Trait
// ============================================================================

/// Trait for RocksDB storage subsystems.
///
/// # Example
///
/// ```ignore
/// pub struct Subsystem;
///
/// impl StorageSubsystem for Subsystem {
///     const NAME: &'static str = "localstore";
///     const COLUMN_FAMILIES: &'static [&'static str] = &["localstore/pull", "localstore/push"];
///
///     fn cf_descriptors(cache: &Cache, config: &BlockCacheConfig) -> Vec<ColumnFamilyDescriptor> {
///         // Return CF descriptors with cache configuration
///     }
/// }
/// ```
pub trait StorageSubsystem: Send + Sync + 'static {
    /// Subsystem name for logging and identification.
    const NAME: &'static str;

    /// List of column family names managed by this subsystem.
    const COLUMN_FAMILIES: &'static [&'static str];

    /// Build column family descriptors with shared block cache.
    ///
    /// Called during database initialization to collect all CF descriptors.
    fn cf_descriptors(
        block_cache: &Cache,
        config: &BlockCacheConfig,
    ) -> Vec<ColumnFamilyDescriptor>;
}
