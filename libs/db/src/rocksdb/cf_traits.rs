//! Column family trait definitions.
//!
//! ```text
//!              ColumnFamily
//!             (CF_NAME only)
//!                   │
//!                   ▼
//!        ColumnFamilyConfig<C>
//!   (RocksDB options with a domain config)
//! ```
//!
//! The localstore codecs (`localstore::IndexCodec`) build on `ColumnFamily`
//! so every index has exactly one place declaring where it lives.

use rocksdb::{BlockBasedOptions, Cache, Options};

use super::config::BlockCacheConfig;

// ============================================================================
// Base Trait: ColumnFamily
// ============================================================================

/// Base marker trait for column family types.
///
/// Provides the single source of truth for CF_NAME.
///
/// # Example
///
/// ```rust,ignore
/// impl ColumnFamily for RetrievalData {
///     const CF_NAME: &'static str = "localstore/retrieval_data";
/// }
/// ```
pub trait ColumnFamily {
    /// Column family name (with prefix, e.g., "localstore/pull")
    const CF_NAME: &'static str;
}

// ============================================================================
// Configuration Trait: ColumnFamilyConfig<C>
// ============================================================================

/// RocksDB configuration trait with domain-specific config type.
pub trait ColumnFamilyConfig<C>: ColumnFamily {
    /// Create column family options with shared block cache and config.
    fn cf_options(cache: &Cache, config: &C) -> Options;
}

/// Options shared by every column family: block-based table on the shared cache.
pub fn block_based_options(cache: &Cache, config: &BlockCacheConfig, block_size: usize) -> Options {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    block_opts.set_block_size(block_size);
    block_opts.set_cache_index_and_filter_blocks(config.cache_index_and_filter_blocks);

    let mut opts = Options::default();
    opts.set_block_based_table_factory(&block_opts);
    opts
}
