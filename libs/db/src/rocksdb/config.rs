//! Configuration types for RocksDB storage.

// ============================================================================
// BlockCacheConfig
// ============================================================================

/// Configuration for RocksDB block cache.
///
/// An audit reads every index exactly once, so the cache mostly serves the
/// point lookups against the primary index made by the referential checks.
#[derive(Debug, Clone)]
pub struct BlockCacheConfig {
    /// Total block cache size in bytes.
    /// Default: 64MB.
    pub cache_size_bytes: usize,

    /// Default block size for column families.
    /// Default: 4KB. Secondary index entries are a few dozen bytes each.
    pub default_block_size: usize,

    /// Block size for the primary index, whose values carry stamps.
    /// Default: 16KB.
    pub large_block_size: usize,

    /// Whether to cache index and filter blocks in the block cache.
    /// Default: true.
    pub cache_index_and_filter_blocks: bool,
}

impl Default for BlockCacheConfig {
    fn default() -> Self {
        Self {
            cache_size_bytes: 64 * 1024 * 1024, // 64MB
            default_block_size: 4 * 1024,       // 4KB
            large_block_size: 16 * 1024,        // 16KB
            cache_index_and_filter_blocks: true,
        }
    }
}

impl BlockCacheConfig {
    /// Create config with specified cache size, using defaults for other settings.
    pub fn with_cache_size(cache_size_bytes: usize) -> Self {
        Self {
            cache_size_bytes,
            ..Default::default()
        }
    }
}
