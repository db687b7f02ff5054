//! Offline consistency audit of a localstore.
//!
//! The audit runs four checks in order, each a single sequential pass:
//! 1. every secondary index against the primary index
//! 2. the gc/reserve counters against the primary count
//! 3. every primary record's blob against its address
//! 4. the findings are collected into a [`Report`]
//!
//! Nothing is written. The store is assumed to have no concurrent writer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chunkaudit_db::audit::{Audit, AuditConfig};
//!
//! let audit = Audit::open(AuditConfig::new("./localstore"))?;
//! let report = audit.run()?;
//! report.render(&mut std::io::stdout())?;
//! ```

mod content;
mod counters;
mod referential;
mod report;

pub use content::check_content;
pub use counters::{check_counters, counter_bound_violation};
pub use referential::check_indexes;
pub use report::Report;

use std::path::PathBuf;

use anyhow::Result;

use crate::localstore::{self, Indexes, SCHEMA_CURRENT};
use crate::rocksdb::BlockCacheConfig;
use crate::sharky::{self, DEFAULT_SHARD_COUNT};
use crate::swarm::SOC_MAX_CHUNK_SIZE;

/// Name of the blob store directory under the store root.
pub const SHARKY_DIR: &str = "sharky";

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for an audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Store root holding the RocksDB files and the blob directory.
    pub path: PathBuf,

    /// Schema name the store must carry.
    /// Default: "sharky"
    pub expected_schema: String,

    /// Number of blob shard files.
    /// Default: 32
    pub shards: u8,

    /// Blob slot size.
    /// Default: largest single-owner chunk
    pub max_chunk_size: usize,

    /// RocksDB block cache used while scanning.
    pub block_cache: BlockCacheConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./localstore"),
            expected_schema: SCHEMA_CURRENT.to_string(),
            shards: DEFAULT_SHARD_COUNT,
            max_chunk_size: SOC_MAX_CHUNK_SIZE,
            block_cache: BlockCacheConfig::default(),
        }
    }
}

impl AuditConfig {
    /// Default config for the store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_expected_schema(mut self, schema: impl Into<String>) -> Self {
        self.expected_schema = schema.into();
        self
    }

    pub fn with_shards(mut self, shards: u8) -> Self {
        self.shards = shards;
        self
    }

    pub fn with_block_cache(mut self, config: BlockCacheConfig) -> Self {
        self.block_cache = config;
        self
    }

    /// Blob store directory.
    pub fn sharky_dir(&self) -> PathBuf {
        self.path.join(SHARKY_DIR)
    }
}

// ============================================================================
// Audit
// ============================================================================

/// An opened store ready to be audited.
///
/// Opening checks every precondition: the store path and blob directory
/// exist, the database opens read-only with all column families, and the
/// schema name matches. Both stores are released when the audit is dropped.
pub struct Audit {
    config: AuditConfig,
    storage: localstore::Storage,
    blobs: sharky::Store,
}

impl Audit {
    pub fn open(config: AuditConfig) -> Result<Self> {
        if !config.path.is_dir() {
            anyhow::bail!("store path not found: {}", config.path.display());
        }
        let sharky_dir = config.sharky_dir();
        if !sharky_dir.is_dir() {
            anyhow::bail!("sharky directory not found: {}", sharky_dir.display());
        }

        let mut storage = localstore::Storage::readonly(&config.path)
            .with_block_cache_config(config.block_cache.clone());
        storage.ready()?;

        // Fail on schema mismatch before touching the blobs.
        Indexes::open(storage.db_access()?, &config.expected_schema)?;

        let blobs = sharky::Store::open(&sharky_dir, config.shards, config.max_chunk_size)?;

        Ok(Self {
            config,
            storage,
            blobs,
        })
    }

    /// Run every check and collect the findings.
    pub fn run(&self) -> Result<Report> {
        let indexes = Indexes::open(self.storage.db_access()?, &self.config.expected_schema)?;
        let primary = &indexes.retrieval_data;
        let mut report = Report::new();

        tracing::info!(indexes = indexes.secondary.len(), "Checking secondary indexes");
        for index in &indexes.secondary {
            let findings = check_indexes(index, primary);
            tracing::info!(
                index = index.name(),
                violations = findings.len(),
                "Index checked"
            );
            report.extend_inconsistencies(findings);
        }

        tracing::info!("Checking counters");
        report.extend_inconsistencies(check_counters(
            &indexes.gc_size,
            &indexes.reserve_size,
            primary,
        ));

        tracing::info!(index = primary.name(), "Checking chunk content");
        let checked = check_content(primary, &self.blobs, &mut report);

        tracing::info!(
            checked,
            inconsistencies = report.inconsistencies().len(),
            corruptions = report.corruptions().len(),
            "Audit completed"
        );
        Ok(report)
    }
}
