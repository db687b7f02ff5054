use std::io::Write;
use std::path::PathBuf;

use chunkaudit_db::audit::{Audit, AuditConfig};
use chunkaudit_db::localstore::SCHEMA_CURRENT;
use chunkaudit_db::rocksdb::BlockCacheConfig;
use chunkaudit_db::sharky::DEFAULT_SHARD_COUNT;
use clap::Args as ClapArgs;

#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

#[derive(Debug, ClapArgs)]
pub struct Command {
    /// Path to the localstore directory (holds the index database and `sharky/`)
    #[clap(long, short = 'p', default_value = "./localstore")]
    pub path: PathBuf,

    /// Schema name the store must carry
    #[clap(long, default_value = SCHEMA_CURRENT)]
    pub expected_schema: String,

    /// Number of sharky shard files
    #[clap(long, default_value_t = DEFAULT_SHARD_COUNT)]
    pub shards: u8,

    /// RocksDB block cache size in MiB
    #[clap(long, default_value_t = 64)]
    pub cache_mb: usize,

    /// Exit with status 1 when any finding is reported
    #[clap(long)]
    pub strict: bool,
}

/// Run the audit and print the report. Returns the process exit code.
pub fn run(cmd: &Command) -> i32 {
    trace!("Running command: {:?}", cmd);

    match run_audit(cmd) {
        Ok(clean) if cmd.strict && !clean => 1,
        Ok(_) => 0,
        Err(e) => {
            error!("Audit of {} failed: {:#}", cmd.path.display(), e);
            println!("{:#}", e);
            1
        }
    }
}

/// Returns whether the store audited clean.
fn run_audit(cmd: &Command) -> anyhow::Result<bool> {
    let config = AuditConfig::new(&cmd.path)
        .with_expected_schema(&cmd.expected_schema)
        .with_shards(cmd.shards)
        .with_block_cache(BlockCacheConfig::with_cache_size(cache_bytes(cmd.cache_mb)));
    let audit = Audit::open(config)?;

    println!("Starting check for localstore at {}...", cmd.path.display());
    let report = audit.run()?;
    println!("Check complete");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report.render(&mut out)?;
    out.flush()?;

    Ok(report.is_clean())
}

/// Cache size in bytes for `--cache-mb`; clamps instead of overflowing.
fn cache_bytes(cache_mb: usize) -> usize {
    cache_mb.saturating_mul(1024 * 1024)
}
