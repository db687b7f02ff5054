//! Common RocksDB storage infrastructure.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                StorageSubsystem Trait                 │
//! │           Defines: name, column families              │
//! └───────────────────────────────────────────────────────┘
//!                           ▲
//!                           │ implements
//!                 ┌─────────┴──────────┐
//!                 │ localstore::Subsys │
//!                 └────────────────────┘
//!                           │
//!                           ▼
//!                 ┌────────────────────┐
//!                 │ Storage<Subsystem> │   ← Generic Storage<S>
//!                 └────────────────────┘
//! ```
//!
//! ```ignore
//! let mut storage = localstore::Storage::readonly(path);
//! storage.ready()?;
//! let indexes = localstore::Indexes::open(storage.db_access()?, "sharky")?;
//! ```

mod cf_traits;
mod config;
mod handle;
mod storage;
mod subsystem;

// Re-exports
pub use cf_traits::{block_based_options, ColumnFamily, ColumnFamilyConfig};
pub use config::BlockCacheConfig;
pub use handle::{DatabaseHandle, StorageMode, StorageOptions};
pub use storage::Storage;
pub use subsystem::{DbAccess, RawEntry, StorageSubsystem};
