//! Localstore: the chunk indexes kept in RocksDB.
//!
//! One column family per index plus `localstore/fields` for scalar values.
//! See [`schema`] for the key/value layouts.

mod index;
mod item;
pub mod schema;
mod subsystem;
mod writer;


pub use index::{Index, Indexes, StringField, Uint64Field};
pub use item::{ChunkItem, ADDRESS_SIZE};
pub use schema::{IndexCodec, PRIMARY_INDEX, SCHEMA_CURRENT, SECONDARY_INDEXES};
pub use subsystem::Subsystem;
pub use writer::StoreWriter;

/// RocksDB storage for a localstore.
pub type Storage = crate::rocksdb::Storage<Subsystem>;
