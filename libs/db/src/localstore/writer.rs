//! Writes into a localstore opened read-write.
//!
//! The audit never writes; this exists to build stores for tests and tools.

use anyhow::Result;
use rocksdb::DB;

use super::item::ChunkItem;
use super::schema::{Fields, IndexCodec};
use crate::rocksdb::ColumnFamily;

/// Put/delete access over a writable localstore database.
pub struct StoreWriter<'a> {
    db: &'a DB,
}

impl<'a> StoreWriter<'a> {
    pub fn new(db: &'a DB) -> Self {
        Self { db }
    }

    fn cf(&self, name: &str) -> Result<&'a rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| anyhow::anyhow!("Column family not found: {}", name))
    }

    /// Store `item` in the index described by `codec`.
    pub fn put(&self, codec: &dyn IndexCodec, item: &ChunkItem) -> Result<()> {
        let key = codec.encode_key(item)?;
        let value = codec.encode_value(item)?;
        self.put_raw(codec.cf_name(), &key, &value)
    }

    /// Store raw bytes, bypassing the codec.
    pub fn put_raw(&self, cf_name: &str, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.put_cf(self.cf(cf_name)?, key, value)?;
        Ok(())
    }

    /// Remove `item` from the index described by `codec`.
    pub fn delete(&self, codec: &dyn IndexCodec, item: &ChunkItem) -> Result<()> {
        let key = codec.encode_key(item)?;
        self.db.delete_cf(self.cf(codec.cf_name())?, key)?;
        Ok(())
    }

    pub fn set_u64(&self, field: &str, value: u64) -> Result<()> {
        self.put_raw(Fields::CF_NAME, field.as_bytes(), &value.to_be_bytes())
    }

    pub fn set_string(&self, field: &str, value: &str) -> Result<()> {
        self.put_raw(Fields::CF_NAME, field.as_bytes(), value.as_bytes())
    }
}
