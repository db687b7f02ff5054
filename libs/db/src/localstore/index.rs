//! Index handles and the registry opened against a localstore.
//!
//! - `Index`: one codec bound to its column family (iterate, scan, has, count)
//! - `Uint64Field` / `StringField`: named scalars in the fields column family
//! - `Indexes`: every index plus the counters, checked against the schema name

use anyhow::{Context, Result};

use super::item::ChunkItem;
use super::schema::{Fields, IndexCodec, PRIMARY_INDEX, SECONDARY_INDEXES};
use crate::rocksdb::{ColumnFamily, DbAccess};

// ============================================================================
// Index
// ============================================================================

/// A codec bound to an opened database.
#[derive(Clone, Copy)]
pub struct Index<'a> {
    db: &'a dyn DbAccess,
    codec: &'static dyn IndexCodec,
}

impl<'a> Index<'a> {
    /// Bind `codec` to `db`; fails when its column family does not exist.
    pub fn open(db: &'a dyn DbAccess, codec: &'static dyn IndexCodec) -> Result<Self> {
        if db.cf_handle(codec.cf_name()).is_none() {
            anyhow::bail!(
                "cannot open index {}: column family {} not found",
                codec.name(),
                codec.cf_name()
            );
        }
        Ok(Self { db, codec })
    }

    pub fn name(&self) -> &'static str {
        self.codec.name()
    }

    /// Visit every entry in ascending key order.
    ///
    /// The visitor returns `Ok(true)` to stop early. A decode failure or a
    /// visitor error aborts the iteration and is returned.
    pub fn iterate<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(ChunkItem) -> Result<bool>,
    {
        self.scan(|entry| visit(entry?))
    }

    /// Like [`Index::iterate`], but an entry that fails to decode is handed
    /// to the visitor as an `Err` and the scan goes on.
    ///
    /// Only engine iterator errors and visitor errors end the scan early.
    pub fn scan<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(Result<ChunkItem>) -> Result<bool>,
    {
        for entry in self.db.iterator_cf(self.codec.cf_name())? {
            let (key, value) = entry?;
            if visit(self.decode_entry(&key, &value))? {
                break;
            }
        }
        Ok(())
    }

    fn decode_entry(&self, key: &[u8], value: &[u8]) -> Result<ChunkItem> {
        let key_item = self
            .codec
            .decode_key(key)
            .with_context(|| format!("{}: decode key {}", self.name(), hex::encode(key)))?;
        let value_item = self
            .codec
            .decode_value(&key_item, value)
            .with_context(|| format!("{}: decode value of {}", self.name(), hex::encode(key)))?;
        Ok(key_item.merge(value_item))
    }

    /// Point lookup by the item's encoded key.
    pub fn has(&self, item: &ChunkItem) -> Result<bool> {
        let key = self.codec.encode_key(item)?;
        Ok(self.db.get_cf(self.codec.cf_name(), &key)?.is_some())
    }

    /// Fetch the full record stored under the item's key.
    pub fn get(&self, item: &ChunkItem) -> Result<Option<ChunkItem>> {
        let key = self.codec.encode_key(item)?;
        match self.db.get_cf(self.codec.cf_name(), &key)? {
            Some(value) => {
                let key_item = self.codec.decode_key(&key)?;
                let value_item = self.codec.decode_value(&key_item, &value)?;
                Ok(Some(key_item.merge(value_item)))
            }
            None => Ok(None),
        }
    }

    /// Exact number of entries.
    pub fn count(&self) -> Result<u64> {
        let mut count = 0u64;
        for entry in self.db.iterator_cf(self.codec.cf_name())? {
            entry?;
            count += 1;
        }
        Ok(count)
    }
}

impl std::fmt::Debug for Index<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index").field("codec", &self.codec).finish()
    }
}

// ============================================================================
// Scalar fields
// ============================================================================

/// Big-endian `u64` stored under a name; absent reads as 0.
pub struct Uint64Field<'a> {
    db: &'a dyn DbAccess,
    name: &'static str,
}

impl<'a> Uint64Field<'a> {
    pub fn new(db: &'a dyn DbAccess, name: &'static str) -> Self {
        Self { db, name }
    }

    pub fn get(&self) -> Result<u64> {
        match self.db.get_cf(Fields::CF_NAME, self.name.as_bytes())? {
            None => Ok(0),
            Some(bytes) => {
                let buf: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    anyhow::anyhow!(
                        "field {}: expected 8 bytes, got {}",
                        self.name,
                        bytes.len()
                    )
                })?;
                Ok(u64::from_be_bytes(buf))
            }
        }
    }
}

impl std::fmt::Debug for Uint64Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uint64Field").field("name", &self.name).finish()
    }
}

/// UTF-8 string stored under a name; absent reads as empty.
pub struct StringField<'a> {
    db: &'a dyn DbAccess,
    name: &'static str,
}

impl<'a> StringField<'a> {
    pub fn new(db: &'a dyn DbAccess, name: &'static str) -> Self {
        Self { db, name }
    }

    pub fn get(&self) -> Result<String> {
        match self.db.get_cf(Fields::CF_NAME, self.name.as_bytes())? {
            None => Ok(String::new()),
            Some(bytes) => String::from_utf8(bytes)
                .with_context(|| format!("field {} is not valid UTF-8", self.name)),
        }
    }
}

// ============================================================================
// Indexes
// ============================================================================

/// Every localstore index and counter opened over one database.
#[derive(Debug)]
pub struct Indexes<'a> {
    pub retrieval_data: Index<'a>,
    pub secondary: Vec<Index<'a>>,
    pub gc_size: Uint64Field<'a>,
    pub reserve_size: Uint64Field<'a>,
}

impl<'a> Indexes<'a> {
    /// Open all indexes, failing when the stored schema name is not
    /// `expected_schema` or any index column family is missing.
    pub fn open(db: &'a dyn DbAccess, expected_schema: &str) -> Result<Self> {
        if db.cf_handle(Fields::CF_NAME).is_none() {
            anyhow::bail!("column family {} not found", Fields::CF_NAME);
        }
        let schema = StringField::new(db, Fields::SCHEMA_NAME)
            .get()
            .context("failed reading schema")?;
        if schema != expected_schema {
            anyhow::bail!(
                "incorrect schema {:?}, needs {}",
                schema,
                expected_schema
            );
        }

        let retrieval_data = Index::open(db, PRIMARY_INDEX)?;
        let secondary = SECONDARY_INDEXES
            .iter()
            .map(|codec| Index::open(db, *codec))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            schema = %schema,
            indexes = secondary.len() + 1,
            "Opened localstore indexes"
        );

        Ok(Self {
            retrieval_data,
            secondary,
            gc_size: Uint64Field::new(db, Fields::GC_SIZE),
            reserve_size: Uint64Field::new(db, Fields::RESERVE_SIZE),
        })
    }
}
