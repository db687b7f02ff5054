//! Localstore schema: the eight chunk indexes and the scalar fields.
//!
//! Every index is a column family whose entries encode a [`ChunkItem`]. The
//! primary index (`retrievalData`) is keyed by address; the seven secondary
//! indexes are materialized views over the same addresses keyed for their own
//! access pattern.
//!
//! | Index | Key | Value |
//! |---|---|---|
//! | retrievalData | Address | BinID(8) \| StoreTimestamp(8) \| Stamp(113) \| Location |
//! | retrievalAccess | Address | AccessTimestamp(8) |
//! | pull | PO(1) \| BinID(8) | Address(32) \| BatchID(32) |
//! | push | StoreTimestamp(8) \| Address(32) | Tag(4, optional) |
//! | gc | AccessTimestamp(8) \| BinID(8) \| Address | BatchID(32) \| Index(8) |
//! | pin | Address | PinCounter(8) |
//! | postageChunks | BatchID(32) \| PO(1) \| Address(32) | empty |
//! | postageIndex | BatchID(32) \| Index(8) | Address(32) \| Timestamp(8) |
//!
//! Integers are big-endian. Decoders reject input shorter than the fixed
//! header; variable-length tails are sliced from the header offset.

use anyhow::Result;
use rocksdb::{Cache, Options};

use super::item::{ChunkItem, ADDRESS_SIZE};
use crate::postage::{Stamp, BATCH_ID_SIZE, INDEX_SIZE, STAMP_SIZE, TIMESTAMP_SIZE};
use crate::rocksdb::{block_based_options, BlockCacheConfig, ColumnFamily, ColumnFamilyConfig};

/// Schema name of stores this auditor understands.
pub const SCHEMA_CURRENT: &str = "sharky";

// ============================================================================
// IndexCodec
// ============================================================================

/// Encode/decode contract binding an index to [`ChunkItem`].
///
/// `decode_key(encode_key(item))` and `decode_value(_, encode_value(item))`
/// reconstruct exactly the fields the index stores and nothing else.
pub trait IndexCodec: Send + Sync {
    /// Column family holding the index.
    fn cf_name(&self) -> &'static str;

    /// Name used in audit findings.
    fn name(&self) -> &'static str;

    /// Key/value layout, `Key->Value`.
    fn layout(&self) -> &'static str;

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>>;

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem>;

    fn encode_value(&self, item: &ChunkItem) -> Result<Vec<u8>>;

    fn decode_value(&self, key_item: &ChunkItem, value: &[u8]) -> Result<ChunkItem>;
}

impl std::fmt::Debug for dyn IndexCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCodec")
            .field("name", &self.name())
            .field("cf", &self.cf_name())
            .finish()
    }
}

// ============================================================================
// Byte helpers
// ============================================================================

fn fixed<'a>(what: &str, field: &'a [u8], size: usize) -> Result<&'a [u8]> {
    if field.len() != size {
        anyhow::bail!(
            "invalid {}: expected {} bytes, got {}",
            what,
            size,
            field.len()
        );
    }
    Ok(field)
}

fn ensure_len(what: &str, bytes: &[u8], min: usize) -> Result<()> {
    if bytes.len() < min {
        anyhow::bail!(
            "{} too short: expected at least {} bytes, got {}",
            what,
            min,
            bytes.len()
        );
    }
    Ok(())
}

fn be_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(buf)
}

fn encode_address_key(item: &ChunkItem) -> Result<Vec<u8>> {
    Ok(fixed("address", &item.address, ADDRESS_SIZE)?.to_vec())
}

fn decode_address_key(key: &[u8]) -> Result<ChunkItem> {
    fixed("address key", key, ADDRESS_SIZE)?;
    Ok(ChunkItem::with_address(key))
}

// ============================================================================
// retrievalData (primary)
// ============================================================================

/// Canonical chunk record: `Address -> BinID | StoreTimestamp | Stamp | Location`.
pub struct RetrievalData;

impl RetrievalData {
    /// Fixed part of the value preceding the location.
    pub const HEADER_SIZE: usize = 16 + STAMP_SIZE;
}

impl ColumnFamily for RetrievalData {
    const CF_NAME: &'static str = "localstore/retrieval_data";
}

impl ColumnFamilyConfig<BlockCacheConfig> for RetrievalData {
    fn cf_options(cache: &Cache, config: &BlockCacheConfig) -> Options {
        block_based_options(cache, config, config.large_block_size)
    }
}

impl IndexCodec for RetrievalData {
    fn cf_name(&self) -> &'static str {
        Self::CF_NAME
    }

    fn name(&self) -> &'static str {
        "retrievalDataIndex"
    }

    fn layout(&self) -> &'static str {
        "Address->BinID|StoreTimestamp|BatchID|BatchIndex|Timestamp|Sig|Location"
    }

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        encode_address_key(item)
    }

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem> {
        decode_address_key(key)
    }

    fn encode_value(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut value = Vec::with_capacity(Self::HEADER_SIZE + item.location.len());
        value.extend_from_slice(&item.bin_id.to_be_bytes());
        value.extend_from_slice(&(item.store_timestamp as u64).to_be_bytes());
        value.extend_from_slice(&item.stamp().to_bytes()?);
        value.extend_from_slice(&item.location);
        Ok(value)
    }

    fn decode_value(&self, _key_item: &ChunkItem, value: &[u8]) -> Result<ChunkItem> {
        ensure_len("retrievalData value", value, Self::HEADER_SIZE)?;
        let mut item = ChunkItem {
            bin_id: be_u64(&value[..8]),
            store_timestamp: be_u64(&value[8..16]) as i64,
            location: value[Self::HEADER_SIZE..].to_vec(),
            ..Default::default()
        };
        item.set_stamp(Stamp::from_bytes(&value[16..Self::HEADER_SIZE])?);
        Ok(item)
    }
}

// ============================================================================
// retrievalAccess
// ============================================================================

/// Last-read tracking: `Address -> AccessTimestamp`.
pub struct RetrievalAccess;

impl ColumnFamily for RetrievalAccess {
    const CF_NAME: &'static str = "localstore/retrieval_access";
}

impl IndexCodec for RetrievalAccess {
    fn cf_name(&self) -> &'static str {
        Self::CF_NAME
    }

    fn name(&self) -> &'static str {
        "retrievalAccessIdx"
    }

    fn layout(&self) -> &'static str {
        "Address->AccessTimestamp"
    }

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        encode_address_key(item)
    }

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem> {
        decode_address_key(key)
    }

    fn encode_value(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        Ok((item.access_timestamp as u64).to_be_bytes().to_vec())
    }

    fn decode_value(&self, _key_item: &ChunkItem, value: &[u8]) -> Result<ChunkItem> {
        ensure_len("retrievalAccess value", value, 8)?;
        Ok(ChunkItem {
            access_timestamp: be_u64(value) as i64,
            ..Default::default()
        })
    }
}

// ============================================================================
// pull
// ============================================================================

/// Per-bin sync ordering: `PO | BinID -> Address | BatchID`.
pub struct Pull;

impl Pull {
    pub const KEY_SIZE: usize = 1 + 8;
    pub const VALUE_SIZE: usize = ADDRESS_SIZE + BATCH_ID_SIZE;
}

impl ColumnFamily for Pull {
    const CF_NAME: &'static str = "localstore/pull";
}

impl IndexCodec for Pull {
    fn cf_name(&self) -> &'static str {
        Self::CF_NAME
    }

    fn name(&self) -> &'static str {
        "pullIdx"
    }

    fn layout(&self) -> &'static str {
        "PO|BinID->Hash|BatchID"
    }

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut key = Vec::with_capacity(Self::KEY_SIZE);
        key.push(item.proximity);
        key.extend_from_slice(&item.bin_id.to_be_bytes());
        Ok(key)
    }

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem> {
        ensure_len("pull key", key, Self::KEY_SIZE)?;
        Ok(ChunkItem {
            proximity: key[0],
            bin_id: be_u64(&key[1..9]),
            ..Default::default()
        })
    }

    fn encode_value(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut value = Vec::with_capacity(Self::VALUE_SIZE);
        value.extend_from_slice(fixed("address", &item.address, ADDRESS_SIZE)?);
        value.extend_from_slice(fixed("batch id", &item.batch_id, BATCH_ID_SIZE)?);
        Ok(value)
    }

    fn decode_value(&self, _key_item: &ChunkItem, value: &[u8]) -> Result<ChunkItem> {
        ensure_len("pull value", value, Self::VALUE_SIZE)?;
        Ok(ChunkItem {
            address: value[..ADDRESS_SIZE].to_vec(),
            batch_id: value[ADDRESS_SIZE..Self::VALUE_SIZE].to_vec(),
            ..Default::default()
        })
    }
}

// ============================================================================
// push
// ============================================================================

/// Pending-sync queue: `StoreTimestamp | Address -> Tag`.
pub struct Push;

impl Push {
    pub const KEY_SIZE: usize = 8 + ADDRESS_SIZE;
    pub const TAG_SIZE: usize = 4;
}

impl ColumnFamily for Push {
    const CF_NAME: &'static str = "localstore/push";
}

impl IndexCodec for Push {
    fn cf_name(&self) -> &'static str {
        Self::CF_NAME
    }

    fn name(&self) -> &'static str {
        "pushIdx"
    }

    fn layout(&self) -> &'static str {
        "StoreTimestamp|Hash->Tags"
    }

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut key = Vec::with_capacity(Self::KEY_SIZE);
        key.extend_from_slice(&(item.store_timestamp as u64).to_be_bytes());
        key.extend_from_slice(fixed("address", &item.address, ADDRESS_SIZE)?);
        Ok(key)
    }

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem> {
        ensure_len("push key", key, Self::KEY_SIZE)?;
        Ok(ChunkItem {
            store_timestamp: be_u64(&key[..8]) as i64,
            address: key[8..Self::KEY_SIZE].to_vec(),
            ..Default::default()
        })
    }

    fn encode_value(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        Ok(item.tag.to_be_bytes().to_vec())
    }

    fn decode_value(&self, _key_item: &ChunkItem, value: &[u8]) -> Result<ChunkItem> {
        let tag = match value.len() {
            0 => 0,
            Self::TAG_SIZE => {
                let mut buf = [0u8; Self::TAG_SIZE];
                buf.copy_from_slice(value);
                u32::from_be_bytes(buf)
            }
            n => anyhow::bail!(
                "invalid push tag: expected 0 or {} bytes, got {}",
                Self::TAG_SIZE,
                n
            ),
        };
        Ok(ChunkItem {
            tag,
            ..Default::default()
        })
    }
}

// ============================================================================
// gc
// ============================================================================

/// Eviction ordering: `AccessTimestamp | BinID | Address -> BatchID | Index`.
pub struct Gc;

impl Gc {
    /// Fixed part of the key preceding the address.
    pub const KEY_HEADER_SIZE: usize = 16;
    pub const VALUE_SIZE: usize = BATCH_ID_SIZE + INDEX_SIZE;
}

impl ColumnFamily for Gc {
    const CF_NAME: &'static str = "localstore/gc";
}

impl IndexCodec for Gc {
    fn cf_name(&self) -> &'static str {
        Self::CF_NAME
    }

    fn name(&self) -> &'static str {
        "gcIdx"
    }

    fn layout(&self) -> &'static str {
        "AccessTimestamp|BinID|Hash->BatchID|BatchIndex"
    }

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut key = Vec::with_capacity(Self::KEY_HEADER_SIZE + item.address.len());
        key.extend_from_slice(&(item.access_timestamp as u64).to_be_bytes());
        key.extend_from_slice(&item.bin_id.to_be_bytes());
        key.extend_from_slice(&item.address);
        Ok(key)
    }

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem> {
        ensure_len("gc key", key, Self::KEY_HEADER_SIZE)?;
        Ok(ChunkItem {
            access_timestamp: be_u64(&key[..8]) as i64,
            bin_id: be_u64(&key[8..16]),
            address: key[Self::KEY_HEADER_SIZE..].to_vec(),
            ..Default::default()
        })
    }

    fn encode_value(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut value = Vec::with_capacity(Self::VALUE_SIZE);
        value.extend_from_slice(fixed("batch id", &item.batch_id, BATCH_ID_SIZE)?);
        value.extend_from_slice(fixed("batch index", &item.index, INDEX_SIZE)?);
        Ok(value)
    }

    fn decode_value(&self, _key_item: &ChunkItem, value: &[u8]) -> Result<ChunkItem> {
        ensure_len("gc value", value, Self::VALUE_SIZE)?;
        Ok(ChunkItem {
            batch_id: value[..BATCH_ID_SIZE].to_vec(),
            index: value[BATCH_ID_SIZE..Self::VALUE_SIZE].to_vec(),
            ..Default::default()
        })
    }
}

// ============================================================================
// pin
// ============================================================================

/// Pin reference counts: `Address -> PinCounter`.
pub struct Pin;

impl ColumnFamily for Pin {
    const CF_NAME: &'static str = "localstore/pin";
}

impl IndexCodec for Pin {
    fn cf_name(&self) -> &'static str {
        Self::CF_NAME
    }

    fn name(&self) -> &'static str {
        "pinIdx"
    }

    fn layout(&self) -> &'static str {
        "Hash->PinCounter"
    }

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        encode_address_key(item)
    }

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem> {
        decode_address_key(key)
    }

    fn encode_value(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        Ok(item.pin_counter.to_be_bytes().to_vec())
    }

    fn decode_value(&self, _key_item: &ChunkItem, value: &[u8]) -> Result<ChunkItem> {
        ensure_len("pin value", value, 8)?;
        Ok(ChunkItem {
            pin_counter: be_u64(value),
            ..Default::default()
        })
    }
}

// ============================================================================
// postageChunks
// ============================================================================

/// Chunks grouped by batch: `BatchID | PO | Address -> nil`.
pub struct PostageChunks;

impl PostageChunks {
    pub const KEY_SIZE: usize = BATCH_ID_SIZE + 1 + ADDRESS_SIZE;
}

impl ColumnFamily for PostageChunks {
    const CF_NAME: &'static str = "localstore/postage_chunks";
}

impl IndexCodec for PostageChunks {
    fn cf_name(&self) -> &'static str {
        Self::CF_NAME
    }

    fn name(&self) -> &'static str {
        "postageChunksIdx"
    }

    fn layout(&self) -> &'static str {
        "BatchID|PO|Hash->nil"
    }

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut key = Vec::with_capacity(Self::KEY_SIZE);
        key.extend_from_slice(fixed("batch id", &item.batch_id, BATCH_ID_SIZE)?);
        key.push(item.proximity);
        key.extend_from_slice(fixed("address", &item.address, ADDRESS_SIZE)?);
        Ok(key)
    }

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem> {
        ensure_len("postageChunks key", key, Self::KEY_SIZE)?;
        Ok(ChunkItem {
            batch_id: key[..BATCH_ID_SIZE].to_vec(),
            proximity: key[BATCH_ID_SIZE],
            address: key[BATCH_ID_SIZE + 1..Self::KEY_SIZE].to_vec(),
            ..Default::default()
        })
    }

    fn encode_value(&self, _item: &ChunkItem) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn decode_value(&self, _key_item: &ChunkItem, _value: &[u8]) -> Result<ChunkItem> {
        Ok(ChunkItem::default())
    }
}

// ============================================================================
// postageIndex
// ============================================================================

/// Batch slot resolution: `BatchID | Index -> Address | Timestamp`.
pub struct PostageIndex;

impl PostageIndex {
    pub const KEY_SIZE: usize = BATCH_ID_SIZE + INDEX_SIZE;
    pub const VALUE_SIZE: usize = ADDRESS_SIZE + TIMESTAMP_SIZE;
}

impl ColumnFamily for PostageIndex {
    const CF_NAME: &'static str = "localstore/postage_index";
}

impl IndexCodec for PostageIndex {
    fn cf_name(&self) -> &'static str {
        Self::CF_NAME
    }

    fn name(&self) -> &'static str {
        "postageIndexIdx"
    }

    fn layout(&self) -> &'static str {
        "BatchID|BatchIndex->Hash|Timestamp"
    }

    fn encode_key(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut key = Vec::with_capacity(Self::KEY_SIZE);
        key.extend_from_slice(fixed("batch id", &item.batch_id, BATCH_ID_SIZE)?);
        key.extend_from_slice(fixed("batch index", &item.index, INDEX_SIZE)?);
        Ok(key)
    }

    fn decode_key(&self, key: &[u8]) -> Result<ChunkItem> {
        ensure_len("postageIndex key", key, Self::KEY_SIZE)?;
        Ok(ChunkItem {
            batch_id: key[..BATCH_ID_SIZE].to_vec(),
            index: key[BATCH_ID_SIZE..Self::KEY_SIZE].to_vec(),
            ..Default::default()
        })
    }

    fn encode_value(&self, item: &ChunkItem) -> Result<Vec<u8>> {
        let mut value = Vec::with_capacity(Self::VALUE_SIZE);
        value.extend_from_slice(fixed("address", &item.address, ADDRESS_SIZE)?);
        value.extend_from_slice(fixed("timestamp", &item.timestamp, TIMESTAMP_SIZE)?);
        Ok(value)
    }

    fn decode_value(&self, _key_item: &ChunkItem, value: &[u8]) -> Result<ChunkItem> {
        ensure_len("postageIndex value", value, Self::VALUE_SIZE)?;
        Ok(ChunkItem {
            address: value[..ADDRESS_SIZE].to_vec(),
            timestamp: value[ADDRESS_SIZE..Self::VALUE_SIZE].to_vec(),
            ..Default::default()
        })
    }
}

// ============================================================================
// Scalar fields
// ============================================================================

/// Named scalar values stored outside any index.
pub struct Fields;

impl Fields {
    /// String naming the schema the store was written with.
    pub const SCHEMA_NAME: &'static str = "schema-name";
    /// Cached number of chunks eligible for garbage collection.
    pub const GC_SIZE: &'static str = "gc-size";
    /// Cached number of chunks held in the reserve.
    pub const RESERVE_SIZE: &'static str = "reserve-size";

    pub const ALL: [&'static str; 3] = [Self::SCHEMA_NAME, Self::GC_SIZE, Self::RESERVE_SIZE];
}

impl ColumnFamily for Fields {
    const CF_NAME: &'static str = "localstore/fields";
}

macro_rules! default_cf_config {
    ($($cf:ty),+ $(,)?) => {
        $(
            impl ColumnFamilyConfig<BlockCacheConfig> for $cf {
                fn cf_options(cache: &Cache, config: &BlockCacheConfig) -> Options {
                    block_based_options(cache, config, config.default_block_size)
                }
            }
        )+
    };
}

default_cf_config!(RetrievalAccess, Pull, Push, Gc, Pin, PostageChunks, PostageIndex, Fields);

// ============================================================================
// Registry tables
// ============================================================================

/// The primary index every secondary index must agree with.
pub const PRIMARY_INDEX: &dyn IndexCodec = &RetrievalData;

/// Secondary indexes in audit order.
pub const SECONDARY_INDEXES: [&dyn IndexCodec; 7] = [
    &RetrievalAccess,
    &Pull,
    &Push,
    &Gc,
    &Pin,
    &PostageChunks,
    &PostageIndex,
];

/// Every column family of the localstore subsystem.
pub const COLUMN_FAMILIES: &[&str] = &[
    RetrievalData::CF_NAME,
    RetrievalAccess::CF_NAME,
    Pull::CF_NAME,
    Push::CF_NAME,
    Gc::CF_NAME,
    Pin::CF_NAME,
    PostageChunks::CF_NAME,
    PostageIndex::CF_NAME,
    Fields::CF_NAME,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Vec<u8> {
        vec![b; ADDRESS_SIZE]
    }

    fn full_item() -> ChunkItem {
        ChunkItem {
            address: addr(0xaa),
            bin_id: 42,
            store_timestamp: 1_650_000_000,
            access_timestamp: 1_650_000_500,
            batch_id: vec![0xbb; BATCH_ID_SIZE],
            index: vec![0, 0, 0, 1, 0, 0, 0, 2],
            timestamp: 1_650_000_000u64.to_be_bytes().to_vec(),
            sig: vec![0xcc; crate::postage::SIGNATURE_SIZE],
            location: vec![1, 2, 0, 0, 0, 16, 0],
            tag: 77,
            pin_counter: 3,
            proximity: 5,
        }
    }

    fn round_trip(codec: &dyn IndexCodec, item: &ChunkItem) -> ChunkItem {
        let key = codec.encode_key(item).unwrap();
        let value = codec.encode_value(item).unwrap();
        let key_item = codec.decode_key(&key).unwrap();
        let value_item = codec.decode_value(&key_item, &value).unwrap();
        key_item.merge(value_item)
    }

    #[test]
    fn test_retrieval_data_round_trip() {
        let item = full_item();
        let decoded = round_trip(&RetrievalData, &item);
        assert_eq!(
            decoded,
            ChunkItem {
                address: item.address.clone(),
                bin_id: item.bin_id,
                store_timestamp: item.store_timestamp,
                batch_id: item.batch_id.clone(),
                index: item.index.clone(),
                timestamp: item.timestamp.clone(),
                sig: item.sig.clone(),
                location: item.location.clone(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_retrieval_data_value_layout() {
        let item = full_item();
        let value = RetrievalData.encode_value(&item).unwrap();
        assert_eq!(value.len(), RetrievalData::HEADER_SIZE + item.location.len());
        assert_eq!(&value[..8], &42u64.to_be_bytes());
        assert_eq!(&value[16..48], item.batch_id.as_slice());
        assert_eq!(&value[RetrievalData::HEADER_SIZE..], item.location.as_slice());
    }

    #[test]
    fn test_retrieval_data_short_value_fails() {
        let err = RetrievalData
            .decode_value(&ChunkItem::default(), &[0u8; RetrievalData::HEADER_SIZE - 1])
            .unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_retrieval_data_empty_location() {
        let mut item = full_item();
        item.location.clear();
        let value = RetrievalData.encode_value(&item).unwrap();
        let decoded = RetrievalData.decode_value(&ChunkItem::default(), &value).unwrap();
        assert!(decoded.location.is_empty());
    }

    #[test]
    fn test_retrieval_data_requires_stamp() {
        let item = ChunkItem::with_address(addr(1));
        assert!(RetrievalData.encode_value(&item).is_err());
    }

    #[test]
    fn test_retrieval_access_round_trip() {
        let item = full_item();
        let decoded = round_trip(&RetrievalAccess, &item);
        assert_eq!(decoded.address, item.address);
        assert_eq!(decoded.access_timestamp, item.access_timestamp);
        assert_eq!(decoded.bin_id, 0);
    }

    #[test]
    fn test_negative_timestamp_round_trip() {
        let mut item = full_item();
        item.access_timestamp = -5;
        assert_eq!(round_trip(&RetrievalAccess, &item).access_timestamp, -5);
    }

    #[test]
    fn test_pull_round_trip() {
        let item = full_item();
        let key = Pull.encode_key(&item).unwrap();
        assert_eq!(key.len(), Pull::KEY_SIZE);
        assert_eq!(key[0], 5);

        let decoded = round_trip(&Pull, &item);
        assert_eq!(
            decoded,
            ChunkItem {
                address: item.address.clone(),
                bin_id: item.bin_id,
                batch_id: item.batch_id.clone(),
                proximity: item.proximity,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_pull_short_inputs_fail() {
        assert!(Pull.decode_key(&[0u8; 8]).is_err());
        assert!(Pull.decode_value(&ChunkItem::default(), &[0u8; 63]).is_err());
    }

    #[test]
    fn test_push_round_trip() {
        let item = full_item();
        let decoded = round_trip(&Push, &item);
        assert_eq!(decoded.address, item.address);
        assert_eq!(decoded.store_timestamp, item.store_timestamp);
        assert_eq!(decoded.tag, 77);
    }

    #[test]
    fn test_push_tag_optional() {
        let decoded = Push.decode_value(&ChunkItem::default(), &[]).unwrap();
        assert_eq!(decoded.tag, 0);
        assert!(Push.decode_value(&ChunkItem::default(), &[1, 2]).is_err());
    }

    #[test]
    fn test_gc_round_trip() {
        let item = full_item();
        let decoded = round_trip(&Gc, &item);
        assert_eq!(
            decoded,
            ChunkItem {
                address: item.address.clone(),
                access_timestamp: item.access_timestamp,
                bin_id: item.bin_id,
                batch_id: item.batch_id.clone(),
                index: item.index.clone(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_gc_key_orders_by_access_time() {
        let mut older = full_item();
        older.access_timestamp = 10;
        older.address = addr(0xff);
        let mut newer = full_item();
        newer.access_timestamp = 11;
        newer.address = addr(0x00);
        assert!(Gc.encode_key(&older).unwrap() < Gc.encode_key(&newer).unwrap());
    }

    #[test]
    fn test_gc_short_key_fails() {
        assert!(Gc.decode_key(&[0u8; 15]).is_err());
    }

    #[test]
    fn test_pin_round_trip() {
        let item = full_item();
        let decoded = round_trip(&Pin, &item);
        assert_eq!(decoded.address, item.address);
        assert_eq!(decoded.pin_counter, 3);
    }

    #[test]
    fn test_postage_chunks_round_trip() {
        let item = full_item();
        assert!(PostageChunks.encode_value(&item).unwrap().is_empty());
        let decoded = round_trip(&PostageChunks, &item);
        assert_eq!(
            decoded,
            ChunkItem {
                address: item.address.clone(),
                batch_id: item.batch_id.clone(),
                proximity: item.proximity,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_postage_index_round_trip() {
        let item = full_item();
        let decoded = round_trip(&PostageIndex, &item);
        assert_eq!(
            decoded,
            ChunkItem {
                address: item.address.clone(),
                batch_id: item.batch_id.clone(),
                index: item.index.clone(),
                timestamp: item.timestamp.clone(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_address_keyed_indexes_reject_bad_address() {
        for codec in [&RetrievalData as &dyn IndexCodec, &RetrievalAccess, &Pin] {
            assert!(codec.encode_key(&ChunkItem::with_address(vec![1, 2])).is_err());
            assert!(codec.decode_key(&[1, 2]).is_err());
        }
    }

    #[test]
    fn test_registry_tables() {
        assert_eq!(PRIMARY_INDEX.name(), "retrievalDataIndex");
        assert_eq!(SECONDARY_INDEXES.len(), 7);
        assert_eq!(COLUMN_FAMILIES.len(), 9);

        let mut cfs: Vec<&str> = SECONDARY_INDEXES.iter().map(|c| c.cf_name()).collect();
        cfs.push(PRIMARY_INDEX.cf_name());
        cfs.sort();
        cfs.dedup();
        assert_eq!(cfs.len(), 8);
        assert!(COLUMN_FAMILIES.contains(&Fields::CF_NAME));
    }
}
