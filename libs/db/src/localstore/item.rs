//! The sparse record shared by every index codec.

use crate::postage::Stamp;

/// Size of a chunk address.
pub const ADDRESS_SIZE: usize = 32;

/// One chunk as seen by a single index.
///
/// Each index populates only the fields it stores; the rest stay zero/empty.
///
/// | Field | Populated by |
/// |---|---|
/// | `address` | every index |
/// | `bin_id` | retrievalData, pull, gc |
/// | `store_timestamp` | retrievalData, push |
/// | `access_timestamp` | retrievalAccess, gc |
/// | `batch_id` | retrievalData, pull, gc, postageChunks, postageIndex |
/// | `index` | retrievalData, gc, postageIndex |
/// | `timestamp`, `sig` | retrievalData (`timestamp` also postageIndex) |
/// | `location` | retrievalData |
/// | `tag` | push |
/// | `pin_counter` | pin |
/// | `proximity` | pull, postageChunks |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkItem {
    pub address: Vec<u8>,
    pub bin_id: u64,
    pub store_timestamp: i64,
    pub access_timestamp: i64,
    pub batch_id: Vec<u8>,
    pub index: Vec<u8>,
    pub timestamp: Vec<u8>,
    pub sig: Vec<u8>,
    pub location: Vec<u8>,
    pub tag: u32,
    pub pin_counter: u64,
    pub proximity: u8,
}

impl ChunkItem {
    /// Item carrying only an address, enough for a lookup in any address-keyed index.
    pub fn with_address(address: impl Into<Vec<u8>>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Fill every zero/empty field of `self` from `other`.
    ///
    /// Used to combine the halves decoded from an entry's key and value.
    pub fn merge(mut self, other: ChunkItem) -> Self {
        fn take_bytes(dst: &mut Vec<u8>, src: Vec<u8>) {
            if dst.is_empty() {
                *dst = src;
            }
        }
        fn take<T: Default + PartialEq>(dst: &mut T, src: T) {
            if *dst == T::default() {
                *dst = src;
            }
        }

        take_bytes(&mut self.address, other.address);
        take(&mut self.bin_id, other.bin_id);
        take(&mut self.store_timestamp, other.store_timestamp);
        take(&mut self.access_timestamp, other.access_timestamp);
        take_bytes(&mut self.batch_id, other.batch_id);
        take_bytes(&mut self.index, other.index);
        take_bytes(&mut self.timestamp, other.timestamp);
        take_bytes(&mut self.sig, other.sig);
        take_bytes(&mut self.location, other.location);
        take(&mut self.tag, other.tag);
        take(&mut self.pin_counter, other.pin_counter);
        take(&mut self.proximity, other.proximity);
        self
    }

    /// The postage stamp fields of this item.
    pub fn stamp(&self) -> Stamp {
        Stamp::new(&self.batch_id, &self.index, &self.timestamp, &self.sig)
    }

    /// Copy the stamp fields into this item.
    pub fn set_stamp(&mut self, stamp: Stamp) {
        self.batch_id = stamp.batch_id;
        self.index = stamp.index;
        self.timestamp = stamp.timestamp;
        self.sig = stamp.sig;
    }

    /// Hex form of the address, as printed in findings.
    pub fn address_hex(&self) -> String {
        hex::encode(&self.address)
    }
}
