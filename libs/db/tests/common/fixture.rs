//! Builds on-disk localstores for the audit integration tests.
//!
//! A fixture is a store root holding the RocksDB files plus a `sharky/`
//! directory. Chunks are written to `shard_000`, one per slot, and indexed in
//! all eight indexes so a freshly built store audits clean.

use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chunkaudit_db::audit::SHARKY_DIR;
use chunkaudit_db::localstore::schema::{
    Fields, Gc, Pin, PostageChunks, PostageIndex, Pull, Push, RetrievalAccess, RetrievalData,
};
use chunkaudit_db::localstore::{ChunkItem, IndexCodec, Storage, StoreWriter, SCHEMA_CURRENT};
use chunkaudit_db::postage::Stamp;
use chunkaudit_db::sharky::{shard_file_name, Location};
use chunkaudit_db::swarm::{cac, soc, Chunk, SOC_ID_SIZE, SOC_MAX_CHUNK_SIZE};
use k256::ecdsa::SigningKey;

pub const ALL_INDEXES: [&dyn IndexCodec; 8] = [
    &RetrievalData,
    &RetrievalAccess,
    &Pull,
    &Push,
    &Gc,
    &Pin,
    &PostageChunks,
    &PostageIndex,
];

pub fn cac_chunk(payload: &[u8]) -> Chunk {
    cac::new(payload).unwrap()
}

pub fn soc_chunk(id: u8, payload: &[u8]) -> Chunk {
    let key = SigningKey::from_slice(&[0x11; 32]).unwrap();
    soc::sign(&[id; SOC_ID_SIZE], &cac_chunk(payload), &key).unwrap()
}

/// A store opened read-write while it is being populated.
pub struct FixtureStore {
    root: PathBuf,
    storage: Storage,
    next_slot: u32,
}

impl FixtureStore {
    /// Create an empty store at `root` carrying the current schema name.
    pub fn create(root: &Path) -> Self {
        Self::create_with_schema(root, SCHEMA_CURRENT)
    }

    pub fn create_with_schema(root: &Path, schema: &str) -> Self {
        fs::create_dir_all(root.join(SHARKY_DIR)).unwrap();
        let mut storage = Storage::readwrite(root);
        storage.ready().unwrap();
        let store = Self {
            root: root.to_path_buf(),
            storage,
            next_slot: 0,
        };
        store.writer().set_string(Fields::SCHEMA_NAME, schema).unwrap();
        store
    }

    pub fn writer(&self) -> StoreWriter<'_> {
        StoreWriter::new(self.storage.writable_db().unwrap())
    }

    /// Store `chunk`'s data in the next slot and index it everywhere.
    pub fn add(&mut self, chunk: &Chunk) -> ChunkItem {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.write_blob(0, slot, chunk.data());

        let location = Location::new(0, slot, chunk.data().len() as u16);
        let item = self.item(chunk.address(), slot, location.to_bytes().to_vec());
        self.index(&item);
        item
    }

    /// Index an address under an arbitrary location without writing a blob.
    pub fn add_with_location(&mut self, address: &[u8], location: Vec<u8>) -> ChunkItem {
        let slot = self.next_slot;
        self.next_slot += 1;
        let item = self.item(address, slot, location);
        self.index(&item);
        item
    }

    pub fn set_counters(&self, gc_size: u64, reserve_size: u64) {
        let writer = self.writer();
        writer.set_u64(Fields::GC_SIZE, gc_size).unwrap();
        writer.set_u64(Fields::RESERVE_SIZE, reserve_size).unwrap();
    }

    /// Close the database so the store can be opened read-only.
    pub fn finish(mut self) -> PathBuf {
        self.storage.close().unwrap();
        self.root
    }

    fn item(&self, address: &[u8], slot: u32, location: Vec<u8>) -> ChunkItem {
        let seq = slot as u64 + 1;
        let mut item = ChunkItem {
            address: address.to_vec(),
            bin_id: seq,
            store_timestamp: 1_700_000_000 + seq as i64,
            access_timestamp: 1_700_000_500 + seq as i64,
            location,
            tag: slot,
            pin_counter: 1,
            proximity: (slot % 8) as u8,
            ..Default::default()
        };
        item.set_stamp(Stamp::new(
            &[0xba; 32],
            &seq.to_be_bytes(),
            &(1_700_000_000 + seq).to_be_bytes(),
            &[0x5e; 65],
        ));
        item
    }

    fn index(&self, item: &ChunkItem) {
        let writer = self.writer();
        for codec in ALL_INDEXES {
            writer.put(codec, item).unwrap();
        }
    }

    fn write_blob(&self, shard: u8, slot: u32, data: &[u8]) {
        let path = self.root.join(SHARKY_DIR).join(shard_file_name(shard));
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)
            .unwrap();
        file.seek(SeekFrom::Start(slot as u64 * SOC_MAX_CHUNK_SIZE as u64))
            .unwrap();
        file.write_all(data).unwrap();
    }
}
