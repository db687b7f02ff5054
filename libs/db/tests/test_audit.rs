/// Integration tests for the localstore audit
///
/// Each test builds a store on disk with `FixtureStore`, damages it in one
/// specific way, closes it, then audits it read-only and checks the findings:
/// - dangling secondary entries (one per secondary index)
/// - counters against the primary count
/// - chunk data against the address, for both chunk schemes
/// - broken locations, unreadable blobs and undecodable records, which must
///   not stop the scan
/// - startup preconditions (paths and schema name)
mod common;

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use chunkaudit_db::audit::{check_indexes, Audit, AuditConfig, Report, SHARKY_DIR};
use chunkaudit_db::localstore::schema::{Pin, RetrievalData};
use chunkaudit_db::localstore::{
    ChunkItem, IndexCodec, Indexes, Storage, PRIMARY_INDEX, SCHEMA_CURRENT,
};
use chunkaudit_db::sharky::{shard_file_name, Location};
use chunkaudit_db::swarm::SOC_MAX_CHUNK_SIZE;
use common::fixture::{cac_chunk, soc_chunk, FixtureStore};
use tempfile::TempDir;

fn audit(root: &Path) -> Report {
    Audit::open(AuditConfig::new(root))
        .expect("Failed to open audit")
        .run()
        .expect("Audit run failed")
}

fn rendered(report: &Report) -> String {
    let mut out = Vec::new();
    report.render(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// XOR one byte of a stored blob.
fn flip_blob_byte(root: &Path, location: &[u8], offset: usize) {
    let location = Location::from_binary(location).unwrap();
    let path = root.join(SHARKY_DIR).join(shard_file_name(location.shard));
    let mut file = OpenOptions::new().read(true).write(true).open(path).unwrap();
    let pos = location.slot as u64 * SOC_MAX_CHUNK_SIZE as u64 + offset as u64;

    let mut byte = [0u8; 1];
    file.seek(SeekFrom::Start(pos)).unwrap();
    file.read_exact(&mut byte).unwrap();
    file.seek(SeekFrom::Start(pos)).unwrap();
    file.write_all(&[byte[0] ^ 0xff]).unwrap();
}

#[test]
fn test_empty_store_is_clean() {
    let temp_dir = TempDir::new().unwrap();
    let root = FixtureStore::create(&temp_dir.path().join("localstore")).finish();

    let report = audit(&root);
    assert!(report.is_clean());
    assert_eq!(rendered(&report), "No inconsistencies or corruptions found\n");
}

#[test]
fn test_consistent_store_is_clean() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    for i in 0..4u8 {
        store.add(&cac_chunk(&[i; 100]));
    }
    store.add(&soc_chunk(1, b"single owner payload"));
    store.add(&soc_chunk(2, b"another single owner payload"));
    let root = store.finish();

    let report = audit(&root);
    assert!(report.is_clean(), "unexpected findings: {:?}", report);
}

#[test]
fn test_missing_primary_entry_is_reported_by_every_secondary_index() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    store.add(&cac_chunk(b"kept"));
    let removed = store.add(&cac_chunk(b"removed"));
    store.writer().delete(&RetrievalData, &removed).unwrap();
    let root = store.finish();

    {
        let mut storage = Storage::readonly(&root);
        storage.ready().unwrap();
        let indexes = Indexes::open(storage.db_access().unwrap(), SCHEMA_CURRENT).unwrap();
        for index in &indexes.secondary {
            let findings = check_indexes(index, &indexes.retrieval_data);
            assert_eq!(
                findings,
                vec![format!(
                    "item in {} and not in retrievalDataIndex {}",
                    index.name(),
                    removed.address_hex()
                )]
            );
        }
    }

    let report = audit(&root);
    assert_eq!(report.inconsistencies().len(), 7);
    assert!(report
        .inconsistencies()
        .iter()
        .all(|f| f.ends_with(&removed.address_hex())));
    assert!(report.corruptions().is_empty());
}

#[test]
fn test_counters_within_bound() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    for i in 0..10u8 {
        store.add(&cac_chunk(&[i; 32]));
    }
    store.set_counters(5, 3);
    let root = store.finish();

    assert!(audit(&root).is_clean());
}

#[test]
fn test_counters_exceed_chunk_count() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    for i in 0..10u8 {
        store.add(&cac_chunk(&[i; 32]));
    }
    store.set_counters(6, 5);
    let root = store.finish();

    let report = audit(&root);
    assert_eq!(
        report.inconsistencies(),
        &["gcSize+reserveSize(11) > chunkCount(10)".to_string()]
    );
    assert!(report.corruptions().is_empty());
}

#[test]
fn test_flipped_content_addressed_byte_is_a_corruption() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    store.add(&cac_chunk(b"intact"));
    let damaged = store.add(&cac_chunk(b"about to be damaged"));
    let root = store.finish();
    // Byte 10 is in the payload, past the 8-byte span.
    flip_blob_byte(&root, &damaged.location, 10);

    let report = audit(&root);
    assert!(report.inconsistencies().is_empty());
    assert_eq!(
        report.corruptions(),
        &[format!("address {}", damaged.address_hex())]
    );
    assert!(rendered(&report).contains(&format!(
        "DATA CORRUPTION: address {}",
        damaged.address_hex()
    )));
}

#[test]
fn test_damaged_single_owner_chunk_is_a_corruption() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    let chunk = soc_chunk(3, b"signed payload");
    let damaged = store.add(&chunk);
    let root = store.finish();
    flip_blob_byte(&root, &damaged.location, chunk.data().len() - 1);

    let report = audit(&root);
    assert_eq!(
        report.corruptions(),
        &[format!("address {}", damaged.address_hex())]
    );
}

#[test]
fn test_malformed_location_does_not_stop_the_scan() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    let broken = store.add_with_location(&[0xaa; 32], vec![1, 2, 3]);
    let damaged = store.add(&cac_chunk(b"checked after the broken record"));
    let root = store.finish();
    flip_blob_byte(&root, &damaged.location, 12);

    let report = audit(&root);
    assert_eq!(report.inconsistencies().len(), 1);
    assert!(report.inconsistencies()[0].starts_with(&format!(
        "invalid sharky location for item {} err:",
        broken.address_hex()
    )));
    assert_eq!(
        report.corruptions(),
        &[format!("address {}", damaged.address_hex())]
    );
}

#[test]
fn test_unreadable_blob_is_an_inconsistency() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    store.add(&cac_chunk(b"readable"));
    // Slot far past the end of shard_000, and a shard file that was never written.
    let past_end =
        store.add_with_location(&[0xbb; 32], Location::new(0, 50, 64).to_bytes().to_vec());
    let no_shard =
        store.add_with_location(&[0xcc; 32], Location::new(3, 0, 64).to_bytes().to_vec());
    let root = store.finish();

    let report = audit(&root);
    let prefix = |item: &ChunkItem| {
        format!(
            "cannot read location from sharky for item {} err:",
            item.address_hex()
        )
    };
    assert_eq!(report.inconsistencies().len(), 2);
    assert!(report.inconsistencies()[0].starts_with(&prefix(&past_end)));
    assert!(report.inconsistencies()[1].starts_with(&prefix(&no_shard)));
    assert!(report.inconsistencies()[1].contains("shard 3 file not found"));
    assert!(report.corruptions().is_empty());
}

#[test]
fn test_undecodable_primary_record_does_not_stop_the_scan() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    // Sorts before every chunk address and is shorter than the value header.
    store
        .writer()
        .put_raw(PRIMARY_INDEX.cf_name(), &[0u8; 32], &[1, 2, 3])
        .unwrap();
    let damaged = store.add(&cac_chunk(b"verified after the bad record"));
    let root = store.finish();
    flip_blob_byte(&root, &damaged.location, 9);

    let report = audit(&root);
    assert_eq!(report.inconsistencies().len(), 1, "{:?}", report);
    let finding = &report.inconsistencies()[0];
    assert!(finding.starts_with("invalid entry: retrievalDataIndex"));
    assert!(finding.contains(&hex::encode([0u8; 32])));
    assert!(!finding.contains("CRITICAL"));
    assert_eq!(
        report.corruptions(),
        &[format!("address {}", damaged.address_hex())]
    );
}

#[test]
fn test_undecodable_secondary_record_does_not_stop_the_check() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = FixtureStore::create(&temp_dir.path().join("localstore"));
    store.add(&cac_chunk(b"pinned"));
    store
        .writer()
        .put_raw(Pin.cf_name(), &[0xff; 32], &[1, 2, 3])
        .unwrap();
    let root = store.finish();

    let report = audit(&root);
    assert_eq!(report.inconsistencies().len(), 1, "{:?}", report);
    assert!(report.inconsistencies()[0].starts_with("invalid entry: pinIdx"));
    assert!(report.corruptions().is_empty());
}

#[test]
fn test_schema_mismatch_fails_to_open() {
    let temp_dir = TempDir::new().unwrap();
    let root =
        FixtureStore::create_with_schema(&temp_dir.path().join("localstore"), "legacy").finish();

    let err = Audit::open(AuditConfig::new(&root)).err().unwrap();
    assert!(err.to_string().contains("incorrect schema \"legacy\""));

    let report = Audit::open(AuditConfig::new(&root).with_expected_schema("legacy"))
        .unwrap()
        .run()
        .unwrap();
    assert!(report.is_clean());
}

#[test]
fn test_missing_directories_fail_to_open() {
    let temp_dir = TempDir::new().unwrap();
    let err = Audit::open(AuditConfig::new(temp_dir.path().join("absent")))
        .err()
        .unwrap();
    assert!(err.to_string().contains("store path not found"));

    let root = FixtureStore::create(&temp_dir.path().join("localstore")).finish();
    fs::remove_dir_all(root.join(SHARKY_DIR)).unwrap();
    let err = Audit::open(AuditConfig::new(&root)).err().unwrap();
    assert!(err.to_string().contains("sharky directory not found"));
}
