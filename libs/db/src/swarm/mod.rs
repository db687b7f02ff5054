//! Chunk addressing schemes.
//!
//! Two ways a chunk's data can justify its address:
//!
//! - [`cac`]: content-addressed chunk, address = BMT hash of `span | payload`
//! - [`soc`]: single-owner chunk, address = `keccak256(id | owner)` where the
//!   owner is recovered from a signature embedded in the data
//!
//! [`valid`] tries both, in that order.

pub mod bmt;
pub mod cac;
pub mod soc;

use sha3::{Digest, Keccak256};

/// Size of an address (and of every hash in this module).
pub const HASH_SIZE: usize = 32;
/// Size of a BMT segment.
pub const SECTION_SIZE: usize = 32;
/// Number of segments in a full chunk.
pub const BRANCHES: usize = 128;
/// Maximum payload carried by a content-addressed chunk.
pub const CHUNK_SIZE: usize = SECTION_SIZE * BRANCHES;
/// Little-endian length prefix of chunk data.
pub const SPAN_SIZE: usize = 8;
/// Maximum size of content-addressed chunk data (span included).
pub const CHUNK_WITH_SPAN_SIZE: usize = CHUNK_SIZE + SPAN_SIZE;
/// Identifier chosen by a single-owner chunk's owner.
pub const SOC_ID_SIZE: usize = HASH_SIZE;
/// Recoverable secp256k1 signature, `r | s | v`.
pub const SOC_SIGNATURE_SIZE: usize = 65;
/// Smallest single-owner chunk: id, signature and an empty inner chunk.
pub const SOC_MIN_CHUNK_SIZE: usize = SOC_ID_SIZE + SOC_SIGNATURE_SIZE + SPAN_SIZE;
/// Largest chunk the blob store has to hold.
pub const SOC_MAX_CHUNK_SIZE: usize = SOC_MIN_CHUNK_SIZE + CHUNK_SIZE;

/// A chunk as read back from the store: stored address plus raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    address: Vec<u8>,
    data: Vec<u8>,
}

impl Chunk {
    pub fn new(address: impl Into<Vec<u8>>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            address: address.into(),
            data: data.into(),
        }
    }

    pub fn address(&self) -> &[u8] {
        &self.address
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Hex form of the address, as printed in findings.
    pub fn address_hex(&self) -> String {
        hex::encode(&self.address)
    }
}

/// Which scheme validated a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    ContentAddressed,
    SingleOwner,
}

/// Classify a chunk, or `None` when its data supports its address under neither scheme.
pub fn classify(chunk: &Chunk) -> Option<ChunkKind> {
    if cac::valid(chunk) {
        Some(ChunkKind::ContentAddressed)
    } else if soc::valid(chunk) {
        Some(ChunkKind::SingleOwner)
    } else {
        None
    }
}

/// True when the chunk satisfies either scheme.
pub fn valid(chunk: &Chunk) -> bool {
    classify(chunk).is_some()
}

/// Keccak-256 over the concatenation of `parts`.
pub fn keccak256(parts: &[&[u8]]) -> [u8; HASH_SIZE] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_constants() {
        assert_eq!(CHUNK_SIZE, 4096);
        assert_eq!(SOC_MIN_CHUNK_SIZE, 105);
        assert_eq!(SOC_MAX_CHUNK_SIZE, 4201);
    }

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(&[])),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_concatenates_parts() {
        assert_eq!(keccak256(&[b"ab", b"c"]), keccak256(&[b"abc"]));
    }

    #[test]
    fn test_classify_neither() {
        let chunk = Chunk::new(vec![0u8; HASH_SIZE], b"not a chunk".to_vec());
        assert_eq!(classify(&chunk), None);
        assert!(!valid(&chunk));
    }

    #[test]
    fn test_classify_cac() {
        let chunk = cac::new(b"hello world").unwrap();
        assert_eq!(classify(&chunk), Some(ChunkKind::ContentAddressed));
    }
}
