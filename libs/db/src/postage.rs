//! Postage stamps attached to stored chunks.
//!
//! Wire form: `batch id (32) | batch index (8) | timestamp (8) | signature (65)`.

use anyhow::Result;

pub const BATCH_ID_SIZE: usize = 32;
pub const INDEX_SIZE: usize = 8;
pub const TIMESTAMP_SIZE: usize = 8;
pub const SIGNATURE_SIZE: usize = 65;
pub const STAMP_SIZE: usize = BATCH_ID_SIZE + INDEX_SIZE + TIMESTAMP_SIZE + SIGNATURE_SIZE;

/// Proof that a chunk was admitted under a payment batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stamp {
    pub batch_id: Vec<u8>,
    pub index: Vec<u8>,
    pub timestamp: Vec<u8>,
    pub sig: Vec<u8>,
}

impl Stamp {
    pub fn new(batch_id: &[u8], index: &[u8], timestamp: &[u8], sig: &[u8]) -> Self {
        Self {
            batch_id: batch_id.to_vec(),
            index: index.to_vec(),
            timestamp: timestamp.to_vec(),
            sig: sig.to_vec(),
        }
    }

    /// Serialize; every field must have its exact width.
    pub fn to_bytes(&self) -> Result<[u8; STAMP_SIZE]> {
        let mut buf = [0u8; STAMP_SIZE];
        let mut offset = 0;
        for (name, field, size) in [
            ("batch id", &self.batch_id, BATCH_ID_SIZE),
            ("batch index", &self.index, INDEX_SIZE),
            ("timestamp", &self.timestamp, TIMESTAMP_SIZE),
            ("signature", &self.sig, SIGNATURE_SIZE),
        ] {
            if field.len() != size {
                anyhow::bail!(
                    "invalid stamp {}: expected {} bytes, got {}",
                    name,
                    size,
                    field.len()
                );
            }
            buf[offset..offset + size].copy_from_slice(field);
            offset += size;
        }
        Ok(buf)
    }

    /// Deserialize from exactly [`STAMP_SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != STAMP_SIZE {
            anyhow::bail!(
                "invalid stamp length: expected {}, got {}",
                STAMP_SIZE,
                bytes.len()
            );
        }
        let (batch_id, rest) = bytes.split_at(BATCH_ID_SIZE);
        let (index, rest) = rest.split_at(INDEX_SIZE);
        let (timestamp, sig) = rest.split_at(TIMESTAMP_SIZE);
        Ok(Self::new(batch_id, index, timestamp, sig))
    }
}
