//! Binary Merkle tree hash over a chunk payload.
//!
//! The payload is zero-padded to [`CHUNK_SIZE`] and split into
//! [`BRANCHES`] segments of [`SECTION_SIZE`] bytes. Adjacent nodes are
//! combined with `keccak256(left | right)` until one root remains. The chunk
//! hash then binds the span: `keccak256(span | root)`.

use anyhow::Result;

use super::{keccak256, BRANCHES, CHUNK_SIZE, HASH_SIZE, SECTION_SIZE, SPAN_SIZE};

/// Root of the tree over `payload`.
pub fn root(payload: &[u8]) -> Result<[u8; HASH_SIZE]> {
    if payload.len() > CHUNK_SIZE {
        anyhow::bail!(
            "payload too large: expected at most {}, got {}",
            CHUNK_SIZE,
            payload.len()
        );
    }

    let mut level: Vec<[u8; HASH_SIZE]> = Vec::with_capacity(BRANCHES);
    for i in 0..BRANCHES {
        let mut segment = [0u8; SECTION_SIZE];
        let start = i * SECTION_SIZE;
        if start < payload.len() {
            let end = (start + SECTION_SIZE).min(payload.len());
            segment[..end - start].copy_from_slice(&payload[start..end]);
        }
        level.push(segment);
    }

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| keccak256(&[&pair[0], &pair[1]]))
            .collect();
    }

    Ok(level[0])
}

/// Chunk hash: `keccak256(span | root(payload))`.
pub fn hash(span: &[u8; SPAN_SIZE], payload: &[u8]) -> Result<[u8; HASH_SIZE]> {
    let root = root(payload)?;
    Ok(keccak256(&[span, &root]))
}

/// Span for a payload of `length` bytes.
pub fn span(length: u64) -> [u8; SPAN_SIZE] {
    length.to_le_bytes()
}
