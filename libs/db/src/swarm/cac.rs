//! Content-addressed chunks.
//!
//! Data layout: `span (8, little-endian) | payload (<= 4096)`. The address is
//! the BMT hash of the payload bound to the span.

use anyhow::Result;

use super::{bmt, Chunk, CHUNK_SIZE, CHUNK_WITH_SPAN_SIZE, HASH_SIZE, SPAN_SIZE};

/// Build a content-addressed chunk carrying `payload`.
pub fn new(payload: &[u8]) -> Result<Chunk> {
    if payload.len() > CHUNK_SIZE {
        anyhow::bail!(
            "payload too large: expected at most {}, got {}",
            CHUNK_SIZE,
            payload.len()
        );
    }
    let mut data = Vec::with_capacity(SPAN_SIZE + payload.len());
    data.extend_from_slice(&bmt::span(payload.len() as u64));
    data.extend_from_slice(payload);
    let address = address(&data)?;
    Ok(Chunk::new(address.to_vec(), data))
}

/// Address implied by `span | payload` data.
pub fn address(data: &[u8]) -> Result<[u8; HASH_SIZE]> {
    if data.len() < SPAN_SIZE || data.len() > CHUNK_WITH_SPAN_SIZE {
        anyhow::bail!(
            "invalid chunk data length: expected {}..={}, got {}",
            SPAN_SIZE,
            CHUNK_WITH_SPAN_SIZE,
            data.len()
        );
    }
    let mut span = [0u8; SPAN_SIZE];
    span.copy_from_slice(&data[..SPAN_SIZE]);
    bmt::hash(&span, &data[SPAN_SIZE..])
}

/// True when the chunk's address is the hash of its data.
pub fn valid(chunk: &Chunk) -> bool {
    match address(chunk.data()) {
        Ok(expected) => chunk.address() == expected.as_slice(),
        Err(_) => false,
    }
}
