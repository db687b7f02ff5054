//! Sharded blob store holding chunk data.
//!
//! Blobs live in `shard_NNN` files, each a sequence of fixed-size slots.
//! A [`Location`] names the shard, the slot and the number of bytes used.

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};

/// Encoded size of a [`Location`].
pub const LOCATION_SIZE: usize = 7;

/// Default number of shard files.
pub const DEFAULT_SHARD_COUNT: u8 = 32;

/// Where a blob is stored.
///
/// Wire form: `shard (1) | slot (4, little-endian) | length (2, little-endian)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub shard: u8,
    pub slot: u32,
    pub length: u16,
}

impl Location {
    pub fn new(shard: u8, slot: u32, length: u16) -> Self {
        Self {
            shard,
            slot,
            length,
        }
    }

    pub fn to_bytes(&self) -> [u8; LOCATION_SIZE] {
        let mut buf = [0u8; LOCATION_SIZE];
        buf[0] = self.shard;
        buf[1..5].copy_from_slice(&self.slot.to_le_bytes());
        buf[5..7].copy_from_slice(&self.length.to_le_bytes());
        buf
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != LOCATION_SIZE {
            anyhow::bail!(
                "invalid location length: expected {}, got {}",
                LOCATION_SIZE,
                bytes.len()
            );
        }
        let mut slot = [0u8; 4];
        slot.copy_from_slice(&bytes[1..5]);
        let mut length = [0u8; 2];
        length.copy_from_slice(&bytes[5..7]);
        Ok(Self {
            shard: bytes[0],
            slot: u32::from_le_bytes(slot),
            length: u16::from_le_bytes(length),
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shard: {}, slot: {}, length: {}",
            self.shard, self.slot, self.length
        )
    }
}

/// Reads blobs by location.
pub trait BlobReader {
    /// Fill `buf` with the blob at `location`; `buf` must be `location.length` long.
    fn read(&self, location: &Location, buf: &mut [u8]) -> Result<()>;
}

/// File name of shard `index`.
pub fn shard_file_name(index: u8) -> String {
    format!("shard_{:03}", index)
}

/// Read-only view over the shard files of a blob store directory.
pub struct Store {
    shards: Vec<Option<File>>,
    max_data_size: usize,
}

impl Store {
    /// Open `shard_count` shards under `dir`. Missing shard files are
    /// tolerated; reads from them fail.
    pub fn open(dir: &Path, shard_count: u8, max_data_size: usize) -> Result<Self> {
        if !dir.is_dir() {
            anyhow::bail!("blob store directory not found: {}", dir.display());
        }
        if max_data_size == 0 {
            anyhow::bail!("max data size must be positive");
        }

        let mut shards = Vec::with_capacity(shard_count as usize);
        for index in 0..shard_count {
            let path = dir.join(shard_file_name(index));
            match File::open(&path) {
                Ok(file) => shards.push(Some(file)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(shard = index, "Shard file missing");
                    shards.push(None);
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("open shard {}", path.display()));
                }
            }
        }

        let present = shards.iter().filter(|s| s.is_some()).count();
        tracing::debug!(
            dir = %dir.display(),
            shards = shard_count,
            present,
            max_data_size,
            "Opened blob store"
        );

        Ok(Self {
            shards,
            max_data_size,
        })
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

impl BlobReader for Store {
    fn read(&self, location: &Location, buf: &mut [u8]) -> Result<()> {
        let length = location.length as usize;
        if buf.len() != length {
            anyhow::bail!(
                "buffer size {} does not match location length {}",
                buf.len(),
                length
            );
        }
        if length > self.max_data_size {
            anyhow::bail!(
                "location length {} exceeds slot size {}",
                length,
                self.max_data_size
            );
        }
        let shard = self
            .shards
            .get(location.shard as usize)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "shard {} out of range (have {})",
                    location.shard,
                    self.shards.len()
                )
            })?
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("shard {} file not found", location.shard))?;

        let offset = location.slot as u64 * self.max_data_size as u64;
        let mut file = shard;
        file.seek(SeekFrom::Start(offset))
            .with_context(|| format!("seek to slot {}", location.slot))?;
        file.read_exact(buf)
            .with_context(|| format!("read {} bytes at {}", length, location))?;
        Ok(())
    }
}
