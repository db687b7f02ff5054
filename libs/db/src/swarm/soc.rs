//! Single-owner chunks.
//!
//! Data layout: `id (32) | signature (65) | span (8) | payload`. The trailing
//! `span | payload` is a content-addressed chunk. The owner signs
//! `keccak256(id | inner address)` with an Ethereum-prefixed secp256k1
//! signature; the chunk address is `keccak256(id | owner)` where the owner is
//! the 20-byte Ethereum address of the signing key.

use anyhow::{Context, Result};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

use super::{cac, keccak256, Chunk, HASH_SIZE, SOC_ID_SIZE, SOC_MIN_CHUNK_SIZE, SOC_SIGNATURE_SIZE};

/// Size of an Ethereum address.
pub const OWNER_SIZE: usize = 20;

/// Offset added to the recovery id in the signature's `v` byte.
const RECOVERY_ID_OFFSET: u8 = 27;
/// Largest `v` byte: offset plus the compressed-key flag plus recovery id 3.
const MAX_RECOVERY_BYTE: u8 = RECOVERY_ID_OFFSET + 7;

/// A single-owner chunk decoded from raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleOwnerChunk {
    pub id: [u8; SOC_ID_SIZE],
    pub owner: [u8; OWNER_SIZE],
    pub signature: [u8; SOC_SIGNATURE_SIZE],
    pub inner: Chunk,
}

impl SingleOwnerChunk {
    /// Parse `data` and recover the owner from its signature.
    pub fn from_data(data: &[u8]) -> Result<Self> {
        if data.len() < SOC_MIN_CHUNK_SIZE {
            anyhow::bail!(
                "single-owner chunk too short: expected at least {}, got {}",
                SOC_MIN_CHUNK_SIZE,
                data.len()
            );
        }

        let mut id = [0u8; SOC_ID_SIZE];
        id.copy_from_slice(&data[..SOC_ID_SIZE]);
        let mut signature = [0u8; SOC_SIGNATURE_SIZE];
        signature.copy_from_slice(&data[SOC_ID_SIZE..SOC_ID_SIZE + SOC_SIGNATURE_SIZE]);

        let inner_data = &data[SOC_ID_SIZE + SOC_SIGNATURE_SIZE..];
        let inner_address = cac::address(inner_data).context("invalid wrapped chunk")?;
        let inner = Chunk::new(inner_address.to_vec(), inner_data.to_vec());

        let owner = recover_owner(&signature, &to_sign(&id, &inner_address))?;

        Ok(Self {
            id,
            owner,
            signature,
            inner,
        })
    }

    /// Address derived from id and owner.
    pub fn address(&self) -> [u8; HASH_SIZE] {
        address(&self.id, &self.owner)
    }
}

/// True when the chunk's data is a single-owner chunk whose id and recovered
/// owner derive its address.
pub fn valid(chunk: &Chunk) -> bool {
    match SingleOwnerChunk::from_data(chunk.data()) {
        Ok(soc) => chunk.address() == soc.address().as_slice(),
        Err(_) => false,
    }
}

/// `keccak256(id | owner)`.
pub fn address(id: &[u8; SOC_ID_SIZE], owner: &[u8; OWNER_SIZE]) -> [u8; HASH_SIZE] {
    keccak256(&[id, owner])
}

/// Ethereum address of a public key: last 20 bytes of the hash of its
/// uncompressed encoding without the `0x04` tag.
pub fn owner_of(key: &VerifyingKey) -> [u8; OWNER_SIZE] {
    let encoded = key.to_encoded_point(false);
    let hash = keccak256(&[&encoded.as_bytes()[1..]]);
    let mut owner = [0u8; OWNER_SIZE];
    owner.copy_from_slice(&hash[HASH_SIZE - OWNER_SIZE..]);
    owner
}

/// Wrap `inner` into a single-owner chunk signed by `key`.
pub fn sign(id: &[u8; SOC_ID_SIZE], inner: &Chunk, key: &SigningKey) -> Result<Chunk> {
    let mut inner_address = [0u8; HASH_SIZE];
    if inner.address().len() != HASH_SIZE {
        anyhow::bail!("inner chunk address must be {} bytes", HASH_SIZE);
    }
    inner_address.copy_from_slice(inner.address());

    let digest = ethereum_digest(&to_sign(id, &inner_address));
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(&digest)
        .map_err(|e| anyhow::anyhow!("signing failed: {}", e))?;

    let mut data = Vec::with_capacity(SOC_ID_SIZE + SOC_SIGNATURE_SIZE + inner.data().len());
    data.extend_from_slice(id);
    data.extend_from_slice(&signature.to_bytes());
    data.push(recovery_id.to_byte() + RECOVERY_ID_OFFSET);
    data.extend_from_slice(inner.data());

    let owner = owner_of(key.verifying_key());
    Ok(Chunk::new(address(id, &owner).to_vec(), data))
}

fn to_sign(id: &[u8; SOC_ID_SIZE], inner_address: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
    keccak256(&[id, inner_address])
}

/// Digest actually signed: the message under the Ethereum signed-message prefix.
fn ethereum_digest(message: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    keccak256(&[prefix.as_bytes(), message])
}

fn recover_owner(
    signature: &[u8; SOC_SIGNATURE_SIZE],
    message: &[u8; HASH_SIZE],
) -> Result<[u8; OWNER_SIZE]> {
    let v = signature[SOC_SIGNATURE_SIZE - 1];
    if !(RECOVERY_ID_OFFSET..=MAX_RECOVERY_BYTE).contains(&v) {
        anyhow::bail!("invalid signature recovery byte {}", v);
    }
    // Compressed-key markers (31..=34) carry the same recovery id in the low bits.
    let recovery_id = RecoveryId::from_byte((v - RECOVERY_ID_OFFSET) & 0x03)
        .ok_or_else(|| anyhow::anyhow!("invalid signature recovery byte {}", v))?;
    let sig = Signature::from_slice(&signature[..SOC_SIGNATURE_SIZE - 1])
        .map_err(|e| anyhow::anyhow!("malformed signature: {}", e))?;

    let key = VerifyingKey::recover_from_prehash(&ethereum_digest(message), &sig, recovery_id)
        .map_err(|e| anyhow::anyhow!("signature recovery failed: {}", e))?;
    Ok(owner_of(&key))
}
