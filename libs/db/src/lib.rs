//! Consistency auditing for a chunk localstore.
//!
//! - [`localstore`]: index codecs, schema registry and RocksDB storage
//! - [`sharky`]: sharded blob store holding chunk data
//! - [`swarm`]: chunk address schemes (content-addressed, single-owner)
//! - [`postage`]: postage stamps attached to stored chunks
//! - [`audit`]: the checks and their report

pub mod audit;
pub mod localstore;
pub mod postage;
pub mod rocksdb;
pub mod sharky;
pub mod swarm;
