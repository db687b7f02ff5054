//! Chunk data read from the blob store must hash to the chunk's address.

use super::report::Report;
use crate::localstore::Index;
use crate::sharky::{BlobReader, Location};
use crate::swarm::{self, Chunk};

/// Scan `primary`, read each chunk's blob and verify its address.
///
/// Undecodable records and location or read failures are inconsistencies;
/// data that satisfies neither chunk scheme is a corruption. Returns the
/// number of records scanned.
pub fn check_content(primary: &Index<'_>, blobs: &dyn BlobReader, report: &mut Report) -> u64 {
    let mut scanned = 0u64;

    let result = primary.scan(|entry| {
        scanned += 1;
        let item = match entry {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "Undecodable primary record");
                report.add_inconsistency(format!("invalid entry: {:#}", e));
                return Ok(false);
            }
        };
        let address = item.address_hex();

        let location = match Location::from_binary(&item.location) {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Invalid location");
                report.add_inconsistency(format!(
                    "invalid sharky location for item {} err: {:#}",
                    address, e
                ));
                return Ok(false);
            }
        };

        let mut buf = vec![0u8; location.length as usize];
        if let Err(e) = blobs.read(&location, &mut buf) {
            tracing::warn!(address = %address, %location, error = %e, "Blob read failed");
            report.add_inconsistency(format!(
                "cannot read location from sharky for item {} err: {:#}",
                address, e
            ));
            return Ok(false);
        }

        let chunk = Chunk::new(item.address, buf);
        if !swarm::valid(&chunk) {
            tracing::warn!(address = %address, "Chunk data does not match address");
            report.add_corruption(format!("address {}", address));
        }
        Ok(false)
    });

    if let Err(e) = result {
        tracing::warn!(index = primary.name(), error = %e, "Content scan failed");
        report.add_inconsistency(format!(
            "CRITICAL: failed checking content of {} index: {:#}",
            primary.name(),
            e
        ));
    }

    scanned
}
