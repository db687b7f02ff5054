//! Every entry of a secondary index must point at a primary entry.

use crate::localstore::Index;

/// Check that each record of `source` exists in `destination`.
///
/// A missing record, an undecodable record or a failed lookup yields one
/// finding per record. A failure iterating `source` yields a single critical
/// finding and ends the check.
pub fn check_indexes(source: &Index<'_>, destination: &Index<'_>) -> Vec<String> {
    let mut findings = Vec::new();
    let mut checked = 0u64;

    let result = source.scan(|entry| {
        checked += 1;
        let item = match entry {
            Ok(item) => item,
            Err(e) => {
                findings.push(format!("invalid entry: {:#}", e));
                return Ok(false);
            }
        };
        match destination.has(&item) {
            Ok(true) => {}
            Ok(false) => findings.push(format!(
                "item in {} and not in {} {}",
                source.name(),
                destination.name(),
                item.address_hex()
            )),
            Err(e) => findings.push(format!(
                "item in {} and not in {} {} err: {:#}",
                source.name(),
                destination.name(),
                item.address_hex(),
                e
            )),
        }
        Ok(false)
    });

    if let Err(e) = result {
        tracing::warn!(index = source.name(), error = %e, "Index iteration failed");
        findings.push(format!(
            "CRITICAL: failed checking {} index: {:#}",
            source.name(),
            e
        ));
    }

    tracing::debug!(
        index = source.name(),
        checked,
        violations = findings.len(),
        "Referential check done"
    );
    findings
}
