//! Audit findings and their rendering.

use std::io::{self, Write};

/// Findings collected by an audit, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    inconsistencies: Vec<String>,
    corruptions: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a structural defect between indexes or counters.
    pub fn add_inconsistency(&mut self, detail: impl Into<String>) {
        self.inconsistencies.push(detail.into());
    }

    pub fn extend_inconsistencies<I>(&mut self, details: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.inconsistencies.extend(details);
    }

    /// Record a chunk whose data does not match its address.
    pub fn add_corruption(&mut self, detail: impl Into<String>) {
        self.corruptions.push(detail.into());
    }

    pub fn inconsistencies(&self) -> &[String] {
        &self.inconsistencies
    }

    pub fn corruptions(&self) -> &[String] {
        &self.corruptions
    }

    pub fn is_clean(&self) -> bool {
        self.inconsistencies.is_empty() && self.corruptions.is_empty()
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.is_clean() {
            return writeln!(out, "No inconsistencies or corruptions found");
        }

        if !self.inconsistencies.is_empty() {
            writeln!(
                out,
                "Found {} inconsistencies in indexes",
                self.inconsistencies.len()
            )?;
            for detail in &self.inconsistencies {
                writeln!(out, "INCONSISTENCY: {}", detail)?;
            }
        }

        if !self.corruptions.is_empty() {
            writeln!(out, "Found {} data corruptions", self.corruptions.len())?;
            for detail in &self.corruptions {
                writeln!(out, "DATA CORRUPTION: {}", detail)?;
            }
        }
        Ok(())
    }
}
