//! Shared infrastructure for the chunkaudit binaries.
//!
//! - [`telemetry`]: tracing subscriber setup
//! - [`build_info`]: version and build metadata baked in by `build.rs`

pub mod telemetry;

/// Build metadata captured at compile time.
pub mod build_info {
    /// Crate version from Cargo.toml.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    /// Short git commit hash, suffixed with `-dirty` for modified trees.
    pub const GIT_HASH: &str = env!("CHUNKAUDIT_GIT_HASH");
    /// RFC 3339 build timestamp.
    pub const BUILD_TIMESTAMP: &str = env!("CHUNKAUDIT_BUILD_TIMESTAMP");

    /// One-line description used in startup logs.
    pub fn summary() -> String {
        format!("{} ({}, built {})", VERSION, GIT_HASH, BUILD_TIMESTAMP)
    }
}
