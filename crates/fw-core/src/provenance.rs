//! Provenance and schema descriptors attached to run artefacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information recorded alongside every sampler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema of the manifest this provenance belongs to.
    pub schema: SchemaVersion,
    /// SHA-256 hash of the input problem.
    pub input_hash: String,
    /// Master deterministic seed used for all randomness.
    pub seed: u64,
    /// Number of cells in the sampled table.
    pub cells: usize,
    /// Number of moves available to the sampler.
    pub moves: usize,
    /// Version map for all tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Creates a provenance record stamped with the current crate version.
    pub fn new(input_hash: impl Into<String>, seed: u64, cells: usize, moves: usize) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert("fw-core".to_string(), env!("CARGO_PKG_VERSION").to_string());
        Self {
            schema: SchemaVersion::default(),
            input_hash: input_hash.into(),
            seed,
            cells,
            moves,
            tool_versions,
        }
    }
}
