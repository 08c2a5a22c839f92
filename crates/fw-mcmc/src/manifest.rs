use std::fs;
use std::path::{Path, PathBuf};

use fw_core::errors::ErrorInfo;
use fw_core::{FiberError, FiberProblem, RunProvenance};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::SamplerConfig;
use crate::kernel::{ChainDiagnostics, ChainOutput};

/// Per-chain entry of a run manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRecord {
    /// Index of the chain.
    pub chain: usize,
    /// Seed the chain's streams were derived from.
    pub seed: u64,
    /// Mean acceptance probability of the chain.
    pub accept_prob: f64,
    /// Distinct tables among the recorded states.
    pub unique_states: usize,
    /// Per-cell averages over the recorded states.
    pub cell_means: Vec<f64>,
    /// Run counters.
    pub diagnostics: ChainDiagnostics,
    /// Trace CSV relative to the run directory.
    pub trace_file: Option<PathBuf>,
}

impl ChainRecord {
    /// Summarises a chain output.
    pub fn from_output(output: &ChainOutput, trace_file: Option<PathBuf>) -> Self {
        Self {
            chain: output.chain,
            seed: output.seed,
            accept_prob: output.accept_prob,
            unique_states: output.trace.unique_states(),
            cell_means: output.trace.cell_means(),
            diagnostics: output.diagnostics.clone(),
            trace_file,
        }
    }
}

/// Structured manifest describing a completed sampler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Configuration used for the run.
    pub config: SamplerConfig,
    /// Master seed used to derive chain substreams.
    pub master_seed: u64,
    /// Optional seed label captured from the configuration.
    pub seed_label: Option<String>,
    /// RFC 3339 timestamp of when the manifest was written.
    pub created_at: String,
    /// Input fingerprint and tool versions.
    pub provenance: RunProvenance,
    /// Average acceptance probability across chains.
    pub mean_accept_prob: f64,
    /// Per-chain records, ordered by chain index.
    pub chains: Vec<ChainRecord>,
}

impl RunManifest {
    /// Builds a manifest for `problem` run under `config`.
    pub fn new(
        problem: &FiberProblem,
        config: &SamplerConfig,
        mean_accept_prob: f64,
        chains: Vec<ChainRecord>,
    ) -> Result<Self, FiberError> {
        let mut provenance = RunProvenance::new(
            input_hash(problem)?,
            config.seed_policy.master_seed,
            problem.num_cells(),
            problem.moves.num_moves(),
        );
        provenance
            .tool_versions
            .insert("fw-mcmc".to_string(), env!("CARGO_PKG_VERSION").to_string());
        Ok(Self {
            config: config.clone(),
            master_seed: config.seed_policy.master_seed,
            seed_label: config.seed_policy.label.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
            provenance,
            mean_accept_prob,
            chains,
        })
    }

    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), FiberError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                FiberError::Serde(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            FiberError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            FiberError::Serde(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, FiberError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            FiberError::Serde(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            FiberError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }
}

/// SHA-256 of the canonical JSON encoding of the problem.
pub fn input_hash(problem: &FiberProblem) -> Result<String, FiberError> {
    let bytes = serde_json::to_vec(problem).map_err(|err| {
        FiberError::Serde(ErrorInfo::new("input-serialize", err.to_string()))
    })?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
