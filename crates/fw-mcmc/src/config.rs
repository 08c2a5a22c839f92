use std::path::PathBuf;

use fw_core::errors::ErrorInfo;
use fw_core::FiberError;
use serde::{Deserialize, Serialize};

use crate::acceptance::Target;

/// YAML-configurable parameters governing a sampler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of recorded states (outer iterations).
    #[serde(default = "default_iter")]
    pub iter: usize,
    /// Inner steps per recorded state.
    #[serde(default = "default_thin")]
    pub thin: usize,
    /// Stationary distribution of the chain.
    #[serde(default)]
    pub target: Target,
    /// Proposal and move-selection switches.
    #[serde(default)]
    pub proposal: ProposalFlags,
    /// Number of independent chains executed by `run_chains`.
    #[serde(default = "default_chains")]
    pub chains: usize,
    /// Sequential importance sampling tuning.
    #[serde(default)]
    pub sis: SisConfig,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Output directory configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_iter() -> usize {
    1_000
}

fn default_thin() -> usize {
    1
}

fn default_chains() -> usize {
    1
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            iter: default_iter(),
            thin: default_thin(),
            target: Target::default(),
            proposal: ProposalFlags::default(),
            chains: default_chains(),
            sis: SisConfig::default(),
            seed_policy: SeedPolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SamplerConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, FiberError> {
        let config: Self = serde_yaml::from_str(text).map_err(|err| {
            FiberError::Serde(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects parameter combinations that cannot produce a chain.
    pub fn validate(&self) -> Result<(), FiberError> {
        for (name, value) in [
            ("iter", self.iter),
            ("thin", self.thin),
            ("chains", self.chains),
            ("sis.max_attempts", self.sis.max_attempts),
        ] {
            if value == 0 {
                return Err(FiberError::Config(
                    ErrorInfo::new("non-positive-parameter", "parameter must be positive")
                        .with_context("parameter", name),
                ));
            }
        }
        self.total_steps().map(|_| ())
    }

    /// Total number of inner steps, `iter * thin`.
    pub fn total_steps(&self) -> Result<usize, FiberError> {
        self.iter.checked_mul(self.thin).ok_or_else(|| {
            FiberError::Config(
                ErrorInfo::new("step-overflow", "iter * thin overflows")
                    .with_context("iter", self.iter)
                    .with_context("thin", self.thin),
            )
        })
    }
}

/// Switches selecting the proposal strategy and move selection scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProposalFlags {
    /// Draw a random step length along the feasible line of the move.
    #[serde(default)]
    pub hit_and_run: bool,
    /// Occasionally replace the proposal with an independent SIS draw.
    #[serde(default)]
    pub sis: bool,
    /// Select moves proportionally to their acceptance history.
    #[serde(default)]
    pub non_uniform: bool,
    /// Walk the feasible line with a short Metropolis sub-chain.
    #[serde(default)]
    pub adaptive: bool,
}

impl ProposalFlags {
    /// Flag set of the basic sampler: no adaptive sub-chain, uniform selection.
    pub fn restricted(hit_and_run: bool, sis: bool) -> Self {
        Self {
            hit_and_run,
            sis,
            non_uniform: false,
            adaptive: false,
        }
    }
}

/// Tuning of the sequential importance sampling generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SisConfig {
    /// Restarts allowed before a table draw is reported as failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_max_attempts() -> usize {
    1_000
}

impl Default for SisConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in manifests.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x0F1B_E75E_ED00_0001_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Output directory layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for run artefacts. Created if it does not exist.
    #[serde(default)]
    pub run_directory: Option<PathBuf>,
    /// Trace filename stem; chain `k` writes `<stem>_chain<k>.csv`.
    #[serde(default = "default_trace_stem")]
    pub trace_stem: String,
    /// Manifest filename relative to `run_directory`.
    #[serde(default = "default_manifest_filename")]
    pub manifest_file: PathBuf,
}

fn default_trace_stem() -> String {
    "trace".to_string()
}

fn default_manifest_filename() -> PathBuf {
    PathBuf::from("manifest.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            run_directory: None,
            trace_stem: default_trace_stem(),
            manifest_file: default_manifest_filename(),
        }
    }
}

impl OutputConfig {
    /// Trace file name used for chain `chain`.
    pub fn trace_file(&self, chain: usize) -> PathBuf {
        PathBuf::from(format!("{}_chain{chain}.csv", self.trace_stem))
    }
}
