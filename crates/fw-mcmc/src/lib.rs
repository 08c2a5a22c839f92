#![deny(missing_docs)]

//! Metropolis-Hastings sampling over the fiber of a contingency table.
//!
//! A chain starts from an observed table and repeatedly picks a move (an
//! integer direction that preserves the sufficient statistics), turns it into
//! a candidate table and accepts it with the probability required by the
//! target distribution. See [`kernel::run`] and [`kernel::run_chains`].

/// Metropolis acceptance for the uniform and hypergeometric targets.
pub mod acceptance;
/// Fiber checks on move matrices and recorded traces.
pub mod analysis;
/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic per-chain random streams.
pub mod determinism;
/// Chain driver and public `run`/`run_chains` entry points.
pub mod kernel;
/// Run manifest serialization helpers.
pub mod manifest;
/// Unit-step, hit-and-run and adaptive proposals.
pub mod proposal;
/// Uniform and history-weighted move selection.
pub mod selector;
/// Sequential table generator used for SIS refreshes.
pub mod sis;
/// Recorded chain states and CSV export.
pub mod trace;

pub use acceptance::{acceptance_probability, Target};
pub use analysis::{check_moves, sufficient_statistics, verify_trace, FiberReport};
pub use config::{OutputConfig, ProposalFlags, SamplerConfig, SeedPolicy, SisConfig};
pub use kernel::{run, run_chains, run_with_generator, ChainDiagnostics, ChainOutput, RunSummary};
pub use manifest::{input_hash, ChainRecord, RunManifest};
pub use proposal::{line_bounds, LineBounds, ProposalStrategy};
pub use selector::{MoveSelector, MoveWeights};
pub use sis::SequentialSis;
pub use trace::Trace;
