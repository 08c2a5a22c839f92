use std::fs;
use std::path::{Path, PathBuf};

use fw_core::errors::ErrorInfo;
use fw_core::{FiberError, FiberProblem, TableGenerator};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::acceptance::{acceptance_probability, accepts};
use crate::analysis;
use crate::config::SamplerConfig;
use crate::determinism::{self, ChainStreams};
use crate::manifest::{ChainRecord, RunManifest};
use crate::proposal::ProposalStrategy;
use crate::selector::MoveSelector;
use crate::sis::SequentialSis;
use crate::trace::Trace;

/// Counters collected while a chain runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainDiagnostics {
    /// Inner steps executed (`iter * thin`).
    pub steps: usize,
    /// Inner steps whose candidate was accepted.
    pub accepted: usize,
    /// Inner steps whose candidate came from the SIS generator.
    pub sis_refreshes: usize,
    /// SIS draws that failed and fell back to the move-based candidate.
    pub sis_failures: usize,
    /// Hit-and-run or adaptive proposals that used the unit-step fallback.
    pub line_fallbacks: usize,
    /// Final move-selection weights (non-uniform selection only).
    pub move_weights: Option<Vec<f64>>,
    /// Final total of the move-selection weights (non-uniform selection only).
    pub total_weight: Option<f64>,
}

/// Result of a single chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainOutput {
    /// Index of the chain within the run.
    pub chain: usize,
    /// Seed the chain's streams were derived from.
    pub seed: u64,
    /// Recorded states, one per outer iteration.
    pub trace: Trace,
    /// Mean acceptance probability over every inner step.
    pub accept_prob: f64,
    /// Run counters.
    pub diagnostics: ChainDiagnostics,
}

/// Summary returned to callers after a multi-chain run completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Master seed the chain seeds were derived from.
    pub master_seed: u64,
    /// Chain outputs ordered by chain index.
    pub chains: Vec<ChainOutput>,
    /// Average of the per-chain acceptance probabilities.
    pub mean_accept_prob: f64,
    /// Trace CSV files written during the run.
    pub trace_paths: Vec<PathBuf>,
    /// Manifest path, if emitted.
    pub manifest_path: Option<PathBuf>,
}

/// Runs chain 0 of the configured run and returns its trace and acceptance.
pub fn run(problem: &FiberProblem, config: &SamplerConfig) -> Result<ChainOutput, FiberError> {
    let generator = prepare(problem, config)?;
    let seed = determinism::chain_seed(config.seed_policy.master_seed, 0);
    drive(
        problem,
        config,
        0,
        seed,
        generator.as_ref().map(|sis| sis as &dyn TableGenerator),
    )
}

/// Runs one chain with a caller-supplied table generator for SIS refreshes.
pub fn run_with_generator(
    problem: &FiberProblem,
    config: &SamplerConfig,
    chain: usize,
    generator: Option<&dyn TableGenerator>,
) -> Result<ChainOutput, FiberError> {
    validate_inputs(problem, config)?;
    if config.proposal.sis && generator.is_none() {
        return Err(FiberError::Config(
            ErrorInfo::new("missing-generator", "SIS refreshes need a table generator")
                .with_hint("pass a generator or disable proposal.sis"),
        ));
    }
    let seed = determinism::chain_seed(config.seed_policy.master_seed, chain);
    drive(problem, config, chain, seed, generator)
}

/// Runs `config.chains` independent chains in parallel.
///
/// Chains share the problem read-only and own everything else. Results are
/// ordered by chain index and do not depend on scheduling. Artefacts are
/// written when `config.output.run_directory` is set.
pub fn run_chains(
    problem: &FiberProblem,
    config: &SamplerConfig,
) -> Result<RunSummary, FiberError> {
    let generator = prepare(problem, config)?;
    let generator = generator.as_ref().map(|sis| sis as &dyn TableGenerator);
    let master_seed = config.seed_policy.master_seed;

    let chains = (0..config.chains)
        .into_par_iter()
        .map(|chain| {
            let seed = determinism::chain_seed(master_seed, chain);
            drive(problem, config, chain, seed, generator)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mean_accept_prob =
        chains.iter().map(|output| output.accept_prob).sum::<f64>() / chains.len() as f64;

    let mut summary = RunSummary {
        master_seed,
        chains,
        mean_accept_prob,
        trace_paths: Vec::new(),
        manifest_path: None,
    };
    if let Some(run_dir) = config.output.run_directory.clone() {
        write_artifacts(problem, config, &run_dir, &mut summary)?;
    }
    Ok(summary)
}

fn validate_inputs(problem: &FiberProblem, config: &SamplerConfig) -> Result<(), FiberError> {
    config.validate()?;
    problem.validate()?;
    if let Some(model) = &problem.model {
        analysis::check_moves(model, &problem.moves)?;
    }
    Ok(())
}

fn prepare(
    problem: &FiberProblem,
    config: &SamplerConfig,
) -> Result<Option<SequentialSis>, FiberError> {
    validate_inputs(problem, config)?;
    if !config.proposal.sis {
        return Ok(None);
    }
    let (Some(model), Some(statistics)) = (problem.model.clone(), problem.statistics()) else {
        return Err(FiberError::Config(
            ErrorInfo::new("sis-without-model", "SIS refreshes need a model matrix")
                .with_hint("add `model` to the problem or disable proposal.sis"),
        ));
    };
    SequentialSis::new(model, statistics, config.sis.max_attempts).map(Some)
}

fn drive(
    problem: &FiberProblem,
    config: &SamplerConfig,
    chain: usize,
    seed: u64,
    generator: Option<&dyn TableGenerator>,
) -> Result<ChainOutput, FiberError> {
    let total_steps = config.total_steps()?;
    let moves = &problem.moves;
    let strategy = ProposalStrategy::from_flags(&config.proposal);
    let generator = generator.filter(|_| config.proposal.sis);
    let refresh_probability = config.target.sis_refresh_probability();
    let mut streams = ChainStreams::new(seed);
    let mut selector = if config.proposal.non_uniform {
        MoveSelector::weighted(moves.num_moves())
    } else {
        MoveSelector::uniform(moves.num_moves(), total_steps, &mut streams.move_indices)
    };

    info!(
        "chain {chain}: {} cells, {} moves, {} x {} steps, {:?} proposals, {:?} target",
        problem.num_cells(),
        moves.num_moves(),
        config.iter,
        config.thin,
        strategy,
        config.target
    );

    let mut current = problem.current.clone();
    let mut trace = Trace::with_capacity(current.len(), config.iter);
    let mut accept_prob = 0.0;
    let mut diagnostics = ChainDiagnostics {
        steps: total_steps,
        ..ChainDiagnostics::default()
    };

    for iteration in 0..config.iter {
        let refresh = generator.is_some()
            && accepts(streams.sis_trigger.uniform(), refresh_probability);
        if refresh {
            debug!("chain {chain}: SIS refresh during iteration {iteration}");
        }
        for inner in 0..config.thin {
            let step = iteration * config.thin + inner;
            let move_index = selector.select(step, &mut streams.move_selection);
            let direction = moves.column(move_index);

            let sis_candidate = match generator {
                Some(sis) if refresh => match sis.generate(&mut streams.sis_table) {
                    Ok(table) => Some(table),
                    Err(err) => {
                        debug!("chain {chain}: SIS draw failed, keeping move proposal: {err}");
                        diagnostics.sis_failures += 1;
                        None
                    }
                },
                _ => None,
            };
            let candidate = match sis_candidate {
                Some(table) => {
                    diagnostics.sis_refreshes += 1;
                    table
                }
                None => {
                    let proposal = strategy.propose(&current, direction, &mut streams.proposal);
                    if proposal.fell_back {
                        diagnostics.line_fallbacks += 1;
                    }
                    proposal.candidate
                }
            };

            let probability = acceptance_probability(config.target, &current, &candidate);
            accept_prob += probability / total_steps as f64;
            if accepts(streams.acceptance.uniform(), probability) {
                current = candidate;
                diagnostics.accepted += 1;
                selector.credit(move_index);
            }
        }
        trace.push(&current);
    }

    if let Some(weights) = selector.weights() {
        diagnostics.move_weights = Some(weights.weights().to_vec());
        diagnostics.total_weight = Some(weights.total());
    }
    info!(
        "chain {chain}: finished with acceptance {accept_prob:.4} ({} of {} accepted, {} SIS refreshes)",
        diagnostics.accepted, diagnostics.steps, diagnostics.sis_refreshes
    );

    Ok(ChainOutput {
        chain,
        seed,
        trace,
        accept_prob,
        diagnostics,
    })
}

fn write_artifacts(
    problem: &FiberProblem,
    config: &SamplerConfig,
    run_dir: &Path,
    summary: &mut RunSummary,
) -> Result<(), FiberError> {
    fs::create_dir_all(run_dir).map_err(|err| {
        FiberError::Serde(
            ErrorInfo::new("run-dir-create", err.to_string())
                .with_context("path", run_dir.display()),
        )
    })?;

    let mut records = Vec::with_capacity(summary.chains.len());
    for output in &summary.chains {
        let relative = config.output.trace_file(output.chain);
        let path = run_dir.join(&relative);
        output.trace.write_csv(&path)?;
        summary.trace_paths.push(path);
        records.push(ChainRecord::from_output(output, Some(relative)));
    }

    let manifest_path = run_dir.join(&config.output.manifest_file);
    let manifest = RunManifest::new(problem, config, summary.mean_accept_prob, records)?;
    manifest.write(&manifest_path)?;
    info!("wrote run manifest to {}", manifest_path.display());
    summary.manifest_path = Some(manifest_path);
    Ok(())
}
