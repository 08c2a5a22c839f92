use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use fw_mcmc::{run_chains, SamplerConfig};
use log::info;

use crate::load_problem;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML configuration describing the sampler run.
    #[arg(long)]
    pub config: PathBuf,
    /// JSON problem: `current`, `moves` columns, optional `model` rows and `suff_stats`.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// Output directory for traces and the run manifest.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let mut config = SamplerConfig::from_yaml_str(&fs::read_to_string(&args.config)?)?;
    config.output.run_directory = Some(args.out.clone());
    let problem = load_problem(&args.input)?;
    info!(
        "sampling {} cells with {} moves into {}",
        problem.num_cells(),
        problem.moves.num_moves(),
        args.out.display()
    );

    let summary = run_chains(&problem, &config)?;

    // Keep the inputs next to the artefacts they produced.
    for (source, name) in [(&args.config, "config.yaml"), (&args.input, "problem.json")] {
        let target = args.out.join(name);
        fs::copy(source, &target).map_err(|err| {
            format!("copying {} to {}: {err}", source.display(), target.display())
        })?;
    }

    for chain in &summary.chains {
        println!(
            "chain {}: accept_prob={:.4} accepted={}/{} unique_states={} sis_refreshes={}",
            chain.chain,
            chain.accept_prob,
            chain.diagnostics.accepted,
            chain.diagnostics.steps,
            chain.trace.unique_states(),
            chain.diagnostics.sis_refreshes
        );
    }
    println!("mean accept_prob={:.4}", summary.mean_accept_prob);
    if let Some(path) = &summary.manifest_path {
        println!("manifest: {}", path.display());
    }
    Ok(())
}
