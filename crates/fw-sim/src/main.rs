use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use commands::{
    check::{self, CheckArgs},
    run::{self, RunArgs},
};
use fw_core::FiberProblem;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "fw-sim", about = "Markov chain sampler over contingency-table fibers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample the fiber of a problem and write traces plus a run manifest.
    Run(RunArgs),
    /// Verify that every state of a trace CSV lies in the problem's fiber.
    Check(CheckArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Check(args) => check::run(&args),
    }
}

pub(crate) fn load_problem(path: &Path) -> Result<FiberProblem, Box<dyn Error>> {
    let problem: FiberProblem = serde_json::from_str(&fs::read_to_string(path)?)?;
    problem.validate()?;
    Ok(problem)
}

pub(crate) fn write_json<P: AsRef<Path>, T: serde::Serialize>(
    path: P,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
