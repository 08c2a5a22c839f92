use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use fw_mcmc::{verify_trace, Trace};

use crate::{load_problem, write_json};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON problem whose model matrix defines the fiber.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// Trace CSV produced by `fw-sim run`.
    #[arg(long)]
    pub trace: PathBuf,
    /// Optional path for a JSON copy of the report.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: &CheckArgs) -> Result<(), Box<dyn Error>> {
    let problem = load_problem(&args.input)?;
    let (Some(model), Some(statistics)) = (problem.model.as_ref(), problem.statistics()) else {
        return Err("the problem has no model matrix to check against".into());
    };
    let trace = Trace::read_csv(&args.trace)?;
    if trace.num_cells() != problem.num_cells() {
        return Err(format!(
            "trace has {} cells per state, problem has {}",
            trace.num_cells(),
            problem.num_cells()
        )
        .into());
    }

    let report = verify_trace(model, &statistics, &trace);
    if let Some(path) = &args.report {
        write_json(path, &report)?;
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_valid() {
        return Err(format!("trace {} leaves the fiber", args.trace.display()).into());
    }
    Ok(())
}
