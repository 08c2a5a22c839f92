mod common;

use fw_core::{FiberProblem, MoveMatrix};
use fw_mcmc::{run, run_chains, run_with_generator, verify_trace, ProposalFlags, Target};

use common::{config, problem_2x3};

#[test]
fn mismatched_dimensions_fail_before_sampling() {
    let moves = MoveMatrix::from_columns(vec![vec![1, -1, 0]]).unwrap();
    let problem = FiberProblem::new(vec![1, 2], moves);
    let err = run(&problem, &config(5, 1, Target::Uniform, ProposalFlags::default())).unwrap_err();
    assert_eq!(err.code(), "dimension-mismatch");
}

#[test]
fn zero_thin_is_rejected() {
    let err = run(&problem_2x3(), &config(5, 0, Target::Uniform, ProposalFlags::default()))
        .unwrap_err();
    assert_eq!(err.code(), "non-positive-parameter");
    assert_eq!(err.info().context.get("parameter").map(String::as_str), Some("thin"));
}

#[test]
fn moves_outside_the_kernel_are_rejected() {
    let mut problem = problem_2x3();
    problem.moves = MoveMatrix::from_columns(vec![vec![1, 0, 0, 0, 0, 0]]).unwrap();
    let err = run(&problem, &config(5, 1, Target::Uniform, ProposalFlags::default())).unwrap_err();
    assert_eq!(err.code(), "move-leaves-fiber");
}

#[test]
fn statistics_must_describe_the_starting_fiber() {
    let mut problem = problem_2x3();
    let model = problem.model.clone().unwrap();
    problem.suff_stats = Some(model.apply(&[5, 0, 0, 0, 5, 0]));
    let flags = ProposalFlags::restricted(false, true);
    let err = run(&problem, &config(400, 1, Target::Uniform, flags)).unwrap_err();
    assert_eq!(err.code(), "statistics-mismatch");

    problem.suff_stats = Some(model.apply(&problem.current));
    let output = run(&problem, &config(400, 1, Target::Uniform, flags)).unwrap();
    let statistics = model.apply(&problem.current);
    assert!(verify_trace(&model, &statistics, &output.trace).is_valid());
}

#[test]
fn sis_needs_a_model() {
    let mut problem = problem_2x3();
    problem.model = None;
    let flags = ProposalFlags::restricted(false, true);
    let err = run_chains(&problem, &config(5, 1, Target::Hypergeometric, flags)).unwrap_err();
    assert_eq!(err.code(), "sis-without-model");

    let err = run_with_generator(&problem, &config(5, 1, Target::Uniform, flags), 0, None)
        .unwrap_err();
    assert_eq!(err.code(), "missing-generator");
}

#[test]
fn sis_can_be_disabled_without_a_model() {
    let mut problem = problem_2x3();
    problem.model = None;
    let output = run(&problem, &config(5, 2, Target::Uniform, ProposalFlags::restricted(true, false)))
        .unwrap();
    assert_eq!(output.trace.len(), 5);
}
