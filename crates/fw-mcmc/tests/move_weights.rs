mod common;

use fw_mcmc::{run, ProposalFlags, Target};

use common::{config, problem_2x3};

fn weighted(hit_and_run: bool) -> ProposalFlags {
    ProposalFlags {
        hit_and_run,
        sis: false,
        non_uniform: true,
        adaptive: false,
    }
}

#[test]
fn total_weight_counts_accepted_steps() {
    let problem = problem_2x3();
    for target in [Target::Uniform, Target::Hypergeometric] {
        for hit_and_run in [false, true] {
            let output = run(&problem, &config(80, 5, target, weighted(hit_and_run))).unwrap();
            let diagnostics = &output.diagnostics;
            let weights = diagnostics.move_weights.as_ref().unwrap();
            let total = diagnostics.total_weight.unwrap();

            assert_eq!(weights.len(), 6);
            assert_eq!(total, 6.0 + diagnostics.accepted as f64);
            assert_eq!(weights.iter().sum::<f64>(), total);
            assert!(weights.iter().all(|&weight| weight >= 1.0));
        }
    }
}

#[test]
fn weights_never_decrease_as_the_run_grows() {
    let problem = problem_2x3();
    let mut previous = vec![1.0; 6];
    for iter in [5, 10, 20, 40] {
        let output = run(&problem, &config(iter, 2, Target::Uniform, weighted(false))).unwrap();
        let weights = output.diagnostics.move_weights.unwrap();
        for (now, before) in weights.iter().zip(&previous) {
            assert!(now >= before);
        }
        previous = weights;
    }
}

#[test]
fn uniform_selection_reports_no_weights() {
    let problem = problem_2x3();
    let output = run(&problem, &config(10, 1, Target::Uniform, ProposalFlags::default())).unwrap();
    assert!(output.diagnostics.move_weights.is_none());
    assert!(output.diagnostics.total_weight.is_none());
}
