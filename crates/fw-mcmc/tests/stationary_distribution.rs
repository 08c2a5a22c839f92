mod common;

use fw_mcmc::{run, ProposalFlags, Target};

use common::{config, problem_2x2};

/// Fraction of recorded states in each of the three fiber points `a = 0, 1, 2`.
fn occupancy(target: Target) -> [f64; 3] {
    let problem = problem_2x2();
    let output = run(&problem, &config(20_000, 2, target, ProposalFlags::default())).unwrap();
    let mut counts = [0usize; 3];
    for state in output.trace.states() {
        counts[state[0] as usize] += 1;
    }
    let total = output.trace.len() as f64;
    counts.map(|count| count as f64 / total)
}

#[test]
fn uniform_target_visits_fiber_evenly() {
    let freq = occupancy(Target::Uniform);
    for value in freq {
        assert!((value - 1.0 / 3.0).abs() < 0.03, "{freq:?}");
    }
}

#[test]
fn hypergeometric_target_matches_factorial_weights() {
    // weights 1/(a!(2-a)!)^2: 1/4, 1, 1/4
    let freq = occupancy(Target::Hypergeometric);
    let expected = [1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0];
    for (value, want) in freq.iter().zip(expected) {
        assert!((value - want).abs() < 0.03, "{freq:?}");
    }
}
