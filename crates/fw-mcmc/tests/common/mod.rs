#![allow(dead_code)]

use fw_core::{FiberProblem, ModelMatrix, MoveMatrix};
use fw_mcmc::{ProposalFlags, SamplerConfig, Target};

/// Row and column sums of a 2 x 3 table, cells in row-major order.
pub fn independence_2x3() -> ModelMatrix {
    ModelMatrix::from_rows(vec![
        vec![1, 1, 1, 0, 0, 0],
        vec![0, 0, 0, 1, 1, 1],
        vec![1, 0, 0, 1, 0, 0],
        vec![0, 1, 0, 0, 1, 0],
        vec![0, 0, 1, 0, 0, 1],
    ])
    .unwrap()
}

/// Basic moves of the 2 x 3 independence model together with their negatives.
pub fn basis_2x3() -> MoveMatrix {
    let basic = [
        vec![1, -1, 0, -1, 1, 0],
        vec![1, 0, -1, -1, 0, 1],
        vec![0, 1, -1, 0, -1, 1],
    ];
    let mut columns: Vec<Vec<i64>> = basic.to_vec();
    columns.extend(basic.iter().map(|m| m.iter().map(|x| -x).collect()));
    MoveMatrix::from_columns(columns).unwrap()
}

pub fn problem_2x3() -> FiberProblem {
    FiberProblem::new(vec![3, 0, 2, 1, 4, 0], basis_2x3()).with_model(independence_2x3())
}

/// 2 x 2 table with all margins equal to 2: the fiber is `[a, 2-a, 2-a, a]`.
pub fn problem_2x2() -> FiberProblem {
    let model = ModelMatrix::from_rows(vec![
        vec![1, 1, 0, 0],
        vec![0, 0, 1, 1],
        vec![1, 0, 1, 0],
        vec![0, 1, 0, 1],
    ])
    .unwrap();
    let moves = MoveMatrix::from_columns(vec![vec![1, -1, -1, 1], vec![-1, 1, 1, -1]]).unwrap();
    FiberProblem::new(vec![1, 1, 1, 1], moves).with_model(model)
}

pub fn config(iter: usize, thin: usize, target: Target, proposal: ProposalFlags) -> SamplerConfig {
    let mut config = SamplerConfig::default();
    config.iter = iter;
    config.thin = thin;
    config.target = target;
    config.proposal = proposal;
    config.seed_policy.master_seed = 2024;
    config
}

/// Every flag combination the driver supports.
pub fn all_flag_sets() -> Vec<ProposalFlags> {
    let mut sets = Vec::new();
    for bits in 0u8..16 {
        sets.push(ProposalFlags {
            hit_and_run: bits & 1 != 0,
            sis: bits & 2 != 0,
            non_uniform: bits & 4 != 0,
            adaptive: bits & 8 != 0,
        });
    }
    sets
}
