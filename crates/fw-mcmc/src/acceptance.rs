use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

/// Stationary distribution targeted by the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// Uniform over the fiber.
    #[default]
    Uniform,
    /// Conditional multinomial: weight proportional to `1 / ∏ cell!`.
    Hypergeometric,
}

impl Target {
    /// Probability, per outer iteration, that proposals are replaced by SIS draws.
    pub fn sis_refresh_probability(self) -> f64 {
        match self {
            Target::Uniform => 0.05,
            Target::Hypergeometric => 0.01,
        }
    }
}

/// Returns `Σ lnΓ(cell + 1)`, the log of `∏ cell!`.
pub fn log_factorial_sum(table: &[i64]) -> f64 {
    table
        .iter()
        .map(|&cell| ln_gamma(cell as f64 + 1.0))
        .sum()
}

/// Metropolis-Hastings acceptance probability of moving `current → candidate`.
///
/// Any negative candidate cell yields exactly zero for every target. The result
/// is always in `[0, 1]`.
pub fn acceptance_probability(target: Target, current: &[i64], candidate: &[i64]) -> f64 {
    if candidate.iter().any(|&cell| cell < 0) {
        return 0.0;
    }
    match target {
        Target::Uniform => 1.0,
        Target::Hypergeometric => {
            let log_ratio = log_factorial_sum(current) - log_factorial_sum(candidate);
            log_ratio.exp().min(1.0)
        }
    }
}

/// Accept iff the uniform draw is strictly below the probability.
pub fn accepts(draw: f64, probability: f64) -> bool {
    draw < probability
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_accepts_every_feasible_candidate() {
        assert_eq!(acceptance_probability(Target::Uniform, &[2, 3], &[3, 2]), 1.0);
        assert_eq!(acceptance_probability(Target::Uniform, &[2, 3], &[0, 5]), 1.0);
    }

    #[test]
    fn negative_cells_are_rejected_for_both_targets() {
        for target in [Target::Uniform, Target::Hypergeometric] {
            assert_eq!(acceptance_probability(target, &[0, 0], &[1, -1]), 0.0);
        }
    }

    #[test]
    fn hypergeometric_ratio_matches_factorials() {
        // [1, 1] -> [2, 0]: (1! 1!) / (2! 0!) = 1/2
        let p = acceptance_probability(Target::Hypergeometric, &[1, 1], &[2, 0]);
        assert!((p - 0.5).abs() < 1e-12);
        // reverse move is uphill and clamps to one
        let p = acceptance_probability(Target::Hypergeometric, &[2, 0], &[1, 1]);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn acceptance_requires_strictly_smaller_draw() {
        assert!(accepts(0.0, 1e-9));
        assert!(!accepts(0.5, 0.5));
        assert!(!accepts(0.0, 0.0));
    }

    #[test]
    fn refresh_probabilities_differ_by_target() {
        assert_eq!(Target::Uniform.sis_refresh_probability(), 0.05);
        assert_eq!(Target::Hypergeometric.sis_refresh_probability(), 0.01);
    }
}
