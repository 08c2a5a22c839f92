use fw_core::RngHandle;
use serde::{Deserialize, Serialize};

use crate::acceptance::{acceptance_probability, accepts, Target};
use crate::config::ProposalFlags;

/// Strategy turning a selected move into a candidate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProposalStrategy {
    /// `current + move`.
    UnitStep,
    /// `current + s * move` with `s` uniform on the feasible line.
    HitAndRun,
    /// Endpoint of a short Metropolis walk along the feasible line.
    Adaptive,
}

impl ProposalStrategy {
    /// Resolves the strategy from the configured flags. Adaptive wins over hit-and-run.
    pub fn from_flags(flags: &ProposalFlags) -> Self {
        if flags.adaptive {
            ProposalStrategy::Adaptive
        } else if flags.hit_and_run {
            ProposalStrategy::HitAndRun
        } else {
            ProposalStrategy::UnitStep
        }
    }

    /// Produces a candidate for `current` along `direction`.
    ///
    /// Candidates are not checked for feasibility here.
    pub fn propose(self, current: &[i64], direction: &[i64], rng: &mut RngHandle) -> Proposal {
        match self {
            ProposalStrategy::UnitStep => Proposal::step(current, direction, 1, false),
            ProposalStrategy::HitAndRun => match feasible_line(current, direction) {
                Some(bounds) => {
                    let mut step = rng.integer_between(bounds.lower, bounds.upper);
                    if step == 0 {
                        step = 1;
                    }
                    Proposal::step(current, direction, step, false)
                }
                None => Proposal::step(current, direction, 1, true),
            },
            ProposalStrategy::Adaptive => match feasible_line(current, direction) {
                Some(bounds) => walk_line(current, direction, bounds.length(), rng),
                None => Proposal::step(current, direction, 1, true),
            },
        }
    }
}

/// Candidate table together with how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Proposed table; may contain negative cells.
    pub candidate: Vec<i64>,
    /// Multiple of the move applied (net displacement for the adaptive walk).
    pub step: i64,
    /// Whether the line was empty or unbounded and a unit step was used instead.
    pub fell_back: bool,
}

impl Proposal {
    fn step(current: &[i64], direction: &[i64], step: i64, fell_back: bool) -> Self {
        Self {
            candidate: shifted(current, direction, step),
            step,
            fell_back,
        }
    }
}

/// Integer step range `[lower, upper]` keeping `current + s * direction` nonnegative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBounds {
    /// Most negative feasible step.
    pub lower: i64,
    /// Most positive feasible step.
    pub upper: i64,
}

impl LineBounds {
    /// `true` when no integer step keeps the table nonnegative.
    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }

    /// `upper - lower`, the number of unit moves spanning the line.
    pub fn length(&self) -> i64 {
        self.upper - self.lower
    }
}

/// Computes the integer bounds of the line through `current` along `direction`.
///
/// Only coordinates where the direction is nonzero constrain the step. Returns
/// `None` when one side of the line is unbounded (the direction has entries of
/// a single sign).
pub fn line_bounds(current: &[i64], direction: &[i64]) -> Option<LineBounds> {
    let mut lower: Option<i64> = None;
    let mut upper: Option<i64> = None;
    for (&cell, &delta) in current.iter().zip(direction) {
        if delta > 0 {
            let bound = -cell.div_euclid(delta);
            lower = Some(lower.map_or(bound, |value| value.max(bound)));
        } else if delta < 0 {
            let bound = cell.div_euclid(-delta);
            upper = Some(upper.map_or(bound, |value| value.min(bound)));
        }
    }
    Some(LineBounds {
        lower: lower?,
        upper: upper?,
    })
}

fn feasible_line(current: &[i64], direction: &[i64]) -> Option<LineBounds> {
    line_bounds(current, direction).filter(|bounds| !bounds.is_empty())
}

/// Returns `current + step * direction`.
pub fn shifted(current: &[i64], direction: &[i64], step: i64) -> Vec<i64> {
    current
        .iter()
        .zip(direction)
        .map(|(cell, delta)| cell + step * delta)
        .collect()
}

fn walk_line(current: &[i64], direction: &[i64], length: i64, rng: &mut RngHandle) -> Proposal {
    let mut state = current.to_vec();
    let mut displacement = 0;
    for _ in 0..length {
        let sign = rng.direction();
        let trial = shifted(&state, direction, sign);
        let probability = acceptance_probability(Target::Hypergeometric, &state, &trial);
        if accepts(rng.uniform(), probability) {
            state = trial;
            displacement += sign;
        }
    }
    Proposal {
        candidate: state,
        step: displacement,
        fell_back: false,
    }
}
