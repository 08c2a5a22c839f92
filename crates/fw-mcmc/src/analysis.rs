use fw_core::errors::ErrorInfo;
use fw_core::{FiberError, ModelMatrix, MoveMatrix};
use serde::{Deserialize, Serialize};

use crate::trace::Trace;

/// Computes `A·table`, the sufficient statistics of `table`.
pub fn sufficient_statistics(model: &ModelMatrix, table: &[i64]) -> Result<Vec<i64>, FiberError> {
    if model.num_cells() != table.len() {
        return Err(FiberError::Model(
            ErrorInfo::new("dimension-mismatch", "table and model differ in cell count")
                .with_context("model_cells", model.num_cells())
                .with_context("table_cells", table.len()),
        ));
    }
    Ok(model.apply(table))
}

/// Verifies that every move lies in the kernel of the model matrix.
pub fn check_moves(model: &ModelMatrix, moves: &MoveMatrix) -> Result<(), FiberError> {
    if model.num_cells() != moves.num_cells() {
        return Err(FiberError::Moves(
            ErrorInfo::new("dimension-mismatch", "moves and model differ in cell count")
                .with_context("model_cells", model.num_cells())
                .with_context("move_cells", moves.num_cells()),
        ));
    }
    for (index, direction) in moves.columns().enumerate() {
        if !model.annihilates(direction) {
            return Err(FiberError::Moves(
                ErrorInfo::new("move-leaves-fiber", "move changes the sufficient statistics")
                    .with_context("move", index)
                    .with_hint("moves must satisfy A·m = 0"),
            ));
        }
    }
    Ok(())
}

/// Outcome of checking a trace against its fiber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiberReport {
    /// Number of recorded states inspected.
    pub states_checked: usize,
    /// First state with a negative cell.
    pub first_negative: Option<usize>,
    /// First state whose statistics differ from the target.
    pub first_off_fiber: Option<usize>,
}

impl FiberReport {
    /// `true` when every state is nonnegative and inside the fiber.
    pub fn is_valid(&self) -> bool {
        self.first_negative.is_none() && self.first_off_fiber.is_none()
    }
}

/// Checks nonnegativity and `A·s == statistics` for every recorded state.
pub fn verify_trace(model: &ModelMatrix, statistics: &[i64], trace: &Trace) -> FiberReport {
    let mut report = FiberReport {
        states_checked: trace.len(),
        first_negative: None,
        first_off_fiber: None,
    };
    for (index, state) in trace.states().enumerate() {
        if report.first_negative.is_none() && state.iter().any(|&cell| cell < 0) {
            report.first_negative = Some(index);
        }
        if report.first_off_fiber.is_none() && model.apply(state) != statistics {
            report.first_off_fiber = Some(index);
        }
        if report.first_negative.is_some() && report.first_off_fiber.is_some() {
            break;
        }
    }
    report
}
