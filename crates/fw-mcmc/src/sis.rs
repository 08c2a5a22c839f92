use fw_core::errors::ErrorInfo;
use fw_core::{FiberError, ModelMatrix, RngHandle, TableGenerator};
use log::warn;

/// Sequential table generator for nonnegative model matrices.
///
/// Cells are filled in order. Each cell is drawn uniformly between a lower
/// bound (what a statistic still needs after every other open cell in its row
/// takes its largest feasible value) and an upper bound (the smallest remaining
/// statistic the cell contributes to). A dead end restarts the draw.
#[derive(Debug, Clone)]
pub struct SequentialSis {
    model: ModelMatrix,
    statistics: Vec<i64>,
    max_attempts: usize,
}

impl SequentialSis {
    /// Builds a generator for the fiber `{x >= 0 : model · x == statistics}`.
    pub fn new(
        model: ModelMatrix,
        statistics: Vec<i64>,
        max_attempts: usize,
    ) -> Result<Self, FiberError> {
        if !model.is_nonnegative() {
            return Err(FiberError::Sis(
                ErrorInfo::new("signed-model", "SIS requires a nonnegative model matrix")
                    .with_hint("use an indicator configuration matrix"),
            ));
        }
        if statistics.len() != model.num_rows() {
            return Err(FiberError::Sis(
                ErrorInfo::new(
                    "statistics-mismatch",
                    "statistics do not match the model rows",
                )
                .with_context("rows", model.num_rows())
                .with_context("statistics", statistics.len()),
            ));
        }
        if let Some(row) = statistics.iter().position(|&value| value < 0) {
            return Err(FiberError::Sis(
                ErrorInfo::new("negative-statistic", "statistics must be nonnegative")
                    .with_context("row", row),
            ));
        }
        for cell in 0..model.num_cells() {
            if (0..model.num_rows()).all(|row| model.row(row)[cell] == 0) {
                return Err(FiberError::Sis(
                    ErrorInfo::new("unbounded-cell", "cell is not constrained by any statistic")
                        .with_context("cell", cell),
                ));
            }
        }
        for row in 0..model.num_rows() {
            if model.row(row).iter().all(|&entry| entry == 0) && statistics[row] != 0 {
                return Err(FiberError::Sis(
                    ErrorInfo::new("infeasible-statistic", "empty row with nonzero statistic")
                        .with_context("row", row),
                ));
            }
        }
        if max_attempts == 0 {
            return Err(FiberError::Config(ErrorInfo::new(
                "non-positive-parameter",
                "SIS needs at least one attempt",
            )));
        }
        Ok(Self {
            model,
            statistics,
            max_attempts,
        })
    }

    /// Model matrix the generator samples under.
    pub fn model(&self) -> &ModelMatrix {
        &self.model
    }

    /// Target sufficient statistics.
    pub fn statistics(&self) -> &[i64] {
        &self.statistics
    }

    fn try_draw(&self, rng: &mut RngHandle) -> Option<Vec<i64>> {
        let cells = self.model.num_cells();
        let rows = self.model.num_rows();
        let mut remaining = self.statistics.clone();
        let mut table = vec![0; cells];

        for cell in 0..cells {
            let caps: Vec<i64> = (cell..cells)
                .map(|open| self.capacity(open, &remaining))
                .collect();
            let upper = caps[0];
            let mut lower = 0;
            for row in 0..rows {
                let coefficient = self.model.row(row)[cell];
                if coefficient == 0 {
                    continue;
                }
                let slack: i64 = self.model.row(row)[cell + 1..]
                    .iter()
                    .zip(&caps[1..])
                    .map(|(&entry, &cap)| entry.saturating_mul(cap))
                    .fold(0i64, i64::saturating_add);
                let needed = remaining[row].saturating_sub(slack);
                if needed > 0 {
                    lower = lower.max(ceil_div(needed, coefficient));
                }
            }
            if lower > upper {
                return None;
            }
            let value = rng.integer_between(lower, upper);
            table[cell] = value;
            for (row, left) in remaining.iter_mut().enumerate() {
                *left -= self.model.row(row)[cell] * value;
            }
        }

        remaining.iter().all(|&left| left == 0).then_some(table)
    }

    fn capacity(&self, cell: usize, remaining: &[i64]) -> i64 {
        (0..self.model.num_rows())
            .filter_map(|row| {
                let coefficient = self.model.row(row)[cell];
                (coefficient > 0).then(|| remaining[row].max(0) / coefficient)
            })
            .min()
            .unwrap_or(0)
    }
}

impl TableGenerator for SequentialSis {
    fn generate(&self, rng: &mut RngHandle) -> Result<Vec<i64>, FiberError> {
        for _ in 0..self.max_attempts {
            if let Some(table) = self.try_draw(rng) {
                return Ok(table);
            }
        }
        warn!(
            "SIS exhausted {} attempts without completing a table",
            self.max_attempts
        );
        Err(FiberError::Sis(
            ErrorInfo::new("sis-exhausted", "no feasible table found")
                .with_context("attempts", self.max_attempts)
                .with_hint("raise sis.max_attempts or disable SIS refreshes"),
        ))
    }
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn independence_2x3() -> ModelMatrix {
        ModelMatrix::from_rows(vec![
            vec![1, 1, 1, 0, 0, 0],
            vec![0, 0, 0, 1, 1, 1],
            vec![1, 0, 0, 1, 0, 0],
            vec![0, 1, 0, 0, 1, 0],
            vec![0, 0, 1, 0, 0, 1],
        ])
        .unwrap()
    }

    #[test]
    fn draws_match_margins() {
        let model = independence_2x3();
        let stats = model.apply(&[3, 0, 2, 1, 4, 0]);
        let sis = SequentialSis::new(model.clone(), stats.clone(), 100).unwrap();
        let mut rng = RngHandle::from_seed(21);
        for _ in 0..200 {
            let table = sis.generate(&mut rng).unwrap();
            assert!(table.iter().all(|&cell| cell >= 0));
            assert_eq!(model.apply(&table), stats);
        }
    }

    #[test]
    fn rejects_signed_models() {
        let model = ModelMatrix::from_rows(vec![vec![1, -1]]).unwrap();
        let err = SequentialSis::new(model, vec![0], 10).unwrap_err();
        assert_eq!(err.code(), "signed-model");
    }

    #[test]
    fn rejects_unconstrained_cells() {
        let model = ModelMatrix::from_rows(vec![vec![1, 0]]).unwrap();
        let err = SequentialSis::new(model, vec![2], 10).unwrap_err();
        assert_eq!(err.code(), "unbounded-cell");
    }

    #[test]
    fn infeasible_statistics_exhaust_attempts() {
        // x0 + x1 = 1 and x0 + x1 = 2 cannot both hold
        let model = ModelMatrix::from_rows(vec![vec![1, 1], vec![1, 1]]).unwrap();
        let sis = SequentialSis::new(model, vec![1, 2], 5).unwrap();
        let mut rng = RngHandle::from_seed(1);
        let err = sis.generate(&mut rng).unwrap_err();
        assert_eq!(err.code(), "sis-exhausted");
    }
}
