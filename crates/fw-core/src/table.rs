//! Table, move and model-matrix types plus input validation.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FiberError};

/// Integer lattice directions applied to a flattened table.
///
/// Stored column-major: column `j` is the `j`-th move and has one entry per
/// cell. Construction rejects empty matrices, ragged columns and all-zero
/// columns, so every instance is a usable `cells × moves` matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct MoveMatrix {
    cells: usize,
    columns: Vec<Vec<i64>>,
}

impl MoveMatrix {
    /// Builds a move matrix from its columns (one move per column).
    pub fn from_columns(columns: Vec<Vec<i64>>) -> Result<Self, FiberError> {
        let Some(first) = columns.first() else {
            return Err(FiberError::Moves(
                ErrorInfo::new("empty-moves", "move matrix contains no moves")
                    .with_hint("supply at least one Markov basis element"),
            ));
        };
        let cells = first.len();
        if cells == 0 {
            return Err(FiberError::Moves(ErrorInfo::new(
                "empty-move",
                "moves must have at least one cell",
            )));
        }
        for (index, column) in columns.iter().enumerate() {
            if column.len() != cells {
                return Err(FiberError::Moves(
                    ErrorInfo::new("ragged-moves", "moves have differing lengths")
                        .with_context("move", index)
                        .with_context("expected", cells)
                        .with_context("found", column.len()),
                ));
            }
            if column.iter().all(|&entry| entry == 0) {
                return Err(FiberError::Moves(
                    ErrorInfo::new("zero-move", "move does not change the table")
                        .with_context("move", index),
                ));
            }
        }
        Ok(Self { cells, columns })
    }

    /// Builds a move matrix from a row-major `cells × moves` layout.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self, FiberError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|row| row.len() != width) {
            return Err(FiberError::Moves(ErrorInfo::new(
                "ragged-moves",
                "move matrix rows have differing lengths",
            )));
        }
        let columns = (0..width)
            .map(|col| rows.iter().map(|row| row[col]).collect())
            .collect();
        Self::from_columns(columns)
    }

    /// Number of table cells each move acts on.
    pub fn num_cells(&self) -> usize {
        self.cells
    }

    /// Number of moves (columns).
    pub fn num_moves(&self) -> usize {
        self.columns.len()
    }

    /// Returns move `index`.
    pub fn column(&self, index: usize) -> &[i64] {
        &self.columns[index]
    }

    /// Iterates over the moves in column order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[i64]> + '_ {
        self.columns.iter().map(Vec::as_slice)
    }
}

impl TryFrom<Vec<Vec<i64>>> for MoveMatrix {
    type Error = FiberError;

    fn try_from(columns: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Self::from_columns(columns)
    }
}

impl From<MoveMatrix> for Vec<Vec<i64>> {
    fn from(matrix: MoveMatrix) -> Self {
        matrix.columns
    }
}

/// Configuration matrix `A` whose image `A·table` is the sufficient statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "Vec<Vec<i64>>")]
pub struct ModelMatrix {
    cells: usize,
    rows: Vec<Vec<i64>>,
}

impl ModelMatrix {
    /// Builds a model matrix from its rows (one statistic per row).
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, FiberError> {
        let cells = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cells == 0 {
            return Err(FiberError::Model(ErrorInfo::new(
                "empty-model",
                "model matrix must have at least one row and one cell",
            )));
        }
        if let Some(index) = rows.iter().position(|row| row.len() != cells) {
            return Err(FiberError::Model(
                ErrorInfo::new("ragged-model", "model matrix rows have differing lengths")
                    .with_context("row", index)
                    .with_context("expected", cells),
            ));
        }
        Ok(Self { cells, rows })
    }

    /// Number of cells (columns of `A`).
    pub fn num_cells(&self) -> usize {
        self.cells
    }

    /// Number of statistics (rows of `A`).
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns row `index` of `A`.
    pub fn row(&self, index: usize) -> &[i64] {
        &self.rows[index]
    }

    /// Returns `true` when every entry of `A` is nonnegative.
    pub fn is_nonnegative(&self) -> bool {
        self.rows.iter().flatten().all(|&entry| entry >= 0)
    }

    /// Computes `A·table`.
    pub fn apply(&self, table: &[i64]) -> Vec<i64> {
        self.rows
            .iter()
            .map(|row| row.iter().zip(table).map(|(a, x)| a * x).sum())
            .collect()
    }

    /// Returns `true` when `A·direction == 0`.
    pub fn annihilates(&self, direction: &[i64]) -> bool {
        self.apply(direction).iter().all(|&value| value == 0)
    }
}

impl TryFrom<Vec<Vec<i64>>> for ModelMatrix {
    type Error = FiberError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<ModelMatrix> for Vec<Vec<i64>> {
    fn from(matrix: ModelMatrix) -> Self {
        matrix.rows
    }
}

/// Everything a sampler run needs to know about the fiber it walks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiberProblem {
    /// Initial table (flattened cells).
    pub current: Vec<i64>,
    /// Moves preserving the sufficient statistics.
    pub moves: MoveMatrix,
    /// Optional model matrix, required for SIS refreshes and fiber checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelMatrix>,
    /// Optional sufficient statistics; derived from `model · current` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suff_stats: Option<Vec<i64>>,
}

impl FiberProblem {
    /// Creates a problem without a model matrix.
    pub fn new(current: Vec<i64>, moves: MoveMatrix) -> Self {
        Self {
            current,
            moves,
            model: None,
            suff_stats: None,
        }
    }

    /// Attaches a model matrix (and derives the statistics from the table).
    pub fn with_model(mut self, model: ModelMatrix) -> Self {
        self.model = Some(model);
        self
    }

    /// Number of cells in the table.
    pub fn num_cells(&self) -> usize {
        self.current.len()
    }

    /// Sufficient statistics defining the fiber, when a model is known.
    pub fn statistics(&self) -> Option<Vec<i64>> {
        match (&self.suff_stats, &self.model) {
            (Some(stats), _) => Some(stats.clone()),
            (None, Some(model)) => Some(model.apply(&self.current)),
            (None, None) => None,
        }
    }

    /// Checks dimensions and nonnegativity before any sampling happens.
    pub fn validate(&self) -> Result<(), FiberError> {
        let cells = self.current.len();
        if cells == 0 {
            return Err(FiberError::Table(ErrorInfo::new(
                "empty-table",
                "initial table has no cells",
            )));
        }
        if let Some(index) = self.current.iter().position(|&cell| cell < 0) {
            return Err(FiberError::Table(
                ErrorInfo::new("negative-cell", "initial table has a negative cell")
                    .with_context("cell", index)
                    .with_context("value", self.current[index]),
            ));
        }
        if self.moves.num_cells() != cells {
            return Err(FiberError::Moves(
                ErrorInfo::new(
                    "dimension-mismatch",
                    "moves and initial table differ in length",
                )
                .with_context("cells", cells)
                .with_context("move_cells", self.moves.num_cells()),
            ));
        }
        if let Some(model) = &self.model {
            if model.num_cells() != cells {
                return Err(FiberError::Model(
                    ErrorInfo::new(
                        "dimension-mismatch",
                        "model matrix and initial table differ in length",
                    )
                    .with_context("cells", cells)
                    .with_context("model_cells", model.num_cells()),
                ));
            }
            if let Some(stats) = &self.suff_stats {
                if stats.len() != model.num_rows() {
                    return Err(FiberError::Model(
                        ErrorInfo::new(
                            "statistics-mismatch",
                            "sufficient statistics do not match the model rows",
                        )
                        .with_context("rows", model.num_rows())
                        .with_context("statistics", stats.len()),
                    ));
                }
                if let Some(row) = model
                    .apply(&self.current)
                    .iter()
                    .zip(stats)
                    .position(|(observed, given)| observed != given)
                {
                    return Err(FiberError::Model(
                        ErrorInfo::new(
                            "statistics-mismatch",
                            "initial table lies outside the fiber of the given statistics",
                        )
                        .with_context("row", row)
                        .with_hint("drop `suff_stats` to derive them from the model"),
                    ));
                }
            }
        } else if self.suff_stats.is_some() {
            return Err(FiberError::Model(
                ErrorInfo::new(
                    "missing-model",
                    "sufficient statistics supplied without a model matrix",
                )
                .with_hint("add the `model` rows that produce the statistics"),
            ));
        }
        Ok(())
    }
}
