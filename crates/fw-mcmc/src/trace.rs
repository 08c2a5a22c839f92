use std::path::Path;

use fw_core::errors::ErrorInfo;
use fw_core::FiberError;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Recorded chain states, one per outer iteration.
///
/// States are stored contiguously; state `i` occupies
/// `cells[i * num_cells .. (i + 1) * num_cells]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    num_cells: usize,
    cells: Vec<i64>,
}

impl Trace {
    /// Creates an empty trace for tables with `num_cells` cells.
    pub fn new(num_cells: usize) -> Self {
        Self::with_capacity(num_cells, 0)
    }

    /// Creates an empty trace with room for `states` recorded tables.
    pub fn with_capacity(num_cells: usize, states: usize) -> Self {
        Self {
            num_cells,
            cells: Vec::with_capacity(num_cells * states),
        }
    }

    /// Appends a recorded state.
    pub fn push(&mut self, state: &[i64]) {
        debug_assert_eq!(state.len(), self.num_cells);
        self.cells.extend_from_slice(state);
    }

    /// Number of cells per state.
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Number of recorded states.
    pub fn len(&self) -> usize {
        if self.num_cells == 0 {
            0
        } else {
            self.cells.len() / self.num_cells
        }
    }

    /// `true` when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recorded state `index`.
    pub fn state(&self, index: usize) -> &[i64] {
        &self.cells[index * self.num_cells..(index + 1) * self.num_cells]
    }

    /// Iterates over the recorded states in order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &[i64]> + '_ {
        self.cells.chunks_exact(self.num_cells.max(1))
    }

    /// Last recorded state, if any.
    pub fn last(&self) -> Option<&[i64]> {
        self.len().checked_sub(1).map(|index| self.state(index))
    }

    /// Number of distinct tables in the trace.
    pub fn unique_states(&self) -> usize {
        self.states().collect::<IndexSet<_>>().len()
    }

    /// Per-cell average over the recorded states.
    pub fn cell_means(&self) -> Vec<f64> {
        let mut means = vec![0.0; self.num_cells];
        let count = self.len();
        if count == 0 {
            return means;
        }
        for state in self.states() {
            for (mean, &cell) in means.iter_mut().zip(state) {
                *mean += cell as f64;
            }
        }
        means.iter_mut().for_each(|mean| *mean /= count as f64);
        means
    }

    /// Writes the trace as CSV: `iteration,cell_0,...,cell_{n-1}`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), FiberError> {
        let path = path.as_ref();
        let csv_error = |err: csv::Error| {
            FiberError::Serde(
                ErrorInfo::new("trace-write", err.to_string())
                    .with_context("path", path.display()),
            )
        };
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        let mut header = vec!["iteration".to_string()];
        header.extend((0..self.num_cells).map(|cell| format!("cell_{cell}")));
        writer.write_record(&header).map_err(csv_error)?;
        for (iteration, state) in self.states().enumerate() {
            let mut record = vec![iteration.to_string()];
            record.extend(state.iter().map(i64::to_string));
            writer.write_record(&record).map_err(csv_error)?;
        }
        writer.flush().map_err(|err| {
            FiberError::Serde(
                ErrorInfo::new("trace-write", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }

    /// Reads a trace previously written by [`Trace::write_csv`].
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, FiberError> {
        let path = path.as_ref();
        let read_error = |code: &str, message: String| {
            FiberError::Serde(ErrorInfo::new(code, message).with_context("path", path.display()))
        };
        let mut reader = csv::Reader::from_path(path)
            .map_err(|err| read_error("trace-read", err.to_string()))?;
        let num_cells = reader
            .headers()
            .map_err(|err| read_error("trace-read", err.to_string()))?
            .len()
            .saturating_sub(1);
        let mut trace = Trace::new(num_cells);
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|err| read_error("trace-read", err.to_string()))?;
            let state = record
                .iter()
                .skip(1)
                .map(str::parse::<i64>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| {
                    read_error("trace-parse", format!("record {line}: {err}"))
                })?;
            if state.len() != num_cells {
                return Err(read_error(
                    "trace-parse",
                    format!("record {line} has {} cells, expected {num_cells}", state.len()),
                ));
            }
            trace.push(&state);
        }
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_sliced_in_order() {
        let mut trace = Trace::new(2);
        trace.push(&[1, 2]);
        trace.push(&[3, 0]);
        trace.push(&[1, 2]);
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.state(1), &[3, 0]);
        assert_eq!(trace.last(), Some(&[1, 2][..]));
        assert_eq!(trace.unique_states(), 2);
        assert_eq!(trace.cell_means(), vec![5.0 / 3.0, 4.0 / 3.0]);
    }

    #[test]
    fn empty_trace_has_no_states() {
        let trace = Trace::new(4);
        assert!(trace.is_empty());
        assert_eq!(trace.last(), None);
        assert_eq!(trace.cell_means(), vec![0.0; 4]);
    }
}
