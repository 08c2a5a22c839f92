use fw_core::RngHandle;
use serde::{Deserialize, Serialize};

/// Empirical move-selection weights for the non-uniform selector.
///
/// Every weight starts at 1.0 and grows by one per accepted step that used the
/// move; `total` tracks the sum so selection never re-sums the weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveWeights {
    weights: Vec<f64>,
    total: f64,
}

impl MoveWeights {
    /// Uniform initial weights for `num_moves` moves.
    pub fn new(num_moves: usize) -> Self {
        Self {
            weights: vec![1.0; num_moves],
            total: num_moves as f64,
        }
    }

    /// Selects the first index whose normalised cumulative weight reaches `draw`.
    pub fn select(&self, draw: f64) -> usize {
        let mut cumulative = 0.0;
        for (index, weight) in self.weights.iter().enumerate() {
            cumulative += weight;
            if draw <= cumulative / self.total {
                return index;
            }
        }
        self.weights.len() - 1
    }

    /// Credits an accepted step to move `index`.
    pub fn credit(&mut self, index: usize) {
        self.weights[index] += 1.0;
        self.total += 1.0;
    }

    /// Current weights in move order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Running sum of all weights.
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Chooses the move used at each inner step.
#[derive(Debug, Clone)]
pub enum MoveSelector {
    /// Indices drawn uniformly up front for the whole run.
    Uniform {
        /// One pre-drawn move index per inner step.
        schedule: Vec<usize>,
    },
    /// Indices drawn proportionally to the acceptance history.
    Weighted {
        /// Mutable weights owned by the run.
        weights: MoveWeights,
    },
}

impl MoveSelector {
    /// Pre-draws `total_steps` uniform indices over `num_moves` moves.
    pub fn uniform(num_moves: usize, total_steps: usize, rng: &mut RngHandle) -> Self {
        let schedule = (0..total_steps).map(|_| rng.index(num_moves)).collect();
        MoveSelector::Uniform { schedule }
    }

    /// Weighted selector starting from uniform weights.
    pub fn weighted(num_moves: usize) -> Self {
        MoveSelector::Weighted {
            weights: MoveWeights::new(num_moves),
        }
    }

    /// Move index for inner step `step`. Weighted selection consumes one draw.
    pub fn select(&self, step: usize, rng: &mut RngHandle) -> usize {
        match self {
            MoveSelector::Uniform { schedule } => schedule[step],
            MoveSelector::Weighted { weights } => weights.select(rng.uniform()),
        }
    }

    /// Records an accepted step that was reached through move `index`.
    pub fn credit(&mut self, index: usize) {
        if let MoveSelector::Weighted { weights } = self {
            weights.credit(index);
        }
    }

    /// Weights of the non-uniform selector, if any.
    pub fn weights(&self) -> Option<&MoveWeights> {
        match self {
            MoveSelector::Uniform { .. } => None,
            MoveSelector::Weighted { weights } => Some(weights),
        }
    }
}
