#![deny(missing_docs)]
#![doc = "Core table, move and error types shared by the fiberwalk sampler crates."]

pub mod errors;
pub mod provenance;
pub mod rng;
pub mod table;

pub use errors::{ErrorInfo, FiberError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
pub use table::{FiberProblem, ModelMatrix, MoveMatrix};

/// Source of independent draws from a fiber.
///
/// Implementors are built from a model matrix and a target statistic and
/// must only ever return nonnegative tables `x` with `A·x == b`.
pub trait TableGenerator: Send + Sync {
    /// Draws one table using the supplied RNG.
    fn generate(&self, rng: &mut RngHandle) -> Result<Vec<i64>, FiberError>;
}
