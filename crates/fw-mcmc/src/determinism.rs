use fw_core::{derive_substream_seed, RngHandle};

/// Independent random streams consumed by one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Pre-drawn uniform move indices.
    MoveIndices,
    /// Draws of the weighted move selector.
    MoveSelection,
    /// Hit-and-run step lengths and adaptive sub-chains.
    Proposal,
    /// Once-per-iteration SIS trigger draws.
    SisTrigger,
    /// SIS table construction.
    SisTable,
    /// Metropolis accept/reject draws.
    Acceptance,
}

impl Stream {
    fn id(self) -> u64 {
        match self {
            Stream::MoveIndices => 0,
            Stream::MoveSelection => 1,
            Stream::Proposal => 2,
            Stream::SisTrigger => 3,
            Stream::SisTable => 4,
            Stream::Acceptance => 5,
        }
    }
}

/// Derives the deterministic seed used for a specific chain.
pub fn chain_seed(master_seed: u64, chain_index: usize) -> u64 {
    derive_substream_seed(master_seed, chain_index as u64)
}

/// RNG handle for `stream` of the chain seeded with `chain_seed`.
pub fn stream_rng(chain_seed: u64, stream: Stream) -> RngHandle {
    RngHandle::substream(chain_seed ^ 0xA5A5_A5A5_A5A5_A5A5, stream.id())
}

/// The full set of streams for one chain.
#[derive(Debug, Clone)]
pub struct ChainStreams {
    /// See [`Stream::MoveIndices`].
    pub move_indices: RngHandle,
    /// See [`Stream::MoveSelection`].
    pub move_selection: RngHandle,
    /// See [`Stream::Proposal`].
    pub proposal: RngHandle,
    /// See [`Stream::SisTrigger`].
    pub sis_trigger: RngHandle,
    /// See [`Stream::SisTable`].
    pub sis_table: RngHandle,
    /// See [`Stream::Acceptance`].
    pub acceptance: RngHandle,
}

impl ChainStreams {
    /// Derives every stream of a chain from its seed.
    pub fn new(chain_seed: u64) -> Self {
        Self {
            move_indices: stream_rng(chain_seed, Stream::MoveIndices),
            move_selection: stream_rng(chain_seed, Stream::MoveSelection),
            proposal: stream_rng(chain_seed, Stream::Proposal),
            sis_trigger: stream_rng(chain_seed, Stream::SisTrigger),
            sis_table: stream_rng(chain_seed, Stream::SisTable),
            acceptance: stream_rng(chain_seed, Stream::Acceptance),
        }
    }
}
