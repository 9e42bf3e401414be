use crate::{rng, NodeId, SplitMix64};

/// Per-step evaluation context handed in by the owner of the tree.
///
/// The owner calls the root exactly once per logical step with a fresh
/// context; the engine never advances `tick` or accumulates `dt_seconds`
/// itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Monotonic step counter.
    pub tick: u64,
    /// Wall/sim time elapsed since the previous step.
    pub dt_seconds: f32,
    /// Global seed for every random draw made during this tree's lifetime.
    pub seed: u64,
}

impl TickContext {
    /// RNG for one node's draw, derived from the global seed.
    ///
    /// Passing the current tick as `stream` gives a fresh, replayable draw
    /// per step; a fixed stream gives a per-node sequence instead.
    pub fn rng_for_node(&self, node: NodeId, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed, node.raw(), stream);
        SplitMix64::new(seed)
    }
}
