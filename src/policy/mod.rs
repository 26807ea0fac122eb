//! Page replacement policies.
//!
//! A policy decides which occupied frame to evict when a major fault finds
//! no free frame. Policies see only frame-level events: a frame being bound
//! to a page, and a frame being touched by an access that needed no load.

pub mod clock;
pub mod fifo;
pub mod random;

use std::str::FromStr;

pub use clock::ClockPolicy;
pub use fifo::FifoPolicy;
pub use random::RandomPolicy;

use crate::error::ConfigError;
use crate::frame::FrameId;

pub trait ReplacementPolicy {
    /// A frame was newly bound to a page.
    fn on_bind(&mut self, frame: FrameId);

    /// A bound frame was accessed without a major fault. FIFO and Random
    /// ignore this; Clock records recency.
    fn on_touch(&mut self, _frame: FrameId) {}

    /// Choose exactly one victim among `occupied`. Only called when the
    /// frame pool has no free frame, so `occupied` is never empty; an empty
    /// set is a caller contract breach and panics.
    fn select_victim(&mut self, occupied: &[FrameId]) -> FrameId;

    fn name(&self) -> &'static str;
}

/// Policy selector, keyed by the CLI spellings of the original simulator
/// (`rand`, `fifo`, `custom`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Fifo,
    Random,
    Clock,
}

impl PolicyKind {
    /// Build a policy instance for a pool of `nframes` frames. `seed` is
    /// used by Random only.
    pub fn build(self, nframes: usize, seed: u64) -> Box<dyn ReplacementPolicy> {
        match self {
            PolicyKind::Fifo => Box::new(FifoPolicy::new()),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Clock => Box::new(ClockPolicy::new(nframes)),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fifo" => Ok(PolicyKind::Fifo),
            "rand" => Ok(PolicyKind::Random),
            "custom" => Ok(PolicyKind::Clock),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}
