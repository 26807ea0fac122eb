//! First-in, first-out replacement: the victim is always the frame bound
//! longest ago.

use std::collections::VecDeque;

use crate::frame::FrameId;

use super::ReplacementPolicy;

pub struct FifoPolicy {
    queue: VecDeque<FrameId>,
}

impl FifoPolicy {
    pub fn new() -> Self {
        FifoPolicy {
            queue: VecDeque::new(),
        }
    }
}

impl Default for FifoPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn on_bind(&mut self, frame: FrameId) {
        self.queue.push_back(frame);
    }

    fn select_victim(&mut self, occupied: &[FrameId]) -> FrameId {
        if occupied.is_empty() {
            panic!("victim selection with no occupied frames");
        }
        // The queue holds exactly the occupied frames, oldest bind first.
        match self.queue.pop_front() {
            Some(frame) => frame,
            None => panic!("fifo queue out of sync with the frame pool"),
        }
    }

    fn name(&self) -> &'static str {
        "fifo"
    }
}
