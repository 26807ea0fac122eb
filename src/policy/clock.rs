//! Clock (second-chance) replacement: a reference-bit approximation of
//! least-recently-used.
//!
//! Every frame carries a reference bit, set on bind and on touch. Victim
//! selection sweeps the frames in a fixed circular order from where the last
//! sweep stopped: a set bit is cleared and the frame skipped, the first
//! clear bit wins. The hand rests just past the victim.

use crate::frame::FrameId;

use super::ReplacementPolicy;

pub struct ClockPolicy {
    referenced: Vec<bool>,
    hand: usize,
}

impl ClockPolicy {
    pub fn new(nframes: usize) -> Self {
        ClockPolicy {
            referenced: vec![false; nframes],
            hand: 0,
        }
    }
}

impl ReplacementPolicy for ClockPolicy {
    fn on_bind(&mut self, frame: FrameId) {
        self.referenced[frame] = true;
    }

    fn on_touch(&mut self, frame: FrameId) {
        self.referenced[frame] = true;
    }

    fn select_victim(&mut self, occupied: &[FrameId]) -> FrameId {
        if occupied.is_empty() {
            panic!("victim selection with no occupied frames");
        }
        // Selection only happens with every frame occupied, so the sweep
        // may walk frame ids directly. It terminates within two laps: the
        // first lap clears every set bit it passes.
        loop {
            let frame = self.hand;
            self.hand = (self.hand + 1) % self.referenced.len();
            if self.referenced[frame] {
                self.referenced[frame] = false;
            } else {
                return frame;
            }
        }
    }

    fn name(&self) -> &'static str {
        "custom"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sweep_falls_back_to_hand_position() {
        let mut policy = ClockPolicy::new(3);
        for f in 0..3 {
            policy.on_bind(f);
        }
        // All bits set: first sweep clears 0,1,2 and wraps to take 0.
        assert_eq!(policy.select_victim(&[0, 1, 2]), 0);
    }

    #[test]
    fn test_touched_frame_survives_untouched_one() {
        let mut policy = ClockPolicy::new(3);
        for f in 0..3 {
            policy.on_bind(f);
        }
        assert_eq!(policy.select_victim(&[0, 1, 2]), 0);
        policy.on_bind(0);

        // Between sweeps only frame 1 is touched; frame 2 must go first.
        policy.on_touch(1);
        // Bits now: 0 set (rebind), 1 set (touch), 2 clear.
        assert_eq!(policy.select_victim(&[0, 1, 2]), 2);
    }

    #[test]
    fn test_hand_advances_past_victim() {
        let mut policy = ClockPolicy::new(4);
        for f in 0..4 {
            policy.on_bind(f);
        }
        assert_eq!(policy.select_victim(&[0, 1, 2, 3]), 0);
        policy.on_bind(0);

        // Hand is at 1 and bits 1..3 were cleared by the first sweep.
        assert_eq!(policy.select_victim(&[0, 1, 2, 3]), 1);
        policy.on_bind(1);
        assert_eq!(policy.select_victim(&[0, 1, 2, 3]), 2);
    }

    #[test]
    #[should_panic(expected = "no occupied frames")]
    fn test_empty_occupied_set_is_fatal() {
        let mut policy = ClockPolicy::new(2);
        policy.select_victim(&[]);
    }
}
