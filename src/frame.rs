//! Physical frame bookkeeping: occupancy, dirty flags, content buffers, and
//! the free list. No policy logic lives here.

use crate::constants::PAGE_SIZE;
use crate::page_table::PageId;

pub type FrameId = usize;

struct Frame {
    occupant: Option<PageId>,
    dirty: bool,
    content: Box<[u8]>,
}

impl Frame {
    fn new() -> Self {
        Frame {
            occupant: None,
            dirty: false,
            content: vec![0u8; PAGE_SIZE].into_boxed_slice(),
        }
    }
}

/// The bounded pool of physical frames. Each frame exclusively owns its
/// page-sized buffer; frames are bound to at most one page at a time.
pub struct FramePool {
    frames: Vec<Frame>,
    free: Vec<FrameId>,
}

impl FramePool {
    pub fn new(nframes: usize) -> Self {
        let frames = (0..nframes).map(|_| Frame::new()).collect();
        // Pop order makes frame 0 the first allocated.
        let free = (0..nframes).rev().collect();
        FramePool { frames, free }
    }

    pub fn nframes(&self) -> usize {
        self.frames.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Take an unoccupied frame off the free list, if any.
    pub fn acquire_free(&mut self) -> Option<FrameId> {
        self.free.pop()
    }

    /// Bind `frame` to `page`. The frame must not already be occupied.
    pub fn bind(&mut self, frame: FrameId, page: PageId) {
        let f = self.frame_mut(frame);
        if let Some(p) = f.occupant {
            panic!("frame #{frame} already bound to page #{p}");
        }
        f.occupant = Some(page);
        f.dirty = false;
    }

    /// Release `frame` back to the free list, clearing occupant and dirty.
    pub fn unbind(&mut self, frame: FrameId) {
        let f = self.frame_mut(frame);
        f.occupant = None;
        f.dirty = false;
        self.free.push(frame);
    }

    pub fn mark_dirty(&mut self, frame: FrameId) {
        self.frame_mut(frame).dirty = true;
    }

    pub fn clear_dirty(&mut self, frame: FrameId) {
        self.frame_mut(frame).dirty = false;
    }

    pub fn is_dirty(&self, frame: FrameId) -> bool {
        self.frame_ref(frame).dirty
    }

    pub fn occupant(&self, frame: FrameId) -> Option<PageId> {
        self.frame_ref(frame).occupant
    }

    pub fn content(&self, frame: FrameId) -> &[u8] {
        &self.frame_ref(frame).content
    }

    pub fn content_mut(&mut self, frame: FrameId) -> &mut [u8] {
        &mut self.frame_mut(frame).content
    }

    /// Currently occupied frame ids in ascending order.
    pub fn occupied_frames(&self) -> Vec<FrameId> {
        (0..self.frames.len())
            .filter(|&f| self.frames[f].occupant.is_some())
            .collect()
    }

    fn frame_ref(&self, frame: FrameId) -> &Frame {
        if frame >= self.frames.len() {
            panic!("illegal frame #{frame} (pool has {} frames)", self.frames.len());
        }
        &self.frames[frame]
    }

    fn frame_mut(&mut self, frame: FrameId) -> &mut Frame {
        if frame >= self.frames.len() {
            panic!("illegal frame #{frame} (pool has {} frames)", self.frames.len());
        }
        &mut self.frames[frame]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_is_all_free() {
        let pool = FramePool::new(3);
        assert_eq!(pool.nframes(), 3);
        assert_eq!(pool.free_count(), 3);
        assert!(pool.occupied_frames().is_empty());
    }

    #[test]
    fn test_acquire_exhausts_free_list() {
        let mut pool = FramePool::new(2);
        assert_eq!(pool.acquire_free(), Some(0));
        assert_eq!(pool.acquire_free(), Some(1));
        assert_eq!(pool.acquire_free(), None);
    }

    #[test]
    fn test_bind_tracks_occupant_and_clears_dirty() {
        let mut pool = FramePool::new(2);
        let f = pool.acquire_free().unwrap();
        pool.bind(f, 7);

        assert_eq!(pool.occupant(f), Some(7));
        assert!(!pool.is_dirty(f));
        assert_eq!(pool.occupied_frames(), vec![f]);

        pool.mark_dirty(f);
        assert!(pool.is_dirty(f));
    }

    #[test]
    fn test_unbind_returns_frame_for_reuse() {
        let mut pool = FramePool::new(1);
        let f = pool.acquire_free().unwrap();
        pool.bind(f, 0);
        pool.mark_dirty(f);
        assert_eq!(pool.acquire_free(), None);

        pool.unbind(f);
        assert_eq!(pool.occupant(f), None);
        assert!(!pool.is_dirty(f));
        assert_eq!(pool.acquire_free(), Some(f));
    }

    #[test]
    fn test_content_is_page_sized_and_writable() {
        let mut pool = FramePool::new(1);
        assert_eq!(pool.content(0).len(), PAGE_SIZE);

        pool.content_mut(0)[42] = 0x5a;
        assert_eq!(pool.content(0)[42], 0x5a);
    }

    #[test]
    #[should_panic(expected = "already bound")]
    fn test_double_bind_is_fatal() {
        let mut pool = FramePool::new(1);
        pool.bind(0, 1);
        pool.bind(0, 2);
    }

    #[test]
    #[should_panic(expected = "illegal frame")]
    fn test_out_of_range_frame_is_fatal() {
        let pool = FramePool::new(2);
        pool.occupant(2);
    }
}
