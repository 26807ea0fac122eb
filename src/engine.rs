//! The paging engine: owns the page table, the frame pool, the backing
//! store, and the replacement policy, and resolves faults synchronously.
//!
//! One fault is serviced at a time; `resolve_access` takes `&mut self`, so a
//! second in-flight fault is unrepresentable rather than locked against.
//! Out-of-range ids, short store transfers, and contract-violating dispatch
//! are invariant breaches and panic; only construction reports recoverable
//! errors.

use std::fmt::Write as _;

use crate::constants::PAGE_SIZE;
use crate::error::ConfigError;
use crate::frame::{FrameId, FramePool};
use crate::page_table::{PageId, PageState, PageTable, Permission};
use crate::policy::ReplacementPolicy;
use crate::store::BackingStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// Which fault class `resolve_access` serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Page was Unmapped: frame acquired (possibly via eviction), block
    /// loaded, page bound.
    Major,
    /// Page was Resident ReadOnly and a write arrived: permission escalated,
    /// no store I/O.
    Minor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub major_faults: u64,
    pub minor_faults: u64,
    pub disk_reads: u64,
    pub disk_writes: u64,
}

pub struct PagingEngine {
    table: PageTable,
    pool: FramePool,
    store: BackingStore,
    policy: Box<dyn ReplacementPolicy>,
    stats: EngineStats,
}

impl PagingEngine {
    pub fn new(
        npages: usize,
        nframes: usize,
        store: BackingStore,
        policy: Box<dyn ReplacementPolicy>,
    ) -> Result<Self, ConfigError> {
        if npages == 0 {
            return Err(ConfigError::ZeroPages);
        }
        if nframes == 0 {
            return Err(ConfigError::ZeroFrames);
        }
        if store.block_count() != npages {
            panic!(
                "store has {} blocks but the page table needs {npages}",
                store.block_count()
            );
        }
        Ok(PagingEngine {
            table: PageTable::new(npages),
            pool: FramePool::new(nframes),
            store,
            policy,
            stats: EngineStats::default(),
        })
    }

    pub fn npages(&self) -> usize {
        self.table.npages()
    }

    pub fn nframes(&self) -> usize {
        self.pool.nframes()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn resident_count(&self) -> usize {
        self.table.resident_count()
    }

    pub fn permission_of(&self, page: PageId) -> Permission {
        self.table.entry(page).permission
    }

    pub fn frame_of(&self, page: PageId) -> Option<FrameId> {
        self.table.entry(page).frame
    }

    pub fn is_dirty(&self, page: PageId) -> bool {
        match self.table.entry(page).frame {
            Some(frame) => self.pool.is_dirty(frame),
            None => false,
        }
    }

    /// Service a fault notification for (`page`, `kind`).
    ///
    /// The caller reports exactly the access the current permission refused.
    /// Dispatching an access the page already grants is a contract breach
    /// and fatal.
    pub fn resolve_access(&mut self, page: PageId, kind: AccessKind) -> FaultKind {
        let entry = *self.table.entry(page);
        match entry.state {
            PageState::Unmapped => {
                let frame = self.acquire_frame();
                self.store.read(page, self.pool.content_mut(frame));
                self.stats.disk_reads += 1;
                self.pool.bind(frame, page);
                self.policy.on_bind(frame);

                let permission = match kind {
                    AccessKind::Read => Permission::ReadOnly,
                    AccessKind::Write => {
                        self.pool.mark_dirty(frame);
                        Permission::ReadWrite
                    }
                };
                self.table.map(page, frame, permission);
                self.stats.major_faults += 1;
                log::debug!("major fault: page #{page} -> frame #{frame} ({})", permission.bits());
                FaultKind::Major
            }
            PageState::Resident
                if kind == AccessKind::Write && entry.permission == Permission::ReadOnly =>
            {
                let frame = match entry.frame {
                    Some(frame) => frame,
                    None => panic!("resident page #{page} has no frame"),
                };
                self.table.set_permission(page, Permission::ReadWrite);
                self.pool.mark_dirty(frame);
                self.policy.on_touch(frame);
                self.stats.minor_faults += 1;
                log::debug!("minor fault: page #{page} escalated to rw-");
                FaultKind::Minor
            }
            PageState::Resident => {
                panic!(
                    "spurious fault: page #{page} already grants {kind:?} with {}",
                    entry.permission.bits()
                );
            }
        }
    }

    /// Recency notification for an access that needed no fault. The page
    /// must be resident.
    pub fn touch(&mut self, page: PageId) {
        match self.table.entry(page).frame {
            Some(frame) => self.policy.on_touch(frame),
            None => panic!("touch on unmapped page #{page}"),
        }
    }

    /// Copy bytes out of a resident page's frame.
    pub fn copy_from_page(&self, page: PageId, offset: usize, dst: &mut [u8]) {
        let frame = self.resident_frame(page, offset, dst.len());
        dst.copy_from_slice(&self.pool.content(frame)[offset..offset + dst.len()]);
    }

    /// Copy bytes into a resident page's frame, marking it dirty.
    pub fn copy_to_page(&mut self, page: PageId, offset: usize, src: &[u8]) {
        let frame = self.resident_frame(page, offset, src.len());
        self.pool.content_mut(frame)[offset..offset + src.len()].copy_from_slice(src);
        self.pool.mark_dirty(frame);
    }

    /// Write every dirty resident page back to its block. Pages stay
    /// resident; their frames are clean afterwards.
    pub fn flush(&mut self) {
        for page in 0..self.table.npages() {
            let entry = self.table.entry(page);
            if entry.state != PageState::Resident {
                continue;
            }
            let frame = match entry.frame {
                Some(frame) => frame,
                None => panic!("resident page #{page} has no frame"),
            };
            if self.pool.is_dirty(frame) {
                self.store.write(page, self.pool.content(frame));
                self.pool.clear_dirty(frame);
                self.stats.disk_writes += 1;
                log::debug!("flush: page #{page} written back from frame #{frame}");
            }
        }
    }

    /// The final dump: one line per page with its id, frame, and rights.
    pub fn page_report(&self) -> String {
        let mut out = String::new();
        for page in 0..self.table.npages() {
            let _ = writeln!(out, "page {:06}: {}", page, self.table.entry(page));
        }
        out
    }

    fn acquire_frame(&mut self) -> FrameId {
        if let Some(frame) = self.pool.acquire_free() {
            return frame;
        }
        let occupied = self.pool.occupied_frames();
        let victim_frame = self.policy.select_victim(&occupied);
        let victim_page = match self.pool.occupant(victim_frame) {
            Some(page) => page,
            None => panic!("policy chose unoccupied frame #{victim_frame}"),
        };
        if self.pool.is_dirty(victim_frame) {
            self.store.write(victim_page, self.pool.content(victim_frame));
            self.stats.disk_writes += 1;
            log::debug!("write-back: page #{victim_page} from frame #{victim_frame}");
        }
        self.table.unmap(victim_page);
        self.pool.unbind(victim_frame);
        log::debug!("evict: page #{victim_page} released frame #{victim_frame}");

        match self.pool.acquire_free() {
            Some(frame) => frame,
            None => panic!("no free frame after eviction"),
        }
    }

    fn resident_frame(&self, page: PageId, offset: usize, len: usize) -> FrameId {
        if offset + len > PAGE_SIZE {
            panic!("byte range {offset}+{len} overruns page #{page}");
        }
        match self.table.entry(page).frame {
            Some(frame) => frame,
            None => panic!("byte access to unmapped page #{page}"),
        }
    }
}
