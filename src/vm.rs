//! The checked virtual memory accessor.
//!
//! Stands in for the hardware trap of a real MMU: every logical read or
//! write first consults the page table, dispatches a fault for each page
//! whose current permission refuses the access, and only then moves bytes.
//! Fault ordering and counts are identical to trap delivery; the mechanism
//! is an explicit check instead of a signal handler.

use crate::constants::PAGE_SIZE;
use crate::engine::{AccessKind, PagingEngine};
use crate::page_table::PageId;

pub struct VirtualMemory {
    engine: PagingEngine,
}

impl VirtualMemory {
    pub fn new(engine: PagingEngine) -> Self {
        VirtualMemory { engine }
    }

    /// Size of the virtual address range in bytes.
    pub fn size(&self) -> usize {
        self.engine.npages() * PAGE_SIZE
    }

    pub fn engine(&self) -> &PagingEngine {
        &self.engine
    }

    pub fn flush(&mut self) {
        self.engine.flush();
    }

    /// Read `buf.len()` bytes starting at `addr`.
    pub fn read(&mut self, addr: usize, buf: &mut [u8]) {
        self.check_range(addr, buf.len());
        let mut done = 0;
        while done < buf.len() {
            let (page, offset, len) = Self::split(addr + done, buf.len() - done);
            self.ensure(page, AccessKind::Read);
            self.engine.copy_from_page(page, offset, &mut buf[done..done + len]);
            done += len;
        }
    }

    /// Write `buf` starting at `addr`.
    pub fn write(&mut self, addr: usize, buf: &[u8]) {
        self.check_range(addr, buf.len());
        let mut done = 0;
        while done < buf.len() {
            let (page, offset, len) = Self::split(addr + done, buf.len() - done);
            self.ensure(page, AccessKind::Write);
            self.engine.copy_to_page(page, offset, &buf[done..done + len]);
            done += len;
        }
    }

    pub fn read_byte(&mut self, addr: usize) -> u8 {
        let mut b = [0u8];
        self.read(addr, &mut b);
        b[0]
    }

    pub fn write_byte(&mut self, addr: usize, value: u8) {
        self.write(addr, &[value]);
    }

    /// Permission check for one page; dispatches a fault when the current
    /// rights refuse the access, otherwise records recency.
    fn ensure(&mut self, page: PageId, kind: AccessKind) {
        let permission = self.engine.permission_of(page);
        let granted = match kind {
            AccessKind::Read => permission.allows_read(),
            AccessKind::Write => permission.allows_write(),
        };
        if granted {
            self.engine.touch(page);
        } else {
            println!("page fault on page #{page}");
            self.engine.resolve_access(page, kind);
        }
    }

    fn split(addr: usize, remaining: usize) -> (PageId, usize, usize) {
        let page = addr / PAGE_SIZE;
        let offset = addr % PAGE_SIZE;
        let len = remaining.min(PAGE_SIZE - offset);
        (page, offset, len)
    }

    fn check_range(&self, addr: usize, len: usize) {
        if addr + len > self.size() {
            panic!(
                "access at {addr}+{len} outside the virtual range of {} bytes",
                self.size()
            );
        }
    }
}
