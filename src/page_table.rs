//! The per-page residency and permission table.

use std::fmt;

use crate::frame::FrameId;

pub type PageId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Unmapped,
    Resident,
}

/// Access rights currently granted on a page. `None` only while Unmapped;
/// within one occupancy period rights only escalate (ReadOnly never reverts
/// to None, ReadWrite never drops back to ReadOnly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Permission {
    None,
    ReadOnly,
    ReadWrite,
}

impl Permission {
    pub fn allows_read(self) -> bool {
        self != Permission::None
    }

    pub fn allows_write(self) -> bool {
        self == Permission::ReadWrite
    }

    /// Render as the three `rwx` characters of the final dump. The simulator
    /// never grants execute, so the last column is always `-`.
    pub fn bits(self) -> &'static str {
        match self {
            Permission::None => "---",
            Permission::ReadOnly => "r--",
            Permission::ReadWrite => "rw-",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageEntry {
    pub state: PageState,
    pub frame: Option<FrameId>,
    pub permission: Permission,
}

impl PageEntry {
    fn unmapped() -> Self {
        PageEntry {
            state: PageState::Unmapped,
            frame: None,
            permission: Permission::None,
        }
    }
}

impl fmt::Display for PageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frame {
            Some(frame) => write!(f, "frame {:06} bits {}", frame, self.permission.bits()),
            None => write!(f, "unmapped     bits {}", self.permission.bits()),
        }
    }
}

pub struct PageTable {
    entries: Vec<PageEntry>,
}

impl PageTable {
    pub fn new(npages: usize) -> Self {
        PageTable {
            entries: vec![PageEntry::unmapped(); npages],
        }
    }

    pub fn npages(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, page: PageId) -> &PageEntry {
        self.check(page);
        &self.entries[page]
    }

    /// Bind `page` to `frame` with the given rights and mark it resident.
    pub fn map(&mut self, page: PageId, frame: FrameId, permission: Permission) {
        self.check(page);
        self.entries[page] = PageEntry {
            state: PageState::Resident,
            frame: Some(frame),
            permission,
        };
    }

    /// Return `page` to the Unmapped state (eviction).
    pub fn unmap(&mut self, page: PageId) {
        self.check(page);
        self.entries[page] = PageEntry::unmapped();
    }

    pub fn set_permission(&mut self, page: PageId, permission: Permission) {
        self.check(page);
        self.entries[page].permission = permission;
    }

    pub fn resident_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == PageState::Resident)
            .count()
    }

    fn check(&self, page: PageId) {
        if page >= self.entries.len() {
            panic!("illegal page #{page} (table has {} pages)", self.entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_start_unmapped() {
        let pt = PageTable::new(4);
        assert_eq!(pt.npages(), 4);
        assert_eq!(pt.resident_count(), 0);

        let e = pt.entry(3);
        assert_eq!(e.state, PageState::Unmapped);
        assert_eq!(e.frame, None);
        assert_eq!(e.permission, Permission::None);
    }

    #[test]
    fn test_map_and_unmap() {
        let mut pt = PageTable::new(4);
        pt.map(2, 1, Permission::ReadOnly);

        let e = pt.entry(2);
        assert_eq!(e.state, PageState::Resident);
        assert_eq!(e.frame, Some(1));
        assert_eq!(e.permission, Permission::ReadOnly);
        assert_eq!(pt.resident_count(), 1);

        pt.unmap(2);
        assert_eq!(pt.entry(2).state, PageState::Unmapped);
        assert_eq!(pt.entry(2).frame, None);
        assert_eq!(pt.resident_count(), 0);
    }

    #[test]
    fn test_permission_checks() {
        assert!(!Permission::None.allows_read());
        assert!(Permission::ReadOnly.allows_read());
        assert!(!Permission::ReadOnly.allows_write());
        assert!(Permission::ReadWrite.allows_read());
        assert!(Permission::ReadWrite.allows_write());
    }

    #[test]
    fn test_bits_rendering() {
        assert_eq!(Permission::None.bits(), "---");
        assert_eq!(Permission::ReadOnly.bits(), "r--");
        assert_eq!(Permission::ReadWrite.bits(), "rw-");
    }

    #[test]
    fn test_entry_display() {
        let mut pt = PageTable::new(2);
        pt.map(0, 3, Permission::ReadWrite);

        assert_eq!(format!("{}", pt.entry(0)), "frame 000003 bits rw-");
        assert_eq!(format!("{}", pt.entry(1)), "unmapped     bits ---");
    }

    #[test]
    #[should_panic(expected = "illegal page")]
    fn test_out_of_range_page_is_fatal() {
        let pt = PageTable::new(2);
        pt.entry(2);
    }
}
