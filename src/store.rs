//! File-backed block device used as the paging backing store.
//!
//! One block per virtual page, block size equal to the page size. Transfers
//! are all-or-nothing: a short read or write, or an out-of-range block id,
//! is a contract breach and aborts the process. No retry, no partial
//! recovery.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::Path;

use crate::constants::BLOCK_SIZE;

pub struct BackingStore {
    file: File,
    nblocks: usize,
}

impl BackingStore {
    /// Open (creating if absent) a store of `nblocks` blocks at `path`,
    /// truncated or extended to exactly the required size.
    pub fn open<P: AsRef<Path>>(path: P, nblocks: usize) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path.as_ref())?;
        file.set_len((nblocks * BLOCK_SIZE) as u64)?;
        Ok(BackingStore { file, nblocks })
    }

    pub fn block_count(&self) -> usize {
        self.nblocks
    }

    /// Read one full block into `buf`.
    pub fn read(&self, block: usize, buf: &mut [u8]) {
        self.check(block, buf.len(), "read");
        match self.file.read_at(buf, (block * BLOCK_SIZE) as u64) {
            Ok(n) if n == BLOCK_SIZE => {}
            Ok(n) => panic!("store read: short read on block #{block}: {n} of {BLOCK_SIZE} bytes"),
            Err(e) => panic!("store read: failed on block #{block}: {e}"),
        }
    }

    /// Write one full block from `buf`.
    pub fn write(&self, block: usize, buf: &[u8]) {
        self.check(block, buf.len(), "write");
        match self.file.write_at(buf, (block * BLOCK_SIZE) as u64) {
            Ok(n) if n == BLOCK_SIZE => {}
            Ok(n) => panic!("store write: short write on block #{block}: {n} of {BLOCK_SIZE} bytes"),
            Err(e) => panic!("store write: failed on block #{block}: {e}"),
        }
    }

    fn check(&self, block: usize, len: usize, op: &str) {
        if block >= self.nblocks {
            panic!("store {op}: invalid block #{block} (store has {} blocks)", self.nblocks);
        }
        if len != BLOCK_SIZE {
            panic!("store {op}: buffer is {len} bytes, expected {BLOCK_SIZE}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &tempfile::TempDir, nblocks: usize) -> BackingStore {
        BackingStore::open(dir.path().join("store"), nblocks).unwrap()
    }

    #[test]
    fn test_open_creates_sized_file() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir, 4);
        assert_eq!(store.block_count(), 4);

        let len = std::fs::metadata(dir.path().join("store")).unwrap().len();
        assert_eq!(len, (4 * BLOCK_SIZE) as u64);
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir, 3);

        let block = vec![0xabu8; BLOCK_SIZE];
        store.write(2, &block);

        let mut back = vec![0u8; BLOCK_SIZE];
        store.read(2, &mut back);
        assert_eq!(back, block);
    }

    #[test]
    fn test_fresh_blocks_read_as_zero() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir, 2);

        let mut buf = vec![0xffu8; BLOCK_SIZE];
        store.read(0, &mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reopen_preserves_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store");

        let block = vec![7u8; BLOCK_SIZE];
        {
            let store = BackingStore::open(&path, 2).unwrap();
            store.write(1, &block);
        }

        let store = BackingStore::open(&path, 2).unwrap();
        let mut back = vec![0u8; BLOCK_SIZE];
        store.read(1, &mut back);
        assert_eq!(back, block);
    }

    #[test]
    #[should_panic(expected = "invalid block")]
    fn test_read_out_of_range_block_is_fatal() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir, 2);
        let mut buf = vec![0u8; BLOCK_SIZE];
        store.read(2, &mut buf);
    }

    #[test]
    #[should_panic(expected = "buffer is")]
    fn test_undersized_buffer_is_fatal() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir, 2);
        store.write(0, &[0u8; 16]);
    }
}
