//! Synthetic access-pattern generators.
//!
//! Each workload drives the whole virtual range `[0, npages * PAGE_SIZE)`
//! through the checked accessor and has no visibility into page or frame
//! state. `scan` is sequential, `sort` mixes striding with data-dependent
//! jumps, `focus` hammers shifting hot windows.

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::PAGE_SIZE;
use crate::error::ConfigError;
use crate::vm::VirtualMemory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    Sort,
    Scan,
    Focus,
}

impl WorkloadKind {
    /// Run the workload to completion and return its result value (a
    /// checksum over the bytes it produced).
    pub fn run(self, vm: &mut VirtualMemory, seed: u64) -> u64 {
        match self {
            WorkloadKind::Sort => sort(vm, seed),
            WorkloadKind::Scan => scan(vm),
            WorkloadKind::Focus => focus(vm, seed),
        }
    }
}

impl FromStr for WorkloadKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sort" => Ok(WorkloadKind::Sort),
            "scan" => Ok(WorkloadKind::Scan),
            "focus" => Ok(WorkloadKind::Focus),
            other => Err(ConfigError::UnknownWorkload(other.to_string())),
        }
    }
}

/// Sequential pattern: write a repeating ramp over the whole range, then
/// read it back and verify.
fn scan(vm: &mut VirtualMemory) -> u64 {
    let size = vm.size();
    let mut checksum = 0u64;

    for addr in 0..size {
        vm.write_byte(addr, (addr % 181) as u8);
    }
    for addr in 0..size {
        let b = vm.read_byte(addr);
        if b != (addr % 181) as u8 {
            panic!("scan mismatch at address {addr}: got {b}, expected {}", addr % 181);
        }
        checksum = checksum.wrapping_add(b as u64);
    }
    checksum
}

/// Fill the range with seeded random bytes, sort it in place through the
/// accessor, and verify the order.
fn sort(vm: &mut VirtualMemory, seed: u64) -> u64 {
    let size = vm.size();
    let mut rng = StdRng::seed_from_u64(seed);

    for addr in 0..size {
        vm.write_byte(addr, rng.r#gen());
    }
    quicksort(vm, size);

    let mut checksum = 0u64;
    let mut prev = 0u8;
    for addr in 0..size {
        let b = vm.read_byte(addr);
        if b < prev {
            panic!("sort left address {addr} out of order");
        }
        prev = b;
        checksum = checksum.wrapping_add(b as u64);
    }
    checksum
}

/// Localized pattern: repeated rounds, each picking a random focus window
/// and performing many small reads and writes inside it.
fn focus(vm: &mut VirtualMemory, seed: u64) -> u64 {
    const ROUNDS: usize = 50;
    const ACCESSES_PER_ROUND: usize = 200;

    let size = vm.size();
    let window = PAGE_SIZE.min(size);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut checksum = 0u64;

    for _ in 0..ROUNDS {
        let base = rng.gen_range(0..=size - window);
        for _ in 0..ACCESSES_PER_ROUND {
            let addr = base + rng.gen_range(0..window);
            if rng.gen_ratio(1, 4) {
                vm.write_byte(addr, rng.r#gen());
            } else {
                checksum = checksum.wrapping_add(vm.read_byte(addr) as u64);
            }
        }
    }
    checksum
}

/// Iterative three-way quicksort over the bytes of `vm`, falling back to
/// insertion sort on short runs. Three-way partitioning keeps the duplicate-
/// heavy byte distribution from degrading to quadratic time.
fn quicksort(vm: &mut VirtualMemory, len: usize) {
    const SMALL: usize = 16;

    let mut stack = vec![(0usize, len)];
    while let Some((lo, hi)) = stack.pop() {
        if hi - lo <= 1 {
            continue;
        }
        if hi - lo <= SMALL {
            insertion_sort(vm, lo, hi);
            continue;
        }

        let pivot = vm.read_byte(lo + (hi - lo) / 2);
        let mut lt = lo;
        let mut i = lo;
        let mut gt = hi;
        while i < gt {
            let b = vm.read_byte(i);
            if b < pivot {
                swap(vm, lt, i);
                lt += 1;
                i += 1;
            } else if b > pivot {
                gt -= 1;
                swap(vm, i, gt);
            } else {
                i += 1;
            }
        }
        stack.push((lo, lt));
        stack.push((gt, hi));
    }
}

fn insertion_sort(vm: &mut VirtualMemory, lo: usize, hi: usize) {
    for i in lo + 1..hi {
        let b = vm.read_byte(i);
        let mut j = i;
        while j > lo && vm.read_byte(j - 1) > b {
            let prev = vm.read_byte(j - 1);
            vm.write_byte(j, prev);
            j -= 1;
        }
        vm.write_byte(j, b);
    }
}

fn swap(vm: &mut VirtualMemory, a: usize, b: usize) {
    if a != b {
        let va = vm.read_byte(a);
        let vb = vm.read_byte(b);
        vm.write_byte(a, vb);
        vm.write_byte(b, va);
    }
}
