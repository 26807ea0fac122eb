pub const PAGE_SIZE: usize = 4096;
pub const BLOCK_SIZE: usize = PAGE_SIZE;

/// Default path of the persistent backing store file.
pub const DEFAULT_STORE_PATH: &str = "myvirtualdisk";

/// Default seed for the Random policy and the randomized workloads.
pub const DEFAULT_SEED: u64 = 4357;
