//! virtmem - demand-paged virtual memory simulator.
//!
//! A bounded pool of physical frames backed by a persistent block store;
//! pages are faulted in on access and evicted under a pluggable replacement
//! policy (FIFO, Random, Clock) when frames run out. Synthetic workloads
//! (`sort`, `scan`, `focus`) drive the virtual range to compare policies.

pub mod constants;
pub mod engine;
pub mod error;
pub mod frame;
pub mod page_table;
pub mod policy;
pub mod store;
pub mod vm;
pub mod workload;

// Re-export commonly used items for convenience
pub use constants::*;
pub use engine::{AccessKind, EngineStats, FaultKind, PagingEngine};
pub use error::ConfigError;
pub use policy::{PolicyKind, ReplacementPolicy};
pub use store::BackingStore;
pub use vm::VirtualMemory;
pub use workload::WorkloadKind;
