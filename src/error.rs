use thiserror::Error;

/// Errors that can be reported before any engine state exists.
///
/// Everything else in this crate (out-of-range ids, short store transfers,
/// contract-violating fault dispatch) is an unrecoverable invariant breach
/// and panics instead of returning a `Result`; see the module docs on
/// [`crate::engine`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("npages must be at least 1")]
    ZeroPages,
    #[error("nframes must be at least 1")]
    ZeroFrames,
    #[error("unknown replacement policy: {0}")]
    UnknownPolicy(String),
    #[error("unknown workload: {0}")]
    UnknownWorkload(String),
}
