//! Recoverable, constructor-time configuration errors.
//!
//! Everything else in this crate is a programmer error (wrong output
//! length, calling an API out of order) and is a `panic!`. This enum
//! covers only the narrow class of errors a caller can trigger by
//! constructing a [`crate::TreeOptions`] from untrusted input, or by
//! mis-setting the global worker count.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `leaf_size` must be at least 1.
    ZeroLeafSize,
    /// `theta` must be finite and strictly positive.
    InvalidTheta(String),
    /// `set_threads` was called with `n == 0`.
    ZeroThreads,
    /// The OS refused to spawn the requested worker threads.
    ThreadPoolUnavailable(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroLeafSize => write!(f, "leaf_size must be at least 1"),
            ConfigError::InvalidTheta(msg) => write!(f, "invalid theta: {msg}"),
            ConfigError::ZeroThreads => write!(f, "invalid thread count: 0"),
            ConfigError::ThreadPoolUnavailable(msg) => write!(f, "failed to start worker threads: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
