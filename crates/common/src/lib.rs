//! Common utilities shared across the trivfold crates.

/// General utility functions for the environment and the file system.
pub mod utils;
