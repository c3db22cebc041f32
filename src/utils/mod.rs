//! Utility modules for nvrmap.

pub mod fs;

pub use fs::{atomic_write, read_if_exists};
