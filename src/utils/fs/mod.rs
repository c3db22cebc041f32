//! File system utilities for nvrmap.
//!
//! Writes that replace a whole file go through [`atomic_write`] so a crash can
//! never leave a half-written file behind.

pub mod atomic;

pub use atomic::{atomic_write, read_if_exists};
