//! Configuration management for nvrmap.
//!
//! See [`NvrmapConfig`] for the file format and override order.

mod global;

pub use global::NvrmapConfig;
