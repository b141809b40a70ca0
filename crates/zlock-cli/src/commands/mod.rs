//! CLI command implementations.

pub mod common;
pub mod config;
pub mod impedance;
pub mod simulate;
