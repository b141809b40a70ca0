//! Simulation configuration for the zlock front-end simulator.
//!
//! A run is described by a flat set of knobs in the units an engineer would
//! turn them in: bit depths, reference volts, nonlinearity in LSBs, errors in
//! percent of full scale, bandwidths in MHz, noise in µV.
//!
//! # Features
//!
//! - **TOML files**: load and save [`SimulationConfig`] with every key optional
//! - **Documented bounds**: [`KNOBS`] lists the range of every knob
//! - **Clamping**: [`SimulationConfig::clamped`] pulls values into range and reports what moved
//! - **Conversion**: [`SimulationConfig::to_chain_config`] produces SI parameter sets
//!
//! # Example
//!
//! ```rust,no_run
//! use zlock_config::SimulationConfig;
//! use zlock_analysis::SignalChain;
//!
//! let config = SimulationConfig::load("bench.toml").unwrap();
//! let (config, clamped) = config.clamped();
//! for c in &clamped {
//!     eprintln!("{}: {} -> {}", c.key, c.requested, c.applied);
//! }
//! let chain = SignalChain::new(config.to_chain_config()).unwrap();
//! ```

mod error;
mod simulation;

/// Knob bounds and defaults.
pub mod knobs;

pub use error::ConfigError;
pub use knobs::{KNOBS, Knob, knob};
pub use simulation::{ClampedKnob, SimulationConfig};
