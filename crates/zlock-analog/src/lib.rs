//! zlock Analog - component error models and simulators
//!
//! Models the non-ideal parts of the analyzer front-end: the DAC that
//! synthesizes the excitation, the amplifier that buffers or converts the
//! sensor current, the ADC that digitizes the response, and the complex
//! impedance of the load itself.
//!
//! # Error Models
//!
//! Pure functions that take an explicit generator:
//!
//! - [`dac_errors`] - INL/DNL, gain/offset, code-transition glitches
//! - [`adc_errors`] - aperture jitter, gain/offset, INL/DNL, quantization
//! - [`opamp_errors`] - gain/offset, single-pole bandwidth, Gaussian noise
//!
//! # Simulators
//!
//! Each simulator validates its parameter set once and owns a ChaCha8
//! generator seeded at construction. Two simulators built with the same
//! parameters and seed produce identical output, regardless of anything else
//! the program does.
//!
//! - [`DacSimulator::digital_to_analog`]
//! - [`AdcSimulator::analog_to_digital`]
//! - [`OpAmpSimulator::run`]
//!
//! # Load
//!
//! - [`Impedance`] - parallel-RC, series-RC and series-RLC topologies
//!
//! # Example
//!
//! ```rust
//! use zlock_analog::{AdcParams, AdcSimulator, DacParams, DacSimulator};
//!
//! let fs = 10e6;
//! let mut dac = DacSimulator::new(DacParams::default(), fs, 42).unwrap();
//! let mut adc = AdcSimulator::new(AdcParams::default(), fs, 44).unwrap();
//!
//! let input: Vec<f64> = (0..256).map(|i| i as f64 / 255.0).collect();
//! let volts = dac.digital_to_analog(&input);
//! let codes = adc.analog_to_digital(&volts);
//! assert!(codes.iter().all(|&c| c <= 65_535));
//! ```

pub mod adc;
pub mod dac;
pub mod impedance;
pub mod nonlinearity;
pub mod opamp;
pub mod params;
pub mod rng;

pub use adc::{AdcSimulator, adc_errors};
pub use dac::{DacSimulator, DigitalInput, dac_errors};
pub use impedance::{Impedance, ImpedanceTopology, ParseTopologyError};
pub use nonlinearity::Nonlinearity;
pub use opamp::{OpAmpSimulator, opamp_errors};
pub use params::{AdcParams, DacParams, OpAmpParams, OpAmpTopology, max_code};
pub use rng::{SimRng, seeded};
