//! Frequency-dependent complex impedance of the sensor load.
//!
//! | Topology | Z(f) | DC limit |
//! |----------|------|----------|
//! | [`ImpedanceTopology::ParallelRc`] | `R / (1 + jωRC)` | `R` |
//! | [`ImpedanceTopology::SeriesRc`] | `R + 1/(jωC)` | `R + 0j` (capacitor open, branch ignored) |
//! | [`ImpedanceTopology::SeriesRlc`] | `R + jωL + 1/(jωC)` | `R + 0j` (inductor short) |
//!
//! `ω = 2π · max(|f|, 1e-30)` so no expression divides by zero; the series
//! topologies additionally return exactly `R + 0j` below that threshold.

use core::f64::consts::TAU;
use core::fmt;
use core::str::FromStr;

use zlock_core::{Complex, Result, SimError};

/// Frequencies with `|f|` below this are treated as DC.
pub const DC_EPSILON_HZ: f64 = 1e-30;

/// Impedances with magnitude below this are treated as a short in
/// [`Impedance::current_from_voltage`].
pub const MIN_IMPEDANCE_OHMS: f64 = 1e-18;

/// Circuit arrangement of the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpedanceTopology {
    /// R in parallel with C.
    ParallelRc,
    /// R in series with C.
    SeriesRc,
    /// R, L and C in series.
    SeriesRlc,
}

impl ImpedanceTopology {
    /// Kebab-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            ImpedanceTopology::ParallelRc => "parallel-rc",
            ImpedanceTopology::SeriesRc => "series-rc",
            ImpedanceTopology::SeriesRlc => "series-rlc",
        }
    }
}

impl fmt::Display for ImpedanceTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown topology name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown impedance model '{0}' (expected parallel-rc, series-rc or series-rlc)")]
pub struct ParseTopologyError(pub String);

impl FromStr for ImpedanceTopology {
    type Err = ParseTopologyError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "parallel-rc" => Ok(ImpedanceTopology::ParallelRc),
            "series-rc" => Ok(ImpedanceTopology::SeriesRc),
            "series-rlc" => Ok(ImpedanceTopology::SeriesRlc),
            _ => Err(ParseTopologyError(s.to_string())),
        }
    }
}

/// Lumped R/L/C load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impedance {
    resistance: f64,
    capacitance: f64,
    inductance: f64,
    topology: ImpedanceTopology,
}

impl Impedance {
    /// Build and validate a load.
    ///
    /// `inductance` is only used by [`ImpedanceTopology::SeriesRlc`].
    ///
    /// # Errors
    ///
    /// `ParameterOutOfRange` if any component value is negative or not
    /// finite, or if a series topology has zero capacitance (an open
    /// circuit at every frequency).
    pub fn new(
        topology: ImpedanceTopology,
        resistance: f64,
        capacitance: f64,
        inductance: f64,
    ) -> Result<Self> {
        for (param, value) in [
            ("resistance", resistance),
            ("capacitance", capacitance),
            ("inductance", inductance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SimError::out_of_range(param, value, "must be non-negative and finite"));
            }
        }
        if topology != ImpedanceTopology::ParallelRc && capacitance == 0.0 {
            return Err(SimError::out_of_range(
                "capacitance",
                capacitance,
                "series topologies need a positive capacitance",
            ));
        }
        Ok(Self {
            resistance,
            capacitance,
            inductance,
            topology,
        })
    }

    /// `R ‖ C`.
    pub fn parallel_rc(resistance: f64, capacitance: f64) -> Result<Self> {
        Self::new(ImpedanceTopology::ParallelRc, resistance, capacitance, 0.0)
    }

    /// `R + C` in series.
    pub fn series_rc(resistance: f64, capacitance: f64) -> Result<Self> {
        Self::new(ImpedanceTopology::SeriesRc, resistance, capacitance, 0.0)
    }

    /// `R + L + C` in series.
    pub fn series_rlc(resistance: f64, inductance: f64, capacitance: f64) -> Result<Self> {
        Self::new(ImpedanceTopology::SeriesRlc, resistance, capacitance, inductance)
    }

    /// Circuit arrangement.
    pub fn topology(&self) -> ImpedanceTopology {
        self.topology
    }

    /// Complex impedance at `f_hz`.
    pub fn z_complex(&self, f_hz: f64) -> Complex<f64> {
        let r = self.resistance;
        let is_dc = f_hz.abs() < DC_EPSILON_HZ;
        let w = TAU * f_hz.abs().max(DC_EPSILON_HZ);

        match self.topology {
            ImpedanceTopology::ParallelRc => {
                Complex::new(r, 0.0) / Complex::new(1.0, w * r * self.capacitance)
            }
            ImpedanceTopology::SeriesRc if is_dc => Complex::new(r, 0.0),
            ImpedanceTopology::SeriesRc => Complex::new(r, -1.0 / (w * self.capacitance)),
            ImpedanceTopology::SeriesRlc if is_dc => Complex::new(r, 0.0),
            ImpedanceTopology::SeriesRlc => {
                Complex::new(r, w * self.inductance - 1.0 / (w * self.capacitance))
            }
        }
    }

    /// [`z_complex`](Self::z_complex) over a frequency grid.
    pub fn sweep(&self, f_hz: &[f64]) -> Vec<Complex<f64>> {
        f_hz.iter().map(|&f| self.z_complex(f)).collect()
    }

    /// Resistance `Re Z(f)` in ohms.
    pub fn resistance(&self, f_hz: f64) -> f64 {
        self.z_complex(f_hz).re
    }

    /// Reactance `Im Z(f)` in ohms.
    pub fn reactance(&self, f_hz: f64) -> f64 {
        self.z_complex(f_hz).im
    }

    /// `|Z(f)|` in ohms.
    pub fn magnitude(&self, f_hz: f64) -> f64 {
        self.z_complex(f_hz).norm()
    }

    /// `arg Z(f)` in radians.
    pub fn phase(&self, f_hz: f64) -> f64 {
        self.z_complex(f_hz).arg()
    }

    /// Current through the load for a voltage record, using the impedance at
    /// the excitation frequency for every sample.
    ///
    /// `I[i] = V[i] · Re(1 / Z(f_excitation))`. This is a single-tone
    /// approximation, not a convolution with the load's impulse response, and
    /// is only meaningful for narrowband excitation near `f_excitation_hz`.
    /// A load with `|Z| < 1e-18` Ω yields all-zero current.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `voltage` and `t` differ in length.
    pub fn current_from_voltage(
        &self,
        voltage: &[f64],
        t: &[f64],
        f_excitation_hz: f64,
    ) -> Result<Vec<f64>> {
        SimError::check_len("t/voltage", t.len(), voltage.len())?;
        let z = self.z_complex(f_excitation_hz);
        if z.norm() < MIN_IMPEDANCE_OHMS {
            return Ok(vec![0.0; voltage.len()]);
        }
        let admittance = z.inv().re;
        Ok(voltage.iter().map(|&v| v * admittance).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_4;

    #[test]
    fn series_rc_dc_limit_is_exact() {
        let z = Impedance::series_rc(1e3, 1e-12).unwrap().z_complex(0.0);
        assert_eq!(z.re, 1e3);
        assert_eq!(z.im, 0.0);
    }

    #[test]
    fn series_rlc_dc_limit_is_exact() {
        let z = Impedance::series_rlc(50.0, 1e-6, 1e-9).unwrap().z_complex(0.0);
        assert_eq!(z, Complex::new(50.0, 0.0));
    }

    #[test]
    fn parallel_rc_dc_is_resistive() {
        let load = Impedance::parallel_rc(1e3, 1e-12).unwrap();
        let z = load.z_complex(0.0);
        assert!((z.re - 1e3).abs() < 1e-9);
        assert!(z.im.abs() < 1e-9);
        assert!(z.re.is_finite() && z.im.is_finite());
    }

    #[test]
    fn parallel_rc_corner() {
        // At f = 1/(2πRC) the phase is -45 degrees and |Z| = R/√2.
        let r = 1e3;
        let c = 1e-9;
        let load = Impedance::parallel_rc(r, c).unwrap();
        let fc = 1.0 / (TAU * r * c);
        assert!((load.phase(fc) + FRAC_PI_4).abs() < 1e-12);
        assert!((load.magnitude(fc) - r / 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn series_rlc_resonance_is_resistive() {
        let l = 1e-6;
        let c = 1e-9;
        let load = Impedance::series_rlc(10.0, l, c).unwrap();
        let f0 = 1.0 / (TAU * (l * c).sqrt());
        assert!((load.resistance(f0) - 10.0).abs() < 1e-12);
        assert!(load.reactance(f0).abs() < 1e-6);
        assert!(load.reactance(f0 * 2.0) > 0.0);
        assert!(load.reactance(f0 / 2.0) < 0.0);
    }

    #[test]
    fn negative_frequency_uses_magnitude() {
        let load = Impedance::series_rc(100.0, 1e-9).unwrap();
        assert_eq!(load.z_complex(-1e6), load.z_complex(1e6));
    }

    #[test]
    fn current_is_v_times_admittance() {
        let load = Impedance::series_rc(1e3, 1e-9).unwrap();
        let f = 100e3;
        let z = load.z_complex(f);
        let v = [1.0, -0.5];
        let i = load.current_from_voltage(&v, &[0.0, 1e-7], f).unwrap();
        let g = (Complex::new(1.0, 0.0) / z).re;
        assert!((i[0] - g).abs() < 1e-15);
        assert!((i[1] + 0.5 * g).abs() < 1e-15);
    }

    #[test]
    fn zero_impedance_gives_zero_current() {
        let load = Impedance::parallel_rc(0.0, 1e-9).unwrap();
        let i = load.current_from_voltage(&[1.0, 2.0], &[0.0, 1.0], 1e3).unwrap();
        assert_eq!(i, vec![0.0, 0.0]);
    }

    #[test]
    fn current_checks_shape() {
        let load = Impedance::parallel_rc(1e3, 1e-9).unwrap();
        assert!(matches!(
            load.current_from_voltage(&[1.0, 2.0], &[0.0], 1e3),
            Err(SimError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_invalid_components() {
        assert!(Impedance::parallel_rc(-1.0, 1e-9).is_err());
        assert!(Impedance::series_rc(1e3, 0.0).is_err());
        assert!(Impedance::series_rlc(1e3, f64::NAN, 1e-9).is_err());
        assert!(Impedance::parallel_rc(1e3, 0.0).is_ok());
    }

    #[test]
    fn topology_names_round_trip() {
        for t in [
            ImpedanceTopology::ParallelRc,
            ImpedanceTopology::SeriesRc,
            ImpedanceTopology::SeriesRlc,
        ] {
            assert_eq!(t.name().parse::<ImpedanceTopology>(), Ok(t));
        }
        assert_eq!(
            "series_rlc".parse::<ImpedanceTopology>(),
            Ok(ImpedanceTopology::SeriesRlc)
        );
        assert!("coax".parse::<ImpedanceTopology>().is_err());
    }
}
