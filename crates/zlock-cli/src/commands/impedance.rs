//! Impedance sweep of a lumped load.

use clap::Args;
use zlock_analog::{Impedance, ImpedanceTopology};

use super::common::{log_space, si};

#[derive(Args)]
pub struct ImpedanceArgs {
    /// Load model: parallel-rc, series-rc or series-rlc
    #[arg(short, long, default_value = "parallel-rc")]
    model: ImpedanceTopology,

    /// Resistance in ohms
    #[arg(short, default_value = "10000")]
    r: f64,

    /// Capacitance in farads
    #[arg(short, default_value = "1e-9")]
    c: f64,

    /// Inductance in henries (series-rlc only)
    #[arg(short, default_value = "0")]
    l: f64,

    /// First frequency in Hz
    #[arg(long, default_value = "100")]
    start: f64,

    /// Last frequency in Hz
    #[arg(long, default_value = "1e7")]
    stop: f64,

    /// Number of log-spaced points
    #[arg(long, default_value = "11")]
    points: usize,
}

pub fn run(args: ImpedanceArgs) -> anyhow::Result<()> {
    if !(args.start.is_finite() && args.start > 0.0 && args.stop.is_finite() && args.stop > args.start) {
        anyhow::bail!(
            "sweep needs 0 < start < stop (got start={}, stop={})",
            args.start,
            args.stop
        );
    }
    let load = Impedance::new(args.model, args.r, args.c, args.l)?;

    println!(
        "{} load: R = {}Ω, C = {}F, L = {}H",
        args.model,
        si(args.r),
        si(args.c),
        si(args.l)
    );
    println!();
    println!("{:>14}  {:>14}  {:>10}", "f (Hz)", "|Z| (Ω)", "phase (°)");
    let freqs = log_space(args.start, args.stop, args.points);
    for (f, z) in freqs.iter().zip(load.sweep(&freqs)) {
        println!("{:>14.3e}  {:>14.4e}  {:>10.3}", f, z.norm(), z.arg().to_degrees());
    }
    Ok(())
}
