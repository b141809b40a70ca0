//! Full signal-chain simulation with envelope recovery.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use zlock_analysis::{
    ChainOutput, EnvelopeRecovery, RecoveryStats, SignalChain, StageError, StepResponse,
    step_response,
};
use zlock_config::SimulationConfig;
use zlock_core::Envelope;

use super::common::{resolve_config, si};

/// Settling tolerance used for the pulse edge, as a fraction of the step.
const SETTLING_TOLERANCE: f64 = 0.02;

#[derive(Args)]
pub struct SimulateArgs {
    /// Configuration file (TOML); defaults are used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recorded envelope trace, one voltage per line at 14 kHz
    #[arg(short, long, conflicts_with_all = ["pulse_mv", "duration_ms"])]
    envelope: Option<PathBuf>,

    /// Height of a synthetic rectangular envelope pulse, mV
    #[arg(long, default_value = "10")]
    pulse_mv: f64,

    /// Length of the synthetic run, ms
    #[arg(long, default_value = "5")]
    duration_ms: f64,

    /// Override a knob (key=value), repeatable
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

/// Summary of one run, without the sample arrays.
#[derive(Debug, Serialize)]
struct SimulationReport {
    config: SimulationConfig,
    samples: usize,
    envelope_peak: f64,
    modulation_depth_pct: f64,
    carrier_scale: f64,
    carrier_amp_volts: f64,
    baseline: f64,
    baseline_source: zlock_analysis::BaselineSource,
    dac_error: StageError,
    adc_error: StageError,
    recovery: RecoveryStats,
    step: Option<StepResponse>,
}

/// Synthetic pulse: rises at one fifth of the run and lasts one fifth of it,
/// so the default 5 ms run carries a 1 ms pulse.
struct Pulse {
    start: f64,
    width: f64,
}

impl Pulse {
    fn for_duration(duration: f64) -> Self {
        Self {
            start: duration / 5.0,
            width: duration / 5.0,
        }
    }
}

pub fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.set)?;
    let chain = SignalChain::new(config.to_chain_config())?;
    let fs = chain.config().sample_rate;

    let (envelope, pulse) = match &args.envelope {
        Some(path) => {
            let envelope = zlock_io::load_and_isolate_envelope(path)?;
            tracing::info!(
                path = %path.display(),
                samples = envelope.len(),
                duration_ms = envelope.duration() * 1e3,
                "loaded envelope"
            );
            (envelope, None)
        }
        None => {
            if !(args.duration_ms.is_finite() && args.duration_ms > 0.0) {
                anyhow::bail!("--duration-ms must be positive (got {})", args.duration_ms);
            }
            let duration = args.duration_ms * 1e-3;
            let pulse = Pulse::for_duration(duration);
            let envelope =
                Envelope::rectangular_pulse(args.pulse_mv * 1e-3, pulse.start, pulse.width, duration, fs);
            (envelope, Some(pulse))
        }
    };

    tracing::info!(
        sample_rate = fs,
        carrier_hz = chain.config().carrier_hz,
        enbw_hz = chain.config().lpf_enbw_hz,
        "running signal chain"
    );
    let output = chain.run_envelope(&envelope)?;
    let recovery = EnvelopeRecovery::analyze(&output, config.to_recovery_options());
    let step = pulse.and_then(|p| rising_edge(&output, &recovery, &p, fs));

    let report = SimulationReport {
        samples: output.len(),
        envelope_peak: output.envelope_peak,
        modulation_depth_pct: output.modulation_depth_pct,
        carrier_scale: output.carrier_scale,
        carrier_amp_volts: output.carrier_amp_volts,
        baseline: recovery.baseline,
        baseline_source: recovery.baseline_source,
        dac_error: output.dac_error(),
        adc_error: output.adc_error(),
        recovery: recovery.stats,
        step,
        config,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Step response of the recovered envelope around the pulse's rising edge,
/// measured after the skipped start-up span.
fn rising_edge(
    output: &ChainOutput,
    recovery: &EnvelopeRecovery,
    pulse: &Pulse,
    fs: f64,
) -> Option<StepResponse> {
    let edge = (pulse.start * fs) as usize;
    let half = (pulse.width * fs / 2.0) as usize;
    let from = edge.saturating_sub(half).max(recovery.skip);
    let to = (edge + half).min(output.len());
    if from >= to {
        return None;
    }
    step_response(&recovery.recovered[from..to], fs, SETTLING_TOLERANCE)
}

fn print_report(report: &SimulationReport) {
    let c = &report.config;
    println!("Signal chain");
    println!(
        "  {} samples at {}Hz, carrier {}Hz, ENBW {}Hz, seed {}",
        report.samples,
        si(c.sample_rate_mhz * 1e6),
        si(c.carrier_freq_khz * 1e3),
        si(c.lpf_enbw_khz * 1e3),
        c.seed
    );
    println!(
        "  DAC {}-bit / {:.2} V, ADC {}-bit / {:.2} V, op-amp {}Hz",
        c.dac_bits,
        c.dac_v_ref,
        c.adc_bits,
        c.adc_v_ref,
        si(c.opamp_bw_mhz * 1e6)
    );
    println!(
        "  envelope peak {}V ({:.3} % modulation)",
        si(report.envelope_peak),
        report.modulation_depth_pct
    );
    if report.carrier_scale < 1.0 {
        println!(
            "  carrier scaled by {:.4} to {}V amplitude",
            report.carrier_scale,
            si(report.carrier_amp_volts)
        );
    }

    println!();
    println!("Stage errors (% of half-span)");
    println!(
        "  DAC  rms {:.4} %  max {:.4} %",
        report.dac_error.rms_pct, report.dac_error.max_pct
    );
    println!(
        "  ADC  rms {:.4} %  max {:.4} %",
        report.adc_error.rms_pct, report.adc_error.max_pct
    );

    let s = &report.recovery;
    println!();
    println!("Envelope recovery");
    println!(
        "  baseline {}V ({:?}), {} of {} samples analyzed",
        si(report.baseline),
        report.baseline_source,
        s.samples_used,
        s.samples_total
    );
    println!("  mean error     {}V", si(s.mean_error));
    println!("  std error      {}V", si(s.std_error));
    println!("  rms error      {}V ({:.3} % p-p)", si(s.rms_error), s.rms_error_pct);
    println!("  max |error|    {}V ({:.3} % p-p)", si(s.max_abs_error), s.max_abs_error_pct);
    println!("  correlation    {:.6}", s.correlation);
    println!("  optimal bias   {}V", si(s.optimal_dc_bias));
    println!("  suggested gain {:.4}", s.suggested_scale);

    if let Some(step) = &report.step {
        println!();
        println!("Rising edge");
        println!("  rise time      {}s", si(step.rise_time));
        println!("  settling time  {}s", si(step.settling_time));
        println!("  overshoot      {:.2} %", step.overshoot_pct);
    }
}
