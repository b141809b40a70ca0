//! Criterion benchmarks for zlock-analysis components
//!
//! Run with: cargo bench -p zlock-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use zlock_analysis::{ChainConfig, EnvelopeRecovery, IqDemodulator, RecoveryOptions, SignalChain};
use zlock_core::{ButterworthLowpass, Envelope, sine_wave, time_axis};

const SAMPLE_RATE: f64 = 10e6;
const CARRIER: f64 = 500e3;

/// Carrier with a DC offset, as seen at the ADC.
fn generate_carrier(size: usize) -> (Vec<f64>, Vec<f64>) {
    let t = time_axis(size, SAMPLE_RATE);
    let s = sine_wave(&t, CARRIER, 0.25, 0.0).iter().map(|v| v + 0.25).collect();
    (t, s)
}

fn bench_filtfilt(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filtfilt");
    let lp = ButterworthLowpass::new(SAMPLE_RATE, 9_746.0).unwrap();

    for size in [10_000, 50_000, 200_000] {
        let (_, signal) = generate_carrier(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| lp.filtfilt(black_box(&signal)).unwrap());
        });
    }

    group.finish();
}

fn bench_demodulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("IqDemodulate");
    let demod = IqDemodulator::new(SAMPLE_RATE, CARRIER, 10e3).unwrap();

    for size in [10_000, 50_000, 200_000] {
        let (t, signal) = generate_carrier(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| demod.demodulate(black_box(&signal), black_box(&t)).unwrap());
        });
    }

    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("SignalChain");
    group.sample_size(10);

    let envelope = Envelope::rectangular_pulse(0.01, 2e-3, 1e-3, 5e-3, 14e3);
    let configs = [
        ("ideal", ChainConfig::ideal()),
        (
            "realistic",
            ChainConfig {
                dac: zlock_analog::DacParams::default(),
                adc: zlock_analog::AdcParams::default(),
                ..ChainConfig::default()
            },
        ),
    ];

    for (name, config) in configs {
        let chain = SignalChain::new(config).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| chain.run_envelope(black_box(&envelope)).unwrap());
        });
    }

    let chain = SignalChain::new(ChainConfig::default()).unwrap();
    let output = chain.run_envelope(&envelope).unwrap();
    group.bench_function("recovery", |b| {
        b.iter(|| EnvelopeRecovery::analyze(black_box(&output), RecoveryOptions::default()));
    });

    group.finish();
}

criterion_group!(benches, bench_filtfilt, bench_demodulate, bench_chain);
criterion_main!(benches);
