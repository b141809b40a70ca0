//! Integration tests chaining the component simulators.

use core::f64::consts::TAU;

use zlock_analog::{
    AdcParams, AdcSimulator, DacParams, DacSimulator, Impedance, OpAmpParams, OpAmpSimulator,
    OpAmpTopology,
};
use zlock_core::{math, sine_wave, time_axis};

fn unipolar_tone(n: usize, fs: f64, f: f64) -> Vec<f64> {
    (0..n).map(|i| 0.5 + 0.45 * (TAU * f * i as f64 / fs).sin()).collect()
}

#[test]
fn ideal_chain_reproduces_input_within_one_lsb() {
    let fs = 10e6;
    let input = unipolar_tone(2000, fs, 500e3);

    let mut dac = DacSimulator::ideal(16, 1.0, fs).unwrap();
    let mut amp = OpAmpSimulator::ideal(fs).unwrap();
    let mut adc = AdcSimulator::ideal(16, 1.0, fs).unwrap();

    let v = dac.digital_to_analog(&input);
    let v = amp.run(&v);
    let codes = adc.analog_to_digital(&v);
    let out = adc.reconstruct(&codes);

    let lsb = 1.0 / 65_535.0;
    for (a, b) in input.iter().zip(&out) {
        assert!((a - b).abs() <= lsb, "{a} vs {b}");
    }
}

#[test]
fn realistic_chain_stays_close() {
    let fs = 10e6;
    let input = unipolar_tone(5000, fs, 500e3);

    let mut dac = DacSimulator::new(DacParams::default(), fs, 42).unwrap();
    let op_params = OpAmpParams {
        topology: OpAmpTopology::VoltageFollower,
        bandwidth_hz: 100e6,
        noise_rms: 5e-6,
        ..OpAmpParams::default()
    };
    let mut amp = OpAmpSimulator::new(op_params, fs, 43).unwrap();
    let mut adc = AdcSimulator::new(AdcParams::default(), fs, 44).unwrap();

    let v = dac.digital_to_analog(&input);
    let v = amp.buffer(&v);
    let codes = adc.analog_to_digital(&v);
    let out = adc.reconstruct(&codes);

    let err: Vec<f64> = input.iter().zip(&out).map(|(a, b)| a - b).collect();
    // a handful of LSBs of INL/DNL plus microvolts of noise
    assert!(math::rms(&err) < 1e-4, "rms error {}", math::rms(&err));
}

#[test]
fn tia_reads_load_current() {
    // Drive a resistive load and read it back through a 10 kΩ TIA.
    let fs = 250e6;
    let f = 1e6;
    let t = time_axis(1000, fs);
    let v = sine_wave(&t, f, 0.1, 0.0);

    let load = Impedance::parallel_rc(1e3, 0.0).unwrap();
    let i = load.current_from_voltage(&v, &t, f).unwrap();

    let params = OpAmpParams {
        topology: OpAmpTopology::Transimpedance { ohms: 10e3 },
        bandwidth_hz: 0.0,
        ..OpAmpParams::ideal()
    };
    let mut tia = OpAmpSimulator::new(params, fs, 0).unwrap();
    let out = tia.run(&i);

    for (vin, vout) in v.iter().zip(&out) {
        assert!((vout + 10.0 * vin).abs() < 1e-12);
    }
}

#[test]
fn seeds_are_independent_of_other_simulators() {
    let fs = 10e6;
    let input = unipolar_tone(500, fs, 1e6);
    let params = OpAmpParams {
        noise_rms: 1e-4,
        ..OpAmpParams::ideal()
    };

    let mut alone = OpAmpSimulator::new(params, fs, 5).unwrap();
    let expected = alone.run(&input);

    // Construct and exercise unrelated simulators in between.
    let mut other = OpAmpSimulator::new(params, fs, 5).unwrap();
    let _ = other.run(&input);
    let mut dac = DacSimulator::new(DacParams::default(), fs, 5).unwrap();
    let _ = dac.digital_to_analog(&input);

    let mut again = OpAmpSimulator::new(params, fs, 5).unwrap();
    assert_eq!(again.run(&input), expected);
}
