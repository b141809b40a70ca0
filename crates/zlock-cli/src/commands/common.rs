//! Shared CLI helpers.

use std::path::Path;

use zlock_config::SimulationConfig;

/// Load `path` (or the defaults), apply `key=value` overrides and clamp every
/// knob to its bounds, logging the ones that moved.
pub fn resolve_config(path: Option<&Path>, overrides: &[String]) -> anyhow::Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    for assignment in overrides {
        config.apply_assignment(assignment)?;
    }

    let (config, clamped) = config.clamped();
    for knob in &clamped {
        tracing::warn!(
            key = knob.key,
            requested = knob.requested,
            applied = knob.applied,
            "knob clamped to its bounds"
        );
    }
    Ok(config)
}

/// Logarithmically spaced points from `start` to `stop`, both included.
pub fn log_space(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (a, b) = (start.log10(), stop.log10());
            let step = (b - a) / (points - 1) as f64;
            (0..points).map(|i| 10f64.powf(a + step * i as f64)).collect()
        }
    }
}

/// Format a value with an SI prefix, e.g. `4.70 k`.
pub fn si(value: f64) -> String {
    const PREFIXES: [(f64, &str); 9] = [
        (1e9, "G"),
        (1e6, "M"),
        (1e3, "k"),
        (1.0, ""),
        (1e-3, "m"),
        (1e-6, "µ"),
        (1e-9, "n"),
        (1e-12, "p"),
        (1e-15, "f"),
    ];
    let magnitude = value.abs();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return format!("{value:.3} ");
    }
    let (scale, prefix) = PREFIXES
        .iter()
        .copied()
        .find(|&(scale, _)| magnitude >= scale)
        .unwrap_or(PREFIXES[PREFIXES.len() - 1]);
    format!("{:.3} {prefix}", value / scale)
}
