//! Default configuration output.

use clap::Args;
use std::path::PathBuf;
use zlock_config::SimulationConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let config = SimulationConfig::default();
    match args.output {
        Some(path) => {
            config.save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
