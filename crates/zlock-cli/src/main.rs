//! zlock CLI - command-line front end of the analog front-end simulator.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "zlock")]
#[command(author, version, about = "Lock-in impedance analyzer front-end simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the DAC → op-amp → ADC chain and recover the envelope
    Simulate(commands::simulate::SimulateArgs),

    /// Sweep the complex impedance of a load model
    Impedance(commands::impedance::ImpedanceArgs),

    /// Print or write the default configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Impedance(args) => commands::impedance::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
