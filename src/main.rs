use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::error;

use atomspan::{Batch, Config};

#[derive(Parser)]
#[command(name = "atomspan")]
#[command(
    about = "Positional atom descriptors: distance to molecule and branch ends and tip-fragment properties",
    long_about = None
)]
struct Cli {
    /// Input structure files (.sdf or .smi)
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Config TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report one atom per symmetry class
    #[arg(long, action = ArgAction::SetTrue)]
    suppress_symmetric: bool,

    /// Skip molecules that cannot be read instead of stopping
    #[arg(long, action = ArgAction::SetTrue)]
    continue_on_error: bool,

    /// Alternative equidistant termini examined per atom
    #[arg(long, value_name = "N")]
    max_alternatives: Option<usize>,

    /// Write reports into this directory instead of next to the inputs
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };
        if self.suppress_symmetric {
            config.suppress_symmetric = true;
        }
        if self.continue_on_error {
            config.continue_on_error = true;
        }
        if let Some(n) = self.max_alternatives {
            config.max_alternatives = n;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut batch = Batch::new(cli.config()?);
    for input in &cli.inputs {
        batch
            .process_file(input)
            .with_context(|| format!("processing {}", input.display()))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
