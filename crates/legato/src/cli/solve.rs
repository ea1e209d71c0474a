use crate::{config::MoveConfig, report::Report};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SolveArgs {
    /// Path to the move file (TOML or JSON).
    pub input: PathBuf,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pub pretty: bool,
}

impl SolveArgs {
    pub fn run(&self) -> Result<()> {
        let config = MoveConfig::from_file(&self.input)?;
        config.validate()?;

        tracing::info!(
            "Solving {} axes from {}",
            config.axes.len(),
            self.input.display()
        );
        let report = Report::solve(&config)?;
        tracing::info!("Slowest axis needs {:.6} s", report.duration);

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .context("failed to serialize report")?;
        println!("{json}");

        Ok(())
    }
}
