use crate::config::MoveConfig;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Path to the move file (TOML or JSON).
    pub input: PathBuf,
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        let config = MoveConfig::from_file(&self.input)?;
        config.validate()?;

        tracing::info!(
            "Move file {} is valid with {} axes",
            self.input.display(),
            config.axes.len()
        );
        Ok(())
    }
}
