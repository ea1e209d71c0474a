use anyhow::Result;
use clap::Args;
use xshell::{Shell, cmd};

#[derive(Args)]
pub struct Fmt {
    /// Only report unformatted files
    #[arg(long)]
    pub check: bool,
}

impl Fmt {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        if self.check {
            eprintln!("Checking formatting...");
            cmd!(sh, "cargo fmt --all -- --check").run()?;
        } else {
            eprintln!("Formatting workspace...");
            cmd!(sh, "cargo fmt --all").run()?;
        }
        Ok(())
    }
}
