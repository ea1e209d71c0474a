use anyhow::Result;
use clap::{Args, Subcommand};
use xshell::{Shell, cmd};

use super::fmt::Fmt;

#[derive(Args)]
pub struct Ci {
    #[command(subcommand)]
    command: Option<CiCommand>,
}

#[derive(Subcommand)]
pub enum CiCommand {
    /// Run cargo fmt check
    Fmt,
    /// Run cargo clippy
    Clippy,
    /// Build the benchmarks without running them
    Bench,
    /// Run cargo test
    Test(TestArgs),
}

#[derive(Args, Default)]
pub struct TestArgs {
    /// Additional arguments to pass to cargo test
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Ci {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        match &self.command {
            Some(cmd) => cmd.run(sh),
            None => {
                CiCommand::Fmt.run(sh)?;
                CiCommand::Clippy.run(sh)?;
                CiCommand::Bench.run(sh)?;
                CiCommand::Test(TestArgs::default()).run(sh)?;
                Ok(())
            }
        }
    }
}

impl CiCommand {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        match self {
            CiCommand::Fmt => Fmt { check: true }.run(sh),
            CiCommand::Clippy => {
                eprintln!("Running cargo clippy...");
                cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?;
                Ok(())
            }
            CiCommand::Bench => {
                eprintln!("Building benchmarks...");
                cmd!(sh, "cargo bench --workspace --no-run").run()?;
                Ok(())
            }
            CiCommand::Test(test_args) => {
                eprintln!("Running cargo test...");
                let args = &test_args.args;
                // snapshots must match exactly in CI
                let _ci = sh.push_env("INSTA_UPDATE", "no");
                cmd!(sh, "cargo test --workspace {args...}").run()?;
                Ok(())
            }
        }
    }
}
