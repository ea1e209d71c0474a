use anyhow::Result;
use clap::Subcommand;
use xshell::Shell;

pub mod bench;
pub mod ci;
pub mod fmt;
pub mod solve;

#[derive(Subcommand)]
pub enum Command {
    /// Run the solver benchmarks
    Bench(bench::Bench),
    /// Run CI checks (fmt, clippy, test). Runs all if no subcommand specified.
    Ci(ci::Ci),
    /// Format the workspace, or check it with `--check`
    Fmt(fmt::Fmt),
    /// Solve every move file in the demos directory
    Solve(solve::Solve),
    /// Run tests
    Test(test::Test),
}

impl Command {
    pub fn run(self, sh: &Shell) -> Result<()> {
        match self {
            Command::Bench(cmd) => cmd.run(sh),
            Command::Ci(cmd) => cmd.run(sh),
            Command::Fmt(cmd) => cmd.run(sh),
            Command::Solve(cmd) => cmd.run(sh),
            Command::Test(cmd) => cmd.run(sh),
        }
    }
}
