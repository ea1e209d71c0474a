use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use xshell::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for the legato workspace")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

/// The directory holding the workspace manifest, one level above this crate.
fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    // relative paths such as `demos` resolve against the workspace
    sh.change_dir(workspace_root()?);

    cli.command.run(&sh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_holds_the_crates() {
        let root = workspace_root().unwrap();
        assert!(root.join("Cargo.toml").is_file());
        assert!(root.join("crates/legato-core").is_dir());
        assert!(root.join("demos").is_dir());
    }
}
