use anyhow::Result;
use clap::Args;
use xshell::{Shell, cmd};

#[derive(Args)]
pub struct Solve {
    /// Directory holding the move files
    #[arg(long, default_value = "demos")]
    dir: String,
}

impl Solve {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        let mut moves: Vec<_> = sh
            .read_dir(&self.dir)?
            .into_iter()
            .filter(|path| {
                matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("toml" | "json")
                )
            })
            .collect();
        moves.sort();

        if moves.is_empty() {
            anyhow::bail!("no move files found in {}", self.dir);
        }

        for path in moves {
            eprintln!("Solving {}...", path.display());
            cmd!(sh, "cargo run -q -p legato -- solve --pretty {path}").run()?;
        }
        Ok(())
    }
}
