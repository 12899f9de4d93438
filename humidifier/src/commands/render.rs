use std::{io::Write, path::PathBuf};

use clap::Args;
use eyre::{Context, Result};
use humidifier_manifest::StackToml;
use tracing::info;

use super::UnwrapOrExit;
use crate::ops;

#[derive(Args)]
pub struct RenderCommand {
    /// Path to the stack manifest
    #[arg(default_value = "stack.toml")]
    pub stack: PathBuf,

    /// Write the template to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,
}

impl RenderCommand {
    /// Run the render command
    pub fn run(&self) -> Result<()> {
        let stack_toml = StackToml::open(&self.stack).unwrap_or_exit();
        let registry = stack_toml.registry().unwrap_or_exit();
        let json = ops::render(&stack_toml, &registry, self.compact).unwrap_or_exit();

        match &self.output {
            Some(path) => {
                std::fs::write(path, &json)
                    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), "template written");
                println!("✓ Wrote {}", path.display());
            }
            None => {
                std::io::stdout()
                    .write_all(json.as_bytes())
                    .wrap_err("Failed to write template")?;
            }
        }

        Ok(())
    }
}
