use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::load_registry;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Resource specification JSON (defaults to the built-in catalog)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let registry = load_registry(self.catalog.as_deref());
        let source = match &self.catalog {
            Some(path) => path.display().to_string(),
            None => "built-in catalog".to_string(),
        };

        let report = ops::check(&registry, &source);
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
