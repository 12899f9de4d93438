use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::load_registry;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ListCommand {
    /// Resource specification JSON (defaults to the built-in catalog)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let registry = load_registry(self.catalog.as_deref());
        ops::list(&registry).render(&mut TerminalOutput::new());
        Ok(())
    }
}
