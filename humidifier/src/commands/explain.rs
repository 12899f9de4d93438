use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::{UnwrapOrExit, load_registry};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ExplainCommand {
    /// Resource type or qualified property type, e.g. `AWS::EC2::VPC`
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Resource specification JSON (defaults to the built-in catalog)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
}

impl ExplainCommand {
    pub fn run(&self) -> Result<()> {
        let registry = load_registry(self.catalog.as_deref());
        let report = ops::explain(&registry, &self.type_name).unwrap_or_exit();
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
