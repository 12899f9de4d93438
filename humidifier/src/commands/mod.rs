mod check;
mod completions;
mod explain;
mod list;
mod render;

use std::path::Path;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use explain::ExplainCommand;
use humidifier_schema::Registry;
use list::ListCommand;
use render::RenderCommand;

/// Extension trait for exiting on library errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for humidifier_schema::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(miette::Report::new(*e)),
        }
    }
}

impl<T> UnwrapOrExit<T> for humidifier_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(miette::Report::new(*e)),
        }
    }
}

fn exit_with(report: miette::Report) -> ! {
    eprintln!("{:?}", report);
    std::process::exit(1);
}

/// Load the catalog at `path`, or the built-in definitions.
pub(crate) fn load_registry(path: Option<&Path>) -> Registry {
    match path {
        Some(path) => Registry::from_file(path).unwrap_or_exit(),
        None => Registry::builtin().clone(),
    }
}

#[derive(Parser)]
#[command(name = "humidifier")]
#[command(version)]
#[command(about = "Render CloudFormation templates from typed resource definitions")]
pub(crate) struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Check(cmd) => cmd.run(),
            Commands::List(cmd) => cmd.run(),
            Commands::Explain(cmd) => cmd.run(),
            Commands::Render(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a resource catalog
    Check(CheckCommand),

    /// List registered resource types
    List(ListCommand),

    /// Show the properties of a resource or property type
    Explain(ExplainCommand),

    /// Render a stack manifest to a template document
    Render(RenderCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
