use anyhow::Result;
use clap::Parser;

mod commands;
mod config;
mod texts;
mod utils;

use crate::config::{AppContext, Overrides, ScaffoldConfig};

/// Scaffold - Create a new project from a remote template.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
  /// Name of the project (and of the directory to create)
  name: Option<String>,
  /// Subpath within the template repository, "." for the repository root [default: template]
  #[arg(long, value_name = "PATH")]
  template: Option<String>,
  /// Template repository as [github:|gitlab:|bitbucket:]owner/repo[#ref]
  #[arg(long, value_name = "DESCRIPTOR")]
  repo: Option<String>,
  /// Install dependencies after scaffolding
  #[arg(long)]
  install: bool,
  /// Skip git repository initialization
  #[arg(long = "no-git")]
  no_git: bool,
}

pub fn parse() -> Cli {
  Cli::parse()
}

pub fn run() -> Result<()> {
  let cli = parse();
  utils::log::init_diagnostics();
  let cwd = std::env::current_dir()?;
  let config = ScaffoldConfig::load()?;
  let ctx = AppContext { cwd, config };

  let flags = Overrides {
    template: cli.template,
    repo: cli.repo,
    install: cli.install,
    no_git: cli.no_git,
  };
  commands::create::run(&ctx, cli.name, flags)
}
