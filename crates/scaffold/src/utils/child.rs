use std::path::Path;
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

/// Spawn a child process with inherited stdio so the user sees live output.
pub fn run_child_process(program: &str, args: &[String], cwd: &Path) -> Result<ExitStatus> {
  log::debug!("running {program} {} in {}", args.join(" "), cwd.display());
  Command::new(program)
    .current_dir(cwd)
    .args(args)
    .stdin(Stdio::inherit())
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit())
    .status()
    .with_context(|| format!("failed to run {program}"))
}

/// Run a child process quietly, capturing stdout and stderr.
pub fn run_captured(program: &str, args: &[&str], cwd: &Path) -> Result<Output> {
  log::debug!("running {program} {} in {}", args.join(" "), cwd.display());
  Command::new(program)
    .current_dir(cwd)
    .args(args)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .output()
    .with_context(|| format!("failed to run {program} {}", args.join(" ")))
}
