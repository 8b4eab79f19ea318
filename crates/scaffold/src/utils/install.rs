use std::path::Path;

use crate::utils::child::run_child_process;
use crate::utils::error_messages;
use crate::utils::package_manager::PackageManager;
use crate::utils::step::StepOutcome;

/// Run `<pm> install` inside `dir` with inherited stdio. Any failure is fatal.
pub fn install_dependencies(pm: PackageManager, dir: &Path) -> StepOutcome {
  let args = pm.install_args();
  let command_line = format!("{} {}", pm.program(), args.join(" "));
  match run_child_process(pm.program(), &args, dir) {
    Ok(status) if status.success() => StepOutcome::Done,
    Ok(status) => StepOutcome::Fatal(anyhow::anyhow!(
      "{} ({} exited with {status})",
      error_messages::install_failed(&command_line),
      pm.program()
    )),
    Err(err) => StepOutcome::Fatal(err.context(error_messages::install_failed(&command_line))),
  }
}
