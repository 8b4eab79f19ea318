use std::path::Path;

use anyhow::Result;

use crate::utils::child::run_captured;
use crate::utils::error_messages;
use crate::utils::step::StepOutcome;

/// Initialize a repository in `dir` and commit everything with `message`.
///
/// Never fatal: a missing `git`, a failing `init`/`add` or a failing commit
/// (e.g. no identity configured) all end up as `Tolerated`.
pub fn init_repository(dir: &Path, message: &str) -> StepOutcome {
  if let Err(err) = git(&["init", "--quiet"], dir).and_then(|()| git(&["add", "-A"], dir)) {
    log::debug!("git setup failed: {err:#}");
    return StepOutcome::Tolerated(format!(
      "Could not initialize a git repository ({err}). Skipping."
    ));
  }
  if let Err(err) = git(&["commit", "--quiet", "-m", message], dir) {
    log::debug!("git commit failed: {err:#}");
    return StepOutcome::Tolerated(format!(
      "Initialized a git repository but could not create the initial commit. {}",
      error_messages::GIT_COMMIT_HINT
    ));
  }
  StepOutcome::Done
}

/// Run git quietly, failing with its stderr on a non-zero exit.
fn git(args: &[&str], cwd: &Path) -> Result<()> {
  let output = run_captured("git", args, cwd)?;
  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("git {} failed: {}", args[0], stderr.trim());
  }
  Ok(())
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;
  use serial_test::serial;
  use std::os::unix::fs::PermissionsExt as _;

  /// Fake git recording each invocation, failing for the `fail_on` subcommand.
  fn fake_git(bin: &Path, fail_on: &str) {
    let script = format!(
      "#!/bin/sh\necho \"$1\" >> .git-calls\nif [ \"$1\" = \"{fail_on}\" ]; then echo 'nope' >&2; exit 1; fi\nexit 0\n"
    );
    let path = bin.join("git");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  fn calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join(".git-calls"))
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  fn with_fake_git<R>(fail_on: &str, f: impl FnOnce(&Path) -> R) -> R {
    let bin = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    fake_git(bin.path(), fail_on);
    let path = format!("{}:/usr/bin:/bin", bin.path().display());
    temp_env::with_var("PATH", Some(path), || f(project.path()))
  }

  #[test]
  #[serial]
  fn runs_init_add_commit() {
    with_fake_git("none", |dir| {
      let outcome = init_repository(dir, "first");
      assert!(matches!(outcome, StepOutcome::Done), "{outcome:?}");
      assert_eq!(calls(dir), vec!["init", "add", "commit"]);
    });
  }

  #[test]
  #[serial]
  fn failed_commit_is_tolerated() {
    with_fake_git("commit", |dir| match init_repository(dir, "first") {
      StepOutcome::Tolerated(msg) => {
        assert!(msg.contains("user.name"), "{msg}");
        assert_eq!(calls(dir), vec!["init", "add", "commit"]);
      }
      other => panic!("expected tolerated outcome, got {other:?}"),
    });
  }

  #[test]
  #[serial]
  fn failed_init_skips_remaining_steps() {
    with_fake_git("init", |dir| {
      let outcome = init_repository(dir, "first");
      assert!(matches!(outcome, StepOutcome::Tolerated(_)), "{outcome:?}");
      assert_eq!(calls(dir), vec!["init"]);
    });
  }

  #[test]
  #[serial]
  fn missing_git_is_tolerated() {
    let empty = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    temp_env::with_var("PATH", Some(empty.path()), || {
      let outcome = init_repository(project.path(), "first");
      assert!(matches!(outcome, StepOutcome::Tolerated(_)), "{outcome:?}");
    });
  }
}
