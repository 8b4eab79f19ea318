use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::utils::error_messages;
use crate::utils::log::t;
use crate::utils::wizard::Answer;

/// Absolute output directory for `project_name` below `cwd`.
#[must_use]
pub fn resolve(cwd: &Path, project_name: &str) -> PathBuf {
  cwd.join(project_name)
}

/// True when `path` exists and has at least one entry.
pub fn is_non_empty_dir(path: &Path) -> Result<bool> {
  if !path.exists() {
    return Ok(false);
  }
  if !path.is_dir() {
    bail!("{} exists and is not a directory", path.display());
  }
  let mut entries =
    fs::read_dir(path).with_context(|| format!("failed to read {}", path.display()))?;
  Ok(entries.next().is_some())
}

/// Make sure `path` is absent or empty before the template is fetched.
///
/// A non-empty directory is only removed after `confirm` answers yes.
/// Declining or cancelling aborts and leaves the directory untouched.
pub fn prepare<F>(path: &Path, confirm: F) -> Result<()>
where
  F: FnOnce(&str) -> Result<Answer<bool>>,
{
  if !is_non_empty_dir(path)? {
    return Ok(());
  }
  let prompt = format!(
    "Directory {} is not empty. Remove existing files and continue?",
    t::path(path.display())
  );
  match confirm(&prompt)? {
    Answer::Value(true) => {
      log::debug!("removing {}", path.display());
      fs::remove_dir_all(path).with_context(|| format!("failed to remove {}", path.display()))
    }
    Answer::Value(false) | Answer::Cancelled => bail!(error_messages::OPERATION_CANCELLED),
  }
}
