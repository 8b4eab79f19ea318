use std::path::{Path, PathBuf};

/// Resolve `program` to an executable path by walking PATH entries.
#[must_use]
pub(crate) fn which(program: &str) -> Option<PathBuf> {
  if program.contains(std::path::MAIN_SEPARATOR) {
    let candidate = PathBuf::from(program);
    return is_executable(&candidate).then_some(candidate);
  }

  let paths = std::env::var_os("PATH")?;
  std::env::split_paths(&paths).find_map(|dir| {
    executable_names(program)
      .into_iter()
      .map(|name| dir.join(name))
      .find(|candidate| is_executable(candidate))
  })
}

/// Returns the first program of `candidates` that resolves on PATH.
#[must_use]
pub(crate) fn first_available<'a>(candidates: &[&'a str]) -> Option<&'a str> {
  candidates.iter().copied().find(|name| which(name).is_some())
}

#[cfg(windows)]
fn executable_names(program: &str) -> Vec<String> {
  ["", ".exe", ".cmd", ".bat"]
    .iter()
    .map(|ext| format!("{program}{ext}"))
    .collect()
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> Vec<String> {
  vec![program.to_string()]
}

/// Returns true when `path` points to a regular executable file.
#[must_use]
pub(crate) fn is_executable(path: &Path) -> bool {
  if !path.is_file() {
    return false;
  }
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::metadata(path)
      .map(|meta| meta.permissions().mode() & 0o111 != 0)
      .unwrap_or(false)
  }
  #[cfg(not(unix))]
  {
    true
  }
}
