use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assert_cmd::Command;
use tempfile::{Builder, TempDir};

/// Isolated working directory, XDG config home and PATH additions for one
/// test run of the `scaffold` binary.
#[derive(Debug)]
pub struct TestEnv {
  temp: TempDir,
  xdg_home: PathBuf,
  bin_dir: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = Builder::new()
      .prefix("scaffold-test-")
      .tempdir()
      .expect("temp dir");
    let xdg_home = temp.path().join("xdg");
    let bin_dir = temp.path().join("bin");
    let _ = std::fs::create_dir_all(&xdg_home);
    let _ = std::fs::create_dir_all(&bin_dir);
    let workdir = temp.path().join("work");
    let _ = std::fs::create_dir_all(&workdir);
    Self {
      temp,
      xdg_home,
      bin_dir,
    }
  }

  /// Directory the binary runs in; projects are created below it.
  pub fn path(&self) -> PathBuf {
    self.temp.path().join("work")
  }

  pub fn project_dir(&self, name: &str) -> PathBuf {
    self.path().join(name)
  }

  pub fn scaffold(&self) -> Result<Command> {
    let mut cmd = Command::cargo_bin("scaffold")?;
    let current_path = std::env::var("PATH").unwrap_or_default();
    let path_value = if current_path.is_empty() {
      self.bin_dir.display().to_string()
    } else {
      format!("{}:{current_path}", self.bin_dir.display())
    };
    cmd.current_dir(self.path());
    cmd.env("XDG_CONFIG_HOME", &self.xdg_home);
    cmd.env("PATH", path_value);
    cmd.env_remove("npm_config_user_agent");
    cmd.env_remove("RUST_LOG");
    for proxy in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
      cmd.env_remove(proxy);
    }
    Ok(cmd)
  }

  /// Write `scaffold/scaffold.toml` below the isolated XDG config home.
  pub fn write_config(&self, body: &str) -> Result<PathBuf> {
    let path = self.xdg_home.join("scaffold").join("scaffold.toml");
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    std::fs::write(&path, body).with_context(|| format!("write config {}", path.display()))?;
    Ok(path)
  }

  /// Point every host at `base_url`, e.g. a local archive server.
  pub fn use_hosts(&self, base_url: &str) -> Result<PathBuf> {
    self.write_config(&format!(
      "[hosts]\ngithub = \"{base_url}\"\ngitlab = \"{base_url}\"\nbitbucket = \"{base_url}\"\n"
    ))
  }

  /// Place an executable script named `name` on the PATH used by the binary.
  pub fn add_bin(&self, name: &str, body: &str) -> Result<PathBuf> {
    let path = self.bin_dir.join(name);
    write_executable_script(&path, body)?;
    Ok(path)
  }

  pub fn write_file(&self, relative: &str, body: &str) -> Result<PathBuf> {
    let path = self.path().join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir {}", parent.display()))?;
    }
    std::fs::write(&path, body).with_context(|| format!("write file {}", path.display()))?;
    Ok(path)
  }
}

pub fn write_executable_script(path: &Path, body: &str) -> Result<()> {
  std::fs::write(path, body).with_context(|| format!("write script {}", path.display()))?;
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt as _;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)
      .with_context(|| format!("set script executable at {}", path.display()))?;
  }
  Ok(())
}
