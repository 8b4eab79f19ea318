use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use toml::Value as TomlValue;

use crate::log_warn;
use crate::utils::package_manager::PackageManager;

pub const DEFAULT_TEMPLATE: &str = "template";
pub const DEFAULT_REPO: &str = "github:scaffold-rs/templates";
pub const DEFAULT_PROJECT_NAME: &str = "my-app";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit from scaffold";

/// Known top-level config keys.
const KNOWN_TOP_LEVEL_KEYS: &[&str] = &[
  "repo",
  "template",
  "package_manager",
  "commit_message",
  "hosts",
];

/// Known keys within `[hosts]` section.
const KNOWN_HOST_KEYS: &[&str] = &["github", "gitlab", "bitbucket"];

const CONFIG_FILE: &str = "scaffold.toml";

/// Locate the user's config file, if one exists.
#[must_use]
pub fn global_config_path() -> Option<PathBuf> {
  let xdg = xdg::BaseDirectories::with_prefix("scaffold");
  xdg.find_config_file(CONFIG_FILE)
}

/// Base URLs of the snapshot download endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostUrls {
  pub github: String,
  pub gitlab: String,
  pub bitbucket: String,
}

impl Default for HostUrls {
  fn default() -> Self {
    Self {
      github: "https://codeload.github.com".to_string(),
      gitlab: "https://gitlab.com".to_string(),
      bitbucket: "https://bitbucket.org".to_string(),
    }
  }
}

/// Values read from `scaffold.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScaffoldConfig {
  #[serde(default)]
  pub repo: Option<String>,
  #[serde(default)]
  pub template: Option<String>,
  #[serde(default)]
  pub package_manager: Option<String>,
  #[serde(default)]
  pub commit_message: Option<String>,
  #[serde(default)]
  pub hosts: HostUrls,
}

impl ScaffoldConfig {
  /// Load the global config, falling back to defaults when none exists.
  pub fn load() -> Result<Self> {
    match global_config_path() {
      Some(path) => Self::from_file(&path),
      None => Ok(Self::default()),
    }
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let raw =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Self::parse(&raw, path)
  }

  fn parse(raw: &str, path: &Path) -> Result<Self> {
    let value: TomlValue =
      toml::from_str(raw).with_context(|| format!("invalid TOML in {}", path.display()))?;
    warn_unknown_keys(&value, path);
    let cfg: Self = value
      .try_into()
      .with_context(|| format!("invalid config in {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(cfg)
  }

  /// Configured package manager, if any, parsed into a known tool.
  pub fn package_manager(&self) -> Result<Option<PackageManager>> {
    self
      .package_manager
      .as_deref()
      .map(str::parse::<PackageManager>)
      .transpose()
      .context("invalid package_manager in config")
  }
}

fn warn_unknown_keys(value: &TomlValue, path: &Path) {
  let Some(table) = value.as_table() else {
    return;
  };
  for key in table.keys() {
    if !KNOWN_TOP_LEVEL_KEYS.contains(&key.as_str()) {
      log_warn!("Unknown key '{}' in {}", key, path.display());
    }
  }
  if let Some(hosts) = table.get("hosts").and_then(TomlValue::as_table) {
    for key in hosts.keys() {
      if !KNOWN_HOST_KEYS.contains(&key.as_str()) {
        log_warn!("Unknown key 'hosts.{}' in {}", key, path.display());
      }
    }
  }
}

/// Immutable settings for one scaffolding run: CLI flags merged over the
/// config file merged over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
  pub project_name: String,
  pub template: String,
  pub repo: String,
  pub install: bool,
  pub git: bool,
  pub package_manager: PackageManager,
  pub commit_message: String,
  pub hosts: HostUrls,
}

/// Flag values as given on the command line, before defaults apply.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub template: Option<String>,
  pub repo: Option<String>,
  pub install: bool,
  pub no_git: bool,
}

impl Options {
  pub fn resolve(project_name: String, flags: Overrides, cfg: &ScaffoldConfig) -> Result<Self> {
    let package_manager = PackageManager::detect(cfg.package_manager()?);
    Ok(Self {
      project_name,
      template: flags
        .template
        .or_else(|| cfg.template.clone())
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
      repo: flags
        .repo
        .or_else(|| cfg.repo.clone())
        .unwrap_or_else(|| DEFAULT_REPO.to_string()),
      install: flags.install,
      git: !flags.no_git,
      package_manager,
      commit_message: cfg
        .commit_message
        .clone()
        .unwrap_or_else(|| DEFAULT_COMMIT_MESSAGE.to_string()),
      hosts: cfg.hosts.clone(),
    })
  }
}

/// Process-level context shared by commands.
#[derive(Debug, Clone)]
pub struct AppContext {
  pub cwd: PathBuf,
  pub config: ScaffoldConfig,
}
