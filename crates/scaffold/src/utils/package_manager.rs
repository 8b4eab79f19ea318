use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::utils::which;

/// Probe order used when nothing else selects a package manager.
const PROBE_ORDER: [PackageManager; 4] = [
  PackageManager::Pnpm,
  PackageManager::Yarn,
  PackageManager::Bun,
  PackageManager::Npm,
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PackageManager {
  #[default]
  Npm,
  Yarn,
  Pnpm,
  Bun,
}

impl PackageManager {
  #[must_use]
  pub fn program(self) -> &'static str {
    match self {
      Self::Npm => "npm",
      Self::Yarn => "yarn",
      Self::Pnpm => "pnpm",
      Self::Bun => "bun",
    }
  }

  #[must_use]
  pub fn install_args(self) -> Vec<String> {
    vec!["install".to_string()]
  }

  /// Shell line that runs a package script, as shown to the user.
  #[must_use]
  pub fn run_script(self, script: &str) -> String {
    match self {
      Self::Npm | Self::Bun => format!("{} run {script}", self.program()),
      Self::Yarn | Self::Pnpm => format!("{} {script}", self.program()),
    }
  }

  /// Pick the package manager with precedence:
  /// configured -> `npm_config_user_agent` -> first found on PATH -> npm.
  #[must_use]
  pub fn detect(configured: Option<Self>) -> Self {
    if let Some(pm) = configured {
      return pm;
    }
    if let Some(pm) = std::env::var("npm_config_user_agent")
      .ok()
      .as_deref()
      .and_then(Self::from_user_agent)
    {
      log::debug!("package manager {pm} selected from npm_config_user_agent");
      return pm;
    }
    let names: Vec<&str> = PROBE_ORDER.iter().map(|pm| pm.program()).collect();
    which::first_available(&names)
      .and_then(|name| name.parse().ok())
      .unwrap_or_default()
  }

  /// Parse the invoking tool from a user agent like `pnpm/9.1.0 npm/? node/v20`.
  fn from_user_agent(agent: &str) -> Option<Self> {
    let first = agent.split_whitespace().next()?;
    let name = first.split('/').next()?;
    name.parse().ok()
  }
}

impl fmt::Display for PackageManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.program())
  }
}

impl FromStr for PackageManager {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "npm" => Ok(Self::Npm),
      "yarn" => Ok(Self::Yarn),
      "pnpm" => Ok(Self::Pnpm),
      "bun" => Ok(Self::Bun),
      other => bail!("unknown package manager: {other}. Known: npm, yarn, pnpm, bun"),
    }
  }
}
