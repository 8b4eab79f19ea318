use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;

use crate::log_warn;
use crate::utils::error_messages;

pub mod tarball;

static DESCRIPTOR_RE: OnceLock<Regex> = OnceLock::new();

/// Remote hosting service of a template repository.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Host {
  #[default]
  GitHub,
  GitLab,
  Bitbucket,
}

impl Host {
  /// Descriptor prefix naming this host explicitly.
  #[must_use]
  pub fn qualifier(self) -> &'static str {
    match self {
      Self::GitHub => "github",
      Self::GitLab => "gitlab",
      Self::Bitbucket => "bitbucket",
    }
  }

  fn from_qualifier(s: &str) -> Option<Self> {
    match s {
      "github" => Some(Self::GitHub),
      "gitlab" => Some(Self::GitLab),
      "bitbucket" => Some(Self::Bitbucket),
      _ => None,
    }
  }
}

/// Concrete location handed to a [`Fetcher`]: repository, optional subtree
/// and optional git reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchSpec {
  pub host: Host,
  /// Whether the descriptor named the host with a `host:` prefix.
  pub explicit_host: bool,
  pub owner: String,
  pub repo: String,
  /// Subtree inside the repository, empty for the repository root.
  pub subdir: String,
  pub reference: Option<String>,
}

impl FetchSpec {
  /// Combine a repository descriptor `[host:]owner/repo[/path][#ref]` with a
  /// template subpath. A subpath of `.` selects the descriptor as is.
  pub fn new(descriptor: &str, template: &str) -> Result<Self> {
    let re = DESCRIPTOR_RE.get_or_init(|| {
      Regex::new(
        r"^(?:(?P<host>[a-z]+):)?(?P<owner>[^/#:\s]+)/(?P<repo>[^/#\s]+)(?P<path>/[^#]*)?(?:#(?P<reference>.+))?$",
      )
      .expect("valid descriptor regex")
    });
    let descriptor = descriptor.trim();
    let Some(caps) = re.captures(descriptor) else {
      bail!("invalid repository descriptor '{descriptor}': expected [host:]owner/repo[#ref]");
    };

    let (host, explicit_host) = match caps.name("host") {
      Some(m) => {
        let host = Host::from_qualifier(m.as_str()).ok_or_else(|| {
          anyhow!(
            "unknown host '{}' in '{descriptor}'. Known hosts: github, gitlab, bitbucket",
            m.as_str()
          )
        })?;
        (host, true)
      }
      None => (Host::GitHub, false),
    };

    let base_path = caps.name("path").map_or("", |m| m.as_str().trim_matches('/'));
    let template = if template.trim() == "." {
      ""
    } else {
      template.trim().trim_matches('/')
    };
    let subdir = [base_path, template]
      .into_iter()
      .filter(|part| !part.is_empty())
      .collect::<Vec<_>>()
      .join("/");

    Ok(Self {
      host,
      explicit_host,
      owner: caps["owner"].to_string(),
      repo: caps["repo"].to_string(),
      subdir,
      reference: caps.name("reference").map(|m| m.as_str().to_string()),
    })
  }

  /// The same location with the explicit host prefix removed, or `None` when
  /// there is nothing to strip.
  #[must_use]
  pub fn without_host_qualifier(&self) -> Option<Self> {
    if !self.explicit_host {
      return None;
    }
    Some(Self {
      host: Host::default(),
      explicit_host: false,
      ..self.clone()
    })
  }
}

impl fmt::Display for FetchSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.explicit_host {
      write!(f, "{}:", self.host.qualifier())?;
    }
    write!(f, "{}/{}", self.owner, self.repo)?;
    if !self.subdir.is_empty() {
      write!(f, "/{}", self.subdir)?;
    }
    if let Some(reference) = &self.reference {
      write!(f, "#{reference}")?;
    }
    Ok(())
  }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("{url} responded with {status}")]
  NotFound { url: String, status: u16 },
  #[error("template path '{0}' does not exist in the repository")]
  MissingSubdir(String),
  #[error("request to {url} failed")]
  Network {
    url: String,
    #[source]
    source: reqwest::Error,
  },
  #[error("failed to unpack repository archive")]
  Archive(#[source] std::io::Error),
  #[error("failed to write {}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl FetchError {
  /// True when the failure points at the remote location rather than the
  /// local filesystem.
  #[must_use]
  pub fn is_location_error(&self) -> bool {
    !matches!(self, Self::Io { .. })
  }
}

/// Capability that materializes a repository snapshot on disk.
pub trait Fetcher {
  fn fetch(&self, spec: &FetchSpec, dest: &Path) -> Result<(), FetchError>;
}

/// Fetch `spec` into `dest`. When the first attempt fails and the spec names
/// its host explicitly, retry exactly once without the prefix.
///
/// Returns the spec that succeeded.
pub fn fetch_with_fallback(
  fetcher: &dyn Fetcher,
  spec: FetchSpec,
  dest: &Path,
) -> Result<FetchSpec> {
  let err = match fetcher.fetch(&spec, dest) {
    Ok(()) => return Ok(spec),
    Err(err) => err,
  };
  if !err.is_location_error() {
    return Err(err).context(error_messages::FETCH_UNEXPECTED);
  }
  log::debug!("fetching {spec} failed: {err:?}");

  let Some(stripped) = spec.without_host_qualifier() else {
    return Err(err).context(error_messages::fetch_failed(&spec));
  };
  log_warn!("Failed to fetch {}, retrying with {}", spec, stripped);
  match fetcher.fetch(&stripped, dest) {
    Ok(()) => Ok(stripped),
    Err(err) if err.is_location_error() => {
      Err(err).context(error_messages::fetch_failed(&stripped))
    }
    Err(err) => Err(err).context(error_messages::FETCH_UNEXPECTED),
  }
}
