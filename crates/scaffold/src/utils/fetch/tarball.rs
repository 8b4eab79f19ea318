use std::io::Read;
use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;
use flate2::read::GzDecoder;

use super::{FetchError, FetchSpec, Fetcher, Host};
use crate::config::HostUrls;

/// Downloads the host's `.tar.gz` snapshot of a repository and unpacks the
/// requested subtree. No history is kept.
pub struct TarballFetcher {
  hosts: HostUrls,
  client: reqwest::blocking::Client,
}

impl TarballFetcher {
  pub fn new(hosts: HostUrls) -> anyhow::Result<Self> {
    let client = reqwest::blocking::Client::builder()
      .user_agent(concat!("scaffold/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("failed to set up the HTTP client")?;
    Ok(Self { hosts, client })
  }

  /// Snapshot URL for `spec`. Without a reference the default branch is used.
  #[must_use]
  pub fn archive_url(&self, spec: &FetchSpec) -> String {
    let reference = spec.reference.as_deref().unwrap_or("HEAD");
    let (owner, repo) = (&spec.owner, &spec.repo);
    match spec.host {
      Host::GitHub => format!(
        "{}/{owner}/{repo}/tar.gz/{reference}",
        self.hosts.github.trim_end_matches('/')
      ),
      Host::GitLab => format!(
        "{}/{owner}/{repo}/-/archive/{reference}/{repo}-{reference}.tar.gz",
        self.hosts.gitlab.trim_end_matches('/')
      ),
      Host::Bitbucket => format!(
        "{}/{owner}/{repo}/get/{reference}.tar.gz",
        self.hosts.bitbucket.trim_end_matches('/')
      ),
    }
  }

  fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    let network = |source: reqwest::Error| FetchError::Network {
      url: url.to_string(),
      source,
    };
    let response = self.client.get(url).send().map_err(network)?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::NotFound {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }
    let bytes = response.bytes().map_err(network)?;
    Ok(bytes.to_vec())
  }
}

impl Fetcher for TarballFetcher {
  fn fetch(&self, spec: &FetchSpec, dest: &Path) -> Result<(), FetchError> {
    let url = self.archive_url(spec);
    log::debug!("downloading {url}");
    let contents = self.download(&url)?;
    let written = extract_subtree(contents.as_slice(), &spec.subdir, dest)?;
    log::debug!("unpacked {written} entries into {}", dest.display());
    Ok(())
  }
}

/// Unpack a gzipped tarball into `dest`, dropping the archive's top-level
/// directory and keeping only entries below `subdir` (relative to it).
///
/// Symlinks pointing outside `dest` and entries that would be written
/// through such a link are skipped.
///
/// Returns the number of unpacked entries.
pub fn extract_subtree(
  contents: impl Read,
  subdir: &str,
  dest: &Path,
) -> Result<usize, FetchError> {
  std::fs::create_dir_all(dest).map_err(io_err(dest))?;
  let root = dest.canonicalize().map_err(io_err(dest))?;

  let subdir: PathBuf = subdir.split('/').filter(|p| !p.is_empty()).collect();
  let mut archive = tar::Archive::new(GzDecoder::new(contents));
  let mut written = 0usize;

  for entry in archive.entries().map_err(FetchError::Archive)? {
    let mut entry = entry.map_err(FetchError::Archive)?;
    let kind = entry.header().entry_type();
    if !(kind.is_file() || kind.is_dir() || kind.is_symlink()) {
      // pax headers and friends
      continue;
    }
    let path = entry.path().map_err(FetchError::Archive)?.into_owned();
    let Some(relative) = relative_entry_path(&path, &subdir) else {
      continue;
    };
    if relative.as_os_str().is_empty() {
      if !kind.is_dir() {
        return Err(FetchError::MissingSubdir(shown_subdir(&subdir)));
      }
      written += 1;
      continue;
    }

    if kind.is_symlink() {
      let link = entry.link_name().map_err(FetchError::Archive)?;
      if !link.is_some_and(|link| link_stays_inside(&relative, &link)) {
        log::warn!(
          "skipping symlink {} pointing outside the project",
          relative.display()
        );
        continue;
      }
    }

    let target = dest.join(&relative);
    let Some(parent) = target.parent() else {
      continue;
    };
    let guarded = if kind.is_dir() { target.as_path() } else { parent };
    if escapes_root(&root, guarded) {
      log::warn!("skipping {} written through a symlink", relative.display());
      continue;
    }
    std::fs::create_dir_all(parent).map_err(io_err(parent))?;
    if !kind.is_dir() && target.symlink_metadata().is_ok() {
      std::fs::remove_file(&target).map_err(io_err(&target))?;
    }
    entry.unpack(&target).map_err(io_err(&target))?;
    written += 1;
  }

  if written == 0 {
    return Err(FetchError::MissingSubdir(shown_subdir(&subdir)));
  }
  Ok(written)
}

fn shown_subdir(subdir: &Path) -> String {
  if subdir.as_os_str().is_empty() {
    ".".to_string()
  } else {
    subdir.display().to_string()
  }
}

/// Whether a link stored at `relative` and pointing to `link` resolves
/// below the extraction root without leaving it on the way.
fn link_stays_inside(relative: &Path, link: &Path) -> bool {
  let mut depth = relative.components().count().saturating_sub(1);
  for component in link.components() {
    match component {
      Component::Normal(_) => depth += 1,
      Component::CurDir => {}
      Component::ParentDir => {
        if depth == 0 {
          return false;
        }
        depth -= 1;
      }
      Component::RootDir | Component::Prefix(_) => return false,
    }
  }
  true
}

/// Resolve the deepest existing ancestor of `path` and check it is still
/// below `root`. Catches directories replaced by symlinks on disk.
fn escapes_root(root: &Path, path: &Path) -> bool {
  let mut existing = path;
  while existing.symlink_metadata().is_err() {
    match existing.parent() {
      Some(parent) => existing = parent,
      None => return true,
    }
  }
  match existing.canonicalize() {
    Ok(real) => !real.starts_with(root),
    Err(_) => true,
  }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> FetchError + use<> {
  let path = path.to_path_buf();
  move |source| FetchError::Io { path, source }
}

/// Strip the archive root and `subdir` from an entry path. Returns `None`
/// for entries outside `subdir` or with unsafe components.
fn relative_entry_path(path: &Path, subdir: &Path) -> Option<PathBuf> {
  let mut parts = Vec::new();
  for component in path.components() {
    match component {
      Component::Normal(part) => parts.push(part),
      Component::CurDir => {}
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
    }
  }
  let without_root: PathBuf = parts.into_iter().skip(1).collect();
  without_root.strip_prefix(subdir).ok().map(Path::to_path_buf)
}
