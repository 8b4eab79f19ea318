use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

pub const MANIFEST_FILE: &str = "package.json";
pub const NAME_PLACEHOLDER: &str = "{{PROJECT_NAME}}";
pub const SLUG_PLACEHOLDER: &str = "{{PROJECT_SLUG}}";

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

/// Replace the name and slug placeholders in a single pass, so text coming
/// from the project name is never substituted again.
#[must_use]
pub fn substitute(text: &str, name: &str, slug: &str) -> String {
  let re = PLACEHOLDER_RE.get_or_init(|| {
    Regex::new(r"\{\{PROJECT_(?P<kind>NAME|SLUG)\}\}").expect("valid placeholder regex")
  });
  re.replace_all(text, |caps: &Captures| match &caps["kind"] {
    "NAME" => name.to_string(),
    _ => slug.to_string(),
  })
  .into_owned()
}

/// Rewrite `package.json` inside `dir`. Returns false when there is no
/// manifest to rewrite.
pub fn rewrite(dir: &Path, name: &str, slug: &str) -> Result<bool> {
  let path = dir.join(MANIFEST_FILE);
  if !path.is_file() {
    return Ok(false);
  }
  let raw =
    fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
  let updated = substitute(&raw, name, slug);
  fs::write(&path, updated).with_context(|| format!("failed to write {}", path.display()))?;
  Ok(true)
}
