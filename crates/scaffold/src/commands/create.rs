use std::path::Path;

use anyhow::Result;

use crate::config::{AppContext, DEFAULT_PROJECT_NAME, Options, Overrides};
use crate::texts;
use crate::utils::error_messages;
use crate::utils::fetch::tarball::TarballFetcher;
use crate::utils::fetch::{FetchSpec, Fetcher, fetch_with_fallback};
use crate::utils::log::t;
use crate::utils::slug::slugify;
use crate::utils::step::StepOutcome;
use crate::utils::wizard::{Answer, Wizard};
use crate::utils::{git, install, manifest, target};
use crate::{log_info, log_success};

pub fn run(ctx: &AppContext, name: Option<String>, flags: Overrides) -> Result<()> {
  let wizard = Wizard::new();
  let project_name = resolve_project_name(name, &wizard)?;
  let opts = Options::resolve(project_name, flags, &ctx.config)?;
  log::debug!("resolved options: {opts:?}");
  let fetcher = TarballFetcher::new(opts.hosts.clone())?;
  scaffold(&ctx.cwd, &opts, &fetcher, |prompt| wizard.confirm(prompt, false))
}

/// Use the positional name when given, otherwise ask for one.
fn resolve_project_name(name: Option<String>, wizard: &Wizard) -> Result<String> {
  if let Some(name) = name.map(|n| n.trim().to_string())
    && !name.is_empty()
  {
    return Ok(name);
  }
  wizard
    .project_name(DEFAULT_PROJECT_NAME)?
    .or_abort(error_messages::OPERATION_CANCELLED)
}

/// Run the scaffolding pipeline for already resolved options.
///
/// `confirm` is asked before a non-empty target directory is removed.
pub fn scaffold<F>(cwd: &Path, opts: &Options, fetcher: &dyn Fetcher, confirm: F) -> Result<()>
where
  F: FnOnce(&str) -> Result<Answer<bool>>,
{
  let dir = target::resolve(cwd, &opts.project_name);
  target::prepare(&dir, confirm)?;

  let spec = FetchSpec::new(&opts.repo, &opts.template)?;
  log_info!(
    "Creating {} in {} from {}",
    t::name(&opts.project_name),
    t::path(dir.display()),
    t::spec(&spec)
  );
  let used = fetch_with_fallback(fetcher, spec, &dir)?;

  let slug = slugify(&opts.project_name);
  if manifest::rewrite(&dir, &opts.project_name, &slug)? {
    log_info!(
      "Updated {} (slug {})",
      t::path(manifest::MANIFEST_FILE),
      t::name(&slug)
    );
  }

  if opts.install {
    log_info!(
      "Installing dependencies with {}",
      t::cmd(opts.package_manager.program())
    );
    install::install_dependencies(opts.package_manager, &dir).into_result()?;
    log_success!("Dependencies installed");
  } else {
    log_info!("Skipping dependency installation (pass --install to enable)");
  }

  if opts.git {
    match git::init_repository(&dir, &opts.commit_message).into_result()? {
      StepOutcome::Tolerated(reason) => log_info!("{}", reason),
      _ => log_success!("Initialized a git repository"),
    }
  } else {
    log_info!("Skipping git initialization (--no-git)");
  }

  for line in texts::summary::done_lines(
    &opts.project_name,
    &used.to_string(),
    opts.package_manager,
    opts.install,
  ) {
    log_info!("{}", line);
  }
  Ok(())
}
