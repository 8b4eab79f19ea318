use std::io::{self, BufRead, IsTerminal as _, Write};

use anyhow::{Context, Result, anyhow, bail};
use inquire::error::InquireError;
use inquire::{Confirm, Text};
use owo_colors::OwoColorize as _;

use crate::{log_info, log_warn};

/// Outcome of an interactive prompt. Cancelling (Esc, Ctrl-C or a closed
/// stdin) is a regular outcome the caller has to handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer<T> {
  Value(T),
  Cancelled,
}

impl<T> Answer<T> {
  /// Unwrap the answer or fail with `abort_message` when cancelled.
  pub fn or_abort(self, abort_message: &str) -> Result<T> {
    match self {
      Answer::Value(value) => Ok(value),
      Answer::Cancelled => bail!("{abort_message}"),
    }
  }
}

/// Shared helpers for interactive prompts.
#[derive(Clone, Debug)]
pub struct Wizard {
  is_tty: bool,
}

impl Default for Wizard {
  fn default() -> Self {
    Self::new()
  }
}

impl Wizard {
  #[must_use]
  pub fn new() -> Self {
    let stdin_tty = io::stdin().is_terminal();
    let stdout_tty = io::stdout().is_terminal();
    Self {
      is_tty: stdin_tty && stdout_tty,
    }
  }

  /// Ask for the project name until a non-empty value is given.
  pub fn project_name(&self, default: &str) -> Result<Answer<String>> {
    loop {
      match self.text("Project name:", default)? {
        Answer::Value(name) if name.is_empty() => {
          log_warn!("Project name cannot be empty");
        }
        answer => return Ok(answer),
      }
    }
  }

  /// Prompt for textual input with a default value and trimming applied.
  pub fn text(&self, prompt: &str, default: &str) -> Result<Answer<String>> {
    if self.is_tty {
      let result = Text::new(prompt).with_default(default).prompt();
      return map_inquire(result).map(|answer| match answer {
        Answer::Value(ans) => Answer::Value(ans.trim().to_string()),
        Answer::Cancelled => Answer::Cancelled,
      });
    }
    Self::fallback_text(prompt, default)
  }

  /// Prompt for a yes/no confirmation.
  pub fn confirm(&self, prompt: &str, default: bool) -> Result<Answer<bool>> {
    if self.is_tty {
      return map_inquire(Confirm::new(prompt).with_default(default).prompt());
    }
    Self::fallback_confirm(prompt, default)
  }

  fn fallback_text(prompt: &str, default: &str) -> Result<Answer<String>> {
    if default.is_empty() {
      log_info!("{}", prompt);
    } else {
      log_info!("{} [{}]", prompt, default);
    }
    print_cursor();

    let Some(input) = read_line()? else {
      return Ok(Answer::Cancelled);
    };
    let trimmed = input.trim();
    if trimmed.is_empty() {
      return Ok(Answer::Value(default.to_string()));
    }
    Ok(Answer::Value(trimmed.to_string()))
  }

  fn fallback_confirm(prompt: &str, default: bool) -> Result<Answer<bool>> {
    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    log_info!("{} {}", prompt, suffix);
    print_cursor();

    let Some(input) = read_line()? else {
      return Ok(Answer::Cancelled);
    };
    let trimmed = input.trim();
    if trimmed.is_empty() {
      return Ok(Answer::Value(default));
    }
    let first = trimmed.chars().next().unwrap_or_default();
    Ok(Answer::Value(matches!(first, 'y' | 'Y')))
  }
}

fn map_inquire<T>(result: Result<T, InquireError>) -> Result<Answer<T>> {
  match result {
    Ok(value) => Ok(Answer::Value(value)),
    Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
      Ok(Answer::Cancelled)
    }
    Err(err) => Err(anyhow!(err)),
  }
}

fn print_cursor() {
  anstream::print!("{}", "-> ".bright_cyan());
  io::stdout().flush().ok();
}

/// Read a single line from stdin. Returns `None` when stdin is closed
/// before anything was read.
fn read_line() -> Result<Option<String>> {
  read_line_from(&mut io::stdin().lock())
}

fn read_line_from(reader: &mut impl BufRead) -> Result<Option<String>> {
  let mut bytes = Vec::new();
  let read = reader
    .read_until(b'\n', &mut bytes)
    .context("failed to read from stdin")?;
  if read == 0 {
    return Ok(None);
  }
  while matches!(bytes.last(), Some(b'\n' | b'\r')) {
    bytes.pop();
  }
  let line = String::from_utf8(bytes).context("input is not valid UTF-8")?;
  Ok(Some(line))
}
