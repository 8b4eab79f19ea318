use owo_colors::OwoColorize as _;

use crate::utils::package_manager::PackageManager;

fn highlight_cmd(cmd: &str) -> String {
  format!("{}", cmd.bright_cyan().bold())
}

/// Quote a directory argument for the `cd` hint when it contains whitespace.
fn shell_arg(dir: &str) -> String {
  if dir.chars().any(char::is_whitespace) {
    format!("\"{dir}\"")
  } else {
    dir.to_string()
  }
}

/// Literal commands the user runs next, in order.
#[must_use]
pub fn next_step_commands(dir: &str, pm: PackageManager, installed: bool) -> Vec<String> {
  let mut steps = vec![format!("cd {}", shell_arg(dir))];
  if !installed {
    steps.push(format!("{} install", pm.program()));
  }
  steps.push(pm.run_script("dev"));
  steps
}

pub fn done_lines(dir: &str, source: &str, pm: PackageManager, installed: bool) -> Vec<String> {
  let mut lines = vec![
    String::new(),
    format!(
      "{} Project created from {}.",
      "Done!".bright_green().bold(),
      source.bright_magenta()
    ),
    String::new(),
    "Next steps:".bright_cyan().bold().to_string(),
  ];
  for cmd in next_step_commands(dir, pm, installed) {
    lines.push(format!("  {}", highlight_cmd(&cmd)));
  }
  lines.push(String::new());
  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn suggests_install_when_skipped() {
    let steps = next_step_commands("my-app", PackageManager::Npm, false);
    assert_eq!(steps, vec!["cd my-app", "npm install", "npm run dev"]);
  }

  #[test]
  fn omits_install_when_done() {
    let steps = next_step_commands("my-app", PackageManager::Pnpm, true);
    assert_eq!(steps, vec!["cd my-app", "pnpm dev"]);
  }

  #[test]
  fn quotes_directories_with_spaces() {
    let steps = next_step_commands("My App", PackageManager::Yarn, true);
    assert_eq!(steps[0], "cd \"My App\"");
  }

  #[test]
  fn done_lines_mention_source() {
    let lines = done_lines("app", "acme/site/template", PackageManager::Npm, false);
    assert!(lines.iter().any(|l| l.contains("acme/site/template")));
    assert!(lines.iter().any(|l| l.contains("npm install")));
  }
}
