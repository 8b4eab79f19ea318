//! Common error messages used across the codebase.

// User aborts
pub(crate) const OPERATION_CANCELLED: &str = "Operation cancelled";

// Template fetching
pub(crate) fn fetch_failed(spec: impl std::fmt::Display) -> String {
  format!(
    "Failed to fetch template from '{spec}'. Make sure the repository and template path are correct and accessible."
  )
}

pub(crate) const FETCH_UNEXPECTED: &str = "Unexpected error while fetching the template";

// Dependency installation
pub(crate) fn install_failed(command: impl std::fmt::Display) -> String {
  format!("Failed to install dependencies. Run `{command}` manually inside the project.")
}

// Version control
pub(crate) const GIT_COMMIT_HINT: &str =
  "Set git user.name and user.email, then commit the initial files yourself.";
