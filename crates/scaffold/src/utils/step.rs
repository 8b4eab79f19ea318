/// Result of one external step of the pipeline, classified by whether the
/// run may continue.
#[derive(Debug)]
pub enum StepOutcome {
  Done,
  /// The step failed but the run continues; carries a message for the user.
  Tolerated(String),
  Fatal(anyhow::Error),
}

impl StepOutcome {
  /// Turn a fatal outcome into an error and pass the rest through.
  pub fn into_result(self) -> anyhow::Result<Self> {
    match self {
      Self::Fatal(err) => Err(err),
      other => Ok(other),
    }
  }
}
