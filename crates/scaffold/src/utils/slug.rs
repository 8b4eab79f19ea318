/// Derive a package-manifest safe slug from a project name.
///
/// Lowercases the input, maps whitespace and anything outside
/// `[a-z0-9-_.]` to `-`, collapses runs of `-` and trims `-` from both ends.
#[must_use]
pub fn slugify(input: &str) -> String {
  let lowered = input.to_lowercase();
  let mut out = String::with_capacity(lowered.len());
  for ch in lowered.chars() {
    let keep = ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '.');
    if keep {
      out.push(ch);
    } else if !out.ends_with('-') {
      out.push('-');
    }
  }
  out.trim_matches('-').to_string()
}
