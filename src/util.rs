// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Small helpers: URL normalization, output directory preparation, man page rendering
// role: utilities/helpers
// inputs: URL text; output directory path; clap CommandFactory
// outputs: Slash-terminated URLs, directories ensured on disk, troff man page text
// side_effects: prepare_out_dir creates directories
// invariants:
// - with_trailing_slash is idempotent
// - prepare_out_dir succeeds only when the directory exists afterwards
// errors: IO errors bubble with the offending path in context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result};
use clap::CommandFactory;

/// Jenkins joins endpoints onto slash-terminated URLs; listings are inconsistent about the slash.
pub fn with_trailing_slash(s: &str) -> String {
  if s.ends_with('/') {
    s.to_string()
  } else {
    format!("{}/", s)
  }
}

/// Ensure the output directory exists before the workbook is written into it.
pub fn prepare_out_dir(dir: &Path) -> Result<()> {
  std::fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
