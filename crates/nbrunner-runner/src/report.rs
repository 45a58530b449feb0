//! Console report for a batch.

use std::io::{self, Write};
use std::path::Path;

use nbrunner_config::RunSpec;

use crate::outcome::BatchSummary;
use crate::run_id::RunId;

/// Width of the separator line framing the summary.
pub const SEPARATOR_WIDTH: usize = 80;

/// Writes the human-readable batch report.
pub struct Reporter<W> {
  out: W,
}

impl Reporter<io::Stdout> {
  pub fn stdout() -> Self {
    Self::new(io::stdout())
  }
}

impl<W: Write> Reporter<W> {
  pub fn new(out: W) -> Self {
    Self { out }
  }

  pub fn run_started(&mut self, run_id: &RunId, spec: &RunSpec) -> io::Result<()> {
    writeln!(self.out, "run_id={}, cfg={}", run_id, spec)
  }

  pub fn run_failed(&mut self, run_id: &RunId, output_path: &Path) -> io::Result<()> {
    writeln!(
      self.out,
      "=> Error during {}; check {} for traceback",
      run_id,
      output_path.display()
    )
  }

  pub fn summary(&mut self, summary: &BatchSummary) -> io::Result<()> {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    writeln!(self.out, "{}", separator)?;
    writeln!(self.out, "{}", summary)?;
    writeln!(self.out, "{}", separator)?;
    self.out.flush()
  }

  pub fn into_inner(self) -> W {
    self.out
  }
}
