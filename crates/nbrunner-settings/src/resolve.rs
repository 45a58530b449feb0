use std::io::{self, BufRead, Write};

use crate::error::SettingsError;
use crate::settings::Field;

/// Decides what happens when a required setting has no value.
pub trait MissingValueResolver {
  fn resolve(&mut self, field: &Field) -> Result<String, SettingsError>;
}

/// Refuse to guess. Used by anything that runs without an operator attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl MissingValueResolver for FailFast {
  fn resolve(&mut self, field: &Field) -> Result<String, SettingsError> {
    Err(field.missing())
  }
}

/// Ask for the value on an interactive stream.
pub struct Prompt<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
  /// Prompt on the process's stdin/stdout.
  pub fn stdio() -> Self {
    Self::new(io::stdin().lock(), io::stdout())
  }
}

impl<R: BufRead, W: Write> MissingValueResolver for Prompt<R, W> {
  fn resolve(&mut self, field: &Field) -> Result<String, SettingsError> {
    let io_err = |source| SettingsError::Prompt {
      field: field.name,
      source,
    };

    write!(self.output, "{}: ", field.prompt).map_err(io_err)?;
    self.output.flush().map_err(io_err)?;

    let mut line = String::new();
    self.input.read_line(&mut line).map_err(io_err)?;

    let value = line.trim();
    if value.is_empty() {
      return Err(field.missing());
    }
    Ok(value.to_string())
  }
}
