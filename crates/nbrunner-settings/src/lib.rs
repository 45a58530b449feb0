//! nbrunner Settings
//!
//! Typed configuration that notebooks pull in at start-up. Values come from
//! environment variables sharing the [`ENV_PREFIX`] namespace, optionally
//! backed by a discovered `.env` file.
//!
//! Construction is two-phase. Settings are read from an [`EnvSource`]; any
//! required field that is unset is handed to a [`MissingValueResolver`], and
//! the caller decides what that means:
//!
//! ```ignore
//! // batch: never block on input
//! let settings = ProjectNotebookSettings::from_env(&ProcessEnv)?;
//!
//! // interactive: ask the operator
//! let env = DotenvSource::discover()?;
//! let settings = KgProjectNotebookSettings::load(&env, &mut Prompt::stdio())?;
//! ```

mod env;
mod error;
mod resolve;
mod settings;

pub use env::{DotenvSource, EnvSource, ProcessEnv};
pub use error::SettingsError;
pub use resolve::{FailFast, MissingValueResolver, Prompt};
pub use settings::{Field, KgProjectNotebookSettings, NotebookSettings, ProjectNotebookSettings};

/// Prefix shared by every settings environment variable.
pub const ENV_PREFIX: &str = "DS_BK_";
