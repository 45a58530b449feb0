//! nbrunner Config
//!
//! This crate contains the serializable batch configuration for nbrunner.
//! A batch is an ordered list of run specifications, each pairing a notebook
//! with the config/credentials file that notebook should see while it runs.
//!
//! Configuration can be loaded from:
//! - YAML files (the default, e.g. `config.yaml`)
//! - JSON files (any path ending in `.json`)
//!
//! ```yaml
//! - path: notebooks/ingest.ipynb
//!   ds_config: creds/dev.yaml
//! - path: notebooks/report.ipynb
//!   ds_config: creds/prod.yaml
//! ```

mod batch;
mod error;
mod run;

pub use batch::BatchConfig;
pub use error::ConfigError;
pub use run::RunSpec;
