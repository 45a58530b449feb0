use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use nbrunner_config::BatchConfig;
use nbrunner_engine::{KernelCommand, ProcessEngine};
use nbrunner_runner::{DEFAULT_CONFIG_ENV_KEY, NotebookRunner, Reporter, RunnerConfig};
use nbrunner_settings::{
  DotenvSource, EnvSource, FailFast, KgProjectNotebookSettings, MissingValueResolver,
  NotebookSettings, ProjectNotebookSettings, Prompt,
};

/// nbrunner - execute a batch of notebooks, each with its own config file
#[derive(Parser)]
#[command(name = "nbrunner")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run every notebook listed in a batch config
  Run {
    /// Path to the batch config (YAML, or JSON by extension)
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Directory executed notebooks are written to
    #[arg(long, default_value = "out")]
    output_dir: PathBuf,

    /// Per-cell timeout in seconds
    #[arg(long, default_value_t = 600)]
    timeout: u64,

    /// Python interpreter that hosts each run's cells
    #[arg(long, default_value = "python3")]
    kernel: String,

    /// Extra interpreter arguments, placed before the driver program
    #[arg(long = "kernel-arg", allow_hyphen_values = true)]
    kernel_args: Vec<String>,

    /// Environment variable that carries the per-run config path
    #[arg(long, default_value = DEFAULT_CONFIG_ENV_KEY)]
    env_key: String,
  },

  /// Resolve notebook settings and print them as JSON
  Settings {
    #[arg(long, value_enum, default_value_t = Scope::Kg)]
    scope: Scope,

    /// Fail on missing values instead of asking for them
    #[arg(long)]
    no_prompt: bool,
  },
}

#[derive(Clone, Copy, ValueEnum)]
enum Scope {
  Base,
  Project,
  Kg,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  match cli.command {
    Some(Commands::Run {
      config,
      output_dir,
      timeout,
      kernel,
      kernel_args,
      env_key,
    }) => {
      let runner = NotebookRunner::new(
        ProcessEngine::new(KernelCommand::new(kernel, kernel_args)),
        RunnerConfig {
          config_env_key: env_key,
          cell_timeout: Duration::from_secs(timeout),
        },
      );
      run_batch(runner, config, output_dir)?;
    }
    Some(Commands::Settings { scope, no_prompt }) => {
      print_settings(scope, no_prompt)?;
    }
    None => {
      println!("nbrunner - use --help to see available commands");
    }
  }

  Ok(())
}

fn run_batch(runner: NotebookRunner<ProcessEngine>, config: PathBuf, output_dir: PathBuf) -> Result<()> {
  let rt = batch_runtime()?;
  rt.block_on(async { run_batch_async(runner, config, output_dir).await })
}

/// Runs bind the config env var, which must not race with other threads
/// reading the environment, so batches get a single-threaded runtime.
fn batch_runtime() -> std::io::Result<tokio::runtime::Runtime> {
  tokio::runtime::Builder::new_current_thread().enable_all().build()
}

async fn run_batch_async(
  runner: NotebookRunner<ProcessEngine>,
  config: PathBuf,
  output_dir: PathBuf,
) -> Result<()> {
  let batch = BatchConfig::load_resolved(&config)
    .with_context(|| format!("failed to load batch config: {}", config.display()))?;

  tracing::info!(config = %config.display(), runs = batch.len(), "loaded batch config");

  runner
    .run_batch(&batch.runs, &output_dir, &mut Reporter::stdout())
    .await
    .context("batch aborted")?;

  Ok(())
}

fn print_settings(scope: Scope, no_prompt: bool) -> Result<()> {
  let env = DotenvSource::discover().context("failed to load .env file")?;
  if let Some(path) = env.path() {
    tracing::info!(path = %path.display(), "loaded .env file");
  }

  let mut resolver: Box<dyn MissingValueResolver> = if no_prompt {
    Box::new(FailFast)
  } else {
    Box::new(Prompt::stdio())
  };

  let json = settings_json(scope, &env, resolver.as_mut())?;
  println!("{json}");
  Ok(())
}

fn settings_json(
  scope: Scope,
  env: &dyn EnvSource,
  resolver: &mut dyn MissingValueResolver,
) -> Result<String> {
  let json = match scope {
    Scope::Base => serde_json::to_string_pretty(&NotebookSettings::from_env(env))?,
    Scope::Project => {
      let settings = ProjectNotebookSettings::load(env, resolver).context("failed to resolve project settings")?;
      serde_json::to_string_pretty(&settings)?
    }
    Scope::Kg => {
      let settings =
        KgProjectNotebookSettings::load(env, resolver).context("failed to resolve knowledge graph settings")?;
      serde_json::to_string_pretty(&settings)?
    }
  };
  Ok(json)
}
