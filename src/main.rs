mod api;
mod app;
mod commands;
mod config;
mod event;
mod store;
mod ui;

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jokebox")]
#[command(about = "A terminal client for the Chuck Norris jokes API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/jokebox/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Fetch from this category instead of a random stored one
  #[arg(long)]
  category: Option<String>,
}

/// Send logs to a daily file under the data directory. The terminal itself
/// belongs to the UI, so nothing may write to stdout or stderr.
fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
  let log_dir = dirs::data_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join("jokebox")
    .join("logs");
  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let file_appender = tracing_appender::rolling::daily(log_dir, "jokebox.log");
  let (writer, guard) = tracing_appender::non_blocking(file_appender);

  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jokebox=info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_ansi(false)
    .with_target(false)
    .with_writer(writer)
    .init();

  Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Keep the guard alive so buffered log lines get flushed on exit
  let _guard = init_tracing()?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override the fetch category if specified on the command line
  let config = if let Some(category) = args.category {
    config::Config {
      default_category: Some(category),
      ..config
    }
  } else {
    config
  };

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
