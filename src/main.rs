use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use tokio::runtime::Runtime;

use log_shipper::cli::{Args, Commands};
use log_shipper::cloud::s3::S3Connector;
use log_shipper::config::write_config_template;
use log_shipper::diagnostics::LogRecorder;
use log_shipper::uploader::{EngineStatus, UploadEngine};

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose, args.log_file.as_deref())?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd);
    }

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(run_agent(&args))
}

/// Initialize logging to the terminal and, optionally, a log file
fn initialize_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .context(format!("Failed to open log file {}", path.display()))?;
        loggers.push(WriteLogger::new(log_level, Config::default(), file));
    }

    CombinedLogger::init(loggers).context("Failed to initialize logger")?;
    Ok(())
}

/// Handle subcommands (init-config)
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                return Err(anyhow!("{} already exists, use --force to overwrite", path.display()));
            }
            info!("Creating configuration template at {}", path.display());
            write_config_template(path)?;
            Ok(())
        }
    }
}

/// Run the upload engine until a shutdown signal arrives
async fn run_agent(args: &Args) -> Result<()> {
    let mut engine = UploadEngine::new(&args.config, Arc::new(S3Connector), Arc::new(LogRecorder::new()));
    if let Some(dir) = &args.watch_dir {
        engine = engine.with_watch_directory(dir);
    }

    engine.start();
    if engine.status() != EngineStatus::Running {
        return Err(anyhow!(
            "Upload engine did not start; fix {} and restart the agent",
            engine.config_path().display()
        ));
    }

    wait_for_shutdown().await?;
    info!("Shutdown requested");

    engine.stop();
    engine.wait().await;

    info!("Log shipper stopped");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("Failed to listen for Ctrl+C")?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl+C")
}
