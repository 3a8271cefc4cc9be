//! CLI entrypoint for Chamber Vote
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod app;

use anyhow::{Context, Result};
use app::App;
use chamber_application::{AuditLog, ChamberStore, CompositeNotificationBus, NotificationBus};
use chamber_infrastructure::{
    BroadcastNotificationBus, ConfigLoader, FileConfig, FileOutputFormat, InMemoryAuditLog,
    InMemoryChamberStore, JsonlAuditLog, TracingNotificationBus,
};
use chamber_presentation::{Cli, OutputFormat, configure_color, formatter_for};
use clap::{CommandFactory, Parser};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // Load configuration before logging so [logging] can take effect
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting Chamber Vote");

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let format = cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Text) | None => OutputFormat::Text,
    });
    configure_color(config.output.color && format == OutputFormat::Text);

    // === Dependency Injection ===
    let store = Arc::new(open_store(&config)?);
    for member in config.roster() {
        store.upsert_member(member).await?;
    }

    let app = App::new(
        store,
        open_audit_log(&config),
        notification_bus(&config),
        formatter_for(format),
        cli.acting_as,
    );

    let output = app.run(command).await?;
    print!("{}", output);

    Ok(())
}

/// Initialize logging based on verbosity level, optionally teeing to a file
fn init_logging(verbose: u8, file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let Some(file) = file else {
        tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(console)
            .init();
        return Ok(None);
    };

    let path = Path::new(file);
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", file))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Could not create log directory {}", directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        directory, file_name,
    ));
    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(console)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

fn open_store(config: &FileConfig) -> Result<InMemoryChamberStore> {
    match &config.storage.snapshot_path {
        Some(path) => Ok(InMemoryChamberStore::open_snapshot(path)?),
        None => {
            warn!("No storage.snapshot_path configured; state lasts for this run only");
            Ok(InMemoryChamberStore::new())
        }
    }
}

fn open_audit_log(config: &FileConfig) -> Arc<dyn AuditLog> {
    if let Some(path) = &config.storage.audit_log_path {
        if let Some(log) = JsonlAuditLog::new(path) {
            return Arc::new(log);
        }
        warn!("Falling back to an in-memory audit log");
    }
    Arc::new(InMemoryAuditLog::new())
}

fn notification_bus(config: &FileConfig) -> Arc<dyn NotificationBus> {
    let mut delegates: Vec<Arc<dyn NotificationBus>> = Vec::new();
    // A one-shot CLI run has no subscribers, so the channel drops every event here;
    // hosts embedding the library subscribe through BroadcastNotificationBus::subscribe
    delegates.push(Arc::new(BroadcastNotificationBus::new(
        config.notifications.channel_capacity,
    )));
    if config.notifications.trace_events {
        delegates.push(Arc::new(TracingNotificationBus));
    }
    Arc::new(CompositeNotificationBus::new(delegates))
}
