use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schema_provisioner::{
    client::HttpMetadataService,
    config::Config,
    events::{CollectingEventSink, EventSink, ProvisioningEvent, TracingEventSink},
    mapping::Operation,
    models::Locale,
    orchestrator::{self, Provisioner, RunSummary},
    schema::ConfigurationSet,
    workbook,
};

#[derive(Parser)]
#[command(name = "schema-provisioner")]
#[command(version)]
#[command(about = "Create or remove schema metadata in bulk from a configuration workbook")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Metadata service URL (overrides config file)
    #[arg(short = 'u', long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level (overrides config file)
    #[arg(short = 'v', long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write an empty workbook describing every column
    Template {
        #[arg(default_value = "template.json")]
        out: PathBuf,
    },
    /// Create everything described by a workbook
    Import { workbook: PathBuf },
    /// Remove everything described by a workbook
    Remove { workbook: PathBuf },
    /// Map a workbook without contacting the service
    Validate {
        workbook: PathBuf,
        /// Validate for removal instead of creation
        #[arg(long)]
        remove: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from_file(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("schema_provisioner={}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting schema provisioner v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", cli.config);

    if let Err(e) = config.validate() {
        bail!("Invalid configuration: {}", e);
    }

    match cli.command {
        Command::Template { out } => {
            workbook::write(&out, &workbook::export_template()).await?;
        }
        Command::Import { workbook } => {
            let set = load_workbook(&workbook, &TracingEventSink).await?;
            let service = HttpMetadataService::new(&config.service)?;
            let summary = Provisioner::new(&service, &TracingEventSink, &config)
                .create(&set)
                .await?;
            report(&summary);
        }
        Command::Remove { workbook } => {
            let set = load_workbook(&workbook, &TracingEventSink).await?;
            let service = HttpMetadataService::new(&config.service)?;
            let summary = Provisioner::new(&service, &TracingEventSink, &config)
                .remove(&set)
                .await?;
            report(&summary);
        }
        Command::Validate { workbook, remove } => {
            let events = CollectingEventSink::new();
            let set = load_workbook(&workbook, &events).await?;
            let operation = if remove {
                Operation::Delete
            } else {
                Operation::Create
            };
            let mapped = orchestrator::validate(
                &set,
                operation,
                Locale(config.service.fallback_locale),
                &events,
            );

            let errors = events.errors();
            for event in events.events() {
                TracingEventSink.emit(event);
            }
            info!("{} of {} rows mapped cleanly", mapped, set.row_count());
            if !errors.is_empty() {
                bail!("{} problems found in {}", errors.len(), workbook.display());
            }
        }
    }

    Ok(())
}

async fn load_workbook(path: &std::path::Path, events: &dyn EventSink) -> Result<ConfigurationSet> {
    let contents = workbook::read(path).await?;
    let (set, errors) = workbook::import(&contents);
    for err in errors {
        events.emit(ProvisioningEvent::Error(err.to_string()));
    }
    info!("{} rows to process", set.row_count());
    Ok(set)
}

fn report(summary: &RunSummary) {
    if summary.faults > 0 {
        warn!(
            "Finished with {} successful changes and {} failures",
            summary.succeeded, summary.faults
        );
    } else {
        info!("Finished with {} successful changes", summary.succeeded);
    }
    if !summary.published {
        info!("Customizations were not published");
    }
}
