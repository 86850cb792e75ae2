//! Shiftwatch CLI
//!
//! Local execution entry point: one-shot fetches, background checks, and the
//! poll loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use shiftwatch::{
    error::{AppError, Result},
    models::{Config, ScheduleEvent, Strategy},
    pipeline::{
        self, ChangeDetector, DateLabelDetector, FingerprintDetector, PollLoop, ScheduleMonitor,
    },
    services::{FanoutSink, HttpFetcher, LogSink, NotificationSink, NtfySink, ScheduleParser},
    storage::{EMPLOYEE_ID_KEY, KeyValueStore, LocalStore},
};

/// Shiftwatch - Daily Schedule Watcher
#[derive(Parser, Debug)]
#[command(
    name = "shiftwatch",
    version,
    about = "Watches a published daily work schedule for changes"
)]
struct Cli {
    /// Path to config file (default: {storage_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding config and persisted state
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Employee ID sent as the request credential
    #[arg(long, env = "SCHEDULING_EMP_ID", hide_env_values = true)]
    employee_id: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Persist the employee ID for later runs
    SetId { id: String },

    /// Fetch and print today's schedule
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Parse a saved schedule page
    Parse {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Run one date-label check and notify on change
    Check,

    /// Poll until interrupted, notifying on every change
    Watch {
        /// Seconds between polls (default: [poll] interval_secs)
        #[arg(long)]
        interval: Option<u64>,

        /// fingerprint | date-label (default: [poll] strategy)
        #[arg(long)]
        strategy: Option<Strategy>,
    },

    /// Validate configuration
    Validate {
        /// Print the effective configuration as TOML
        #[arg(long)]
        print: bool,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Log sink plus the configured push endpoint, if any.
fn build_sink(config: &Config) -> Result<Arc<dyn NotificationSink>> {
    let mut sink = FanoutSink::new(vec![Arc::new(LogSink)]);
    if let Some(url) = &config.notify.ntfy_url {
        sink.push(Arc::new(NtfySink::new(url.clone())?));
    }
    Ok(Arc::new(sink))
}

fn print_event(event: &ScheduleEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(event)?);
        return Ok(());
    }
    match event {
        ScheduleEvent::Loaded(document) => println!("{}", document),
        ScheduleEvent::Failed { .. } => println!("{}", event.notification().body),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let storage_dir = cli
        .storage_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("storage"));
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| storage_dir.join("config.toml"));
    let mut config = Config::load_or_default(&config_path);
    if let Some(dir) = &cli.storage_dir {
        config.storage.dir = dir.clone();
    }
    log::debug!("Using state directory {}", config.storage.dir.display());

    let store: Arc<dyn KeyValueStore> = Arc::new(LocalStore::new(&config.storage.dir));
    let explicit_id = cli.employee_id.as_deref();

    match cli.command {
        Command::SetId { id } => {
            let id = id.trim();
            if id.is_empty() {
                return Err(AppError::validation("employee ID is empty"));
            }
            store.set(EMPLOYEE_ID_KEY, id).await?;
            log::info!("Employee ID saved");
        }

        Command::Show { json } => {
            let employee_id = pipeline::resolve_employee_id(store.as_ref(), explicit_id).await?;
            let fetcher = HttpFetcher::new(&config.fetcher, &employee_id)?;
            let parser = ScheduleParser::new(&config.markup)?;

            let event = pipeline::fetch_schedule(&fetcher, &parser).await;
            print_event(&event, json)?;
            if event.document().is_none() {
                std::process::exit(1);
            }
        }

        Command::Parse { file, json } => {
            let html = tokio::fs::read_to_string(&file).await?;
            let parser = ScheduleParser::new(&config.markup)?;
            let document = parser.parse(&html)?;
            print_event(&ScheduleEvent::Loaded(document), json)?;
        }

        Command::Check => {
            let sink = build_sink(&config)?;
            let detection =
                pipeline::run_check(&config, Arc::clone(&store), sink.as_ref(), explicit_id)
                    .await?;
            log::debug!("Check result: {:?}", detection);
        }

        Command::Watch { interval, strategy } => {
            let employee_id = pipeline::resolve_employee_id(store.as_ref(), explicit_id).await?;
            let fetcher = Arc::new(HttpFetcher::new(&config.fetcher, &employee_id)?);
            let parser = Arc::new(ScheduleParser::new(&config.markup)?);

            let detector: Box<dyn ChangeDetector> =
                match strategy.unwrap_or(config.poll.strategy) {
                    Strategy::Fingerprint => Box::new(FingerprintDetector::new()),
                    Strategy::DateLabel => Box::new(DateLabelDetector::new(Arc::clone(&store))),
                };
            log::info!("Watching {} ({} strategy)", fetcher.url(), detector.name());

            let monitor = ScheduleMonitor::new(fetcher, parser, detector, build_sink(&config)?)
                .with_failure_reports(config.poll.report_failures);
            let mut poll = PollLoop::new(monitor);
            poll.start(Duration::from_secs(
                interval.unwrap_or(config.poll.interval_secs),
            ))?;

            tokio::signal::ctrl_c().await?;
            log::info!("Interrupted, stopping...");
            poll.stop().await?;
        }

        Command::Validate { print } => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (fetcher, poll, notify, and markup selectors)");

            if print {
                print!("{}", config.to_toml()?);
            }
        }
    }

    Ok(())
}
