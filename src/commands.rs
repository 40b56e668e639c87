//! Command implementations for the explorer CLI
//!
//! Loads the dataset once, then either prints a one-shot report or runs an
//! interactive JSON-lines session against a single controller.

use crate::cli::{Args, Command, OutputFormat};
use crate::config::ExplorerConfig;
use crate::controller::{InteractionController, SelectionEvent, ViewUpdate};
use crate::loader::load_dataset;
use crate::models::{DerivedStatistics, LoadReport, StationAggregate};
use crate::projector::MapProjector;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Main command runner
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let command = args.command.clone().unwrap_or(Command::Summary);
    let config = args.to_config().context("Invalid configuration")?;
    let store = Arc::new(load_store(&config).await?);
    let projector = MapProjector::new(config.map.clone());

    match command {
        Command::Summary => {
            let update = InteractionController::new(store.clone(), projector).render();
            report_update(args.format, &update, Some(store.load_report()))
        }
        Command::Select { station } => {
            let mut controller = InteractionController::new(store, projector);
            let update = controller.handle(SelectionEvent::Select(station));
            report_update(args.format, &update, None)
        }
        Command::Stations { top } => {
            let mut ranked = store.base_counts().ranked();
            if let Some(top) = top {
                ranked.truncate(top);
            }
            report_stations(args.format, &ranked)
        }
        Command::Session => run_session(store, projector).await,
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lostfound_explorer={}", log_level)));

    // Logs go to stderr so stdout stays clean for JSON output
    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load the dataset off the async runtime
async fn load_store(config: &ExplorerConfig) -> Result<RecordStore> {
    info!("Loading dataset from {}", config.dataset.path.display());

    let dataset = config.dataset.clone();
    let store = tokio::task::spawn_blocking(move || load_dataset(&dataset))
        .await
        .context("Dataset loading task failed")?
        .with_context(|| {
            format!(
                "Failed to load dataset {}",
                config.dataset.path.display()
            )
        })?;

    Ok(store)
}

/// Feed stdin selection events through one controller
///
/// Writes the initial unfiltered view first, then one update per event.
/// Lines that fail to parse are logged and skipped.
async fn run_session(store: Arc<RecordStore>, projector: MapProjector) -> Result<()> {
    let mut controller = InteractionController::new(store, projector);
    let mut stdout = tokio::io::stdout();

    write_json_line(&mut stdout, &controller.render()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut handled = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read selection event")?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match controller.handle_json(line) {
            Ok(update) => {
                write_json_line(&mut stdout, &update).await?;
                handled += 1;
            }
            Err(e) => warn!("Skipping malformed event {:?}: {}", line, e),
        }
    }

    info!("Session ended after {} events", handled);
    Ok(())
}

async fn write_json_line<W, T>(writer: &mut W, value: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut bytes = serde_json::to_vec(value).context("Failed to serialize view update")?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

fn report_update(
    format: OutputFormat,
    update: &ViewUpdate,
    load_report: Option<&LoadReport>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(update)?);
        }
        OutputFormat::Table => {
            let heading = match update.state.station() {
                Some(station) => format!("Lost and Found Records: {}", station),
                None => "Lost and Found Records".to_string(),
            };
            println!("{}", heading.bright_green().bold());
            print_statistics(&update.statistics);

            println!("\n{}", "Map".bright_green().bold());
            println!(
                "  {} {}",
                "Stations plotted:".bright_cyan(),
                update.figure.points.len().to_string().bright_white()
            );
            if update.figure.unplaced_stations > 0 {
                println!(
                    "  {} {}",
                    "Stations without coordinates:".bright_yellow(),
                    update.figure.unplaced_stations
                );
            }
            if let Some(center) = update.figure.center {
                println!(
                    "  {} {:.4}, {:.4} (zoom {})",
                    "Center:".bright_cyan(),
                    center.latitude,
                    center.longitude,
                    update.figure.zoom
                );
            }

            if let Some(report) = load_report.filter(|r| !r.is_clean()) {
                print_load_report(report);
            }
        }
    }
    Ok(())
}

fn print_statistics(stats: &DerivedStatistics) {
    println!(
        "  {} {}",
        "Total records:".bright_cyan(),
        stats.record_count.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Unique stations:".bright_cyan(),
        stats.unique_station_count.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Unique item types:".bright_cyan(),
        stats.unique_item_type_count.to_string().bright_white()
    );

    let earliest = stats
        .earliest_record_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("  {} {}", "Earliest record:".bright_cyan(), earliest);

    let busiest = stats
        .busiest_station
        .as_ref()
        .map(|b| format!("{} ({})", b.station_name, b.count))
        .unwrap_or_else(|| "-".to_string());
    println!("  {} {}", "Busiest station:".bright_cyan(), busiest);
}

fn print_load_report(report: &LoadReport) {
    println!("\n{}", "Data quality".bright_yellow().bold());
    println!(
        "  {} {} of {} rows",
        "Missing station:".bright_yellow(),
        report.missing_station,
        report.total_rows
    );
    println!(
        "  {} {}",
        "Missing item type:".bright_yellow(),
        report.missing_item_type
    );
    println!(
        "  {} {}",
        "Invalid coordinates:".bright_yellow(),
        report.invalid_coordinates
    );
    println!(
        "  {} {}",
        "Invalid timestamps:".bright_yellow(),
        report.invalid_timestamp
    );
}

fn report_stations(format: OutputFormat, ranked: &[StationAggregate]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(ranked)?);
        }
        OutputFormat::Table => {
            println!("{}", "Stations by record count".bright_green().bold());
            let width = ranked.len().to_string().len();
            for (i, station) in ranked.iter().enumerate() {
                println!(
                    "  {:>width$}. {} {}",
                    (i + 1).to_string().bright_yellow(),
                    station.station_name.bright_cyan(),
                    format!("({})", station.count).bright_black(),
                    width = width
                );
            }
        }
    }
    Ok(())
}
