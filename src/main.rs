use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use logsift_store::{
    MemoryStore, SortOrder, clear_by_request, find_by_demand, load_records,
};
use logsift_types::{
    ClearRequest, DateRangePreset, Demand, LogLevel, LogRecord, TIMESTAMP_FORMAT,
};

mod config;

use config::Config;

/// Logsift - search and prune structured application logs
#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSONL log file to search (overrides the config file)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Severity levels to include (repeatable)
    #[arg(long = "level", value_name = "LEVEL")]
    levels: Vec<String>,

    /// Execution-context tags to include (repeatable)
    #[arg(long = "mode", value_name = "MODE")]
    modes: Vec<String>,

    /// Channels to include (repeatable)
    #[arg(long = "channel", value_name = "CHANNEL")]
    channels: Vec<String>,

    /// Exact request id to match
    #[arg(long, value_name = "ID")]
    request_id: Option<String>,

    /// Acting user as a MODE_ID selector, e.g. BE_12
    #[arg(long, value_name = "USER")]
    user: Option<String>,

    /// Time window: a range code 1-7 or one of this-week, last-week,
    /// last-7-days, this-month, last-month, last-31-days, custom
    #[arg(long, value_name = "RANGE")]
    range: Option<String>,

    /// Lower bound for --range custom (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// Upper bound for --range custom
    #[arg(long, value_name = "DATE")]
    to: Option<String>,

    /// Print oldest entries first instead of newest first
    #[arg(long)]
    ascending: bool,

    /// Maximum number of rows to print
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Empty the log file instead of searching it
    #[arg(long)]
    clear: bool,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(args.config.as_deref())?;
    let file = args
        .file
        .clone()
        .or_else(|| config.log_file.clone())
        .context("no log file given (pass FILE or set log_file in the config)")?;

    let store = MemoryStore::from_records(load_records(&file)?);

    if args.clear {
        let count = store.len();
        if clear_by_request(&store, &ClearRequest::all())? {
            std::fs::write(&file, "")
                .with_context(|| format!("failed to truncate {}", file.display()))?;
            println!("cleared {} log records from {}", count, file.display());
        }
        return Ok(());
    }

    let demand = demand_from_args(&args)?;
    // One snapshot of "now" for the whole resolution
    let now = Local::now().naive_local();

    let order = if args.ascending {
        SortOrder::Ascending
    } else {
        SortOrder::default()
    };
    let rows = find_by_demand(&store, &demand, now, order)?;

    for record in rows.iter().take(effective_limit(&args, &config)) {
        print_record(record);
    }

    Ok(())
}

/// Build the search demand from command-line flags
fn demand_from_args(args: &Args) -> Result<Demand> {
    let mut demand = Demand::new();

    if !args.levels.is_empty() {
        let levels = args
            .levels
            .iter()
            .map(|raw| {
                LogLevel::parse(raw).with_context(|| format!("unknown log level '{raw}'"))
            })
            .collect::<Result<BTreeSet<_>>>()?;
        demand = demand.with_levels(levels);
    }
    if !args.modes.is_empty() {
        demand = demand.with_modes(args.modes.iter().cloned().collect());
    }
    if !args.channels.is_empty() {
        demand = demand.with_channels(args.channels.iter().cloned().collect());
    }
    if let Some(request_id) = &args.request_id {
        demand = demand.with_request_id(request_id);
    }
    if let Some(user) = &args.user {
        demand = demand.with_actor(user);
    }
    if let Some(raw) = &args.range {
        if let Some(preset) = parse_range(raw)? {
            demand = demand.with_date_range(preset);
        }
    }
    if let Some(from) = &args.from {
        demand = demand.with_date_start(from);
    }
    if let Some(to) = &args.to {
        demand = demand.with_date_end(to);
    }

    Ok(demand)
}

/// Parse a `--range` value
///
/// Numeric codes outside 1-7 select no window, matching the store core's
/// treatment of unknown codes; unknown names are rejected as typos.
fn parse_range(raw: &str) -> Result<Option<DateRangePreset>> {
    if let Ok(code) = raw.parse::<u8>() {
        let preset = DateRangePreset::from_code(code);
        if preset.is_none() {
            tracing::warn!(code, "unknown date range code, showing all dates");
        }
        return Ok(preset);
    }
    let preset = match raw {
        "this-week" => DateRangePreset::ThisWeek,
        "last-week" => DateRangePreset::LastWeek,
        "last-7-days" => DateRangePreset::Last7Days,
        "this-month" => DateRangePreset::ThisMonth,
        "last-month" => DateRangePreset::LastMonth,
        "last-31-days" => DateRangePreset::Last31Days,
        "custom" => DateRangePreset::Custom,
        _ => anyhow::bail!("unknown date range '{raw}'"),
    };
    Ok(Some(preset))
}

/// Row cap: CLI flag wins over the config file; no cap when neither is set
fn effective_limit(args: &Args, config: &Config) -> usize {
    args.limit.or(config.limit).unwrap_or(usize::MAX)
}

fn print_record(record: &LogRecord) {
    println!(
        "{} [{:<9}] {} {} {} user={} {}",
        record.datetime.format(TIMESTAMP_FORMAT),
        record.level.as_str(),
        record.mode,
        record.channel,
        record.request_id,
        record.user_id,
        record.message
    );
}
