//! Subscription Dashboard: command-line view over the synthetic
//! subscription analytics pipeline.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use subscription_core::config::AppConfig;
use subscription_core::types::parse_date;
use subscription_core::{PlanFilter, PlatformFilter};
use subscription_reporting::export::{export, export_file_name};
use subscription_reporting::{
    Dataset, ExportFormat, FilterRequest, RangePreset, RawTableState, SortDirection, SortField,
    SubscriptionDashboard, TableSort,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "subscription-dashboard")]
#[command(about = "Subscription analytics over a deterministic synthetic dataset")]
#[command(version)]
struct Cli {
    /// Generator seed (overrides config)
    #[arg(long, env = "SUBSCRIPTION_ANALYTICS__GENERATOR__SEED", global = true)]
    seed: Option<u64>,

    /// Number of generated days (overrides config)
    #[arg(long, env = "SUBSCRIPTION_ANALYTICS__GENERATOR__DAYS", global = true)]
    days: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the first and last available dates
    Range,

    /// KPIs, trend series, and breakdowns for a selection
    Overview(FilterArgs),

    /// Per-date trend series for a selection
    Chart(FilterArgs),

    /// One page of the raw record table
    Raw {
        #[command(flatten)]
        sort: SortArgs,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Export records as CSV or JSON, in table sort order
    Export {
        /// csv or json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// Output file (default: stdout); a directory gets the standard file name
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        sort: SortArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug)]
struct SortArgs {
    /// Column to sort by, e.g. date, mrr, planType
    #[arg(long, default_value = "date")]
    sort_by: SortField,

    /// Sort ascending instead of descending
    #[arg(long, default_value_t = false)]
    asc: bool,
}

impl SortArgs {
    fn table_sort(&self) -> TableSort {
        TableSort {
            field: self.sort_by,
            direction: if self.asc {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
        }
    }
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Start date, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// End date, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,

    /// ios, android, or all
    #[arg(long)]
    platform: Option<PlatformFilter>,

    /// monthly, yearly, or all
    #[arg(long)]
    plan: Option<PlanFilter>,

    /// Quick range ending at the latest date: 7d, 30d, 90d, 1y
    #[arg(long, conflicts_with_all = ["start", "end"])]
    preset: Option<RangePreset>,
}

impl FilterArgs {
    fn request(&self) -> FilterRequest {
        FilterRequest {
            start: self.start,
            end: self.end,
            platform: self.platform,
            plan_type: self.plan,
            preset: self.preset,
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_export(
    body: &str,
    output: Option<&str>,
    format: ExportFormat,
    on: NaiveDate,
) -> anyhow::Result<()> {
    let Some(output) = output else {
        println!("{}", body);
        return Ok(());
    };

    let mut path = std::path::PathBuf::from(output);
    if path.is_dir() {
        path.push(export_file_name(format, on));
    }
    std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = body.len(), "Export written");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "subscription_dashboard=info,subscription_reporting=info".into()
            }),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(seed) = cli.seed {
        config.generator.seed = seed;
    }
    if let Some(days) = cli.days {
        config.generator.days = days;
    }

    info!(
        seed = config.generator.seed,
        start_date = %config.generator.start_date,
        days = config.generator.days,
        "Subscription dashboard starting"
    );

    let dataset = Dataset::generate(&config.generator);
    let dashboard = SubscriptionDashboard::new(&dataset, config.dashboard.clone());

    match cli.command {
        Commands::Range => {
            let range = dashboard
                .date_range()
                .context("dataset is empty; no date range")?;
            print_json(&range)?;
        }
        Commands::Overview(args) => {
            let filters = dashboard.resolve_filters(&args.request())?;
            print_json(&dashboard.overview(&filters))?;
        }
        Commands::Chart(args) => {
            let filters = dashboard.resolve_filters(&args.request())?;
            print_json(&dashboard.chart(&filters))?;
        }
        Commands::Raw { sort, page } => {
            let mut table = RawTableState::new(config.dashboard.page_size);
            table.sort = sort.table_sort();
            table.go_to(page);
            print_json(&table.view(dataset.raw_data()))?;
        }
        Commands::Export {
            format,
            output,
            sort,
            filters,
        } => {
            let request = filters.request();
            let records = if request.is_empty() {
                dataset.raw_data().to_vec()
            } else {
                dataset.filter(&dashboard.resolve_filters(&request)?)
            };
            let body = export(&sort.table_sort().apply(&records), format)?;
            write_export(&body, output.as_deref(), format, Utc::now().date_naive())?;
        }
    }

    Ok(())
}
