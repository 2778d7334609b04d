use std::path::PathBuf;
use std::time::Duration;

use analytics::{
    AggregationEngine, DailyOrdersSummary, DemographicCount, OverviewSummary, ProductRanking,
    ProductRankings, RfmRecord,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use configuration::{Config, SampleConfig};
use core_types::{DateRange, Dimension, OrderRecord};
use indicatif::{ProgressBar, ProgressStyle};
use ingestion::{DataSource, IngestError};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the OrderScope reporting application.
fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => handle_report(args)?,
        Commands::Generate(args) => handle_generate(args)?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Order-history analytics reports straight from CSV exports.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the order analytics report for a date window.
    Report(ReportArgs),
    /// Write a reproducible sample dataset as CSV files.
    Generate(GenerateArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// The start of the reporting window (format: YYYY-MM-DD).
    /// Defaults to the configured date, else the earliest order date.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// The end of the reporting window (format: YYYY-MM-DD).
    /// Defaults to the configured date, else the latest order date.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// How many products to list in each leaderboard.
    #[arg(long)]
    top: Option<usize>,

    /// Restrict the demographic breakdown to one dimension
    /// (gender, age_group or state). All three render by default.
    #[arg(long)]
    dimension: Option<Dimension>,

    /// Report on the generated sample dataset instead of the CSV files.
    #[arg(long)]
    sample: bool,

    /// Show a row for every day of the window, zero-filled where no orders exist.
    #[arg(long)]
    fill_days: bool,

    /// Emit the report as one JSON document instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct GenerateArgs {
    /// Directory to write orders.csv and customers.csv into.
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Seed for the generator; identical seeds yield identical datasets.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of orders to generate.
    #[arg(long)]
    orders: Option<u32>,

    /// Number of customers to generate.
    #[arg(long)]
    customers: Option<u32>,
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let config = configuration::load_config()?;

    let records = load_records(&args, &config)?;
    if records.is_empty() {
        println!("No order data available; nothing to report.");
        return Ok(());
    }

    let Some(range) = resolve_range(&args, &config, &records) else {
        println!("No dated orders available; nothing to report.");
        return Ok(());
    };

    let engine = AggregationEngine::new();
    let filtered = engine.filter_by_date_range(&records, &range);
    if filtered.is_empty() {
        println!("No orders between {} and {}.", range.start, range.end);
        return Ok(());
    }

    let overview = engine.overview(&filtered);
    let mut daily = engine.daily_orders(&filtered);
    if args.fill_days || config.report.fill_missing_days {
        daily = engine.fill_missing_days(&daily, &range);
    }
    let top_n = args.top.unwrap_or(config.report.top_n);
    let rankings = engine.product_rankings(&filtered, top_n)?;
    let dimensions = match args.dimension {
        Some(dimension) => vec![dimension],
        None => vec![Dimension::Gender, Dimension::AgeGroup, Dimension::State],
    };
    let demographics = dimensions
        .into_iter()
        .map(|dimension| (dimension, engine.demographic_counts(&filtered, dimension)))
        .collect();

    let sections = ReportSections {
        overview,
        daily,
        rankings,
        demographics,
        rfm: engine.rfm(&filtered),
    };

    if args.json {
        print_json(&range, &sections)?;
    } else {
        print_tables(&range, &sections, config.report.rfm_top_n);
    }

    Ok(())
}

/// Loads the order history for the report, showing a spinner meanwhile.
///
/// When the CSV source is missing a file and `data.fallback_to_sample` is
/// set, the generated sample dataset stands in; every other failure
/// propagates.
fn load_records(args: &ReportArgs, config: &Config) -> anyhow::Result<Vec<OrderRecord>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Loading order history...");

    let source = if args.sample {
        DataSource::Sample(config.sample.clone())
    } else {
        DataSource::Csv {
            orders: config.data.orders_path.clone(),
            customers: config.data.customers_path.clone(),
        }
    };

    let result = match ingestion::load(&source) {
        Err(IngestError::MissingFile(path)) if config.data.fallback_to_sample => {
            tracing::warn!(
                "{} not found; falling back to the generated sample dataset",
                path.display()
            );
            ingestion::load(&DataSource::Sample(config.sample.clone()))
        }
        other => other,
    };

    spinner.finish_and_clear();
    Ok(result?)
}

/// Resolves the reporting window: CLI flags override the configured dates,
/// which override the dataset's own first and last order dates.
///
/// `None` means no bound could be found at all, i.e. the dataset holds no
/// dated records and neither flag nor config supplied the missing side.
fn resolve_range(args: &ReportArgs, config: &Config, records: &[OrderRecord]) -> Option<DateRange> {
    let observed = records
        .iter()
        .filter_map(|record| record.order_date)
        .fold(None::<(NaiveDate, NaiveDate)>, |bounds, timestamp| {
            let date = timestamp.date_naive();
            Some(match bounds {
                None => (date, date),
                Some((min, max)) => (min.min(date), max.max(date)),
            })
        });

    let start = args
        .from
        .or(config.report.start_date)
        .or(observed.map(|(min, _)| min))?;
    let end = args
        .to
        .or(config.report.end_date)
        .or(observed.map(|(_, max)| max))?;
    Some(DateRange::new(start, end))
}

// ==============================================================================
// Generate Command Logic
// ==============================================================================

fn handle_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let sample = sample_with_overrides(config.sample, &args)?;

    let (orders_path, customers_path) = ingestion::sample::write_csv_files(&sample, &args.out_dir)?;
    println!("Wrote {}", orders_path.display());
    println!("Wrote {}", customers_path.display());

    Ok(())
}

/// Applies the CLI flags on top of the configured generator parameters.
///
/// The flags land after `load_config` has validated the file, so the merged
/// result is validated again; the generator assumes its config is valid.
fn sample_with_overrides(base: SampleConfig, args: &GenerateArgs) -> anyhow::Result<SampleConfig> {
    let mut sample = base;
    if let Some(seed) = args.seed {
        sample.seed = seed;
    }
    if let Some(orders) = args.orders {
        sample.orders = orders;
    }
    if let Some(customers) = args.customers {
        sample.customers = customers;
    }
    sample.validate()?;
    Ok(sample)
}

// ==============================================================================
// Rendering
// ==============================================================================

/// Everything the report renders, computed once and shared by both output
/// modes.
struct ReportSections {
    overview: OverviewSummary,
    daily: Vec<DailyOrdersSummary>,
    rankings: ProductRankings,
    demographics: Vec<(Dimension, Vec<DemographicCount>)>,
    rfm: Vec<RfmRecord>,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    window: &'a DateRange,
    overview: &'a OverviewSummary,
    daily_orders: &'a [DailyOrdersSummary],
    products: &'a ProductRankings,
    demographics: Vec<DemographicSection<'a>>,
    rfm: &'a [RfmRecord],
}

#[derive(Serialize)]
struct DemographicSection<'a> {
    dimension: &'a str,
    counts: &'a [DemographicCount],
}

fn print_json(range: &DateRange, sections: &ReportSections) -> anyhow::Result<()> {
    let document = ReportDocument {
        window: range,
        overview: &sections.overview,
        daily_orders: &sections.daily,
        products: &sections.rankings,
        demographics: sections
            .demographics
            .iter()
            .map(|(dimension, counts)| DemographicSection {
                dimension: dimension.as_str(),
                counts,
            })
            .collect(),
        rfm: &sections.rfm,
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn print_tables(range: &DateRange, sections: &ReportSections, rfm_top_n: usize) {
    println!("Report window: {} to {}", range.start, range.end);

    println!("\n--- Overview ---");
    let mut table = new_table(["Total Orders", "Total Revenue"]);
    table.add_row(vec![
        right(sections.overview.total_orders),
        right(format_money(sections.overview.total_revenue)),
    ]);
    println!("{table}");

    println!("\n--- Daily Orders ---");
    let mut table = new_table(["Date", "Orders", "Revenue"]);
    for day in &sections.daily {
        table.add_row(vec![
            Cell::new(day.date),
            right(day.order_count),
            right(format_money(day.revenue)),
        ]);
    }
    println!("{table}");

    let rankings = &sections.rankings;
    println!("\n--- Top {} Products by Quantity ---", rankings.best.len());
    println!("{}", rankings_table(&rankings.best));
    println!(
        "\n--- Bottom {} Products by Quantity ---",
        rankings.worst.len()
    );
    println!("{}", rankings_table(&rankings.worst));

    for (dimension, counts) in &sections.demographics {
        println!("\n--- Customers by {} ---", dimension);
        let mut table = new_table([dimension.as_str(), "Customers"]);
        for count in counts {
            table.add_row(vec![
                Cell::new(&count.category_value),
                right(count.customer_count),
            ]);
        }
        println!("{table}");
    }

    let (recent, frequent, spenders) = ranked_rfm(&sections.rfm, rfm_top_n);
    println!("\n--- Most Recent Customers ---");
    println!("{}", rfm_table(&recent));
    println!("\n--- Most Frequent Customers ---");
    println!("{}", rfm_table(&frequent));
    println!("\n--- Biggest Spenders ---");
    println!("{}", rfm_table(&spenders));
}

/// Ranked views over the RFM metrics: most recent (lowest recency), most
/// frequent, and highest spend. Stable sorts keep the engine's
/// first-encounter order for ties.
fn ranked_rfm(rfm: &[RfmRecord], top_n: usize) -> (Vec<&RfmRecord>, Vec<&RfmRecord>, Vec<&RfmRecord>) {
    let mut recent: Vec<&RfmRecord> = rfm.iter().collect();
    recent.sort_by_key(|record| record.recency);
    recent.truncate(top_n);

    let mut frequent: Vec<&RfmRecord> = rfm.iter().collect();
    frequent.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    frequent.truncate(top_n);

    let mut spenders: Vec<&RfmRecord> = rfm.iter().collect();
    spenders.sort_by(|a, b| b.monetary.cmp(&a.monetary));
    spenders.truncate(top_n);

    (recent, frequent, spenders)
}

fn rankings_table(rankings: &[ProductRanking]) -> Table {
    let mut table = new_table(["Product", "Quantity"]);
    for ranking in rankings {
        table.add_row(vec![
            Cell::new(&ranking.product_name),
            right(ranking.total_quantity),
        ]);
    }
    table
}

fn rfm_table(records: &[&RfmRecord]) -> Table {
    let mut table = new_table(["Customer", "Recency (days)", "Frequency", "Monetary"]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.customer_id),
            right(record.recency),
            right(record.frequency),
            right(format_money(record.monetary)),
        ]);
    }
    table
}

fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header.to_vec());
    table
}

fn right(value: impl ToString) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn format_money(value: Decimal) -> String {
    // Display's precision specifier truncates a Decimal, so round first.
    format!("{:.2}", value.round_dp(2))
}
