//! Report CLI
//!
//! Print dashboard figures in the terminal or export the filtered events.
//! Usage:
//!   cargo run --bin report -- summary --start 1980 --end 2020
//!   cargo run --bin report -- countries --top 15 --groups Natural
//!   cargo run --bin report -- export --output natural.parquet --groups Natural

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pulse::analytics::{
    country_stats, default_range, focus_events, format_thousands, group_options, top_countries,
    yearly_stats, FocusReport, Kpis, Selection, YearRange,
};
use pulse::config::Config;
use pulse::data::{write_csv, write_parquet, DataLoader, Dataset};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "report")]
#[command(about = "Summaries and exports of the disaster dataset")]
struct Cli {
    /// Config file (defaults to config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data file, overrides data.path
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct SelectionArgs {
    /// First start year (inclusive)
    #[arg(long)]
    start: Option<i32>,

    /// Last start year (inclusive)
    #[arg(long)]
    end: Option<i32>,

    /// Disaster groups (comma-separated), defaults to all in range
    #[arg(long, value_delimiter = ',')]
    groups: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportFormat {
    Csv,
    Parquet,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Headline KPIs and the per-year table
    Summary {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Countries ranked by affected population
    Countries {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Number of countries to show
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Focus-country breakdown (whole dataset, no filters)
    Focus {
        /// ISO-3 code, overrides focus.iso
        #[arg(long)]
        iso: Option<String>,
    },

    /// Disaster groups present in a year range
    Groups {
        #[arg(long)]
        start: Option<i32>,

        #[arg(long)]
        end: Option<i32>,
    },

    /// Write the filtered events to a file
    Export {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format, inferred from the extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("pulse=info".parse()?)
                .add_directive("report=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data) = &cli.data {
        config.data.path = data.display().to_string();
    }

    let dataset = DataLoader::new(config.data_path()).load()?;
    let bounds = dataset
        .year_bounds()
        .context("Dataset has no events to derive a year range from")?;
    let defaults = default_range(&config.dashboard, bounds);

    match cli.command {
        Commands::Summary { selection } => {
            let selection = resolve(&dataset, bounds, defaults, selection)?;
            print_summary(&dataset, &selection);
            Ok(())
        }

        Commands::Countries { selection, top } => {
            let selection = resolve(&dataset, bounds, defaults, selection)?;
            print_countries(&dataset, &selection, top);
            Ok(())
        }

        Commands::Focus { iso } => {
            let iso = iso.unwrap_or_else(|| config.focus.iso.clone());
            let name = if iso == config.focus.iso {
                config.focus.name.clone()
            } else {
                iso.clone()
            };
            print_focus(&dataset, &iso, &name);
            Ok(())
        }

        Commands::Groups { start, end } => {
            let range = YearRange::clamped(
                start.unwrap_or(defaults.start),
                end.unwrap_or(defaults.end),
                bounds,
            )?;
            println!("\nDisaster groups {}-{}:", range.start, range.end);
            for group in group_options(&dataset.events, range) {
                println!("  - {}", group);
            }
            Ok(())
        }

        Commands::Export {
            selection,
            output,
            format,
        } => {
            let selection = resolve(&dataset, bounds, defaults, selection)?;
            let events: Vec<_> = selection
                .select(&dataset.events)
                .into_iter()
                .cloned()
                .collect();

            match format.unwrap_or_else(|| infer_format(&output)) {
                ExportFormat::Csv => write_csv(&events, &output)?,
                ExportFormat::Parquet => write_parquet(&events, &output)?,
            }
            println!("\nExported {} events to: {}", events.len(), output.display());
            Ok(())
        }
    }
}

fn resolve(
    dataset: &Dataset,
    bounds: (i32, i32),
    defaults: YearRange,
    args: SelectionArgs,
) -> Result<Selection> {
    Selection::resolve(&dataset.events, bounds, defaults, args.start, args.end, args.groups)
}

fn infer_format(path: &std::path::Path) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("parquet") => ExportFormat::Parquet,
        _ => ExportFormat::Csv,
    }
}

fn print_header(title: &str, width: usize) {
    println!();
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(width));
    println!("\x1b[1;36m  {}\x1b[0m", title);
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(width));
}

fn print_footer(width: usize) {
    println!("\x1b[1;36m{}\x1b[0m", "═".repeat(width));
}

fn print_selection(selection: &Selection) {
    let groups = if selection.groups.is_empty() {
        "(none)".to_string()
    } else {
        selection.groups.join(", ")
    };
    println!(
        "Period: {} → {} | Groups: {}",
        selection.range.start, selection.range.end, groups
    );
    println!();
}

fn print_summary(dataset: &Dataset, selection: &Selection) {
    let events = selection.select(&dataset.events);
    let kpis = Kpis::from_events(&events);

    print_header("THE PULSE OF DISASTERS", 55);
    print_selection(selection);

    println!("\x1b[1;33mKPIS\x1b[0m");
    for card in kpis.cards() {
        println!("  {:<26} {}", format!("{}:", card.label), card.value);
    }
    println!();

    println!("\x1b[1;33mDECOUPLING\x1b[0m");
    println!("  {:>6} {:>12} {:>14}", "Year", "Occurrences", "Deaths");
    println!("  {}", "-".repeat(34));
    for stat in yearly_stats(&events) {
        println!(
            "  {:>6} {:>12} {:>14}",
            stat.year,
            format_thousands(stat.occurrences),
            format_thousands(stat.deaths)
        );
    }
    print_footer(55);
}

fn print_countries(dataset: &Dataset, selection: &Selection, top: usize) {
    let events = selection.select(&dataset.events);
    let stats = country_stats(&events);

    print_header("MOST AFFECTED COUNTRIES", 60);
    print_selection(selection);

    println!("┌{:─<7}┬{:─<34}┬{:─>16}┐", "", "", "");
    println!("│ {:5} │ {:32} │ {:>14} │", "ISO", "Country", "Affected");
    println!("├{:─<7}┼{:─<34}┼{:─>16}┤", "", "", "");
    for stat in top_countries(&stats, top) {
        let name: String = stat.country.as_deref().unwrap_or("-").chars().take(32).collect();
        println!(
            "│ {:5} │ {:32} │ {:>14} │",
            stat.iso,
            name,
            format_thousands(stat.total_affected)
        );
    }
    println!("└{:─<7}┴{:─<34}┴{:─>16}┘", "", "", "");
    println!("{} countries in selection", stats.len());
    print_footer(60);
}

fn print_focus(dataset: &Dataset, iso: &str, name: &str) {
    let events = focus_events(&dataset.events, iso);
    let report = FocusReport::build(&events, iso, name);

    print_header(&format!("FOCUS ON {}", name.to_uppercase()), 55);

    if report.is_empty() {
        println!("No {} data in the dataset.", name);
        print_footer(55);
        return;
    }

    println!("\x1b[1;33mAFFECTED PEOPLE BY TYPE\x1b[0m");
    for series in &report.affected_by_type {
        let total: u64 = series.points.iter().map(|(_, affected)| affected).sum();
        println!(
            "  {:<24} {:>14} across {} years",
            series.disaster_type,
            format_thousands(total),
            series.points.len()
        );
    }
    println!();

    println!("\x1b[1;33mDEADLIEST EVENTS\x1b[0m");
    let mut bubbles: Vec<_> = report.bubbles.iter().filter(|b| b.deaths > 0).collect();
    bubbles.sort_by(|a, b| b.deaths.cmp(&a.deaths));
    for bubble in bubbles.iter().take(10) {
        println!(
            "  {} {:<20} \x1b[31m{:>10}\x1b[0m  {}",
            bubble.year,
            bubble.disaster_type,
            format_thousands(bubble.deaths),
            bubble.event_name.as_deref().unwrap_or("")
        );
    }
    print_footer(55);
}
