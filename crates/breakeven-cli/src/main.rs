mod chart_view;
mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;
use std::process;

use breakeven_core::handlers::parse_decimal;
use breakeven_core::{BreakevenError, InvalidMarginPolicy};
use commands::analyze::AnalyzeArgs;
use commands::FieldArgs;

/// Break-even analysis from the command line
#[derive(Parser)]
#[command(
    name = "breakeven",
    version,
    about = "Break-even analysis: break-even point, production report and chart",
    long_about = "Computes the break-even point from a unit price, a unit variable cost \
                  and fixed costs, reports revenue, costs and profit at a set of \
                  production levels, and plots revenue against total cost."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// TOML file with levels, currency_symbol and on_invalid_margin
    #[arg(long, global = true)]
    config: Option<String>,

    /// Production levels for the report and chart (e.g. 3000,4000,5000)
    #[arg(long, global = true, value_delimiter = ',', value_parser = parse_level)]
    levels: Option<Vec<Decimal>>,

    /// Symbol prefixed to displayed amounts
    #[arg(long, global = true)]
    currency_symbol: Option<String>,

    /// What to render when price does not exceed variable cost
    #[arg(long, global = true)]
    on_invalid_margin: Option<MarginPolicy>,

    /// Log filter (e.g. "debug"); RUST_LOG is used when absent
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Break-even units and revenue
    Compute(FieldArgs),
    /// Break-even point plus revenue, costs and profit at each production level
    Report(FieldArgs),
    /// Revenue vs. total-cost chart with the break-even point marked
    Chart(FieldArgs),
    /// Full analysis: target volume, margin of safety and what-if scenarios
    Analyze(AnalyzeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MarginPolicy {
    /// Render the report and chart without break-even figures
    Annotate,
    /// Render nothing
    Suppress,
}

impl From<MarginPolicy> for InvalidMarginPolicy {
    fn from(p: MarginPolicy) -> Self {
        match p {
            MarginPolicy::Annotate => InvalidMarginPolicy::Annotate,
            MarginPolicy::Suppress => InvalidMarginPolicy::Suppress,
        }
    }
}

/// Levels accept the same notation as the form fields.
fn parse_level(text: &str) -> Result<Decimal, BreakevenError> {
    parse_decimal("production level", text)
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    let overrides = config::Overrides {
        levels: cli.levels,
        currency_symbol: cli.currency_symbol,
        on_invalid_margin: cli.on_invalid_margin.map(Into::into),
    };
    let options = match config::load(cli.config.as_deref(), overrides) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<output::Rendered, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compute(args) => commands::calculate::run_compute(args, &options),
        Commands::Report(args) => commands::calculate::run_report(args, &options),
        Commands::Chart(args) => commands::chart::run_chart(args, &options),
        Commands::Analyze(args) => commands::analyze::run_analyze(args, &options),
        Commands::Version => {
            println!("breakeven {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(rendered) => {
            if let Err(e) = output::format_output(&cli.output, &rendered) {
                eprintln!("{}: {}", "error".red().bold(), e);
                process::exit(1);
            }
            for w in &rendered.warnings {
                eprintln!("{}: {}", "warning".yellow().bold(), w);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
