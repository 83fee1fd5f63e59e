use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use tax_cli::app::{self, CalculateRequest, VisitAction};
use tax_cli::config::AppConfig;
use tax_cli::logging::{self, LogOptions};
use tax_core::Period;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Progressive income tax estimator.
///
/// Computes statutory deductions, taxable income and the tax owed per
/// bracket for an annual or monthly gross income.
#[derive(Debug, Parser)]
#[command(name = "tax-estimator", version)]
struct Cli {
    /// Configuration file (TOML). Defaults to $TAX_ESTIMATOR_CONFIG, then
    /// ./tax-estimator.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive, e.g. `debug` or `tax_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Do not write log output to the terminal.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate tax for a gross income.
    Calculate {
        /// Gross income; grouping commas are allowed (e.g. 5,000,000).
        income: String,

        /// Period the income is given in.
        #[arg(long, default_value = "annual")]
        period: Period,

        /// Period to present amounts in. Defaults to --period.
        #[arg(long)]
        view: Option<Period>,

        /// Bracket table CSV replacing the configured one.
        #[arg(long)]
        brackets: Option<PathBuf>,

        /// Print the annual result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Convert an entered value between periods.
    Convert {
        value: String,

        #[arg(long)]
        from: Period,

        #[arg(long)]
        to: Period,
    },

    /// Print the active bracket table.
    Brackets {
        /// Bracket table CSV replacing the configured one.
        #[arg(long)]
        brackets: Option<PathBuf>,
    },

    /// Read or update the visit counter.
    Visits {
        #[command(subcommand)]
        action: VisitsCommand,
    },
}

#[derive(Debug, Subcommand)]
enum VisitsCommand {
    /// Print the stored count.
    Get,
    /// Count one visit and print the new total.
    Increment,
    /// Overwrite the stored count.
    Set {
        #[arg(value_parser = clap::value_parser!(i64).range(0..))]
        count: i64,
    },
}

impl From<VisitsCommand> for VisitAction {
    fn from(command: VisitsCommand) -> Self {
        match command {
            VisitsCommand::Get => VisitAction::Get,
            VisitsCommand::Increment => VisitAction::Increment,
            VisitsCommand::Set { count } => VisitAction::Set(count),
        }
    }
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Install logging. `--log-level` wins over the config file and
/// `TAX_ESTIMATOR_LOG`, which win over `RUST_LOG`.
fn init_tracing(
    cli: &Cli,
    config: &AppConfig,
) -> anyhow::Result<()> {
    logging::init_logging(&LogOptions {
        level_flag: cli.log_level.clone(),
        configured_level: config.log_level.clone(),
        quiet: cli.quiet,
        file: cli.log_file.clone().or_else(|| config.log_file.clone()),
    })
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&cli, &config)?;
    debug!(?config, "configuration resolved");

    match cli.command {
        Command::Calculate {
            income,
            period,
            view,
            brackets,
            json,
        } => {
            let request = CalculateRequest {
                income: &income,
                period,
                view: view.unwrap_or(period),
                brackets: brackets.as_deref(),
                json,
            };
            println!("{}", app::run_calculate(&config, &request)?);
        }
        Command::Convert { value, from, to } => {
            println!("{}", app::run_convert(&value, from, to)?);
        }
        Command::Brackets { brackets } => {
            println!("{}", app::run_brackets(&config, brackets.as_deref())?);
        }
        Command::Visits { action } => {
            let counter = app::build_counter(&config.counter_config()).await;
            println!("{}", app::run_visits(&counter, action.into()).await);
        }
    }

    Ok(())
}
