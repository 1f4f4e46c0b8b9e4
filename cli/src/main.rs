//! erp-costs - Hidden-cost estimates for ERP implementations from the
//! command line.
//!
//! # Commands
//!
//! - `erp-costs calculate` - Compute the hidden costs of a company
//! - `erp-costs definitions` - Print the formula catalog
//! - `erp-costs examples` - List the example companies
//! - `erp-costs stats <sector>` - Average hidden costs for a sector
//! - `erp-costs recommend <report>` - Recommendations for a saved report
//!
//! # Examples
//!
//! ```bash
//! # First example company with its sector's typical parameters
//! erp-costs calculate --example 0 --sector-preset
//!
//! # Own company, own parameters, saved for later
//! erp-costs calculate --company atlas.json --params atlas-params.json > report.json
//! erp-costs recommend report.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

use commands::calculate::CompanySource;
use commands::{calculate, load_config, recommend, reference};
use error::CliResult;

/// ERP hidden-cost calculator
#[derive(Parser)]
#[command(name = "erp-costs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the hidden costs of a company and print the report
    Calculate {
        /// Index of an example company (see `examples`)
        #[arg(short, long, conflicts_with = "company", required_unless_present = "company")]
        example: Option<usize>,

        /// JSON file with nom_entreprise, secteur, taille,
        /// chiffre_affaires and nombre_employes
        #[arg(long)]
        company: Option<PathBuf>,

        /// Start from the typical parameters of the company's sector
        #[arg(short, long)]
        sector_preset: bool,

        /// JSON file of parameter overrides
        #[arg(short, long)]
        params: Option<PathBuf>,
    },

    /// Print the formula catalog
    Definitions,

    /// List the example companies
    Examples,

    /// Average hidden costs observed for a sector
    Stats {
        /// Sector label (Industrie, Services, Distribution, Textile)
        #[arg(default_value = "Tous")]
        sector: String,
    },

    /// Recommendations for a report printed by `calculate`
    Recommend {
        /// Report JSON file
        report: PathBuf,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Calculate {
            example,
            company,
            sector_preset,
            params,
        } => {
            let source = match (example, company.as_deref()) {
                (Some(index), _) => CompanySource::Example(index),
                (None, Some(path)) => CompanySource::File(path),
                (None, None) => {
                    return Err(error::CliError::InvalidInput(
                        "either --example or --company is required".to_string(),
                    ))
                }
            };
            calculate::execute(&config, source, sector_preset, params.as_deref())
        }

        Commands::Definitions => reference::definitions(&config),

        Commands::Examples => reference::examples(),

        Commands::Stats { sector } => reference::stats(&sector),

        Commands::Recommend { report } => recommend::execute(&report),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
