//! Error types for the erp-costs CLI.

use erp_hidden_costs_core_rs::{CompanyError, ConfigError};
use thiserror::Error;

/// CLI result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// IO error while reading an input file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid company: {0}")]
    Company(#[from] CompanyError),

    /// Well-formed JSON with the wrong shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
