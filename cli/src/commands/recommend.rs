//! `erp-costs recommend` command - Recommendations for a saved report.

use std::path::Path;

use erp_hidden_costs_core_rs::Recommendations;
use serde_json::Value;

use super::{print_json, read_json};
use crate::error::CliResult;

/// Execute the `recommend` command.
///
/// Accepts either a bare report (as printed by `calculate`) or a response
/// body wrapping it under `resultats`.
pub fn execute(report_file: &Path) -> CliResult<()> {
    let document = read_json(report_file)?;
    let recommendations = Recommendations::from_json(unwrap_results(&document));
    print_json(&serde_json::to_value(recommendations)?)
}

fn unwrap_results(document: &Value) -> &Value {
    document.get("resultats").unwrap_or(document)
}
