//! Reference content: `definitions`, `examples` and `stats` commands.

use erp_hidden_costs_core_rs::insights::{sector_statistics, EXAMPLE_COMPANIES};
use erp_hidden_costs_core_rs::{EngineConfig, FormulaCatalog};
use serde_json::json;

use super::print_json;
use crate::error::CliResult;

/// Print the formula catalog.
pub fn definitions(config: &EngineConfig) -> CliResult<()> {
    print_json(&FormulaCatalog::with_unit(&config.currency).to_json())
}

/// Print the example companies with their index.
pub fn examples() -> CliResult<()> {
    let listed: Vec<_> = EXAMPLE_COMPANIES
        .iter()
        .enumerate()
        .map(|(index, example)| json!({ "index": index, "exemple": example }))
        .collect();
    print_json(&json!(listed))
}

/// Print the average hidden costs observed for a sector.
pub fn stats(sector: &str) -> CliResult<()> {
    print_json(&json!({
        "secteur": sector,
        "statistiques": sector_statistics(sector),
    }))
}
