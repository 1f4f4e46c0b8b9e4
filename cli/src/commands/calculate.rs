//! `erp-costs calculate` command - Compute the hidden costs of one company.

use std::path::Path;

use erp_hidden_costs_core_rs::insights::{sector_preset, EXAMPLE_COMPANIES};
use erp_hidden_costs_core_rs::{CompanyProfile, CostCalculator, EngineConfig, ParameterSet};
use tracing::info;

use super::{print_json, read_json_object};
use crate::error::{CliError, CliResult};

/// Where the company profile comes from
pub enum CompanySource<'a> {
    Example(usize),
    File(&'a Path),
}

/// Execute the `calculate` command.
pub fn execute(
    config: &EngineConfig,
    company: CompanySource<'_>,
    use_sector_preset: bool,
    params_file: Option<&Path>,
) -> CliResult<()> {
    let company = load_company(company)?;

    let mut params = if use_sector_preset {
        sector_preset(company.sector())
    } else {
        ParameterSet::new()
    };
    if let Some(path) = params_file {
        let overrides = ParameterSet::from_json_map(&read_json_object(path)?);
        params = params.with_overrides(&overrides);
    }

    let calculator = CostCalculator::with_unit(&config.currency);
    let report = calculator.calculate_total_costs(&company, &params);
    info!(
        company = company.name(),
        total = report.total_general(),
        "calculation completed"
    );

    print_json(&report.to_json())
}

fn load_company(source: CompanySource<'_>) -> CliResult<CompanyProfile> {
    match source {
        CompanySource::Example(index) => {
            let example = EXAMPLE_COMPANIES.get(index).ok_or_else(|| {
                CliError::InvalidInput(format!(
                    "example {} does not exist (0..{})",
                    index,
                    EXAMPLE_COMPANIES.len()
                ))
            })?;
            Ok(example.profile()?)
        }
        CompanySource::File(path) => Ok(CompanyProfile::from_request(&read_json_object(path)?)?),
    }
}
