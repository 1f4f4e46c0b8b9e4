//! Report summary built from a previously returned result document.
//!
//! No file is produced; the summary carries a fixed placeholder download URL.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use super::recommendations::CategoryTotals;
use crate::costs::report::REPORT_DATE_FORMAT;
use crate::costs::CostCategory;
use crate::models::company::is_empty_value;

/// Placeholder download location returned with every summary
pub const SIMULATED_DOWNLOAD_URL: &str = "/api/rapport/download/simulation.pdf";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    #[error("Données de résultat manquantes")]
    MissingResults,

    #[error("Nom de l'entreprise manquant dans les résultats")]
    MissingCompanyName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub titre: String,
    pub date_generation: String,
    pub utilisateur: String,
    pub resume: Value,
    pub details_erreurs: Value,
    pub details_resistance: Value,
    pub details_imprevus: Value,
}

impl ReportSummary {
    /// Summarize `resultats` for `user_name`.
    ///
    /// `resultats.entreprise.nom` must be present. Missing totals and
    /// detail blocks default to 0 and `{}`.
    pub fn build(
        resultats: &Value,
        user_name: &str,
        generated_at: NaiveDateTime,
    ) -> Result<Self, SummaryError> {
        if is_empty_value(resultats) {
            return Err(SummaryError::MissingResults);
        }
        let company_name = match resultats.pointer("/entreprise/nom") {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Null) | None => return Err(SummaryError::MissingCompanyName),
            Some(other) => other.to_string(),
        };

        let totals = CategoryTotals::from_json(resultats);
        let number = |key: &str| resultats.get(key).and_then(Value::as_f64).unwrap_or(0.0);
        let details = |category: CostCategory| {
            resultats
                .get(category.report_key())
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()))
        };

        Ok(Self {
            titre: format!("Rapport des Coûts Cachés ERP - {}", company_name),
            date_generation: generated_at.format(REPORT_DATE_FORMAT).to_string(),
            utilisateur: user_name.to_string(),
            resume: json!({
                "total_erreurs": totals.errors,
                "total_resistance": totals.resistance,
                "total_imprevus": totals.unforeseen,
                "total_general": number("total_general"),
                "pourcentage_ca": number("pourcentage_ca"),
            }),
            details_erreurs: details(CostCategory::Errors),
            details_resistance: details(CostCategory::Resistance),
            details_imprevus: details(CostCategory::Unforeseen),
        })
    }
}
