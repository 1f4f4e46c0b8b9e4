//! Computed cost results: line items, category outcomes and the final report
//!
//! Nothing here is stored; a [`CostReport`] is built fresh for every
//! calculation and handed over to the caller.

use chrono::NaiveDateTime;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::warn;

use super::parameters::ParameterError;
use crate::models::company::CompanyProfile;

/// Format of `date_calcul` in serialized reports
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// CATEGORIES
// ============================================================================

/// The three fixed hidden-cost groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostCategory {
    /// Implementation errors (planning, technical, training, configuration)
    Errors,
    /// Organizational resistance to change
    Resistance,
    /// Unforeseen costs
    Unforeseen,
}

impl CostCategory {
    /// Categories in report order
    pub const ALL: [CostCategory; 3] = [
        CostCategory::Errors,
        CostCategory::Resistance,
        CostCategory::Unforeseen,
    ];

    /// Key of the category block in the report JSON
    pub fn report_key(self) -> &'static str {
        match self {
            CostCategory::Errors => "couts_erreurs",
            CostCategory::Resistance => "couts_resistance",
            CostCategory::Unforeseen => "couts_imprevus",
        }
    }

    /// Key of the category total inside its block
    pub fn total_key(self) -> &'static str {
        match self {
            CostCategory::Errors => "total_erreurs",
            CostCategory::Resistance => "total_resistance",
            CostCategory::Unforeseen => "total_imprevus",
        }
    }

    /// Display label used by recommendations
    pub fn label(self) -> &'static str {
        match self {
            CostCategory::Errors => "Erreurs",
            CostCategory::Resistance => "Résistance au changement",
            CostCategory::Unforeseen => "Imprévus",
        }
    }
}

// ============================================================================
// LINE ITEMS AND BREAKDOWNS
// ============================================================================

/// One computed cost line.
///
/// `details` renders the operands actually used; it is presentational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLineItem {
    #[serde(rename = "valeur")]
    pub value: f64,
    pub description: String,
    pub details: String,
}

impl CostLineItem {
    pub fn new(value: f64, description: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
            details: details.into(),
        }
    }
}

/// Line items of a category that computed successfully
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    category: CostCategory,
    lines: Vec<(&'static str, CostLineItem)>,
}

impl CategoryBreakdown {
    pub fn new(category: CostCategory) -> Self {
        Self {
            category,
            lines: Vec::with_capacity(4),
        }
    }

    /// Append a line (keeps insertion order for serialization)
    pub fn push(&mut self, key: &'static str, item: CostLineItem) {
        self.lines.push((key, item));
    }

    pub fn category(&self) -> CostCategory {
        self.category
    }

    pub fn lines(&self) -> &[(&'static str, CostLineItem)] {
        &self.lines
    }

    pub fn line(&self, key: &str) -> Option<&CostLineItem> {
        self.lines.iter().find(|(k, _)| *k == key).map(|(_, item)| item)
    }

    /// Sum of all line values, in line order
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|(_, item)| item.value).sum()
    }

    /// Key of the first line that is infinite or NaN, or the total key when
    /// only the sum overflows
    pub fn non_finite_key(&self) -> Option<&'static str> {
        self.lines
            .iter()
            .find(|(_, item)| !item.value.is_finite())
            .map(|(key, _)| *key)
            .or_else(|| (!self.total().is_finite()).then_some(self.category.total_key()))
    }
}

/// Result of computing one category.
///
/// A degraded category reports a zero total and keeps the cause so the
/// aggregator can surface it without failing the whole report.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    Computed(CategoryBreakdown),
    Degraded {
        category: CostCategory,
        cause: ParameterError,
    },
}

impl CategoryOutcome {
    pub fn category(&self) -> CostCategory {
        match self {
            CategoryOutcome::Computed(breakdown) => breakdown.category(),
            CategoryOutcome::Degraded { category, .. } => *category,
        }
    }

    /// Category total (0 when degraded)
    pub fn total(&self) -> f64 {
        match self {
            CategoryOutcome::Computed(breakdown) => breakdown.total(),
            CategoryOutcome::Degraded { .. } => 0.0,
        }
    }

    pub fn breakdown(&self) -> Option<&CategoryBreakdown> {
        match self {
            CategoryOutcome::Computed(breakdown) => Some(breakdown),
            CategoryOutcome::Degraded { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, CategoryOutcome::Degraded { .. })
    }

    pub fn cause(&self) -> Option<&ParameterError> {
        match self {
            CategoryOutcome::Computed(_) => None,
            CategoryOutcome::Degraded { cause, .. } => Some(cause),
        }
    }
}

/// Serializes as `{ <line_key>: {valeur, description, details}, ..., total_<category> }`.
/// A degraded category only carries its zero total.
impl Serialize for CategoryOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let lines = self.breakdown().map(|b| b.lines()).unwrap_or(&[]);
        let mut map = serializer.serialize_map(Some(lines.len() + 1))?;
        for (key, item) in lines {
            map.serialize_entry(key, item)?;
        }
        map.serialize_entry(self.category().total_key(), &self.total())?;
        map.end()
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Consolidated result of one calculation request
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    company: CompanyProfile,
    errors: CategoryOutcome,
    resistance: CategoryOutcome,
    unforeseen: CategoryOutcome,
    total_general: f64,
    revenue_percentage: f64,
    generated_at: NaiveDateTime,
}

impl CostReport {
    /// Assemble a report, deriving `total_general` and the revenue percentage.
    ///
    /// If the category totals are finite but their sum overflows, the largest
    /// categories are degraded until `total_general` is finite again.
    pub fn new(
        company: CompanyProfile,
        errors: CategoryOutcome,
        resistance: CategoryOutcome,
        unforeseen: CategoryOutcome,
        generated_at: NaiveDateTime,
    ) -> Self {
        let mut outcomes = [errors, resistance, unforeseen];
        let mut total_general: f64 = outcomes.iter().map(CategoryOutcome::total).sum();
        while !total_general.is_finite() {
            let largest = (0..outcomes.len())
                .max_by(|&a, &b| {
                    outcomes[a]
                        .total()
                        .abs()
                        .total_cmp(&outcomes[b].total().abs())
                })
                .unwrap_or(0);
            let category = outcomes[largest].category();
            warn!(
                category = category.report_key(),
                "cost category degraded to zero: total_general overflows"
            );
            outcomes[largest] = CategoryOutcome::Degraded {
                category,
                cause: ParameterError::NonFinite {
                    line: "total_general".to_string(),
                },
            };
            total_general = outcomes.iter().map(CategoryOutcome::total).sum();
        }
        let [errors, resistance, unforeseen] = outcomes;
        let revenue_percentage = percentage_of_revenue(total_general, company.annual_revenue());

        Self {
            company,
            errors,
            resistance,
            unforeseen,
            total_general,
            revenue_percentage,
            generated_at,
        }
    }

    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    pub fn errors(&self) -> &CategoryOutcome {
        &self.errors
    }

    pub fn resistance(&self) -> &CategoryOutcome {
        &self.resistance
    }

    pub fn unforeseen(&self) -> &CategoryOutcome {
        &self.unforeseen
    }

    pub fn category(&self, category: CostCategory) -> &CategoryOutcome {
        match category {
            CostCategory::Errors => &self.errors,
            CostCategory::Resistance => &self.resistance,
            CostCategory::Unforeseen => &self.unforeseen,
        }
    }

    pub fn total_general(&self) -> f64 {
        self.total_general
    }

    /// `total_general / annual_revenue * 100`, 0 when revenue is 0 or the
    /// ratio overflows
    pub fn revenue_percentage(&self) -> f64 {
        self.revenue_percentage
    }

    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    /// Human-readable causes of every degraded category
    pub fn warnings(&self) -> Vec<String> {
        CostCategory::ALL
            .iter()
            .filter_map(|&c| {
                self.category(c)
                    .cause()
                    .map(|cause| format!("{}: {}", c.report_key(), cause))
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Only string keys and finite numbers: cannot fail
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for CostReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let warnings = self.warnings();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("entreprise", &self.company)?;
        map.serialize_entry("couts_erreurs", &self.errors)?;
        map.serialize_entry("couts_resistance", &self.resistance)?;
        map.serialize_entry("couts_imprevus", &self.unforeseen)?;
        map.serialize_entry("total_general", &self.total_general)?;
        map.serialize_entry("pourcentage_ca", &self.revenue_percentage)?;
        map.serialize_entry(
            "date_calcul",
            &self.generated_at.format(REPORT_DATE_FORMAT).to_string(),
        )?;
        if !warnings.is_empty() {
            map.serialize_entry("avertissements", &warnings)?;
        }
        map.end()
    }
}

/// Percentage of revenue represented by `total`; defined as 0 for zero
/// revenue and for ratios too large to represent.
pub fn percentage_of_revenue(total: f64, annual_revenue: f64) -> f64 {
    if annual_revenue > 0.0 {
        let percentage = total / annual_revenue * 100.0;
        if percentage.is_finite() {
            percentage
        } else {
            0.0
        }
    } else {
        0.0
    }
}
