//! Company profile attached to every cost estimate.
//!
//! The profile is immutable once built. Construction enforces the only
//! invariant the engine relies on: the annual revenue is a finite,
//! non-negative amount (MAD).

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Request fields that must be present (and non-empty) to build a profile.
pub const REQUIRED_COMPANY_FIELDS: [&str; 5] = [
    "nom_entreprise",
    "secteur",
    "taille",
    "chiffre_affaires",
    "nombre_employes",
];

/// Errors raised while building a [`CompanyProfile`] from request input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompanyError {
    #[error("Le champ {0} est obligatoire")]
    MissingField(String),

    #[error("Format des données numérique invalide ({field})")]
    InvalidNumber { field: String },

    #[error("Le chiffre d'affaires doit être positif ou nul (reçu {0})")]
    NegativeRevenue(f64),
}

/// Company attributes echoed into every report.
///
/// Serializes with the French field names used by the report JSON
/// (`nom`, `secteur`, `taille`, `chiffre_affaires`, `nombre_employes`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfile {
    #[serde(rename = "nom")]
    name: String,
    #[serde(rename = "secteur")]
    sector: String,
    #[serde(rename = "taille")]
    size: String,
    #[serde(rename = "chiffre_affaires")]
    annual_revenue: f64,
    #[serde(rename = "nombre_employes")]
    employee_count: u64,
}

impl CompanyProfile {
    /// Build a profile, rejecting negative or non-finite revenue.
    ///
    /// # Example
    /// ```
    /// use erp_hidden_costs_core_rs::CompanyProfile;
    ///
    /// let sim = CompanyProfile::new("SIM", "Industrie", "Grande", 50_000_000.0, 300).unwrap();
    /// assert_eq!(sim.employee_count(), 300);
    /// assert!(CompanyProfile::new("X", "Services", "Petite", -1.0, 10).is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        sector: impl Into<String>,
        size: impl Into<String>,
        annual_revenue: f64,
        employee_count: u64,
    ) -> Result<Self, CompanyError> {
        if !annual_revenue.is_finite() {
            return Err(CompanyError::InvalidNumber {
                field: "chiffre_affaires".to_string(),
            });
        }
        if annual_revenue < 0.0 {
            return Err(CompanyError::NegativeRevenue(annual_revenue));
        }

        Ok(Self {
            name: name.into(),
            sector: sector.into(),
            size: size.into(),
            annual_revenue,
            employee_count,
        })
    }

    /// Parse a profile from a calculation request body.
    ///
    /// A field counts as missing when it is absent or "empty" (null, false,
    /// zero, empty string, empty array or object). This means a request with
    /// `chiffre_affaires: 0` is rejected here even though the engine itself
    /// accepts zero revenue.
    pub fn from_request(body: &Map<String, Value>) -> Result<Self, CompanyError> {
        for field in REQUIRED_COMPANY_FIELDS {
            match body.get(field) {
                Some(value) if !is_empty_value(value) => {}
                _ => return Err(CompanyError::MissingField(field.to_string())),
            }
        }

        // Presence checked above
        let text = |field: &str| body.get(field).map(value_as_text).unwrap_or_default();

        let annual_revenue = parse_revenue(&body["chiffre_affaires"])?;
        let employee_count = parse_employee_count(&body["nombre_employes"])?;

        Self::new(
            text("nom_entreprise"),
            text("secteur"),
            text("taille"),
            annual_revenue,
            employee_count,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    /// Annual revenue in MAD (always >= 0)
    pub fn annual_revenue(&self) -> f64 {
        self.annual_revenue
    }

    pub fn employee_count(&self) -> u64 {
        self.employee_count
    }
}

/// Null, false, zero, `""`, `[]` and `{}` count as "not provided"
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_revenue(value: &Value) -> Result<f64, CompanyError> {
    let invalid = || CompanyError::InvalidNumber {
        field: "chiffre_affaires".to_string(),
    };

    match value {
        Value::Number(n) => n.as_f64().ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Whole numbers only; fractional JSON numbers are truncated toward zero.
fn parse_employee_count(value: &Value) -> Result<u64, CompanyError> {
    let invalid = || CompanyError::InvalidNumber {
        field: "nombre_employes".to_string(),
    };

    match value {
        Value::Number(n) => {
            if let Some(count) = n.as_u64() {
                return Ok(count);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 => Ok(f.trunc() as u64),
                _ => Err(invalid()),
            }
        }
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn valid_request() -> Value {
        json!({
            "nom_entreprise": "Distributeur National (DN)",
            "secteur": "Distribution",
            "taille": "Moyenne",
            "chiffre_affaires": 20000000,
            "nombre_employes": 150
        })
    }

    #[test]
    fn test_from_request_parses_all_fields() {
        let profile = CompanyProfile::from_request(&body(valid_request())).unwrap();
        assert_eq!(profile.name(), "Distributeur National (DN)");
        assert_eq!(profile.sector(), "Distribution");
        assert_eq!(profile.size(), "Moyenne");
        assert_eq!(profile.annual_revenue(), 20_000_000.0);
        assert_eq!(profile.employee_count(), 150);
    }

    #[test]
    fn test_missing_field_reported_in_declaration_order() {
        let mut request = valid_request();
        request.as_object_mut().unwrap().remove("taille");
        request.as_object_mut().unwrap().remove("nombre_employes");

        let err = CompanyProfile::from_request(&body(request)).unwrap_err();
        assert_eq!(err, CompanyError::MissingField("taille".to_string()));
        assert_eq!(err.to_string(), "Le champ taille est obligatoire");
    }

    #[test]
    fn test_zero_revenue_in_request_counts_as_missing() {
        let mut request = valid_request();
        request["chiffre_affaires"] = json!(0);

        let err = CompanyProfile::from_request(&body(request)).unwrap_err();
        assert_eq!(err, CompanyError::MissingField("chiffre_affaires".to_string()));
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let mut request = valid_request();
        request["chiffre_affaires"] = json!(" 1500000.5 ");
        request["nombre_employes"] = json!("42");

        let profile = CompanyProfile::from_request(&body(request)).unwrap();
        assert_eq!(profile.annual_revenue(), 1_500_000.5);
        assert_eq!(profile.employee_count(), 42);
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        let mut request = valid_request();
        request["chiffre_affaires"] = json!("beaucoup");
        let err = CompanyProfile::from_request(&body(request)).unwrap_err();
        assert!(matches!(err, CompanyError::InvalidNumber { ref field } if field == "chiffre_affaires"));

        let mut request = valid_request();
        request["nombre_employes"] = json!("12.5");
        let err = CompanyProfile::from_request(&body(request)).unwrap_err();
        assert!(matches!(err, CompanyError::InvalidNumber { ref field } if field == "nombre_employes"));
    }

    #[test]
    fn test_fractional_employee_count_truncates() {
        let mut request = valid_request();
        request["nombre_employes"] = json!(12.9);

        let profile = CompanyProfile::from_request(&body(request)).unwrap();
        assert_eq!(profile.employee_count(), 12);
    }

    #[test]
    fn test_negative_revenue_rejected() {
        let mut request = valid_request();
        request["chiffre_affaires"] = json!(-5);

        let err = CompanyProfile::from_request(&body(request)).unwrap_err();
        assert_eq!(err, CompanyError::NegativeRevenue(-5.0));
    }

    #[test]
    fn test_zero_revenue_allowed_by_constructor() {
        let profile = CompanyProfile::new("Startup", "Services", "Petite", 0.0, 3).unwrap();
        assert_eq!(profile.annual_revenue(), 0.0);
    }

    #[test]
    fn test_serializes_with_report_field_names() {
        let profile = CompanyProfile::new("PME Services (PME-S)", "Services", "Petite", 5e6, 50).unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["nom"], "PME Services (PME-S)");
        assert_eq!(json["secteur"], "Services");
        assert_eq!(json["taille"], "Petite");
        assert_eq!(json["chiffre_affaires"], 5_000_000.0);
        assert_eq!(json["nombre_employes"], 50);
    }
}
