//! Parameter sets and their documented defaults
//!
//! A [`ParameterSet`] is a flat mapping from parameter name to a JSON value.
//! Formulas read numbers out of it with [`ParameterSet::number_or`], falling
//! back to the default documented next to each key below. Values are never
//! range-checked: negative or odd numbers flow straight into the formulas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ============================================================================
// PARAMETER KEYS AND DEFAULTS
// ============================================================================

/// Parameter names read by the calculator, paired with their defaults.
pub mod keys {
    // Errors
    pub const DELAI_REEL_MOIS: (&str, f64) = ("delai_reel_mois", 12.0);
    pub const DELAI_PREVUE_MOIS: (&str, f64) = ("delai_prevue_mois", 8.0);
    pub const COUT_JOUR_HOMME: (&str, f64) = ("cout_jour_homme", 800.0);
    pub const HEURES_CORRECTION: (&str, f64) = ("heures_correction", 200.0);
    pub const TAUX_HORAIRE_TECHNICIEN: (&str, f64) = ("taux_horaire_technicien", 150.0);
    pub const NOMBRE_PERSONNES_FORMATION: (&str, f64) = ("nombre_personnes_formation", 50.0);
    pub const DUREE_FORMATION_JOURS: (&str, f64) = ("duree_formation_jours", 5.0);
    pub const COUT_FORMATION_PAR_JOUR: (&str, f64) = ("cout_formation_par_jour", 500.0);
    pub const HEURES_CONFIGURATION: (&str, f64) = ("heures_configuration", 100.0);
    pub const TAUX_HORAIRE_DEVELOPPEUR: (&str, f64) = ("taux_horaire_developpeur", 200.0);

    // Resistance
    pub const TAUX_BAISSE_PRODUCTIVITE: (&str, f64) = ("taux_baisse_productivite", 15.0);
    pub const SALAIRE_MOYEN_MENSUEL: (&str, f64) = ("salaire_moyen_mensuel", 8000.0);
    pub const NOMBRE_EMPLOYES: (&str, f64) = ("nombre_employes", 100.0);
    pub const DUREE_ADAPTATION_MOIS: (&str, f64) = ("duree_adaptation_mois", 3.0);
    pub const NOMBRE_DEPARTS: (&str, f64) = ("nombre_departs", 5.0);
    pub const COUT_EMBAUCHE_PAR_PERSONNE: (&str, f64) = ("cout_embauche_par_personne", 10_000.0);
    pub const COUT_FORMATION_NOUVEL_EMPLOYE: (&str, f64) = ("cout_formation_nouvel_employe", 5000.0);
    pub const HEURES_INEFFICACITE: (&str, f64) = ("heures_inefficacite", 500.0);
    pub const TAUX_HORAIRE_MOYEN: (&str, f64) = ("taux_horaire_moyen", 50.0);
    pub const HEURES_SUPPORT: (&str, f64) = ("heures_support", 300.0);
    pub const TAUX_HORAIRE_SUPPORT: (&str, f64) = ("taux_horaire_support", 100.0);

    // Unforeseen
    pub const HEURES_RETRAVAIL: (&str, f64) = ("heures_retravail", 300.0);
    pub const HEURES_INTEGRATION: (&str, f64) = ("heures_integration", 400.0);
    pub const COUT_MAINTENANCE_ANNUEL: (&str, f64) = ("cout_maintenance_annuel", 100_000.0);
    pub const TAUX_MAINTENANCE_IMPREVU: (&str, f64) = ("taux_maintenance_imprevu", 20.0);
    pub const HEURES_ADAPTATION: (&str, f64) = ("heures_adaptation", 200.0);
    pub const TAUX_HORAIRE_EXPERT: (&str, f64) = ("taux_horaire_expert", 250.0);

    /// Every key the calculator reads (shared rates appear once).
    pub const ALL: [(&str, f64); 27] = [
        DELAI_REEL_MOIS,
        DELAI_PREVUE_MOIS,
        COUT_JOUR_HOMME,
        HEURES_CORRECTION,
        TAUX_HORAIRE_TECHNICIEN,
        NOMBRE_PERSONNES_FORMATION,
        DUREE_FORMATION_JOURS,
        COUT_FORMATION_PAR_JOUR,
        HEURES_CONFIGURATION,
        TAUX_HORAIRE_DEVELOPPEUR,
        TAUX_BAISSE_PRODUCTIVITE,
        SALAIRE_MOYEN_MENSUEL,
        NOMBRE_EMPLOYES,
        DUREE_ADAPTATION_MOIS,
        NOMBRE_DEPARTS,
        COUT_EMBAUCHE_PAR_PERSONNE,
        COUT_FORMATION_NOUVEL_EMPLOYE,
        HEURES_INEFFICACITE,
        TAUX_HORAIRE_MOYEN,
        HEURES_SUPPORT,
        TAUX_HORAIRE_SUPPORT,
        HEURES_RETRAVAIL,
        HEURES_INTEGRATION,
        COUT_MAINTENANCE_ANNUEL,
        TAUX_MAINTENANCE_IMPREVU,
        HEURES_ADAPTATION,
        TAUX_HORAIRE_EXPERT,
    ];
}

// ============================================================================
// PARAMETER SET
// ============================================================================

/// Raised when a parameter cannot be used as a number, or when the amounts
/// computed from otherwise valid parameters leave the range of `f64`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("parameter '{key}' is not numeric (got {found})")]
    NotNumeric { key: String, found: String },

    #[error("amount '{line}' overflows")]
    NonFinite { line: String },
}

/// Flat mapping of optional numeric overrides.
///
/// Unknown keys are kept but never read. Only JSON numbers are numeric;
/// strings (even "12"), booleans, null and containers are rejected when a
/// formula reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, Value>,
}

impl ParameterSet {
    /// Empty set: every formula uses its defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object (the `parametres` field of a request)
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        Self {
            values: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    /// Set a numeric value, builder-style.
    ///
    /// # Example
    /// ```
    /// use erp_hidden_costs_core_rs::ParameterSet;
    ///
    /// let params = ParameterSet::new().with("nombre_departs", 0.0);
    /// assert_eq!(params.number_or("nombre_departs", 5.0), Ok(0.0));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Set a numeric value. Non-finite values are stored as null, which
    /// formulas then reject.
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        let json = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        self.values.insert(key.into(), json);
    }

    /// Store a raw JSON value (used to carry request input unchanged)
    pub fn set_raw(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Merge `overrides` on top of `self`; overriding keys win.
    pub fn with_overrides(mut self, overrides: &ParameterSet) -> Self {
        for (key, value) in &overrides.values {
            self.values.insert(key.clone(), value.clone());
        }
        self
    }

    /// Read `key` as a number, or `default` if it is absent.
    pub fn number_or(&self, key: &str, default: f64) -> Result<f64, ParameterError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| ParameterError::NotNumeric {
                key: key.to_string(),
                found: n.to_string(),
            }),
            Some(other) => Err(ParameterError::NotNumeric {
                key: key.to_string(),
                found: other.to_string(),
            }),
        }
    }

    /// Convenience for the `(key, default)` pairs in [`keys`]
    pub fn get(&self, param: (&str, f64)) -> Result<f64, ParameterError> {
        self.number_or(param.0, param.1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (key, value) in iter {
            set.set(key, value);
        }
        set
    }
}
