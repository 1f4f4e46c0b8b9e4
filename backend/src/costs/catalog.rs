//! Formula Catalog
//!
//! Static, read-only documentation of every cost line: display name,
//! description, formula text and unit. The catalog is never evaluated; the
//! executable formulas live in `calculator.rs`. Each entry records the
//! calculator line it documents and the parameters its formula reads, so
//! tests can check both definitions stay in step.

use serde::Serialize;

use super::parameters::keys;
use super::report::CostCategory;

/// Default unit label for every cost line
pub const DEFAULT_UNIT: &str = "MAD";

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Documentation for a single cost line.
///
/// Serializes as `{nom, description, formule, unite}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostCatalogEntry {
    #[serde(rename = "nom")]
    pub name: String,

    pub description: String,

    /// Formula in plain text (documentation only)
    #[serde(rename = "formule")]
    pub formula_text: String,

    #[serde(rename = "unite")]
    pub unit: String,

    /// Key of the calculator line this entry documents
    #[serde(skip)]
    pub line_key: &'static str,

    /// Parameters mentioned by the formula, with their defaults
    #[serde(skip)]
    pub parameters: Vec<(&'static str, f64)>,
}

/// The three fixed catalogs, four entries each
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaCatalog {
    #[serde(rename = "couts_erreurs")]
    errors: Vec<CostCatalogEntry>,
    #[serde(rename = "couts_resistance")]
    resistance: Vec<CostCatalogEntry>,
    #[serde(rename = "couts_imprevus")]
    unforeseen: Vec<CostCatalogEntry>,
}

impl Default for FormulaCatalog {
    fn default() -> Self {
        Self::with_unit(DEFAULT_UNIT)
    }
}

impl FormulaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog labelling every line with `unit`
    pub fn with_unit(unit: &str) -> Self {
        Self {
            errors: error_entries(unit),
            resistance: resistance_entries(unit),
            unforeseen: unforeseen_entries(unit),
        }
    }

    pub fn entries(&self, category: CostCategory) -> &[CostCatalogEntry] {
        match category {
            CostCategory::Errors => &self.errors,
            CostCategory::Resistance => &self.resistance,
            CostCategory::Unforeseen => &self.unforeseen,
        }
    }

    /// All entries, category by category
    pub fn iter(&self) -> impl Iterator<Item = (CostCategory, &CostCatalogEntry)> {
        CostCategory::ALL
            .into_iter()
            .flat_map(move |c| self.entries(c).iter().map(move |e| (c, e)))
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.resistance.len() + self.unforeseen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The three lists as JSON, verbatim, for UI/documentation rendering
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn entry(
    unit: &str,
    line_key: &'static str,
    name: &str,
    description: &str,
    formula_text: &str,
    parameters: &[(&'static str, f64)],
) -> CostCatalogEntry {
    CostCatalogEntry {
        name: name.to_string(),
        description: description.to_string(),
        formula_text: formula_text.to_string(),
        unit: unit.to_string(),
        line_key,
        parameters: parameters.to_vec(),
    }
}

// ============================================================================
// CATALOG CONTENT
// ============================================================================

fn error_entries(unit: &str) -> Vec<CostCatalogEntry> {
    vec![
        entry(
            unit,
            "erreurs_planification",
            "Erreurs de planification",
            "Dépassement des délais et budget initial dû à une mauvaise estimation",
            "cout_planification = max(0, delai_reel_mois - delai_prevue_mois) * 22 * cout_jour_homme",
            &[keys::DELAI_REEL_MOIS, keys::DELAI_PREVUE_MOIS, keys::COUT_JOUR_HOMME],
        ),
        entry(
            unit,
            "erreurs_techniques",
            "Erreurs techniques",
            "Corrections de bugs, problèmes de configuration et ajustements techniques",
            "cout_technique = heures_correction * taux_horaire_technicien",
            &[keys::HEURES_CORRECTION, keys::TAUX_HORAIRE_TECHNICIEN],
        ),
        entry(
            unit,
            "formation_inadequate",
            "Formation inadéquate",
            "Formation supplémentaire nécessaire suite à un mauvais planning initial",
            "cout_formation = nombre_personnes_formation * duree_formation_jours * cout_formation_par_jour",
            &[
                keys::NOMBRE_PERSONNES_FORMATION,
                keys::DUREE_FORMATION_JOURS,
                keys::COUT_FORMATION_PAR_JOUR,
            ],
        ),
        entry(
            unit,
            "configuration_personnalisee",
            "Configuration personnalisée",
            "Développements spécifiques non prévus initialement",
            "cout_configuration = heures_configuration * taux_horaire_developpeur",
            &[keys::HEURES_CONFIGURATION, keys::TAUX_HORAIRE_DEVELOPPEUR],
        ),
    ]
}

fn resistance_entries(unit: &str) -> Vec<CostCatalogEntry> {
    vec![
        entry(
            unit,
            "baisse_productivite",
            "Baisse de productivité",
            "Réduction temporaire de l'efficacité des employés pendant la période d'adaptation",
            "cout_productivite = (taux_baisse_productivite / 100) * salaire_moyen_mensuel * nombre_employes * duree_adaptation_mois",
            &[
                keys::TAUX_BAISSE_PRODUCTIVITE,
                keys::SALAIRE_MOYEN_MENSUEL,
                keys::NOMBRE_EMPLOYES,
                keys::DUREE_ADAPTATION_MOIS,
            ],
        ),
        entry(
            unit,
            "turnover",
            "Turnover accru",
            "Départ d'employés ne s'adaptant pas au nouveau système",
            "cout_turnover = nombre_departs * (cout_embauche_par_personne + cout_formation_nouvel_employe)",
            &[
                keys::NOMBRE_DEPARTS,
                keys::COUT_EMBAUCHE_PAR_PERSONNE,
                keys::COUT_FORMATION_NOUVEL_EMPLOYE,
            ],
        ),
        entry(
            unit,
            "resistance_passive",
            "Résistance passive",
            "Temps perdu en résistance au changement et non-utilisation optimale",
            "cout_resistance = heures_inefficacite * taux_horaire_moyen",
            &[keys::HEURES_INEFFICACITE, keys::TAUX_HORAIRE_MOYEN],
        ),
        entry(
            unit,
            "support_supplementaire",
            "Support supplémentaire",
            "Besoin accru en support technique et fonctionnel pendant la transition",
            "cout_support = heures_support * taux_horaire_support",
            &[keys::HEURES_SUPPORT, keys::TAUX_HORAIRE_SUPPORT],
        ),
    ]
}

fn unforeseen_entries(unit: &str) -> Vec<CostCatalogEntry> {
    vec![
        entry(
            unit,
            "imprevus_organisationnels",
            "Imprévus organisationnels",
            "Changements non prévus dans les processus métier",
            "cout_organisationnel = heures_retravail * taux_horaire_moyen",
            &[keys::HEURES_RETRAVAIL, keys::TAUX_HORAIRE_MOYEN],
        ),
        entry(
            unit,
            "problemes_compatibilite",
            "Problèmes de compatibilité",
            "Intégration complexe avec systèmes existants",
            "cout_compatibilite = heures_integration * taux_horaire_technicien",
            &[keys::HEURES_INTEGRATION, keys::TAUX_HORAIRE_TECHNICIEN],
        ),
        entry(
            unit,
            "maintenance_imprevue",
            "Coûts de maintenance imprévus",
            "Maintenance corrective et évolutive non prévue au budget",
            "cout_maintenance = cout_maintenance_annuel * (taux_maintenance_imprevu / 100)",
            &[keys::COUT_MAINTENANCE_ANNUEL, keys::TAUX_MAINTENANCE_IMPREVU],
        ),
        entry(
            unit,
            "evolutions_reglementaires",
            "Évolutions réglementaires",
            "Adaptations nécessaires suite à des changements réglementaires",
            "cout_reglementaire = heures_adaptation * taux_horaire_expert",
            &[keys::HEURES_ADAPTATION, keys::TAUX_HORAIRE_EXPERT],
        ),
    ]
}

/// Get the cost definitions as a JSON string.
///
/// Shape: `{"couts_erreurs": [...], "couts_resistance": [...], "couts_imprevus": [...]}`
pub fn get_cost_definitions() -> String {
    serde_json::to_string_pretty(&FormulaCatalog::new()).unwrap_or_else(|_| "{}".to_string())
}
