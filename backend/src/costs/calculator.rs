//! Cost Calculator
//!
//! Pure computation of the three hidden-cost categories from a
//! [`ParameterSet`], and the aggregator that folds them into a
//! [`CostReport`].
//!
//! # Failure policy
//!
//! Each category is computed independently. If any parameter it reads is
//! non-numeric, or one of its amounts overflows to infinity or NaN, that
//! category becomes [`CategoryOutcome::Degraded`] with a zero total and the
//! other categories are computed as usual. The aggregator itself cannot
//! fail.
//!
//! # Example
//!
//! ```rust
//! use erp_hidden_costs_core_rs::{CompanyProfile, CostCalculator, ParameterSet};
//!
//! let calculator = CostCalculator::new();
//! let company = CompanyProfile::new("SIM", "Industrie", "Grande", 50_000_000.0, 300).unwrap();
//! let report = calculator.calculate_total_costs(&company, &ParameterSet::new());
//!
//! assert_eq!(report.errors().total(), 245_400.0);
//! ```

use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use super::catalog::{FormulaCatalog, DEFAULT_UNIT};
use super::parameters::{keys, ParameterError, ParameterSet};
use super::report::{CategoryBreakdown, CategoryOutcome, CostCategory, CostLineItem, CostReport};
use crate::models::company::CompanyProfile;

/// Working days per month used to convert a schedule overrun into man-days
pub const WORKING_DAYS_PER_MONTH: f64 = 22.0;

/// Stateless calculator. Holds only the documentation catalog and the unit
/// label used in `details` strings, so one instance can serve any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct CostCalculator {
    catalog: FormulaCatalog,
    unit: String,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::with_unit(DEFAULT_UNIT)
    }
}

impl CostCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator whose catalog and details use `unit` as currency label
    pub fn with_unit(unit: &str) -> Self {
        Self {
            catalog: FormulaCatalog::with_unit(unit),
            unit: unit.to_string(),
        }
    }

    /// Read-only formula documentation
    pub fn catalog(&self) -> &FormulaCatalog {
        &self.catalog
    }

    // ========================================================================
    // Category computations
    // ========================================================================

    /// Implementation errors: planning overrun, technical fixes, extra
    /// training and custom configuration.
    pub fn calculate_error_costs(&self, params: &ParameterSet) -> CategoryOutcome {
        Self::outcome(CostCategory::Errors, self.error_lines(params))
    }

    /// Organizational resistance: productivity drop, turnover, passive
    /// resistance and extra support.
    pub fn calculate_resistance_costs(&self, params: &ParameterSet) -> CategoryOutcome {
        Self::outcome(CostCategory::Resistance, self.resistance_lines(params))
    }

    /// Unforeseen costs: organizational rework, compatibility issues,
    /// unplanned maintenance and regulatory changes.
    pub fn calculate_unforeseen_costs(&self, params: &ParameterSet) -> CategoryOutcome {
        Self::outcome(CostCategory::Unforeseen, self.unforeseen_lines(params))
    }

    pub fn calculate_category(&self, category: CostCategory, params: &ParameterSet) -> CategoryOutcome {
        match category {
            CostCategory::Errors => self.calculate_error_costs(params),
            CostCategory::Resistance => self.calculate_resistance_costs(params),
            CostCategory::Unforeseen => self.calculate_unforeseen_costs(params),
        }
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    /// Compute all three categories and wrap them, with the company profile
    /// and the current local time, into a report.
    pub fn calculate_total_costs(&self, company: &CompanyProfile, params: &ParameterSet) -> CostReport {
        self.calculate_total_costs_at(company, params, Local::now().naive_local())
    }

    /// Same as [`calculate_total_costs`](Self::calculate_total_costs) with an
    /// explicit timestamp, for reproducible output.
    pub fn calculate_total_costs_at(
        &self,
        company: &CompanyProfile,
        params: &ParameterSet,
        generated_at: NaiveDateTime,
    ) -> CostReport {
        let report = CostReport::new(
            company.clone(),
            self.calculate_error_costs(params),
            self.calculate_resistance_costs(params),
            self.calculate_unforeseen_costs(params),
            generated_at,
        );

        debug!(
            company = company.name(),
            total_general = report.total_general(),
            pourcentage_ca = report.revenue_percentage(),
            "hidden costs computed"
        );

        report
    }

    fn outcome(
        category: CostCategory,
        result: Result<CategoryBreakdown, ParameterError>,
    ) -> CategoryOutcome {
        let result = result.and_then(|breakdown| match breakdown.non_finite_key() {
            Some(line) => Err(ParameterError::NonFinite {
                line: line.to_string(),
            }),
            None => Ok(breakdown),
        });
        match result {
            Ok(breakdown) => CategoryOutcome::Computed(breakdown),
            Err(cause) => {
                warn!(
                    category = category.report_key(),
                    %cause,
                    "cost category degraded to zero"
                );
                CategoryOutcome::Degraded { category, cause }
            }
        }
    }

    // ========================================================================
    // Formulas
    // ========================================================================

    fn error_lines(&self, p: &ParameterSet) -> Result<CategoryBreakdown, ParameterError> {
        let unit = &self.unit;

        let delai_reel = p.get(keys::DELAI_REEL_MOIS)?;
        let delai_prevue = p.get(keys::DELAI_PREVUE_MOIS)?;
        let cout_jour_homme = p.get(keys::COUT_JOUR_HOMME)?;
        let retard = delai_reel - delai_prevue;
        let cout_planification = retard.max(0.0) * WORKING_DAYS_PER_MONTH * cout_jour_homme;

        let heures_correction = p.get(keys::HEURES_CORRECTION)?;
        let taux_technicien = p.get(keys::TAUX_HORAIRE_TECHNICIEN)?;
        let cout_technique = heures_correction * taux_technicien;

        let personnes = p.get(keys::NOMBRE_PERSONNES_FORMATION)?;
        let duree_formation = p.get(keys::DUREE_FORMATION_JOURS)?;
        let cout_par_jour = p.get(keys::COUT_FORMATION_PAR_JOUR)?;
        let cout_formation = personnes * duree_formation * cout_par_jour;

        let heures_configuration = p.get(keys::HEURES_CONFIGURATION)?;
        let taux_developpeur = p.get(keys::TAUX_HORAIRE_DEVELOPPEUR)?;
        let cout_configuration = heures_configuration * taux_developpeur;

        let mut b = CategoryBreakdown::new(CostCategory::Errors);
        b.push(
            "erreurs_planification",
            CostLineItem::new(
                cout_planification,
                "Dépassement délais de mise en œuvre",
                format!(
                    "{} mois de retard × {} jours × {} {}/jour",
                    retard, WORKING_DAYS_PER_MONTH, cout_jour_homme, unit
                ),
            ),
        );
        b.push(
            "erreurs_techniques",
            CostLineItem::new(
                cout_technique,
                "Corrections techniques et bugs",
                format!("{} heures × {} {}/heure", heures_correction, taux_technicien, unit),
            ),
        );
        b.push(
            "formation_inadequate",
            CostLineItem::new(
                cout_formation,
                "Formation supplémentaire nécessaire",
                format!(
                    "{} personnes × {} jours × {} {}/jour",
                    personnes, duree_formation, cout_par_jour, unit
                ),
            ),
        );
        b.push(
            "configuration_personnalisee",
            CostLineItem::new(
                cout_configuration,
                "Développements spécifiques supplémentaires",
                format!("{} heures × {} {}/heure", heures_configuration, taux_developpeur, unit),
            ),
        );
        Ok(b)
    }

    fn resistance_lines(&self, p: &ParameterSet) -> Result<CategoryBreakdown, ParameterError> {
        let unit = &self.unit;

        let taux_baisse = p.get(keys::TAUX_BAISSE_PRODUCTIVITE)?;
        let salaire = p.get(keys::SALAIRE_MOYEN_MENSUEL)?;
        let employes = p.get(keys::NOMBRE_EMPLOYES)?;
        let duree_mois = p.get(keys::DUREE_ADAPTATION_MOIS)?;
        let cout_productivite = (taux_baisse / 100.0) * salaire * employes * duree_mois;

        let departs = p.get(keys::NOMBRE_DEPARTS)?;
        let cout_embauche = p.get(keys::COUT_EMBAUCHE_PAR_PERSONNE)?;
        let cout_formation_nouveau = p.get(keys::COUT_FORMATION_NOUVEL_EMPLOYE)?;
        let cout_turnover = departs * (cout_embauche + cout_formation_nouveau);

        let heures_inefficacite = p.get(keys::HEURES_INEFFICACITE)?;
        let taux_moyen = p.get(keys::TAUX_HORAIRE_MOYEN)?;
        let cout_resistance = heures_inefficacite * taux_moyen;

        let heures_support = p.get(keys::HEURES_SUPPORT)?;
        let taux_support = p.get(keys::TAUX_HORAIRE_SUPPORT)?;
        let cout_support = heures_support * taux_support;

        let mut b = CategoryBreakdown::new(CostCategory::Resistance);
        b.push(
            "baisse_productivite",
            CostLineItem::new(
                cout_productivite,
                "Perte de productivité pendant adaptation",
                format!(
                    "{}% × {} {} × {} employés × {} mois",
                    taux_baisse, salaire, unit, employes, duree_mois
                ),
            ),
        );
        b.push(
            "turnover",
            CostLineItem::new(
                cout_turnover,
                "Coûts liés au départ des employés",
                format!(
                    "{} départs × ({} + {}) {}",
                    departs, cout_embauche, cout_formation_nouveau, unit
                ),
            ),
        );
        b.push(
            "resistance_passive",
            CostLineItem::new(
                cout_resistance,
                "Heures perdues en résistance passive",
                format!("{} heures × {} {}/heure", heures_inefficacite, taux_moyen, unit),
            ),
        );
        b.push(
            "support_supplementaire",
            CostLineItem::new(
                cout_support,
                "Support technique supplémentaire",
                format!("{} heures × {} {}/heure", heures_support, taux_support, unit),
            ),
        );
        Ok(b)
    }

    fn unforeseen_lines(&self, p: &ParameterSet) -> Result<CategoryBreakdown, ParameterError> {
        let unit = &self.unit;

        let heures_retravail = p.get(keys::HEURES_RETRAVAIL)?;
        let taux_moyen = p.get(keys::TAUX_HORAIRE_MOYEN)?;
        let cout_organisationnel = heures_retravail * taux_moyen;

        let heures_integration = p.get(keys::HEURES_INTEGRATION)?;
        let taux_technicien = p.get(keys::TAUX_HORAIRE_TECHNICIEN)?;
        let cout_compatibilite = heures_integration * taux_technicien;

        let maintenance_annuelle = p.get(keys::COUT_MAINTENANCE_ANNUEL)?;
        let taux_imprevu = p.get(keys::TAUX_MAINTENANCE_IMPREVU)?;
        let cout_maintenance = maintenance_annuelle * (taux_imprevu / 100.0);

        let heures_adaptation = p.get(keys::HEURES_ADAPTATION)?;
        let taux_expert = p.get(keys::TAUX_HORAIRE_EXPERT)?;
        let cout_reglementaire = heures_adaptation * taux_expert;

        let mut b = CategoryBreakdown::new(CostCategory::Unforeseen);
        b.push(
            "imprevus_organisationnels",
            CostLineItem::new(
                cout_organisationnel,
                "Retravail des processus organisationnels",
                format!("{} heures × {} {}/heure", heures_retravail, taux_moyen, unit),
            ),
        );
        b.push(
            "problemes_compatibilite",
            CostLineItem::new(
                cout_compatibilite,
                "Intégration avec systèmes existants",
                format!("{} heures × {} {}/heure", heures_integration, taux_technicien, unit),
            ),
        );
        b.push(
            "maintenance_imprevue",
            CostLineItem::new(
                cout_maintenance,
                "Maintenance supplémentaire non prévue",
                format!("{} {} × {}%", maintenance_annuelle, unit, taux_imprevu),
            ),
        );
        b.push(
            "evolutions_reglementaires",
            CostLineItem::new(
                cout_reglementaire,
                "Adaptations réglementaires",
                format!("{} heures × {} {}/heure", heures_adaptation, taux_expert, unit),
            ),
        );
        Ok(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_value(outcome: &CategoryOutcome, key: &str) -> f64 {
        outcome.breakdown().unwrap().line(key).unwrap().value
    }

    #[test]
    fn test_error_defaults() {
        let outcome = CostCalculator::new().calculate_error_costs(&ParameterSet::new());
        assert_eq!(line_value(&outcome, "erreurs_planification"), 70_400.0);
        assert_eq!(line_value(&outcome, "erreurs_techniques"), 30_000.0);
        assert_eq!(line_value(&outcome, "formation_inadequate"), 125_000.0);
        assert_eq!(line_value(&outcome, "configuration_personnalisee"), 20_000.0);
        assert_eq!(outcome.total(), 245_400.0);
    }

    #[test]
    fn test_resistance_defaults() {
        let outcome = CostCalculator::new().calculate_resistance_costs(&ParameterSet::new());
        assert!((line_value(&outcome, "baisse_productivite") - 360_000.0).abs() < 1e-6);
        assert_eq!(line_value(&outcome, "turnover"), 75_000.0);
        assert_eq!(line_value(&outcome, "resistance_passive"), 25_000.0);
        assert_eq!(line_value(&outcome, "support_supplementaire"), 30_000.0);
        assert!((outcome.total() - 490_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_unforeseen_defaults() {
        let outcome = CostCalculator::new().calculate_unforeseen_costs(&ParameterSet::new());
        assert_eq!(line_value(&outcome, "imprevus_organisationnels"), 15_000.0);
        assert_eq!(line_value(&outcome, "problemes_compatibilite"), 60_000.0);
        assert!((line_value(&outcome, "maintenance_imprevue") - 20_000.0).abs() < 1e-6);
        assert_eq!(line_value(&outcome, "evolutions_reglementaires"), 50_000.0);
        assert!((outcome.total() - 145_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_planning_overrun_floors_at_zero() {
        let params = ParameterSet::new()
            .with("delai_reel_mois", 6.0)
            .with("delai_prevue_mois", 10.0);
        let outcome = CostCalculator::new().calculate_error_costs(&params);

        assert_eq!(line_value(&outcome, "erreurs_planification"), 0.0);
        assert_eq!(outcome.total(), 30_000.0 + 125_000.0 + 20_000.0);
        // Details still show the raw (negative) overrun
        let details = &outcome.breakdown().unwrap().line("erreurs_planification").unwrap().details;
        assert!(details.starts_with("-4 mois de retard"), "{}", details);
    }

    #[test]
    fn test_details_interpolate_operands() {
        let outcome = CostCalculator::new().calculate_error_costs(&ParameterSet::new());
        let b = outcome.breakdown().unwrap();
        assert_eq!(
            b.line("erreurs_planification").unwrap().details,
            "4 mois de retard × 22 jours × 800 MAD/jour"
        );
        assert_eq!(b.line("erreurs_techniques").unwrap().details, "200 heures × 150 MAD/heure");

        let unforeseen = CostCalculator::new().calculate_unforeseen_costs(&ParameterSet::new());
        assert_eq!(
            unforeseen.breakdown().unwrap().line("maintenance_imprevue").unwrap().details,
            "100000 MAD × 20%"
        );
    }

    #[test]
    fn test_non_numeric_parameter_degrades_only_its_category() {
        let mut params = ParameterSet::new();
        params.set_raw("nombre_departs", json!("cinq"));

        let calculator = CostCalculator::new();
        let resistance = calculator.calculate_resistance_costs(&params);
        assert!(resistance.is_degraded());
        assert_eq!(resistance.total(), 0.0);

        assert!(!calculator.calculate_error_costs(&params).is_degraded());
        assert!(!calculator.calculate_unforeseen_costs(&params).is_degraded());
    }

    #[test]
    fn test_shared_rate_degrades_both_categories_reading_it() {
        // taux_horaire_moyen is read by resistance and unforeseen
        let mut params = ParameterSet::new();
        params.set_raw("taux_horaire_moyen", json!(null));

        let calculator = CostCalculator::new();
        assert!(!calculator.calculate_error_costs(&params).is_degraded());
        assert!(calculator.calculate_resistance_costs(&params).is_degraded());
        assert!(calculator.calculate_unforeseen_costs(&params).is_degraded());
    }

    #[test]
    fn test_overflowing_line_degrades_its_category() {
        let params = ParameterSet::new()
            .with("heures_correction", 1e308)
            .with("taux_horaire_technicien", 10.0);

        let calculator = CostCalculator::new();
        let errors = calculator.calculate_error_costs(&params);
        assert_eq!(
            errors.cause(),
            Some(&ParameterError::NonFinite {
                line: "erreurs_techniques".to_string()
            })
        );
        assert_eq!(errors.total(), 0.0);

        // Reads the same rate, but 400 h x 10 stays finite
        assert!(!calculator.calculate_unforeseen_costs(&params).is_degraded());
    }

    #[test]
    fn test_lines_summing_past_max_degrade_on_total() {
        let params = ParameterSet::new()
            .with("heures_correction", 1e304)
            .with("taux_horaire_technicien", 10_000.0)
            .with("heures_configuration", 1e304)
            .with("taux_horaire_developpeur", 10_000.0);

        let errors = CostCalculator::new().calculate_error_costs(&params);
        assert_eq!(
            errors.cause(),
            Some(&ParameterError::NonFinite {
                line: "total_erreurs".to_string()
            })
        );
    }

    #[test]
    fn test_unit_label_used_in_details() {
        let calculator = CostCalculator::with_unit("EUR");
        let outcome = calculator.calculate_error_costs(&ParameterSet::new());
        assert!(outcome
            .breakdown()
            .unwrap()
            .lines()
            .iter()
            .all(|(_, item)| item.details.contains("EUR")));
        assert!(calculator.catalog().iter().all(|(_, e)| e.unit == "EUR"));
    }

    #[test]
    fn test_catalog_matches_calculator_lines() {
        let calculator = CostCalculator::new();
        let defaults = ParameterSet::new();

        for (category, entry) in calculator.catalog().iter() {
            let baseline = calculator.calculate_category(category, &defaults);
            let base_value = line_value(&baseline, entry.line_key);

            // Every parameter the catalog names must move the computed line
            for (param, default) in &entry.parameters {
                let bumped = ParameterSet::new().with(*param, default + 1.0);
                let outcome = calculator.calculate_category(category, &bumped);
                assert_ne!(
                    line_value(&outcome, entry.line_key),
                    base_value,
                    "{} does not react to {}",
                    entry.line_key,
                    param
                );
            }
        }
    }
}
