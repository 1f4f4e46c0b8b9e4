//! Recommendation texts selected from the dominant cost category

use serde::Serialize;
use serde_json::Value;

use crate::costs::{CostCategory, CostReport};

const ERROR_RECOMMENDATIONS: [&str; 4] = [
    "🔧 Renforcer la planification initiale avec une marge de 20%",
    "📊 Réaliser une étude de faisabilité approfondie",
    "⏱️ Établir un calendrier réaliste avec jalons intermédiaires",
    "👥 Impliquer un consultant ERP expérimenté",
];

const RESISTANCE_RECOMMENDATIONS: [&str; 4] = [
    "💬 Mettre en place un programme de communication proactive",
    "🎓 Développer un plan de formation adapté aux différents profils",
    "🤝 Impliquer les utilisateurs clés dès le début du projet",
    "🏆 Créer un système de récompense pour l'adoption du nouveau système",
];

const UNFORESEEN_RECOMMENDATIONS: [&str; 4] = [
    "🛡️ Prévoir une réserve de 15-25% pour les imprévus",
    "🔍 Identifier et prioriser les risques en amont",
    "📋 Mettre en place un comité de suivi des risques",
    "🔄 Adopter une approche agile avec itérations courtes",
];

/// Appended to every recommendation list
pub const GENERAL_RECOMMENDATIONS: [&str; 5] = [
    "✅ Former une équipe projet dédiée et compétente",
    "🎯 Choisir un ERP adapté à la taille et au secteur",
    "📝 Négocier un contrat de support et maintenance clair",
    "📈 Mesurer régulièrement l'avancement et les écarts",
    "🔄 Prévoir des revues de projet trimestrielles",
];

fn specific_recommendations(category: CostCategory) -> &'static [&'static str; 4] {
    match category {
        CostCategory::Errors => &ERROR_RECOMMENDATIONS,
        CostCategory::Resistance => &RESISTANCE_RECOMMENDATIONS,
        CostCategory::Unforeseen => &UNFORESEEN_RECOMMENDATIONS,
    }
}

/// The three category totals, in report order
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryTotals {
    pub errors: f64,
    pub resistance: f64,
    pub unforeseen: f64,
}

impl CategoryTotals {
    pub fn from_report(report: &CostReport) -> Self {
        Self {
            errors: report.errors().total(),
            resistance: report.resistance().total(),
            unforeseen: report.unforeseen().total(),
        }
    }

    /// Read `couts_*.total_*` out of a serialized report. Missing or
    /// non-numeric totals count as 0.
    pub fn from_json(resultats: &Value) -> Self {
        let total = |category: CostCategory| {
            resultats
                .get(category.report_key())
                .and_then(|block| block.get(category.total_key()))
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        };
        Self {
            errors: total(CostCategory::Errors),
            resistance: total(CostCategory::Resistance),
            unforeseen: total(CostCategory::Unforeseen),
        }
    }

    pub fn get(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Errors => self.errors,
            CostCategory::Resistance => self.resistance,
            CostCategory::Unforeseen => self.unforeseen,
        }
    }

    /// Category with the highest total. Ties go to the earlier category.
    pub fn dominant(&self) -> CostCategory {
        let mut best = CostCategory::Errors;
        for category in CostCategory::ALL {
            if self.get(category) > self.get(best) {
                best = category;
            }
        }
        best
    }
}

/// Recommendation list plus the category that drove it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommandations: Vec<&'static str>,
    pub categorie_principale: &'static str,
}

impl Recommendations {
    pub fn from_totals(totals: &CategoryTotals) -> Self {
        let dominant = totals.dominant();
        let recommandations = specific_recommendations(dominant)
            .iter()
            .chain(GENERAL_RECOMMENDATIONS.iter())
            .copied()
            .collect();
        Self {
            recommandations,
            categorie_principale: dominant.label(),
        }
    }

    pub fn from_report(report: &CostReport) -> Self {
        Self::from_totals(&CategoryTotals::from_report(report))
    }

    pub fn from_json(resultats: &Value) -> Self {
        Self::from_totals(&CategoryTotals::from_json(resultats))
    }
}
