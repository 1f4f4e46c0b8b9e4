//! Static reference data: example companies, sector statistics and
//! per-sector parameter presets.

use serde::Serialize;

use crate::costs::ParameterSet;
use crate::models::company::{CompanyError, CompanyProfile};

/// A ready-made company used to prefill the calculator form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleCompany {
    pub nom: &'static str,
    pub secteur: &'static str,
    pub taille: &'static str,
    pub chiffre_affaires: f64,
    pub nombre_employes: u64,
    pub description: &'static str,
}

impl ExampleCompany {
    pub fn profile(&self) -> Result<CompanyProfile, CompanyError> {
        CompanyProfile::new(
            self.nom,
            self.secteur,
            self.taille,
            self.chiffre_affaires,
            self.nombre_employes,
        )
    }
}

pub static EXAMPLE_COMPANIES: [ExampleCompany; 4] = [
    ExampleCompany {
        nom: "Société Industrielle Marocaine (SIM)",
        secteur: "Industrie",
        taille: "Grande",
        chiffre_affaires: 50_000_000.0,
        nombre_employes: 300,
        description: "Entreprise industrielle avec processus complexes",
    },
    ExampleCompany {
        nom: "Distributeur National (DN)",
        secteur: "Distribution",
        taille: "Moyenne",
        chiffre_affaires: 20_000_000.0,
        nombre_employes: 150,
        description: "Chaîne de distribution nationale",
    },
    ExampleCompany {
        nom: "PME Services (PME-S)",
        secteur: "Services",
        taille: "Petite",
        chiffre_affaires: 5_000_000.0,
        nombre_employes: 50,
        description: "PME spécialisée dans les services",
    },
    ExampleCompany {
        nom: "Groupe Textile Marocain (GTM)",
        secteur: "Textile",
        taille: "Grande",
        chiffre_affaires: 80_000_000.0,
        nombre_employes: 500,
        description: "Groupe textile exportateur",
    },
];

/// Observed average hidden costs for a sector (MAD)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorStatistics {
    pub couts_moyens_erreurs: f64,
    pub couts_moyens_resistance: f64,
    pub couts_moyens_imprevus: f64,
    pub total_moyen: f64,
    pub nombre_implementations: u32,
    pub taux_reussite: &'static str,
}

const fn stats(
    erreurs: f64,
    resistance: f64,
    imprevus: f64,
    total: f64,
    implementations: u32,
    reussite: &'static str,
) -> SectorStatistics {
    SectorStatistics {
        couts_moyens_erreurs: erreurs,
        couts_moyens_resistance: resistance,
        couts_moyens_imprevus: imprevus,
        total_moyen: total,
        nombre_implementations: implementations,
        taux_reussite: reussite,
    }
}

/// Label of the all-sectors aggregate
pub const ALL_SECTORS: &str = "Tous";

static SECTOR_STATISTICS: [(&str, SectorStatistics); 5] = [
    ("Industrie", stats(450_000.0, 350_000.0, 300_000.0, 1_100_000.0, 25, "72%")),
    ("Services", stats(300_000.0, 250_000.0, 200_000.0, 750_000.0, 40, "85%")),
    ("Distribution", stats(400_000.0, 300_000.0, 250_000.0, 950_000.0, 30, "78%")),
    ("Textile", stats(500_000.0, 400_000.0, 350_000.0, 1_250_000.0, 15, "65%")),
    (ALL_SECTORS, stats(412_500.0, 325_000.0, 275_000.0, 1_012_500.0, 110, "75%")),
];

/// Statistics for `sector` (exact label); unknown sectors get the
/// all-sectors aggregate.
pub fn sector_statistics(sector: &str) -> &'static SectorStatistics {
    // The aggregate is the last row
    let fallback = &SECTOR_STATISTICS[SECTOR_STATISTICS.len() - 1];
    let (_, stats) = SECTOR_STATISTICS
        .iter()
        .find(|(name, _)| *name == sector)
        .unwrap_or(fallback);
    stats
}

const PRESET_KEYS: [&str; 18] = [
    "delai_prevue_mois",
    "delai_reel_mois",
    "cout_jour_homme",
    "heures_correction",
    "heures_configuration",
    "taux_horaire_developpeur",
    "taux_baisse_productivite",
    "salaire_moyen_mensuel",
    "duree_adaptation_mois",
    "nombre_departs",
    "heures_support",
    "taux_horaire_support",
    "heures_retravail",
    "heures_integration",
    "cout_maintenance_annuel",
    "taux_maintenance_imprevu",
    "heures_adaptation",
    "taux_horaire_expert",
];

/// Values in `PRESET_KEYS` order
static SECTOR_PRESETS: [(&str, [f64; 18]); 4] = [
    (
        "industrie",
        [
            10.0, 15.0, 1000.0, 300.0, 150.0, 200.0, 20.0, 9000.0, 4.0, 8.0, 400.0, 120.0,
            400.0, 500.0, 150_000.0, 25.0, 250.0, 300.0,
        ],
    ),
    (
        "services",
        [
            8.0, 12.0, 800.0, 200.0, 100.0, 200.0, 15.0, 8000.0, 3.0, 5.0, 300.0, 100.0, 300.0,
            400.0, 100_000.0, 20.0, 200.0, 250.0,
        ],
    ),
    (
        "distribution",
        [
            9.0, 14.0, 900.0, 250.0, 120.0, 200.0, 18.0, 7500.0, 3.0, 6.0, 350.0, 110.0, 350.0,
            450.0, 120_000.0, 22.0, 220.0, 280.0,
        ],
    ),
    (
        "textile",
        [
            11.0, 16.0, 950.0, 350.0, 180.0, 220.0, 22.0, 6500.0, 5.0, 10.0, 450.0, 130.0,
            450.0, 550.0, 180_000.0, 28.0, 280.0, 320.0,
        ],
    ),
];

/// Typical parameter values for a sector (case-insensitive); unknown
/// sectors fall back to the services preset.
pub fn sector_preset(sector: &str) -> ParameterSet {
    let wanted = sector.to_lowercase();
    let (_, values) = SECTOR_PRESETS
        .iter()
        .find(|(name, _)| *name == wanted)
        .unwrap_or(&SECTOR_PRESETS[1]);
    PRESET_KEYS.iter().copied().zip(values.iter().copied()).collect()
}
