//! Static reference content and text derived from computed results

pub mod recommendations;
pub mod reference_data;
pub mod summary;

pub use recommendations::{CategoryTotals, Recommendations, GENERAL_RECOMMENDATIONS};
pub use reference_data::{
    sector_preset, sector_statistics, ExampleCompany, SectorStatistics, ALL_SECTORS,
    EXAMPLE_COMPANIES,
};
pub use summary::{ReportSummary, SummaryError, SIMULATED_DOWNLOAD_URL};
