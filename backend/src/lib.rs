//! ERP Hidden Costs Core - Rust Engine
//!
//! Estimates the hidden costs of an ERP implementation for a company, broken
//! down into three categories: implementation errors, resistance to change
//! and unforeseen costs.
//!
//! # Architecture
//!
//! - **models**: Company profile
//! - **costs**: Parameters, formula catalog, cost calculator and reports
//! - **history**: Session-scoped calculation history
//! - **accounts**: User registry and authentication
//! - **insights**: Example companies, sector statistics, recommendations
//! - **service**: Request-level operations with JSON envelopes
//! - **config**: TOML configuration
//!
//! # Critical Invariants
//!
//! 1. Each category total is the sum of its line values
//! 2. `total_general` is the sum of the three category totals
//! 3. A malformed parameter degrades only the categories that read it
//!
//! # Example
//!
//! ```
//! use erp_hidden_costs_core_rs::{CompanyProfile, CostCalculator, ParameterSet};
//!
//! let company = CompanyProfile::new("SIM", "Industrie", "Grande", 50_000_000.0, 300).unwrap();
//! let report = CostCalculator::new().calculate_total_costs(&company, &ParameterSet::new());
//! assert!((report.total_general() - 880_400.0).abs() < 1e-6);
//! assert_eq!(report.errors().total(), 245_400.0);
//! ```

// Module declarations
pub mod accounts;
pub mod config;
pub mod costs;
pub mod history;
pub mod insights;
pub mod models;
pub mod service;

// Re-exports for convenience
pub use accounts::{AccountRegistry, AuthError, AuthenticatedUser};
pub use config::{ConfigError, EngineConfig};
pub use costs::{
    get_cost_definitions, CategoryOutcome, CostCalculator, CostCategory, CostReport,
    FormulaCatalog, ParameterError, ParameterSet,
};
pub use history::{CalculationHistory, HistoryEntry, SessionStore};
pub use insights::{Recommendations, ReportSummary};
pub use models::company::{CompanyError, CompanyProfile};
pub use service::{CostService, ServiceError};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn erp_hidden_costs_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::service::PyCostService>()?;
    m.add_function(wrap_pyfunction!(ffi::get_cost_definitions, m)?)?;
    Ok(())
}
