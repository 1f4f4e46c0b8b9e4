//! Hidden-cost engine
//!
//! This module provides:
//! - Parameter sets and their documented defaults (`parameters`)
//! - The formula catalog used for documentation (`catalog`)
//! - Result types: line items, category outcomes, reports (`report`)
//! - The calculator and aggregator (`calculator`)
//!
//! # Two definitions of each formula
//!
//! The catalog text and the executable formulas are kept separate. Changing
//! a formula means updating both `catalog.rs` and `calculator.rs`; the
//! calculator tests fail if a catalog entry names a parameter the computed
//! line does not react to.

pub mod calculator;
pub mod catalog;
pub mod parameters;
pub mod report;

// Re-exports
pub use calculator::{CostCalculator, WORKING_DAYS_PER_MONTH};
pub use catalog::{get_cost_definitions, CostCatalogEntry, FormulaCatalog};
pub use parameters::{keys, ParameterError, ParameterSet};
pub use report::{
    percentage_of_revenue, CategoryBreakdown, CategoryOutcome, CostCategory, CostLineItem,
    CostReport,
};
