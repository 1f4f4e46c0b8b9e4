//! Domain models for the hidden-cost engine

pub mod company;

// Re-exports
pub use company::{CompanyError, CompanyProfile, REQUIRED_COMPANY_FIELDS};
