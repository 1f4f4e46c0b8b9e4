//! PyO3 wrapper for CostService

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::{parse_body, to_response};
use crate::config::EngineConfig;
use crate::service::{success_body, CostService as RustCostService};

/// Python wrapper for the Rust cost service
///
/// # Example (from Python)
///
/// ```python
/// from erp_hidden_costs_core_rs import CostService
///
/// service = CostService()
/// sid = service.open_session()
/// status, body = service.login(sid, '{"email": "demo@erp.ma", "password": "demo123"}')
/// status, body = service.calculate(sid, json.dumps(form))
/// ```
#[pyclass(name = "CostService")]
pub struct PyCostService {
    inner: RustCostService,
}

#[pymethods]
impl PyCostService {
    /// Create a service, optionally from a TOML configuration document
    ///
    /// # Errors
    ///
    /// Raises ValueError if the TOML is malformed or fails validation.
    #[new]
    #[pyo3(signature = (config_toml=None))]
    fn new(config_toml: Option<&str>) -> PyResult<Self> {
        let config = match config_toml {
            Some(text) => EngineConfig::from_toml(text)
                .map_err(|e| PyValueError::new_err(format!("Invalid config: {}", e)))?,
            None => EngineConfig::default(),
        };
        Ok(Self {
            inner: RustCostService::new(config)
                .map_err(|e| PyValueError::new_err(format!("Invalid config: {}", e)))?,
        })
    }

    fn open_session(&self) -> String {
        self.inner.open_session()
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    fn signup(&self, session_id: &str, body: &str) -> PyResult<(u16, String)> {
        let body = parse_body(body)?;
        Ok(to_response(self.inner.signup(session_id, &body)))
    }

    fn login(&self, session_id: &str, body: &str) -> PyResult<(u16, String)> {
        let body = parse_body(body)?;
        Ok(to_response(self.inner.login(session_id, &body)))
    }

    fn logout(&self, session_id: &str) -> (u16, String) {
        (200, success_body(self.inner.logout(session_id)).to_string())
    }

    /// `{"authenticated": bool, "user"?: {...}}` (no envelope)
    fn check_auth(&self, session_id: &str) -> String {
        self.inner.check_auth(session_id).to_string()
    }

    // ========================================================================
    // Costs
    // ========================================================================

    /// Returns `{"success": true, "resultats": {...}}` on success
    fn calculate(&self, session_id: &str, body: &str) -> PyResult<(u16, String)> {
        let body = parse_body(body)?;
        let result = self
            .inner
            .calculate(session_id, &body)
            .map(|report| serde_json::json!({ "resultats": report }));
        Ok(to_response(result))
    }

    fn history(&self, session_id: &str) -> (u16, String) {
        let historique = self.inner.history(session_id);
        to_response(Ok(serde_json::json!({ "historique": historique })))
    }

    fn definitions(&self) -> (u16, String) {
        to_response(Ok(self.inner.definitions()))
    }

    fn examples(&self) -> (u16, String) {
        to_response(Ok(serde_json::json!({ "exemples": self.inner.examples() })))
    }

    #[pyo3(signature = (sector=None))]
    fn sector_statistics(&self, sector: Option<&str>) -> (u16, String) {
        to_response(Ok(self.inner.sector_statistics(sector)))
    }

    fn recommendations(&self, body: &str) -> PyResult<(u16, String)> {
        let body = parse_body(body)?;
        Ok(to_response(self.inner.recommendations(&body)))
    }

    fn report(&self, session_id: &str, body: &str) -> PyResult<(u16, String)> {
        let body = parse_body(body)?;
        Ok(to_response(self.inner.report(session_id, &body)))
    }

    /// Health document (no envelope)
    fn health(&self) -> String {
        self.inner.health().to_string()
    }
}
