//! Python bindings
//!
//! The host passes request bodies as JSON strings and receives
//! `(status, body)` pairs with JSON bodies, so no Python type conversion is
//! needed beyond strings and integers.

pub mod service;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::service::respond;

/// Formula catalog as a JSON string
#[pyfunction]
pub fn get_cost_definitions() -> String {
    crate::costs::get_cost_definitions()
}

/// Parse a request body; an empty string means "no body"
pub(crate) fn parse_body(body: &str) -> PyResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| PyValueError::new_err(format!("Invalid JSON: {}", e)))
}

pub(crate) fn to_response<T: Serialize>(
    result: Result<T, crate::service::ServiceError>,
) -> (u16, String) {
    let (status, body) = respond(result);
    (status, body.to_string())
}
