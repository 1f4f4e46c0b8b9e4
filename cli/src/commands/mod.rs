//! CLI command implementations.

pub mod calculate;
pub mod recommend;
pub mod reference;

use std::fs;
use std::path::Path;

use erp_hidden_costs_core_rs::EngineConfig;
use serde_json::{Map, Value};

use crate::error::{CliError, CliResult};

/// Load the engine configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Read a file holding a single JSON value.
pub fn read_json(path: &Path) -> CliResult<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Read a file holding a JSON object.
pub fn read_json_object(path: &Path) -> CliResult<Map<String, Value>> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::InvalidInput(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
    }
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_json_object_rejects_arrays() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        assert!(matches!(
            read_json_object(file.path()),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
