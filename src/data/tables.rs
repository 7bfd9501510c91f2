//! Lookup-table configuration files. YAML (`.yaml`/`.yml`) or JSON (`.json`).
//!
//! ```yaml
//! positions:
//!   delantero: { attack: 1.3, control: 0.7, midfield: 0.9 }
//! tactics:
//!   neutral: { opponent_attack: 1.0, opponent_defense: 1.0 }
//! ```
//!
//! The original factor names (`ataque`, `medio`, `ataque_rival`, `defensa_rival`) are accepted too.

use std::fs;
use std::path::Path;

use crate::engine::LookupTables;
use crate::error::{Result, SimError};

pub fn load_tables(path: impl AsRef<Path>) -> Result<LookupTables> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let parse_error = |reason: String| SimError::Parse {
        path: path.display().to_string(),
        reason,
    };
    let tables: LookupTables = if is_json {
        serde_json::from_str(&raw).map_err(|e| parse_error(e.to_string()))?
    } else {
        serde_yaml::from_str(&raw).map_err(|e| parse_error(e.to_string()))?
    };

    tables.validate()?;
    Ok(tables)
}

/// Stock tables when `path` is None.
pub fn load_tables_or_default(path: Option<&Path>) -> Result<LookupTables> {
    match path {
        Some(path) => load_tables(path),
        None => Ok(LookupTables::default()),
    }
}
