//! Station registry for the forecast page.
//!
//! The registry maps upstream station ids to a display name and an optional
//! danger level. It is loaded once at startup and shared read-only between
//! requests.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to read station file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse station file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationRegistryEntry {
    pub id: i64,
    pub name: String,
    pub danger_level: Option<f64>,
}

/// Station record as it appears in the registry file. Every field is optional
/// so one incomplete record does not reject the whole file.
#[derive(Debug, Deserialize)]
struct StationRecord {
    id: Option<i64>,
    name: Option<String>,
    #[serde(default)]
    dangerlevel: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: HashMap<i64, StationRegistryEntry>,
}

impl StationRegistry {
    pub fn new(entries: impl IntoIterator<Item = StationRegistryEntry>) -> Self {
        let stations = entries.into_iter().map(|entry| (entry.id, entry)).collect();
        Self { stations }
    }

    #[instrument(skip_all)]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        debug!("Reading station registry from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json(&json)?;
        info!("Loaded {} stations from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let records: Vec<StationRecord> = serde_json::from_str(json)?;
        let mut skipped = 0;

        // Later records with the same id replace earlier ones
        let entries: Vec<StationRegistryEntry> = records
            .into_iter()
            .filter_map(|record| {
                let entry = record.into_entry();
                if entry.is_none() {
                    skipped += 1;
                }
                entry
            })
            .collect();

        if skipped > 0 {
            warn!("Skipped {} station records without id or name", skipped);
        }

        Ok(Self::new(entries))
    }

    pub fn get(&self, id: i64) -> Option<&StationRegistryEntry> {
        self.stations.get(&id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationRecord {
    fn into_entry(self) -> Option<StationRegistryEntry> {
        let id = self.id?;
        let name = self.name?;
        let danger_level = self.dangerlevel.as_ref().and_then(parse_danger_level);
        if danger_level.is_none() {
            debug!("Station {} ({}) has no danger level", id, name);
        }

        Some(StationRegistryEntry {
            id,
            name,
            danger_level,
        })
    }
}

/// Danger levels arrive as numeric strings, bare numbers or `null`.
pub fn parse_danger_level(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_danger_level_variants() {
        assert_eq!(parse_danger_level(&json!("3.5")), Some(3.5));
        assert_eq!(parse_danger_level(&json!(" 12.25 ")), Some(12.25));
        assert_eq!(parse_danger_level(&json!(7)), Some(7.0));
        assert_eq!(parse_danger_level(&json!(null)), None);
        assert_eq!(parse_danger_level(&json!("n/a")), None);
        assert_eq!(parse_danger_level(&json!("")), None);
        assert_eq!(parse_danger_level(&json!(true)), None);
    }

    #[test]
    fn test_from_json_reads_records() {
        let json = r#"[
            {"id": 5, "name": "Sylhet", "dangerlevel": "3.5"},
            {"id": 7, "name": "Sunamganj", "dangerlevel": null},
            {"id": 9, "name": "Derai"}
        ]"#;

        let registry = StationRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 3);

        let sylhet = registry.get(5).unwrap();
        assert_eq!(sylhet.name, "Sylhet");
        assert_eq!(sylhet.danger_level, Some(3.5));

        assert_eq!(registry.get(7).unwrap().danger_level, None);
        assert_eq!(registry.get(9).unwrap().danger_level, None);
        assert!(registry.get(42).is_none());
    }

    #[test]
    fn test_from_json_skips_incomplete_records() {
        let json = r#"[
            {"name": "No Id", "dangerlevel": "1.0"},
            {"id": 3, "dangerlevel": "2.0"},
            {"id": 4, "name": "Habiganj", "dangerlevel": "9.5"}
        ]"#;

        let registry = StationRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(4).unwrap().name, "Habiganj");
    }

    #[test]
    fn test_from_json_later_duplicate_wins() {
        let json = r#"[
            {"id": 5, "name": "Old Name", "dangerlevel": "1.0"},
            {"id": 5, "name": "Sylhet", "dangerlevel": "3.5"}
        ]"#;

        let registry = StationRegistry::from_json(json).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(5).unwrap().name, "Sylhet");
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        let result = StationRegistry::from_json(r#"{"id": 5}"#);
        assert!(matches!(result, Err(RegistryError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = StationRegistry::load("/nonexistent/stations.json");
        assert!(matches!(result, Err(RegistryError::Io { .. })));
    }
}
