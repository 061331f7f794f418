//! Read-only stop catalog
//!
//! The catalog maps stop ids to coordinates and addresses. It is loaded
//! once at startup from a JSON file and filtered in memory — the worker
//! never mutates it.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::Stop;

/// In-memory stop catalog.
#[derive(Debug, Clone)]
pub struct StopCatalog {
    stops: Vec<Stop>,
}

impl StopCatalog {
    pub fn from_stops(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    /// Load the catalog from a JSON array of stops.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stop catalog at {}", path.display()))?;
        let stops: Vec<Stop> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse stop catalog at {}", path.display()))?;

        info!("Loaded {} stops from {}", stops.len(), path.display());
        Ok(Self { stops })
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Select stops matching the given ids, preserving catalog order.
    /// Unknown ids are skipped.
    pub fn select(&self, ids: &[String]) -> Vec<Stop> {
        self.stops
            .iter()
            .filter(|stop| ids.iter().any(|id| id == &stop.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StopCatalog {
        StopCatalog::from_stops(vec![
            Stop {
                id: "l1".into(),
                address: "1200 Elm St".into(),
                lat: 30.27,
                lng: -97.74,
            },
            Stop {
                id: "l2".into(),
                address: "804 Cedar Ave".into(),
                lat: 30.30,
                lng: -97.70,
            },
            Stop {
                id: "l3".into(),
                address: "55 Lakeview Dr".into(),
                lat: 30.25,
                lng: -97.78,
            },
        ])
    }

    #[test]
    fn select_preserves_catalog_order() {
        let cat = catalog();
        assert_eq!(cat.len(), 3);
        assert!(!cat.is_empty());

        let selected = cat.select(&["l3".to_string(), "l1".to_string()]);
        let ids: Vec<&str> = selected.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l3"]);
    }

    #[test]
    fn select_skips_unknown_ids() {
        let selected = catalog().select(&["l2".to_string(), "nope".to_string()]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "l2");
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = std::env::temp_dir();
        let path = dir.join("showings-catalog-malformed.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(StopCatalog::load(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
