//! Province-to-region lookup table.
//!
//! This module handles loading and validating the table that assigns each
//! province to its region and carries the per-region display metadata
//! shown on the dashboard map.

use crate::geojson::RegionProperties;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// The default table shipped with the binary. External tables passed via
/// `--table` use the same schema.
const DEFAULT_TABLE_JSON: &str = include_str!("../data/province_regions.json");

/// Region assignment and display metadata for one province.
///
/// `members` and `coverage` are display strings (e.g. "4.2M", "87%"),
/// copied verbatim to the output and never treated as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Region identifier (e.g. "Region IV-A", "CAR", "BARMM").
    pub region: String,
    /// Region display label, typically equal to `region`.
    pub name: String,
    /// Membership figure as displayed on the dashboard.
    pub members: String,
    /// Number of accredited facilities in the region.
    pub facilities: u32,
    /// Coverage percentage as displayed on the dashboard.
    pub coverage: String,
}

impl RegionInfo {
    /// Build the output feature properties from this entry.
    pub fn to_properties(&self) -> RegionProperties {
        RegionProperties {
            name: self.name.clone(),
            region: self.region.clone(),
            members: self.members.clone(),
            facilities: self.facilities,
            coverage: self.coverage.clone(),
        }
    }
}

/// Validation failures for a province table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("province table is empty")]
    Empty,
    #[error("province table contains a blank province name")]
    BlankProvince,
    #[error("province '{0}' has a blank region identifier")]
    BlankRegion(String),
    #[error("province '{0}' has a blank display name")]
    BlankName(String),
}

/// The province-to-region lookup table, keyed by province name.
///
/// Keys must exactly match the `NAME_1` property of the geometry source;
/// provinces in the input with no entry here are reported as unmatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvinceTable {
    entries: HashMap<String, RegionInfo>,
}

impl ProvinceTable {
    /// Load the table embedded at build time.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(DEFAULT_TABLE_JSON).context("Embedded province table is invalid")
    }

    /// Parse and validate a table from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: ProvinceTable =
            serde_json::from_str(json).context("Failed to parse province table JSON")?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table from an external JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read province table: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid province table: {}", path.display()))
    }

    /// Validate table invariants at startup.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.entries.is_empty() {
            return Err(TableError::Empty);
        }

        for (province, info) in &self.entries {
            if province.trim().is_empty() {
                return Err(TableError::BlankProvince);
            }
            if info.region.trim().is_empty() {
                return Err(TableError::BlankRegion(province.clone()));
            }
            if info.name.trim().is_empty() {
                return Err(TableError::BlankName(province.clone()));
            }
        }

        Ok(())
    }

    /// Look up the region entry for a province name.
    pub fn get(&self, province: &str) -> Option<&RegionInfo> {
        self.entries.get(province)
    }

    /// Number of provinces in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)] // Companion to len()
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct region identifiers in the table.
    pub fn region_count(&self) -> usize {
        let regions: std::collections::HashSet<&str> =
            self.entries.values().map(|info| info.region.as_str()).collect();
        regions.len()
    }

    /// Serialize the table as pretty-printed JSON (for `--init-table`).
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.entries).context("Failed to serialize province table")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(region: &str) -> RegionInfo {
        RegionInfo {
            region: region.to_string(),
            name: region.to_string(),
            members: "1.0M".to_string(),
            facilities: 100,
            coverage: "80%".to_string(),
        }
    }

    #[test]
    fn test_embedded_table_is_valid() {
        let table = ProvinceTable::embedded().unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.len(), 81);
        assert_eq!(table.region_count(), 17);
    }

    #[test]
    fn test_embedded_table_lookups() {
        let table = ProvinceTable::embedded().unwrap();

        let abra = table.get("Abra").unwrap();
        assert_eq!(abra.region, "CAR");
        assert_eq!(abra.name, "CAR");

        let cavite = table.get("Cavite").unwrap();
        assert_eq!(cavite.region, "Region IV-A");

        assert!(table.get("Atlantis").is_none());
    }

    #[test]
    fn test_parse_external_table() {
        let json = r#"{
            "Abra": { "region": "CAR", "name": "CAR", "members": "0.8M", "facilities": 134, "coverage": "75%" }
        }"#;

        let table = ProvinceTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Abra").unwrap().facilities, 134);
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = ProvinceTable::from_json_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_region_rejected() {
        let mut entries = HashMap::new();
        let mut info = entry("CAR");
        info.region = "  ".to_string();
        entries.insert("Abra".to_string(), info);

        let table = ProvinceTable { entries };
        assert_eq!(
            table.validate(),
            Err(TableError::BlankRegion("Abra".to_string()))
        );
    }

    #[test]
    fn test_blank_province_rejected() {
        let mut entries = HashMap::new();
        entries.insert("".to_string(), entry("CAR"));

        let table = ProvinceTable { entries };
        assert_eq!(table.validate(), Err(TableError::BlankProvince));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(
            &path,
            r#"{ "Cebu": { "region": "Region VII", "name": "Region VII", "members": "7.8M", "facilities": 894, "coverage": "89%" } }"#,
        )
        .unwrap();

        let table = ProvinceTable::load(&path).unwrap();
        assert_eq!(table.get("Cebu").unwrap().region, "Region VII");
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let result = ProvinceTable::load(Path::new("/nonexistent/table.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_to_json_pretty_round_trips() {
        let table = ProvinceTable::embedded().unwrap();
        let json = table.to_json_pretty().unwrap();
        let reparsed = ProvinceTable::from_json_str(&json).unwrap();
        assert_eq!(reparsed.len(), table.len());
    }
}
