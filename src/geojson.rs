//! GeoJSON data model and file I/O.
//!
//! This module contains the typed representation of the province-level
//! input FeatureCollection and the region-level output FeatureCollection,
//! plus the two file operations the tool performs.

use anyhow::{Context, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// A single GeoJSON position (longitude, latitude, optional altitude).
pub type Position = Vec<f64>;

/// A linear ring: a closed sequence of positions.
pub type Ring = Vec<Position>;

/// Polygon coordinates: one outer ring plus any holes.
pub type PolygonCoords = Vec<Ring>;

/// MultiPolygon coordinates: a list of polygon ring-arrays.
pub type MultiPolygonCoords = Vec<PolygonCoords>;

/// Geometry of an input province feature.
///
/// Only `Polygon` and `MultiPolygon` carry coordinates; any other GeoJSON
/// geometry type (e.g. `GeometryCollection`, `Point`) deserializes to
/// `Unsupported` with the foreign type name preserved for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(PolygonCoords),
    MultiPolygon(MultiPolygonCoords),
    Unsupported(String),
}

/// Raw geometry capture used during deserialization.
///
/// Unknown geometry types carry their payload under keys other than
/// `coordinates` (e.g. `geometries`), so coordinates default to null.
#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawGeometry::deserialize(deserializer)?;
        match raw.kind.as_str() {
            "Polygon" => serde_json::from_value(raw.coordinates)
                .map(Geometry::Polygon)
                .map_err(|e| de::Error::custom(format!("invalid Polygon coordinates: {}", e))),
            "MultiPolygon" => serde_json::from_value(raw.coordinates)
                .map(Geometry::MultiPolygon)
                .map_err(|e| {
                    de::Error::custom(format!("invalid MultiPolygon coordinates: {}", e))
                }),
            other => Ok(Geometry::Unsupported(other.to_string())),
        }
    }
}

impl Geometry {
    /// Returns the GeoJSON type name of this geometry.
    #[allow(dead_code)] // Utility for diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Unsupported(kind) => kind,
        }
    }
}

/// Properties of an input province feature.
///
/// `NAME_1` is the GADM convention for the first-level administrative
/// division name; all other source properties are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvinceProperties {
    #[serde(rename = "NAME_1")]
    pub name: String,
}

/// One province feature from the input FeatureCollection.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvinceFeature {
    pub properties: ProvinceProperties,
    pub geometry: Geometry,
}

/// The province-level input FeatureCollection.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvinceCollection {
    pub features: Vec<ProvinceFeature>,
}

/// Display properties attached to each output region feature.
///
/// `members` and `coverage` are free-form display strings copied verbatim
/// from the lookup table; they are never parsed as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionProperties {
    pub name: String,
    pub region: String,
    pub members: String,
    pub facilities: u32,
    pub coverage: String,
}

/// The output geometry: always a MultiPolygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: MultiPolygonCoords,
}

impl MultiPolygonGeometry {
    pub fn new(coordinates: MultiPolygonCoords) -> Self {
        Self {
            kind: "MultiPolygon".to_string(),
            coordinates,
        }
    }
}

/// One region feature in the output FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: RegionProperties,
    pub geometry: MultiPolygonGeometry,
}

impl RegionFeature {
    pub fn new(properties: RegionProperties, coordinates: MultiPolygonCoords) -> Self {
        Self {
            kind: "Feature".to_string(),
            properties,
            geometry: MultiPolygonGeometry::new(coordinates),
        }
    }
}

/// The region-level output FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<RegionFeature>,
}

impl RegionCollection {
    pub fn new(features: Vec<RegionFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

/// Read and parse the province-level FeatureCollection.
///
/// A missing file or unparsable JSON is fatal: the error propagates to the
/// caller with context and the run aborts without partial output.
pub fn read_provinces(path: &Path) -> Result<ProvinceCollection> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read province geometry: {}", path.display()))?;

    let collection: ProvinceCollection = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse province geometry: {}", path.display()))?;

    Ok(collection)
}

/// Serialize and write the region-level FeatureCollection.
///
/// Pretty-printing is the default (matching what the map component was
/// built against); `pretty = false` writes minified JSON.
pub fn write_regions(path: &Path, regions: &RegionCollection, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(regions)
    } else {
        serde_json::to_string(regions)
    }
    .context("Failed to serialize region FeatureCollection")?;

    fs::write(path, json)
        .with_context(|| format!("Failed to write region geometry: {}", path.display()))?;

    Ok(())
}
