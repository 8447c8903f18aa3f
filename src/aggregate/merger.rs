//! Region merging logic.
//!
//! Collapses N province polygons into M region MultiPolygons (M <= N) in a
//! single pass over the input features. The transform is pure: it takes the
//! parsed table and collection and returns the merged collection plus
//! diagnostics, leaving all file I/O to the caller.

use crate::geojson::{
    Geometry, MultiPolygonCoords, ProvinceCollection, RegionCollection, RegionFeature,
    RegionProperties,
};
use crate::table::{ProvinceTable, RegionInfo};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A province whose geometry type is neither Polygon nor MultiPolygon.
///
/// Such a province contributes nothing to the output: its metadata is not
/// used to seed a region, and the condition is reported after the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGeometry {
    pub province: String,
    pub geometry_type: String,
}

/// A province whose table entry disagrees with the metadata already seeded
/// for its region. First-seen values are kept; the conflict is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataConflict {
    pub province: String,
    pub region: String,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// The merged region FeatureCollection, sorted by region identifier.
    pub regions: RegionCollection,
    /// Total input features processed.
    pub provinces_read: usize,
    /// Province names with no entry in the lookup table, in input order.
    pub unmatched: Vec<String>,
    /// Provinces dropped for carrying an unsupported geometry type.
    pub unsupported: Vec<SkippedGeometry>,
    /// Provinces whose metadata disagreed with their region's seeded values.
    pub conflicts: Vec<MetadataConflict>,
}

/// Per-region accumulator while the pass is running.
struct RegionBucket {
    properties: RegionProperties,
    coordinates: MultiPolygonCoords,
}

/// Merge province features into region features.
///
/// Ordering contract: region features are emitted sorted by region
/// identifier; within a region, polygons appear in input feature order. A
/// Polygon's ring-array becomes one MultiPolygon entry; a MultiPolygon's
/// entries are spliced in individually. Region metadata comes from the
/// first matched province of each region.
pub fn aggregate(table: &ProvinceTable, provinces: &ProvinceCollection) -> Aggregation {
    let mut buckets: BTreeMap<String, RegionBucket> = BTreeMap::new();
    let mut unmatched = Vec::new();
    let mut unsupported = Vec::new();
    let mut conflicts = Vec::new();

    for feature in &provinces.features {
        let province = &feature.properties.name;

        let Some(info) = table.get(province) else {
            warn!("No region entry for province '{}'", province);
            unmatched.push(province.clone());
            continue;
        };

        match &feature.geometry {
            Geometry::Unsupported(kind) => {
                warn!(
                    "Skipping '{}': unsupported geometry type '{}'",
                    province, kind
                );
                unsupported.push(SkippedGeometry {
                    province: province.clone(),
                    geometry_type: kind.clone(),
                });
            }
            Geometry::Polygon(rings) => {
                let bucket = bucket_for(&mut buckets, &mut conflicts, province, info);
                bucket.coordinates.push(rings.clone());
                debug!("'{}' -> {} (Polygon, 1 entry)", province, info.region);
            }
            Geometry::MultiPolygon(polygons) => {
                let bucket = bucket_for(&mut buckets, &mut conflicts, province, info);
                bucket.coordinates.extend(polygons.iter().cloned());
                debug!(
                    "'{}' -> {} (MultiPolygon, {} entries)",
                    province,
                    info.region,
                    polygons.len()
                );
            }
        }
    }

    let features: Vec<RegionFeature> = buckets
        .into_values()
        .map(|bucket| RegionFeature::new(bucket.properties, bucket.coordinates))
        .collect();

    Aggregation {
        regions: RegionCollection::new(features),
        provinces_read: provinces.features.len(),
        unmatched,
        unsupported,
        conflicts,
    }
}

/// Find or create the bucket for a province's region.
///
/// On creation the bucket is seeded with this province's metadata; on later
/// hits a differing entry is recorded as a conflict and the seeded values
/// are kept.
fn bucket_for<'a>(
    buckets: &'a mut BTreeMap<String, RegionBucket>,
    conflicts: &mut Vec<MetadataConflict>,
    province: &str,
    info: &RegionInfo,
) -> &'a mut RegionBucket {
    let properties = info.to_properties();

    match buckets.entry(info.region.clone()) {
        Entry::Occupied(occupied) => {
            let bucket = occupied.into_mut();
            if bucket.properties != properties {
                warn!(
                    "Province '{}' carries metadata differing from region '{}'; keeping first-seen values",
                    province, info.region
                );
                conflicts.push(MetadataConflict {
                    province: province.to_string(),
                    region: info.region.clone(),
                });
            }
            bucket
        }
        Entry::Vacant(vacant) => vacant.insert(RegionBucket {
            properties,
            coordinates: Vec::new(),
        }),
    }
}
