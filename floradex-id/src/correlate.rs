//! Result correlation across identification, invasive-species, and boundary
//! sources
//!
//! Turns raw upstream payloads into the flat tables, map points, and region
//! summaries the page renders. Every operation here is a pure function of
//! its input payload; failure of an upstream call is handled by the route
//! layer, which passes nothing (or an empty payload) into this module.

use crate::normalize::{geometry, name, timestamp};
use crate::services::invasive_client::{InvasiveFeature, InvasiveQueryResponse};
use crate::services::plantnet_client::IdentifyResponse;
use crate::types::{InvasiveRecord, MapPoint, RegionSummary, SpeciesCandidate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Output bundle of [`build_invasive_tables`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvasiveTables {
    /// One row per feature, upstream order
    pub records: Vec<InvasiveRecord>,
    /// At most one marker per record; records without decodable geometry
    /// contribute none
    pub points: Vec<MapPoint>,
    /// Per-region counts, descending, ties in first-seen order
    pub summaries: Vec<RegionSummary>,
}

/// Match accounting for a boundary join; unmatched records are counted,
/// never silently dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryJoinStats {
    pub matched: usize,
    pub unmatched: usize,
}

/// Boundary geometry source keyed by normalized unit name
///
/// Built from a boundary layer whose native geometry is Web Mercator; each
/// boundary polygon reduces to one representative point at construction.
#[derive(Debug, Clone, Default)]
pub struct BoundaryIndex {
    points: HashMap<String, (f64, f64)>,
}

impl BoundaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a boundary layer response; `name_field` selects the attribute
    /// holding the unit name
    pub fn from_features(features: &[InvasiveFeature], name_field: &str) -> Self {
        let mut index = Self::new();
        for feature in features {
            let display_name = attr_str(&feature.attributes, name_field);
            let key = name::normalize(&display_name);
            if key.is_empty() {
                continue;
            }
            let reduced = feature
                .geometry
                .as_ref()
                .and_then(geometry::reduce_web_mercator);
            if let Some((lat, lon)) = reduced {
                index.points.entry(key).or_insert((lat, lon));
            }
        }
        index
    }

    pub fn insert(&mut self, display_name: &str, lat: f64, lon: f64) {
        let key = name::normalize(display_name);
        if !key.is_empty() {
            self.points.insert(key, (lat, lon));
        }
    }

    /// Look up a boundary point by any surface spelling of the unit name
    pub fn lookup(&self, display_name: &str) -> Option<(f64, f64)> {
        self.points.get(&name::normalize(display_name)).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build the candidate-species table from an identification response
///
/// One row per result entry, in the order received: the upstream service
/// already ranks by confidence, so rows are never re-sorted. Missing nested
/// fields become empty strings.
pub fn build_species_table(response: &IdentifyResponse) -> Vec<SpeciesCandidate> {
    response
        .results
        .iter()
        .map(|result| {
            let species = result.species.as_ref();
            SpeciesCandidate {
                scientific_name: species
                    .and_then(|s| s.scientific_name.clone())
                    .unwrap_or_default(),
                common_names: species.map(|s| s.common_names.clone()).unwrap_or_default(),
                genus: species
                    .and_then(|s| s.genus.as_ref())
                    .and_then(|g| g.scientific_name.clone())
                    .unwrap_or_default(),
                family: species
                    .and_then(|s| s.family.as_ref())
                    .and_then(|f| f.scientific_name.clone())
                    .unwrap_or_default(),
                score: result.score,
                score_display: format!("{:.2}", result.score),
            }
        })
        .collect()
}

/// Build record, map-point, and region-summary tables from an
/// invasive-species query response
pub fn build_invasive_tables(response: &InvasiveQueryResponse) -> InvasiveTables {
    let mut records = Vec::with_capacity(response.features.len());
    let mut points = Vec::new();

    for feature in &response.features {
        let attrs = &feature.attributes;
        let record = InvasiveRecord {
            plant_code: attr_str(attrs, "NRCS_PLANT_CODE"),
            scientific_name: attr_str(attrs, "SCIENTIFIC_NAME"),
            common_name: attr_str(attrs, "COMMON_NAME"),
            project_code: attr_str(attrs, "PROJECT_CODE"),
            plant_status: attr_str(attrs, "PLANT_STATUS"),
            unit_name: attr_str(attrs, "FS_UNIT_NAME"),
            examiners: attr_str(attrs, "EXAMINERS"),
            last_update: timestamp::normalize_json(
                attrs.get("LAST_UPDATE").unwrap_or(&Value::Null),
            ),
        };

        match feature.geometry.as_ref().and_then(geometry::reduce) {
            Some((lat, lon)) => points.push(MapPoint {
                lat,
                lon,
                label: record.unit_name.clone(),
            }),
            None => {
                if feature.geometry.is_some() {
                    debug!(unit = %record.unit_name, "Map marker unavailable: geometry not decodable");
                }
            }
        }

        records.push(record);
    }

    let summaries = summarize_regions(&records);
    InvasiveTables {
        records,
        points,
        summaries,
    }
}

/// Group records into per-region counts
///
/// The group key is the normalized unit name; the displayed name is the
/// first-seen surface name of the group, trimmed but otherwise untouched.
/// Sorted by descending count; the sort is stable, so ties keep first-seen
/// order.
pub fn summarize_regions(records: &[InvasiveRecord]) -> Vec<RegionSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut summaries: Vec<RegionSummary> = Vec::new();

    for record in records {
        let key = name::normalize(&record.unit_name);
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(&i) => summaries[i].record_count += 1,
            None => {
                index.insert(key, summaries.len());
                summaries.push(RegionSummary {
                    unit_name: record.unit_name.trim().to_string(),
                    record_count: 1,
                });
            }
        }
    }

    summaries.sort_by(|a, b| b.record_count.cmp(&a.record_count));
    summaries
}

/// Join records to a boundary geometry source by normalized unit name
///
/// A record whose normalized unit name has no boundary match contributes no
/// marker; the stats report how many matched versus not.
pub fn join_boundaries(
    records: &[InvasiveRecord],
    boundaries: &BoundaryIndex,
) -> (Vec<MapPoint>, BoundaryJoinStats) {
    let mut points = Vec::new();
    let mut stats = BoundaryJoinStats::default();

    for record in records {
        match boundaries.lookup(&record.unit_name) {
            Some((lat, lon)) => {
                stats.matched += 1;
                points.push(MapPoint {
                    lat,
                    lon,
                    label: record.unit_name.clone(),
                });
            }
            None => {
                stats.unmatched += 1;
                debug!(unit = %record.unit_name, "No boundary match for record");
            }
        }
    }

    (points, stats)
}

fn attr_str(attrs: &HashMap<String, Value>, key: &str) -> String {
    match attrs.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identify_response(raw: serde_json::Value) -> IdentifyResponse {
        serde_json::from_value(raw).unwrap()
    }

    fn invasive_response(raw: serde_json::Value) -> InvasiveQueryResponse {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_species_table_preserves_upstream_order() {
        let response = identify_response(json!({
            "results": [
                { "species": { "scientificNameWithoutAuthor": "B" }, "score": 0.2 },
                { "species": { "scientificNameWithoutAuthor": "A" }, "score": 0.9 }
            ]
        }));

        let table = build_species_table(&response);
        assert_eq!(table[0].scientific_name, "B");
        assert_eq!(table[1].scientific_name, "A");
    }

    #[test]
    fn test_species_table_empty_results() {
        let table = build_species_table(&identify_response(json!({ "results": [] })));
        assert!(table.is_empty());
    }

    #[test]
    fn test_species_table_missing_fields_default_to_empty() {
        let response = identify_response(json!({ "results": [ { "score": 0.5 } ] }));
        let table = build_species_table(&response);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].scientific_name, "");
        assert_eq!(table[0].genus, "");
        assert!(table[0].common_names.is_empty());
        assert_eq!(table[0].score_display, "0.50");
    }

    #[test]
    fn test_invasive_tables_end_to_end() {
        let response = invasive_response(json!({
            "features": [
                {
                    "attributes": {
                        "FS_UNIT_NAME": "Angeles National Forest",
                        "LAST_UPDATE": "1609459200000"
                    },
                    "geometry": { "x": -118.0, "y": 34.0 }
                }
            ]
        }));

        let tables = build_invasive_tables(&response);
        assert_eq!(tables.records.len(), 1);
        assert_eq!(tables.records[0].last_update, "2021-01-01");
        assert_eq!(tables.points, vec![MapPoint {
            lat: 34.0,
            lon: -118.0,
            label: "Angeles National Forest".to_string(),
        }]);
        assert_eq!(tables.summaries, vec![RegionSummary {
            unit_name: "Angeles National Forest".to_string(),
            record_count: 1,
        }]);
    }

    #[test]
    fn test_differently_punctuated_unit_names_share_one_summary() {
        let response = invasive_response(json!({
            "features": [
                { "attributes": { "FS_UNIT_NAME": "Angeles National Forest" } },
                { "attributes": { "FS_UNIT_NAME": "\u{1f3de}\u{fe0f} Angeles  National-Forest" } }
            ]
        }));

        let tables = build_invasive_tables(&response);
        // Records keep their distinct displayed names
        assert_eq!(tables.records[0].unit_name, "Angeles National Forest");
        assert_eq!(
            tables.records[1].unit_name,
            "\u{1f3de}\u{fe0f} Angeles  National-Forest"
        );
        // But the summary groups them through the normalized join key
        assert_eq!(tables.summaries.len(), 1);
        assert_eq!(tables.summaries[0].unit_name, "Angeles National Forest");
        assert_eq!(tables.summaries[0].record_count, 2);
    }

    #[test]
    fn test_summaries_sorted_by_count_descending_stable() {
        let response = invasive_response(json!({
            "features": [
                { "attributes": { "FS_UNIT_NAME": "Alpha" } },
                { "attributes": { "FS_UNIT_NAME": "Beta" } },
                { "attributes": { "FS_UNIT_NAME": "Gamma" } },
                { "attributes": { "FS_UNIT_NAME": "Gamma" } }
            ]
        }));

        let summaries = build_invasive_tables(&response).summaries;
        assert_eq!(summaries[0].unit_name, "Gamma");
        assert_eq!(summaries[0].record_count, 2);
        // Tie between Alpha and Beta keeps first-seen order
        assert_eq!(summaries[1].unit_name, "Alpha");
        assert_eq!(summaries[2].unit_name, "Beta");
    }

    #[test]
    fn test_record_without_geometry_contributes_no_point() {
        let response = invasive_response(json!({
            "features": [
                { "attributes": { "FS_UNIT_NAME": "Sequoia National Forest" } },
                {
                    "attributes": { "FS_UNIT_NAME": "Sierra National Forest" },
                    "geometry": { "rings": [] }
                }
            ]
        }));

        let tables = build_invasive_tables(&response);
        assert_eq!(tables.records.len(), 2);
        assert!(tables.points.is_empty());
    }

    #[test]
    fn test_numeric_attributes_render_as_text() {
        let response = invasive_response(json!({
            "features": [
                { "attributes": { "NRCS_PLANT_CODE": 42, "FS_UNIT_NAME": "Tahoe" } }
            ]
        }));

        let tables = build_invasive_tables(&response);
        assert_eq!(tables.records[0].plant_code, "42");
    }

    #[test]
    fn test_boundary_join_counts_matched_and_unmatched() {
        let records = vec![
            InvasiveRecord {
                plant_code: String::new(),
                scientific_name: String::new(),
                common_name: String::new(),
                project_code: String::new(),
                plant_status: String::new(),
                unit_name: "\u{1f3de}\u{fe0f} Angeles National Forest".to_string(),
                examiners: String::new(),
                last_update: String::new(),
            },
            InvasiveRecord {
                plant_code: String::new(),
                scientific_name: String::new(),
                common_name: String::new(),
                project_code: String::new(),
                plant_status: String::new(),
                unit_name: "Unknown Unit".to_string(),
                examiners: String::new(),
                last_update: String::new(),
            },
        ];

        let mut boundaries = BoundaryIndex::new();
        boundaries.insert("Angeles National Forest", 34.2, -118.1);

        let (points, stats) = join_boundaries(&records, &boundaries);
        assert_eq!(stats, BoundaryJoinStats { matched: 1, unmatched: 1 });
        assert_eq!(points.len(), 1);
        // Marker label keeps the record's displayed name, not the boundary's
        assert_eq!(points[0].label, "\u{1f3de}\u{fe0f} Angeles National Forest");
    }

    #[test]
    fn test_boundary_index_from_web_mercator_features() {
        let features: Vec<InvasiveFeature> = serde_json::from_value(json!([
            {
                "attributes": { "FORESTNAME": "Angeles National Forest" },
                "geometry": { "x": 0.0, "y": 0.0 }
            },
            {
                "attributes": { "FORESTNAME": "No Geometry Forest" }
            }
        ]))
        .unwrap();

        let index = BoundaryIndex::from_features(&features, "FORESTNAME");
        assert_eq!(index.len(), 1);
        let (lat, lon) = index.lookup("angeles national forest").unwrap();
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
    }
}
