//! End-to-end correlation fixtures
//!
//! Feeds recorded-style upstream payloads through the correlation layer and
//! checks the tables the page would render.

use serde_json::json;

use floradex_id::correlate::{self, BoundaryIndex};
use floradex_id::services::invasive_client::InvasiveQueryResponse;
use floradex_id::services::plantnet_client::IdentifyResponse;

#[test]
fn test_identification_response_to_species_table() {
    let response: IdentifyResponse = serde_json::from_value(json!({
        "results": [
            {
                "species": {
                    "scientificNameWithoutAuthor": "Quercus alba",
                    "commonNames": ["White oak"],
                    "genus": { "scientificNameWithoutAuthor": "Quercus" },
                    "family": { "scientificNameWithoutAuthor": "Fagaceae" }
                },
                "score": 0.87
            }
        ]
    }))
    .unwrap();

    let table = correlate::build_species_table(&response);
    assert_eq!(table.len(), 1);

    let row = &table[0];
    assert_eq!(row.scientific_name, "Quercus alba");
    assert_eq!(row.common_names, vec!["White oak".to_string()]);
    assert_eq!(row.genus, "Quercus");
    assert_eq!(row.family, "Fagaceae");
    assert_eq!(row.score, 0.87);
    assert_eq!(row.score_display, "0.87");
}

#[test]
fn test_invasive_response_to_tables() {
    let response: InvasiveQueryResponse = serde_json::from_value(json!({
        "features": [
            {
                "attributes": {
                    "FS_UNIT_NAME": "Angeles National Forest",
                    "LAST_UPDATE": "1609459200000"
                },
                "geometry": { "x": -118.0, "y": 34.0 }
            }
        ]
    }))
    .unwrap();

    let tables = correlate::build_invasive_tables(&response);

    assert_eq!(tables.records.len(), 1);
    assert_eq!(tables.records[0].unit_name, "Angeles National Forest");
    assert_eq!(tables.records[0].last_update, "2021-01-01");

    assert_eq!(tables.points.len(), 1);
    assert_eq!(tables.points[0].lat, 34.0);
    assert_eq!(tables.points[0].lon, -118.0);
    assert_eq!(tables.points[0].label, "Angeles National Forest");

    assert_eq!(tables.summaries.len(), 1);
    assert_eq!(tables.summaries[0].unit_name, "Angeles National Forest");
    assert_eq!(tables.summaries[0].record_count, 1);
}

#[test]
fn test_polygon_features_reduce_to_ring_centroids() {
    let response: InvasiveQueryResponse = serde_json::from_value(json!({
        "features": [
            {
                "attributes": { "FS_UNIT_NAME": "Inyo National Forest" },
                "geometry": {
                    "rings": [
                        [[-118.0, 37.0], [-118.0, 38.0], [-117.0, 38.0], [-117.0, 37.0]],
                        [[-117.6, 37.4], [-117.5, 37.4], [-117.5, 37.5]]
                    ]
                }
            }
        ]
    }))
    .unwrap();

    let tables = correlate::build_invasive_tables(&response);
    assert_eq!(tables.points.len(), 1);
    // Vertex mean of the 4-vertex outer ring; the 3-vertex hole is ignored
    assert!((tables.points[0].lat - 37.5).abs() < 1e-9);
    assert!((tables.points[0].lon - (-117.5)).abs() < 1e-9);
}

#[test]
fn test_failed_query_shape_yields_empty_tables() {
    // The route layer passes an empty payload when the upstream call fails;
    // the correlator must produce empty collections, not errors
    let tables = correlate::build_invasive_tables(&InvasiveQueryResponse::default());
    assert!(tables.records.is_empty());
    assert!(tables.points.is_empty());
    assert!(tables.summaries.is_empty());
}

#[test]
fn test_boundary_join_reports_match_counts() {
    let response: InvasiveQueryResponse = serde_json::from_value(json!({
        "features": [
            { "attributes": { "FS_UNIT_NAME": "Angeles National Forest" } },
            { "attributes": { "FS_UNIT_NAME": "Angeles National-Forest" } },
            { "attributes": { "FS_UNIT_NAME": "Modoc National Forest" } }
        ]
    }))
    .unwrap();
    let tables = correlate::build_invasive_tables(&response);

    let mut boundaries = BoundaryIndex::new();
    boundaries.insert("Angeles National Forest", 34.2, -118.1);

    let (points, stats) = correlate::join_boundaries(&tables.records, &boundaries);
    assert_eq!(stats.matched, 2, "both spellings join through the normalized key");
    assert_eq!(stats.unmatched, 1);
    assert_eq!(points.len(), 2);
}
