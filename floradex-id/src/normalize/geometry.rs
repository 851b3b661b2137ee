//! Geometry reduction for Esri-style feature geometries
//!
//! The invasive-species layer returns either a point (`{x, y}`) or a polygon
//! (`{rings: [[[x, y], ...], ...]}`). Both reduce to a single (lat, lon)
//! pair for marker placement. For polygons, the ring with the most vertices
//! stands in for the outer boundary (holes are ignored) and its vertex mean
//! stands in for the centroid; this is a known approximation for marker
//! placement, not an area-weighted centroid.

use serde::{Deserialize, Serialize};

/// Web Mercator sphere radius in meters (EPSG:3857)
const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Raw Esri geometry as returned by the query services
///
/// Rings are kept loosely typed (`Vec<f64>` vertices) so an unexpected extra
/// ordinate never fails deserialization of the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsriGeometry {
    /// Point longitude (or easting, for projected sources)
    pub x: Option<f64>,
    /// Point latitude (or northing, for projected sources)
    pub y: Option<f64>,
    /// Polygon rings, each an ordered sequence of [x, y] vertices
    pub rings: Option<Vec<Vec<Vec<f64>>>>,
}

/// Reduce a geometry already in geographic coordinates to (lat, lon)
///
/// Returns `None` for anything that is not a decodable point or polygon;
/// the caller treats that as "no marker for this record", not an error.
pub fn reduce(geometry: &EsriGeometry) -> Option<(f64, f64)> {
    reduce_with(geometry, |x, y| (y, x))
}

/// Reduce a geometry whose native coordinates are Web Mercator (EPSG:3857)
///
/// Each vertex is reprojected to WGS84 before averaging. Which reducer
/// applies is decided by the data source, never by inspecting coordinates.
pub fn reduce_web_mercator(geometry: &EsriGeometry) -> Option<(f64, f64)> {
    reduce_with(geometry, web_mercator_to_wgs84)
}

fn reduce_with<F>(geometry: &EsriGeometry, to_lat_lon: F) -> Option<(f64, f64)>
where
    F: Fn(f64, f64) -> (f64, f64),
{
    if let (Some(x), Some(y)) = (geometry.x, geometry.y) {
        return Some(to_lat_lon(x, y));
    }

    let rings = geometry.rings.as_ref()?;

    // First ring with the greatest vertex count: outer boundary heuristic
    let mut largest: Option<&Vec<Vec<f64>>> = None;
    for ring in rings {
        if largest.map_or(true, |best| ring.len() > best.len()) {
            largest = Some(ring);
        }
    }
    let ring = largest?;

    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut count = 0usize;
    for vertex in ring {
        if let (Some(&x), Some(&y)) = (vertex.first(), vertex.get(1)) {
            let (lat, lon) = to_lat_lon(x, y);
            lat_sum += lat;
            lon_sum += lon;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    Some((lat_sum / count as f64, lon_sum / count as f64))
}

/// Convert a Web Mercator (x, y) in meters to (lat, lon) in degrees
fn web_mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = ((y / WEB_MERCATOR_RADIUS).exp().atan() * 2.0 - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64) -> EsriGeometry {
        EsriGeometry {
            x: Some(x),
            y: Some(y),
            rings: None,
        }
    }

    fn polygon(rings: Vec<Vec<Vec<f64>>>) -> EsriGeometry {
        EsriGeometry {
            x: None,
            y: None,
            rings: Some(rings),
        }
    }

    #[test]
    fn test_point_geometry() {
        assert_eq!(reduce(&point(-100.0, 40.0)), Some((40.0, -100.0)));
    }

    #[test]
    fn test_polygon_uses_largest_ring_only() {
        // 3-vertex hole far away from the 5-vertex outer ring
        let geometry = polygon(vec![
            vec![vec![90.0, 90.0], vec![91.0, 90.0], vec![90.0, 91.0]],
            vec![
                vec![-118.0, 34.0],
                vec![-118.0, 36.0],
                vec![-116.0, 36.0],
                vec![-116.0, 34.0],
                vec![-117.0, 35.0],
            ],
        ]);

        let (lat, lon) = reduce(&geometry).unwrap();
        assert!((lat - 35.0).abs() < 1e-9);
        assert!((lon - (-117.0)).abs() < 1e-9);
    }

    #[test]
    fn test_missing_or_empty_geometry() {
        assert_eq!(reduce(&EsriGeometry::default()), None);
        assert_eq!(reduce(&polygon(vec![])), None);
        assert_eq!(reduce(&polygon(vec![vec![]])), None);
        // Vertices without both ordinates are skipped
        assert_eq!(reduce(&polygon(vec![vec![vec![1.0]]])), None);
    }

    #[test]
    fn test_web_mercator_point() {
        // Origin of the projection is (0, 0) in degrees
        let (lat, lon) = reduce_web_mercator(&point(0.0, 0.0)).unwrap();
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);

        // One earth-radius east along the equator is ~57.3 degrees longitude
        let (lat, lon) = reduce_web_mercator(&point(WEB_MERCATOR_RADIUS, 0.0)).unwrap();
        assert!(lat.abs() < 1e-9);
        assert!((lon - 1.0f64.to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn test_web_mercator_round_trip_latitude() {
        // y for 45 degrees north: R * ln(tan(pi/4 + lat/2))
        let lat_in = 45.0f64.to_radians();
        let y = WEB_MERCATOR_RADIUS * (std::f64::consts::FRAC_PI_4 + lat_in / 2.0).tan().ln();
        let (lat, _) = reduce_web_mercator(&point(0.0, y)).unwrap();
        assert!((lat - 45.0).abs() < 1e-9);
    }
}
