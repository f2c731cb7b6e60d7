//! Spatial operations and utilities leveraging the geo crate.
//!
//! This is the narrow geometry seam the aggregators call through: distance,
//! intersection, and area. The engine places no constraint on these beyond
//! numerical correctness for geographic coordinates, and none of them are
//! reimplemented here.

use geo::{
    ChamberlainDuquetteArea, Distance, Euclidean, Geodesic, Geometry, Haversine, Intersects,
    Point, Polygon, Rhumb,
};

/// Mean Earth radius in kilometers, used for the approximate-circle helper.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance metrics for spatial calculations.
///
/// - **Haversine**: fast spherical distance, good for most lon/lat work
/// - **Geodesic**: more accurate ellipsoidal distance (Karney 2013), slower
/// - **Rhumb**: constant bearing distance, useful for navigation
/// - **Euclidean**: planar distance, only for projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Haversine formula - assumes spherical Earth, accurate enough for most uses
    #[default]
    Haversine,
    /// Geodesic distance using Karney (2013) - accounts for Earth's ellipsoid
    Geodesic,
    /// Rhumb line (loxodrome) - maintains constant bearing
    Rhumb,
    /// Euclidean distance - for planar/projected coordinates only
    Euclidean,
}

/// Calculate the distance between two points using the specified metric.
///
/// # Returns
///
/// Distance in meters.
///
/// # Examples
///
/// ```rust
/// use geo::Point;
/// use urbanlens::spatial::{DistanceMetric, distance_between};
///
/// let nyc = Point::new(-74.0060, 40.7128);
/// let la = Point::new(-118.2437, 34.0522);
///
/// let dist = distance_between(&nyc, &la, DistanceMetric::Haversine);
/// assert!(dist > 3_900_000.0); // ~3,944 km
/// ```
pub fn distance_between(point1: &Point, point2: &Point, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Haversine => Haversine.distance(*point1, *point2),
        DistanceMetric::Geodesic => Geodesic.distance(*point1, *point2),
        DistanceMetric::Rhumb => Rhumb.distance(*point1, *point2),
        DistanceMetric::Euclidean => Euclidean.distance(*point1, *point2),
    }
}

/// Haversine distance between two points in kilometers.
pub fn distance_km(point1: &Point, point2: &Point) -> f64 {
    Haversine.distance(*point1, *point2) / 1000.0
}

/// Whether a feature geometry intersects the lens polygon.
pub fn intersects(geometry: &Geometry, polygon: &Polygon) -> bool {
    geometry.intersects(polygon)
}

/// Unsigned geodesic area of a geometry in square meters.
///
/// Point and line geometries have zero area.
pub fn geometry_area_sqm(geometry: &Geometry) -> f64 {
    geometry.chamberlain_duquette_unsigned_area()
}

/// Build an approximate circle polygon around `center`.
///
/// Vertices are placed in degree space with a cosine correction for
/// longitude, which is the same approximation interactive map tooling uses
/// for lens outlines at mid-latitudes.
pub fn approximate_circle(center: &Point, radius_km: f64, vertices: usize) -> Polygon {
    let vertices = vertices.max(3);
    let radius_deg_lat = (radius_km / EARTH_RADIUS_KM).to_degrees();
    let radius_deg_lon = radius_deg_lat / center.y().to_radians().cos().max(1e-12);

    let mut ring = Vec::with_capacity(vertices + 1);
    for step in 0..vertices {
        let theta = 2.0 * std::f64::consts::PI * (step as f64) / (vertices as f64);
        ring.push(geo::coord! {
            x: center.x() + radius_deg_lon * theta.cos(),
            y: center.y() + radius_deg_lat * theta.sin(),
        });
    }
    let first = ring[0];
    ring.push(first);

    Polygon::new(geo::LineString::from(ring), vec![])
}
