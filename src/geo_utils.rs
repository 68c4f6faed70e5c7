//! # Geographic Utilities
//!
//! Geodesic helpers shared by the statistics engine, the timeline builder and
//! the simulator.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two points, in meters |
//! | [`polyline_length`] | Total length of a track in meters |
//! | [`initial_bearing`] | Initial great-circle bearing from one point to another |
//! | [`compute_bounds`] | Bounding box of a track |
//! | [`format_coord`] | `lat°, lon°` text for popups and readouts |
//!
//! ## Example
//!
//! ```rust
//! use wake_timeline::{GeoPoint, geo_utils};
//!
//! let track = vec![
//!     GeoPoint::new(151.2093, -33.8688), // Sydney
//!     GeoPoint::new(151.2200, -33.8600),
//!     GeoPoint::new(151.2300, -33.8500),
//! ];
//!
//! let length = geo_utils::polyline_length(&track);
//! println!("Track length: {:.0}m", length);
//!
//! let bounds = geo_utils::compute_bounds(&track).unwrap();
//! println!("Bounds: {:.4}E to {:.4}E", bounds.min_lon, bounds.max_lon);
//! ```
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! Distances use the haversine formula on a sphere of radius 6,371,000 m. The
//! `sqrt(h)` term is clamped to 1.0 before `asin`, so rounding overshoot on
//! antipodal or duplicate points never produces `NaN`.
//!
//! Reference: [Haversine formula (Wikipedia)](https://en.wikipedia.org/wiki/Haversine_formula)
//!
//! ### Coordinate System
//!
//! All functions expect WGS84 longitude/latitude in degrees.

use geo::{BoundingRect, Coord, LineString};
use crate::{Bounds, GeoPoint};

/// Spherical Earth radius used by [`haversine_distance`], in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters in one nautical mile.
pub const METERS_PER_NM: f64 = 1852.0;

/// Multiplier from meters/second to knots.
pub const MS_TO_KNOTS: f64 = 1.943844492;

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two points using the Haversine formula.
///
/// Returns meters along a spherical Earth of radius [`EARTH_RADIUS_M`]. The
/// function is symmetric and returns exactly `0.0` for identical points.
///
/// # Example
///
/// ```rust
/// use wake_timeline::{GeoPoint, geo_utils};
///
/// let a = GeoPoint::new(0.0, 0.0);
/// let b = GeoPoint::new(0.0, 1.0);
///
/// let distance = geo_utils::haversine_distance(&a, &b);
/// assert!((distance - 111_195.0).abs() < 1.0); // one degree of latitude
/// ```
#[inline]
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lon = (d_lon / 2.0).sin();
    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Calculate the total length of a polyline in meters.
///
/// Sums the haversine distance between consecutive points. Empty or single-point
/// tracks return 0.0.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Initial great-circle bearing from `from` towards `to`, in degrees clockwise
/// from true north, normalized to `[0, 360)`.
///
/// Identical points yield `0.0`.
pub fn initial_bearing(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if bearing >= 360.0 { 0.0 } else { bearing }
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Compute the bounding box of a track.
///
/// Returns `None` for empty input. A single point yields a degenerate box.
///
/// # Example
///
/// ```rust
/// use wake_timeline::{GeoPoint, geo_utils};
///
/// let track = vec![
///     GeoPoint::new(152.40, -32.60),
///     GeoPoint::new(151.79, -32.92),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&track).unwrap();
/// assert_eq!(bounds.min_lon, 151.79);
/// assert_eq!(bounds.max_lat, -32.60);
/// ```
pub fn compute_bounds(points: &[GeoPoint]) -> Option<Bounds> {
    let line: LineString<f64> = points
        .iter()
        .map(|p| Coord { x: p.lon, y: p.lat })
        .collect();

    let rect = line.bounding_rect()?;
    Some(Bounds {
        min_lon: rect.min().x,
        min_lat: rect.min().y,
        max_lon: rect.max().x,
        max_lat: rect.max().y,
    })
}

// =============================================================================
// Formatting
// =============================================================================

/// Format a point as `"{lat}°, {lon}°"` with five decimals.
pub fn format_coord(p: &GeoPoint) -> String {
    format!("{:.5}°, {:.5}°", p.lat, p.lon)
}

// =============================================================================
// Unit Tests
// =============================================================================
