//! # Track Statistics
//!
//! Aggregate trip figures for a recorded track: total distance, elapsed time
//! and average speed over ground.
//!
//! Every input is optional except the samples themselves, and nothing here can
//! fail. Missing, malformed or non-finite timestamps degrade to a zero
//! duration, which in turn gives a zero average speed.
//!
//! ## Duration sources
//!
//! 1. `explicit_end - explicit_start` when both are present and finite.
//! 2. Otherwise `last - first` of the fallback time list (two or more entries).
//! 3. Otherwise zero.
//!
//! Both paths clamp negative spans to zero.

use crate::format::{format_duration, format_knots};
use crate::geo_utils::{polyline_length, METERS_PER_NM, MS_TO_KNOTS};
use crate::source::Track;
use crate::RawSample;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A timestamp as it arrives from the track source: epoch seconds, or text.
///
/// Text is coerced the way a loosely typed client would: a trimmed decimal
/// number parses, anything else (including ISO-8601 dates) is non-finite.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum TimeValue {
    Epoch(f64),
    Text(String),
}

impl TimeValue {
    /// Numeric value in seconds, `NaN` when the value can't be coerced.
    pub fn as_seconds(&self) -> f64 {
        match self {
            TimeValue::Epoch(v) => *v,
            TimeValue::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        }
    }
}

impl From<f64> for TimeValue {
    fn from(v: f64) -> Self {
        TimeValue::Epoch(v)
    }
}

impl From<i64> for TimeValue {
    fn from(v: i64) -> Self {
        TimeValue::Epoch(v as f64)
    }
}

impl From<&str> for TimeValue {
    fn from(s: &str) -> Self {
        TimeValue::Text(s.to_string())
    }
}

/// Derived trip statistics. Recomputed on every track load.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackStats {
    /// Track name, when the source supplies one
    pub name: Option<String>,
    /// Total distance in meters
    pub distance_m: f64,
    /// Total distance in nautical miles
    pub distance_nm: f64,
    /// Elapsed time in seconds (>= 0)
    pub duration_secs: f64,
    /// Average speed over ground in knots (>= 0)
    pub avg_knots: f64,
}

/// Display strings for the stats panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub title: String,
    pub distance: String,
    pub duration: String,
    pub speed: String,
}

impl TrackStats {
    /// Panel text: name (or `"Track"`), distance, duration and average speed.
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            title: self.name.clone().unwrap_or_else(|| "Track".to_string()),
            distance: format!("Dist: {:.1} nm", self.distance_nm),
            duration: format!("Time: {}", format_duration(self.duration_secs)),
            speed: format!("Avg: {}", format_knots(self.avg_knots)),
        }
    }
}

/// Compute distance, duration and average speed for a sample sequence.
///
/// # Example
///
/// ```rust
/// use wake_timeline::{GeoPoint, RawSample, stats::compute_stats};
///
/// let samples = vec![
///     RawSample::new(GeoPoint::new(0.0, 0.0)),
///     RawSample::new(GeoPoint::new(0.0, 1.0)),
/// ];
/// let stats = compute_stats(&samples, Some(0.0), Some(3600.0), &[], Some("Passage"));
/// assert!((stats.distance_nm - 60.04).abs() < 0.01);
/// assert_eq!(stats.duration_secs, 3600.0);
/// ```
pub fn compute_stats(
    samples: &[RawSample],
    explicit_start: Option<f64>,
    explicit_end: Option<f64>,
    fallback_times: &[TimeValue],
    name: Option<&str>,
) -> TrackStats {
    let positions: Vec<_> = samples.iter().map(|s| s.position).collect();
    let meters = polyline_length(&positions);
    let duration_secs = resolve_duration(explicit_start, explicit_end, fallback_times);

    let avg_knots = if duration_secs > 0.0 {
        (meters / duration_secs) * MS_TO_KNOTS
    } else {
        0.0
    };

    TrackStats {
        name: name.map(str::to_string),
        distance_m: meters,
        distance_nm: meters / METERS_PER_NM,
        duration_secs,
        avg_knots,
    }
}

/// Pick the elapsed time from explicit bounds, then the fallback list.
fn resolve_duration(start: Option<f64>, end: Option<f64>, times: &[TimeValue]) -> f64 {
    match (start, end) {
        (Some(s), Some(e)) if s.is_finite() && e.is_finite() => return (e - s).max(0.0),
        _ => {}
    }

    if let (Some(first), Some(last)) = (times.first(), times.last()) {
        if times.len() >= 2 {
            let span = last.as_seconds() - first.as_seconds();
            if span.is_finite() {
                return span.max(0.0);
            }
        }
    }

    0.0
}

/// Compute stats for many tracks, e.g. to annotate a track list.
///
/// Uses rayon when the `parallel` feature is enabled. Output order matches input.
pub fn compute_stats_batch(tracks: &[Track]) -> Vec<TrackStats> {
    #[cfg(feature = "parallel")]
    {
        tracks.par_iter().map(Track::stats).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        tracks.iter().map(Track::stats).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::haversine_distance;
    use crate::GeoPoint;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn samples(points: &[(f64, f64)]) -> Vec<RawSample> {
        points
            .iter()
            .map(|&(lon, lat)| RawSample::new(GeoPoint::new(lon, lat)))
            .collect()
    }

    /// Latitude delta that spans exactly one nautical mile on the haversine sphere.
    fn one_nm_in_degrees() -> f64 {
        (METERS_PER_NM / crate::geo_utils::EARTH_RADIUS_M).to_degrees()
    }

    #[test]
    fn test_empty_track_is_all_zero() {
        let stats = compute_stats(&[], Some(1000.0), Some(1100.0), &[], None);
        assert_eq!(stats.distance_nm, 0.0);
        // duration comes from the explicit bounds, but distance is zero
        assert_eq!(stats.avg_knots, 0.0);

        let stats = compute_stats(&[], None, None, &[], None);
        assert_eq!(stats, TrackStats::default());
    }

    #[test]
    fn test_single_point_is_all_zero() {
        let stats = compute_stats(&samples(&[(151.2, -33.8)]), None, None, &[], None);
        assert_eq!(stats.distance_nm, 0.0);
        assert_eq!(stats.duration_secs, 0.0);
        assert_eq!(stats.avg_knots, 0.0);
    }

    #[test]
    fn test_two_points_one_nm_in_100s() {
        let track = samples(&[(0.0, 0.0), (0.0, one_nm_in_degrees())]);
        let stats = compute_stats(&track, Some(1000.0), Some(1100.0), &[], None);

        assert_eq!(stats.duration_secs, 100.0);
        assert!(approx_eq(stats.distance_nm, 1.0, 1e-9));
        assert!(approx_eq(stats.avg_knots, 36.0, 0.01));
    }

    #[test]
    fn test_explicit_bounds_clamp_negative() {
        let track = samples(&[(0.0, 0.0), (0.0, 0.1)]);
        let stats = compute_stats(&track, Some(2000.0), Some(1000.0), &[], None);
        assert_eq!(stats.duration_secs, 0.0);
        assert_eq!(stats.avg_knots, 0.0);
    }

    #[test]
    fn test_non_finite_bounds_use_fallback_times() {
        let track = samples(&[(0.0, 0.0), (0.0, 0.1)]);
        let times = vec![TimeValue::from(500.0), TimeValue::from(550.0), TimeValue::from(800.0)];
        let stats = compute_stats(&track, Some(f64::NAN), Some(1000.0), &times, None);
        assert_eq!(stats.duration_secs, 300.0);
    }

    #[test]
    fn test_fallback_times_coerce_numeric_text() {
        let track = samples(&[(0.0, 0.0), (0.0, 0.1)]);
        let times = vec![TimeValue::from(" 100 "), TimeValue::from("160.5")];
        let stats = compute_stats(&track, None, None, &times, None);
        assert_eq!(stats.duration_secs, 60.5);
    }

    #[test]
    fn test_fallback_times_non_numeric_is_zero() {
        let track = samples(&[(0.0, 0.0), (0.0, 0.1)]);
        let times = vec![
            TimeValue::from("2024-03-01T10:00:00Z"),
            TimeValue::from("2024-03-01T11:00:00Z"),
        ];
        let stats = compute_stats(&track, None, None, &times, None);
        assert_eq!(stats.duration_secs, 0.0);
        assert_eq!(stats.avg_knots, 0.0);
    }

    #[test]
    fn test_fallback_needs_two_entries() {
        let track = samples(&[(0.0, 0.0), (0.0, 0.1)]);
        let stats = compute_stats(&track, None, None, &[TimeValue::from(100.0)], None);
        assert_eq!(stats.duration_secs, 0.0);
    }

    #[test]
    fn test_distance_sums_consecutive_pairs() {
        let track = samples(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let expected = haversine_distance(&track[0].position, &track[1].position)
            + haversine_distance(&track[1].position, &track[2].position);
        let stats = compute_stats(&track, None, None, &[], Some("Loop"));
        assert!(approx_eq(stats.distance_m, expected, 1e-6));
        assert!(approx_eq(stats.distance_nm, expected / METERS_PER_NM, 1e-9));
        assert_eq!(stats.name.as_deref(), Some("Loop"));
    }

    #[test]
    fn test_summary_text() {
        let stats = TrackStats {
            name: None,
            distance_m: 11_112.0,
            distance_nm: 6.0,
            duration_secs: 3600.0,
            avg_knots: 6.0,
        };
        let summary = stats.summary();
        assert_eq!(summary.title, "Track");
        assert_eq!(summary.distance, "Dist: 6.0 nm");
        assert_eq!(summary.duration, "Time: 1h 0m");
        assert_eq!(summary.speed, "Avg: 6.0 kn");
    }

    #[test]
    fn test_batch_preserves_order() {
        let a = Track::new("a", samples(&[(0.0, 0.0), (0.0, 1.0)])).with_times(0.0, 3600.0);
        let b = Track::new("b", samples(&[(0.0, 0.0)]));
        let stats = compute_stats_batch(&[a, b]);
        assert_eq!(stats.len(), 2);
        assert!(stats[0].distance_nm > 60.0);
        assert_eq!(stats[1].distance_nm, 0.0);
    }
}
