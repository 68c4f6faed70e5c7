//! # Wake Timeline
//!
//! Track statistics, timeline reconstruction and playback for recorded
//! vessel tracks.
//!
//! This library provides:
//! - Trip statistics (distance, duration, average speed) from raw position samples
//! - Distance-weighted timelines for tracks without per-point timestamps
//! - Interpolated position, speed and heading at any time offset
//! - A cancellable, rate-adjustable playback controller that keeps a map marker
//!   and a scrubber in sync
//!
//! ## Features
//!
//! - **`serde`** - Serialize/deserialize tracks, timelines and config
//! - **`parallel`** - Enable parallel batch statistics with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use wake_timeline::{GeoPoint, RawSample, Track, Timeline};
//!
//! let samples = vec![
//!     RawSample::new(GeoPoint::new(152.40, -32.60)),
//!     RawSample::new(GeoPoint::new(152.30, -32.60)),
//!     RawSample::new(GeoPoint::new(152.17, -32.71)),
//! ];
//! let track = Track::new("broughton", samples).with_times(1_700_000_000.0, 1_700_003_600.0);
//!
//! let stats = track.stats();
//! println!("{:.1} nm in {}s at {:.1} kn", stats.distance_nm, stats.duration_secs, stats.avg_knots);
//!
//! let timeline = Timeline::for_track(&track, stats.duration_secs);
//! if let Some(halfway) = timeline.position_at(1800.0) {
//!     println!("Halfway: {:.4}, {:.4}", halfway.lon, halfway.lat);
//! }
//! ```

pub mod format;
pub mod geo_utils;
pub mod playback;
pub mod sim;
pub mod source;
pub mod stats;
pub mod timeline;

pub use playback::{
    FrameHandle, FrameScheduler, ManualClock, MapSink, PlaybackConfig, PlaybackController,
    PlaybackState, PlaybackStatus, ScrubberSink,
};
pub use source::{InMemoryTrackSource, Track, TrackEndpoint, TrackEndpoints, TrackSource};
pub use stats::{compute_stats, compute_stats_batch, StatsSummary, TimeValue, TrackStats};
pub use timeline::{
    build_timeline, build_timeline_from_timestamps, heading_at, position_at, speed_at, Timeline,
    Waypoint,
};

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("WakeTimelineRust")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A geographic position in degrees (WGS84).
///
/// # Example
/// ```
/// use wake_timeline::GeoPoint;
/// let point = GeoPoint::new(151.2093, -33.8688); // Sydney
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Create a new point from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check if the point has finite, in-range coordinates.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lon >= -180.0
            && self.lon <= 180.0
    }
}

/// One raw track point, in chronological order within its track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSample {
    pub position: GeoPoint,
    /// Speed over ground in m/s. Absent or <= 0 means unknown.
    pub sog: Option<f64>,
    /// Epoch seconds, when the source recorded per-point times
    pub time: Option<f64>,
}

impl RawSample {
    /// A sample with no speed or time.
    pub fn new(position: GeoPoint) -> Self {
        Self { position, sog: None, time: None }
    }

    pub fn with_sog(mut self, sog_ms: f64) -> Self {
        self.sog = Some(sog_ms);
        self
    }

    pub fn with_time(mut self, epoch_secs: f64) -> Self {
        self.time = Some(epoch_secs);
        self
    }

    /// Reported speed in knots, `None` when unknown.
    ///
    /// A reported 0 counts as unknown, not as stationary.
    pub fn sog_knots(&self) -> Option<f64> {
        match self.sog {
            Some(v) if v.is_finite() && v > 0.0 => Some(v * geo_utils::MS_TO_KNOTS),
            _ => None,
        }
    }
}

/// Bounding box of a track, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// Create bounds from points. `None` for empty input.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        geo_utils::compute_bounds(points)
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// `[min_lon, min_lat, max_lon, max_lat]`, the GeoJSON `bbox` order.
    pub fn to_bbox(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::info;

    /// Compute trip statistics for a sample sequence.
    #[uniffi::export]
    pub fn ffi_compute_stats(
        samples: Vec<RawSample>,
        started_at: Option<f64>,
        ended_at: Option<f64>,
        name: Option<String>,
    ) -> TrackStats {
        init_logging();
        let stats = compute_stats(&samples, started_at, ended_at, &[], name.as_deref());
        info!(
            "[WakeTimelineRust] stats for {} samples: {:.2} nm, {:.0}s, {:.1} kn",
            samples.len(), stats.distance_nm, stats.duration_secs, stats.avg_knots
        );
        stats
    }

    /// Build a distance-weighted timeline.
    #[uniffi::export]
    pub fn ffi_build_timeline(samples: Vec<RawSample>, duration_secs: f64) -> Vec<Waypoint> {
        init_logging();
        build_timeline(&samples, duration_secs)
    }

    /// Interpolated position at `t` seconds into the timeline.
    #[uniffi::export]
    pub fn ffi_position_at(waypoints: Vec<Waypoint>, t: f64) -> Option<GeoPoint> {
        position_at(&waypoints, t)
    }

    /// Interpolated speed in knots at `t` seconds into the timeline.
    #[uniffi::export]
    pub fn ffi_speed_at(waypoints: Vec<Waypoint>, t: f64) -> f64 {
        speed_at(&waypoints, t)
    }

    /// Scrubber label text for a time and speed.
    #[uniffi::export]
    pub fn ffi_playback_label(time_secs: f64, speed_knots: f64) -> String {
        format::playback_label(time_secs, speed_knots)
    }

    /// Default playback settings.
    #[uniffi::export]
    pub fn default_playback_config() -> PlaybackConfig {
        init_logging();
        PlaybackConfig::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(151.2093, -33.8688).is_valid());
        assert!(!GeoPoint::new(0.0, 91.0).is_valid());
        assert!(!GeoPoint::new(181.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_sog_knots_unknown_values() {
        let p = GeoPoint::new(0.0, 0.0);
        assert_eq!(RawSample::new(p).sog_knots(), None);
        assert_eq!(RawSample::new(p).with_sog(0.0).sog_knots(), None);
        assert_eq!(RawSample::new(p).with_sog(-1.0).sog_knots(), None);
        assert_eq!(RawSample::new(p).with_sog(f64::NAN).sog_knots(), None);
    }

    #[test]
    fn test_sog_knots_converts() {
        let kn = RawSample::new(GeoPoint::new(0.0, 0.0)).with_sog(1.0).sog_knots().unwrap();
        assert!((kn - 1.943844492).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_center_and_bbox() {
        let bounds = Bounds::from_points(&[GeoPoint::new(150.0, -34.0), GeoPoint::new(152.0, -32.0)])
            .unwrap();
        assert_eq!(bounds.center(), GeoPoint::new(151.0, -33.0));
        assert_eq!(bounds.to_bbox(), [150.0, -34.0, 152.0, -32.0]);
    }

    #[test]
    fn test_bounds_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_raw_sample_json_shape() {
        let sample = RawSample::new(GeoPoint::new(151.2, -33.8)).with_sog(3.0);
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["position"]["lon"], 151.2);
        assert_eq!(json["sog"], 3.0);
        assert!(json["time"].is_null());
    }
}
