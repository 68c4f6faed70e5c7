//! Track source interface.
//!
//! How tracks are fetched (HTTP, a database, a file) is up to the host. The
//! playback core only needs an already-decoded [`Track`] per id.

use std::collections::HashMap;

use crate::geo_utils::format_coord;
use crate::stats::{compute_stats, TimeValue, TrackStats};
use crate::{Bounds, GeoPoint, RawSample};

/// A recorded track as delivered by a [`TrackSource`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    pub id: String,
    pub name: Option<String>,
    /// Samples in chronological order
    pub samples: Vec<RawSample>,
    /// Start time in epoch seconds
    pub started_at: Option<f64>,
    /// End time in epoch seconds
    pub ended_at: Option<f64>,
    /// Fallback per-point times, used for duration when start/end are missing
    #[cfg_attr(feature = "serde", serde(default))]
    pub times: Vec<TimeValue>,
    /// Bounding box supplied by the source, if any
    pub bbox: Option<Bounds>,
}

/// First or last position of a track, for start/finish markers.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEndpoint {
    pub position: GeoPoint,
    /// Epoch seconds
    pub time: Option<f64>,
}

impl TrackEndpoint {
    /// `"lat°, lon°"` for the marker popup.
    pub fn coord_text(&self) -> String {
        format_coord(&self.position)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackEndpoints {
    pub start: TrackEndpoint,
    pub finish: TrackEndpoint,
}

impl Track {
    pub fn new(id: &str, samples: Vec<RawSample>) -> Self {
        Self {
            id: id.to_string(),
            samples,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_times(mut self, started_at: f64, ended_at: f64) -> Self {
        self.started_at = Some(started_at);
        self.ended_at = Some(ended_at);
        self
    }

    pub fn with_fallback_times(mut self, times: Vec<TimeValue>) -> Self {
        self.times = times;
        self
    }

    pub fn with_bbox(mut self, bbox: Bounds) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Sample positions, for the track geometry layer.
    pub fn positions(&self) -> Vec<GeoPoint> {
        self.samples.iter().map(|s| s.position).collect()
    }

    pub fn stats(&self) -> TrackStats {
        compute_stats(
            &self.samples,
            self.started_at,
            self.ended_at,
            &self.times,
            self.name.as_deref(),
        )
    }

    /// Source-supplied bounds, otherwise computed from the samples.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bbox.or_else(|| Bounds::from_points(&self.positions()))
    }

    /// Start and finish markers. `None` for fewer than 2 samples.
    pub fn endpoints(&self) -> Option<TrackEndpoints> {
        if self.samples.len() < 2 {
            return None;
        }
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some(TrackEndpoints {
            start: TrackEndpoint {
                position: first.position,
                time: self.started_at.or(first.time),
            },
            finish: TrackEndpoint {
                position: last.position,
                time: self.ended_at.or(last.time),
            },
        })
    }
}

/// Supplies decoded tracks by id.
pub trait TrackSource {
    fn track(&self, id: &str) -> Option<Track>;
}

/// A [`TrackSource`] backed by a map, for tests, demos and preloaded data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackSource {
    tracks: HashMap<String, Track>,
}

impl InMemoryTrackSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a track under its id.
    pub fn insert(&mut self, track: Track) {
        self.tracks.insert(track.id.clone(), track);
    }

    /// Track ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tracks.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl TrackSource for InMemoryTrackSource {
    fn track(&self, id: &str) -> Option<Track> {
        self.tracks.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> Track {
        Track::new(
            "7",
            vec![
                RawSample::new(GeoPoint::new(152.40, -32.60)).with_time(100.0),
                RawSample::new(GeoPoint::new(152.30, -32.60)),
                RawSample::new(GeoPoint::new(151.79, -32.92)).with_time(900.0),
            ],
        )
        .with_name("Broughton run")
    }

    #[test]
    fn test_endpoints_prefer_track_times() {
        let track = sample_track().with_times(50.0, 1000.0);
        let ends = track.endpoints().unwrap();
        assert_eq!(ends.start.position, GeoPoint::new(152.40, -32.60));
        assert_eq!(ends.start.time, Some(50.0));
        assert_eq!(ends.finish.time, Some(1000.0));
        assert_eq!(ends.finish.coord_text(), "-32.92000°, 151.79000°");
    }

    #[test]
    fn test_endpoints_fall_back_to_sample_times() {
        let ends = sample_track().endpoints().unwrap();
        assert_eq!(ends.start.time, Some(100.0));
        assert_eq!(ends.finish.time, Some(900.0));
    }

    #[test]
    fn test_endpoints_need_two_samples() {
        let track = Track::new("x", vec![RawSample::new(GeoPoint::new(0.0, 0.0))]);
        assert!(track.endpoints().is_none());
    }

    #[test]
    fn test_bounds_prefers_source_bbox() {
        let bbox = Bounds { min_lon: 1.0, min_lat: 2.0, max_lon: 3.0, max_lat: 4.0 };
        assert_eq!(sample_track().with_bbox(bbox).bounds(), Some(bbox));

        let computed = sample_track().bounds().unwrap();
        assert_eq!(computed.min_lon, 151.79);
        assert_eq!(computed.max_lat, -32.60);
    }

    #[test]
    fn test_stats_carry_name() {
        let stats = sample_track().with_times(0.0, 3600.0).stats();
        assert_eq!(stats.name.as_deref(), Some("Broughton run"));
        assert!(stats.distance_nm > 0.0);
    }

    #[test]
    fn test_in_memory_source() {
        let mut source = InMemoryTrackSource::new();
        source.insert(sample_track());
        source.insert(Track::new("3", vec![]));
        assert_eq!(source.ids(), vec!["3".to_string(), "7".to_string()]);
        assert_eq!(source.track("7").unwrap().name.as_deref(), Some("Broughton run"));
        assert!(source.track("missing").is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_track_from_json() {
        let json = r#"{
            "id": "12",
            "name": "Harbour",
            "samples": [
                {"position": {"lon": 151.2, "lat": -33.8}, "sog": 2.5, "time": null},
                {"position": {"lon": 151.3, "lat": -33.7}, "sog": null, "time": null}
            ],
            "started_at": null,
            "ended_at": null,
            "times": [1000, "1600"],
            "bbox": null
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.samples.len(), 2);
        assert_eq!(track.stats().duration_secs, 600.0);
    }
}
