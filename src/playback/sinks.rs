//! Output ports the playback controller pushes state into.
//!
//! Sinks only receive values. They have no handle back to the controller, so a
//! sink can't re-enter it while an update is being delivered.

use crate::GeoPoint;

/// The map view.
pub trait MapSink {
    /// Move the playback marker.
    fn set_marker_position(&mut self, position: GeoPoint);

    /// Replace the drawn track line. Called by the host when a track loads;
    /// the controller only moves the marker.
    fn set_track_geometry(&mut self, positions: &[GeoPoint]);
}

/// The scrubber control and its label.
pub trait ScrubberSink {
    fn set_range(&mut self, min: f64, max: f64);
    fn set_value(&mut self, value: f64);
    fn set_enabled(&mut self, enabled: bool);
    fn set_label(&mut self, text: &str);
}

/// A sink that drops everything, for headless sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MapSink for NullSink {
    fn set_marker_position(&mut self, _position: GeoPoint) {}
    fn set_track_geometry(&mut self, _positions: &[GeoPoint]) {}
}

impl ScrubberSink for NullSink {
    fn set_range(&mut self, _min: f64, _max: f64) {}
    fn set_value(&mut self, _value: f64) {}
    fn set_enabled(&mut self, _enabled: bool) {}
    fn set_label(&mut self, _text: &str) {}
}
