//! # Timeline Reconstruction
//!
//! Turns raw samples into a sequence of timestamped, speed-annotated
//! [`Waypoint`]s spanning `[0, duration]`, and answers interpolated queries
//! against it.
//!
//! ## Building
//!
//! Most stored tracks only carry a start and end time. [`build_timeline`]
//! spreads the known duration over the segments in proportion to their
//! great-circle length, so long legs take longer than short ones. Tracks whose
//! points are all stationary fall back to equal time per segment.
//!
//! When every sample carries its own timestamp,
//! [`build_timeline_from_timestamps`] uses the real times instead.
//!
//! Per-waypoint speed is the sample's reported SOG when positive, otherwise the
//! segment's distance over time. Zero-length segments in time carry the previous
//! speed forward. The first waypoint borrows the second one's speed unless it
//! reported its own.
//!
//! ## Querying
//!
//! [`position_at`], [`speed_at`] and [`heading_at`] clamp outside the timeline
//! and interpolate linearly inside it. Position interpolation is planar in
//! lon/lat, not along the great circle; at the segment lengths of a recorded
//! track the difference is invisible on the map.

use log::debug;

use crate::geo_utils::{haversine_distance, initial_bearing, MS_TO_KNOTS};
use crate::source::Track;
use crate::{GeoPoint, RawSample};

/// A synthesized point on the playback timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Seconds since the start of the track
    pub time_offset: f64,
    pub position: GeoPoint,
    /// Speed over ground in knots
    pub speed_knots: f64,
}

/// Build a distance-weighted timeline of `duration_secs`.
///
/// Returns an empty vector for fewer than 2 samples or a duration that is not
/// a positive finite number. The first waypoint is at exactly `0.0` and the
/// last at exactly `duration_secs`.
///
/// # Example
///
/// ```rust
/// use wake_timeline::{GeoPoint, RawSample, build_timeline};
///
/// let samples: Vec<RawSample> = [(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]
///     .iter()
///     .map(|&(lon, lat)| RawSample::new(GeoPoint::new(lon, lat)))
///     .collect();
///
/// let waypoints = build_timeline(&samples, 100.0);
/// let offsets: Vec<f64> = waypoints.iter().map(|w| w.time_offset).collect();
/// assert_eq!(offsets, vec![0.0, 50.0, 100.0]);
/// ```
pub fn build_timeline(samples: &[RawSample], duration_secs: f64) -> Vec<Waypoint> {
    if samples.len() < 2 || !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Vec::new();
    }

    let distances = segment_distances(samples);
    let total_distance: f64 = distances.iter().sum();
    let uniform = duration_secs / (samples.len() - 1) as f64;

    let times: Vec<f64> = distances
        .iter()
        .map(|d| {
            if total_distance > 0.0 {
                duration_secs * (d / total_distance)
            } else {
                uniform
            }
        })
        .collect();

    let waypoints = assemble(samples, &distances, &times, duration_secs);
    debug!(
        "built distance-weighted timeline: {} waypoints over {:.0}s ({:.0}m)",
        waypoints.len(),
        duration_secs,
        total_distance
    );
    waypoints
}

/// Build a timeline from per-sample timestamps.
///
/// Returns `None` unless there are at least 2 samples, every sample has a
/// finite timestamp, the timestamps never decrease and the total span is
/// positive.
pub fn build_timeline_from_timestamps(samples: &[RawSample]) -> Option<Vec<Waypoint>> {
    if samples.len() < 2 {
        return None;
    }

    let stamps: Vec<f64> = samples
        .iter()
        .map(|s| s.time.filter(|t| t.is_finite()))
        .collect::<Option<_>>()?;

    if stamps.windows(2).any(|w| w[1] < w[0]) {
        return None;
    }

    let span = stamps[stamps.len() - 1] - stamps[0];
    if span <= 0.0 {
        return None;
    }

    let distances = segment_distances(samples);
    let times: Vec<f64> = stamps.windows(2).map(|w| w[1] - w[0]).collect();

    let waypoints = assemble(samples, &distances, &times, span);
    debug!("built timestamped timeline: {} waypoints over {:.0}s", waypoints.len(), span);
    Some(waypoints)
}

fn segment_distances(samples: &[RawSample]) -> Vec<f64> {
    samples
        .windows(2)
        .map(|w| haversine_distance(&w[0].position, &w[1].position))
        .collect()
}

/// Accumulate segment times into waypoints. `distances` and `times` have one
/// entry per segment.
fn assemble(samples: &[RawSample], distances: &[f64], times: &[f64], duration: f64) -> Vec<Waypoint> {
    let first = &samples[0];
    let mut waypoints = Vec::with_capacity(samples.len());
    waypoints.push(Waypoint {
        time_offset: 0.0,
        position: first.position,
        speed_knots: first.sog_knots().unwrap_or(0.0),
    });

    let mut elapsed = 0.0;
    let mut prev_speed = waypoints[0].speed_knots;

    for ((sample, &seg_distance), &seg_time) in samples[1..].iter().zip(distances).zip(times) {
        elapsed += seg_time;

        let speed_knots = match sample.sog_knots() {
            Some(kn) => kn,
            None if seg_time > 0.0 => (seg_distance / seg_time) * MS_TO_KNOTS,
            None => prev_speed,
        };
        prev_speed = speed_knots;

        waypoints.push(Waypoint {
            // accumulated rounding may overshoot before the last segment
            time_offset: elapsed.min(duration),
            position: sample.position,
            speed_knots,
        });
    }

    if let Some(last) = waypoints.last_mut() {
        last.time_offset = duration;
    }
    if first.sog_knots().is_none() {
        waypoints[0].speed_knots = waypoints[1].speed_knots;
    }

    waypoints
}

// ============================================================================
// Queries
// ============================================================================

/// Locate the segment for `t`: `Err(index)` when `t` clamps to a single
/// waypoint, `Ok((prev, curr, ratio))` when it falls strictly inside.
fn locate(waypoints: &[Waypoint], t: f64) -> Result<(usize, usize, f64), usize> {
    let last = waypoints.len() - 1;
    // `!(t > ..)` also routes NaN to the first waypoint
    if !(t > waypoints[0].time_offset) {
        return Err(0);
    }
    if t >= waypoints[last].time_offset {
        return Err(last);
    }

    // first waypoint with time_offset >= t; always in 1..=last here
    let curr = waypoints.partition_point(|w| w.time_offset < t);
    let prev = curr - 1;
    let span = waypoints[curr].time_offset - waypoints[prev].time_offset;
    let ratio = if span > 0.0 {
        (t - waypoints[prev].time_offset) / span
    } else {
        0.0
    };
    Ok((prev, curr, ratio))
}

#[inline]
fn lerp(a: f64, b: f64, ratio: f64) -> f64 {
    a + (b - a) * ratio
}

/// Interpolated position at `t` seconds. `None` only for an empty timeline.
pub fn position_at(waypoints: &[Waypoint], t: f64) -> Option<GeoPoint> {
    if waypoints.is_empty() {
        return None;
    }
    let point = match locate(waypoints, t) {
        Err(i) => waypoints[i].position,
        Ok((prev, curr, ratio)) => {
            let a = waypoints[prev].position;
            let b = waypoints[curr].position;
            GeoPoint::new(lerp(a.lon, b.lon, ratio), lerp(a.lat, b.lat, ratio))
        }
    };
    Some(point)
}

/// Interpolated speed in knots at `t` seconds. `0.0` for an empty timeline.
pub fn speed_at(waypoints: &[Waypoint], t: f64) -> f64 {
    if waypoints.is_empty() {
        return 0.0;
    }
    match locate(waypoints, t) {
        Err(i) => waypoints[i].speed_knots,
        Ok((prev, curr, ratio)) => {
            lerp(waypoints[prev].speed_knots, waypoints[curr].speed_knots, ratio)
        }
    }
}

/// Course over ground at `t`: the initial bearing of the segment being
/// travelled, in degrees `[0, 360)`.
///
/// Clamps to the first or last segment outside the timeline. Stationary
/// segments reuse the nearest earlier moving segment. `None` for fewer than
/// 2 waypoints.
pub fn heading_at(waypoints: &[Waypoint], t: f64) -> Option<f64> {
    if waypoints.len() < 2 {
        return None;
    }
    let mut curr = match locate(waypoints, t) {
        Ok((_, curr, _)) => curr,
        Err(i) => i.max(1),
    };

    while curr > 1 && waypoints[curr - 1].position == waypoints[curr].position {
        curr -= 1;
    }
    Some(initial_bearing(&waypoints[curr - 1].position, &waypoints[curr].position))
}

// ============================================================================
// Timeline
// ============================================================================

/// An owned timeline with its duration.
///
/// An empty timeline reports a duration of zero, which disables playback.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    waypoints: Vec<Waypoint>,
    duration: f64,
}

impl Timeline {
    /// Distance-weighted timeline of `duration_secs`.
    pub fn build(samples: &[RawSample], duration_secs: f64) -> Self {
        Self::from_waypoints(build_timeline(samples, duration_secs))
    }

    /// Timeline for a loaded track: real per-point times when every sample has
    /// one, otherwise distance-weighted over `duration_secs`.
    pub fn for_track(track: &Track, duration_secs: f64) -> Self {
        match build_timeline_from_timestamps(&track.samples) {
            Some(waypoints) => Self::from_waypoints(waypoints),
            None => Self::build(&track.samples, duration_secs),
        }
    }

    /// Wrap already-built waypoints. Duration is the last waypoint's offset.
    pub fn from_waypoints(waypoints: Vec<Waypoint>) -> Self {
        let duration = match waypoints.last() {
            Some(w) if waypoints.len() >= 2 => w.time_offset.max(0.0),
            _ => 0.0,
        };
        Self { waypoints, duration }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn into_waypoints(self) -> Vec<Waypoint> {
        self.waypoints
    }

    pub fn position_at(&self, t: f64) -> Option<GeoPoint> {
        position_at(&self.waypoints, t)
    }

    pub fn speed_at(&self, t: f64) -> f64 {
        speed_at(&self.waypoints, t)
    }

    pub fn heading_at(&self, t: f64) -> Option<f64> {
        heading_at(&self.waypoints, t)
    }
}
