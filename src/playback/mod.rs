//! # Playback
//!
//! A single-threaded playback session for one loaded track.
//!
//! ## States
//!
//! | Status | Meaning |
//! |--------|---------|
//! | `Idle` | No track, or a track with zero duration. Nothing ticks. |
//! | `Paused` | Track loaded, clock stopped, `current_time` held. |
//! | `Playing` | A frame is pending and each frame advances the clock. |
//!
//! ## Clock
//!
//! Each frame advances `current_time` by the wall-clock delta since the previous
//! frame, times the playback rate. The first frame after `play()` only records
//! its timestamp. Reaching the end clamps to `duration` and pauses; no further
//! frame is requested.
//!
//! At most one frame request is outstanding at any time. Every pause, reload,
//! dispose and reschedule cancels the previous handle first, and frames arriving
//! with any other handle are dropped.
//!
//! ## Example
//!
//! ```rust
//! use wake_timeline::playback::{ManualClock, NullSink, PlaybackConfig, PlaybackController, PlaybackStatus};
//! use wake_timeline::{build_timeline, GeoPoint, RawSample};
//!
//! let samples: Vec<RawSample> = [(0.0, 0.0), (0.0, 1.0)]
//!     .iter()
//!     .map(|&(lon, lat)| RawSample::new(GeoPoint::new(lon, lat)))
//!     .collect();
//!
//! let mut player = PlaybackController::new(
//!     PlaybackConfig::default(),
//!     ManualClock::new(),
//!     NullSink,
//!     NullSink,
//! );
//! player.load(build_timeline(&samples, 60.0), 60.0);
//! player.play();
//!
//! // host frame loop
//! for (i, handle) in player.scheduler_mut().take_pending().into_iter().enumerate() {
//!     player.on_frame(handle, i as f64);
//! }
//! assert_eq!(player.status(), PlaybackStatus::Playing);
//! ```

mod clock;
mod sinks;

pub use clock::{FrameHandle, FrameScheduler, ManualClock};
pub use sinks::{MapSink, NullSink, ScrubberSink};

use log::{debug, info};

use crate::format::{format_duration, playback_label};
use crate::source::Track;
use crate::stats::TrackStats;
use crate::timeline::{Timeline, Waypoint};
use crate::GeoPoint;

/// Configuration for transport controls.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Seconds moved by step-forward / step-backward.
    /// Default: 15.0
    pub step_seconds: f64,

    /// Rate multiplier selected for a fresh session.
    /// Default: 4.0
    pub default_rate: f64,

    /// Rate applied when a rate selection can't be parsed or isn't offered.
    /// Default: 1.0
    pub fallback_rate: f64,

    /// Multipliers offered by the rate selector.
    /// Default: 1, 2, 4, 8, 16, 32
    pub rate_choices: Vec<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_seconds: 15.0,
            default_rate: 4.0,
            fallback_rate: 1.0,
            rate_choices: vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0],
        }
    }
}

impl PlaybackConfig {
    /// Parse a rate selector value such as `"4"`, `"8x"` or `"16×"`.
    ///
    /// Values that don't parse, or aren't among `rate_choices`, give
    /// `fallback_rate`.
    pub fn parse_rate(&self, input: &str) -> f64 {
        let trimmed = input
            .trim()
            .trim_end_matches(|c: char| matches!(c, 'x' | 'X' | '×'))
            .trim_end();

        match trimmed.parse::<f64>() {
            Ok(rate) if self.rate_choices.iter().any(|c| (c - rate).abs() < 1e-9) => rate,
            _ => self.fallback_rate,
        }
    }
}

/// Coarse state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Paused,
    Playing,
}

/// Clock state of a session. `0 <= current_time <= duration` always holds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackState {
    pub current_time: f64,
    pub duration: f64,
    pub playing: bool,
    pub rate: f64,
    /// Timestamp of the last frame that advanced the clock, in seconds
    pub last_tick_timestamp: Option<f64>,
}

impl PlaybackState {
    fn idle(rate: f64) -> Self {
        Self {
            current_time: 0.0,
            duration: 0.0,
            playing: false,
            rate,
            last_tick_timestamp: None,
        }
    }
}

/// Drives playback of one timeline and keeps the map marker and scrubber in sync.
///
/// Owns its scheduler and sinks. Dropping the controller cancels any pending
/// frame.
pub struct PlaybackController<S: FrameScheduler, M: MapSink, U: ScrubberSink> {
    config: PlaybackConfig,
    scheduler: S,
    map: M,
    scrubber: U,
    timeline: Timeline,
    state: PlaybackState,
    pending: Option<FrameHandle>,
}

impl<S: FrameScheduler, M: MapSink, U: ScrubberSink> PlaybackController<S, M, U> {
    /// Create an idle session.
    pub fn new(config: PlaybackConfig, scheduler: S, map: M, scrubber: U) -> Self {
        let rate = if config.default_rate.is_finite() && config.default_rate > 0.0 {
            config.default_rate
        } else {
            1.0
        };
        Self {
            config,
            scheduler,
            map,
            scrubber,
            timeline: Timeline::default(),
            state: PlaybackState::idle(rate),
            pending: None,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Load a new timeline, replacing whatever was loaded.
    ///
    /// Any pending frame is cancelled first. With fewer than 2 waypoints or a
    /// duration that isn't positive the session goes `Idle` and the scrubber is
    /// disabled; otherwise it is `Paused` at time 0. The selected rate carries
    /// over.
    pub fn load(&mut self, waypoints: Vec<Waypoint>, duration: f64) {
        self.cancel_pending();

        let usable = waypoints.len() >= 2 && duration.is_finite() && duration > 0.0;
        let rate = self.state.rate;
        self.state = PlaybackState::idle(rate);

        if usable {
            self.timeline = Timeline::from_waypoints(waypoints);
            self.state.duration = duration;
        } else {
            self.timeline = Timeline::default();
        }

        debug!(
            "playback load: {} waypoints, duration {:.1}s, status {:?}",
            self.timeline.waypoints().len(),
            self.state.duration,
            self.status()
        );

        self.scrubber.set_range(0.0, self.state.duration);
        self.scrubber.set_enabled(usable);
        if usable {
            self.sync();
        } else {
            self.scrubber.set_value(0.0);
            self.scrubber.set_label(&format_duration(0.0));
        }
    }

    /// Load an already-built [`Timeline`].
    pub fn load_timeline(&mut self, timeline: Timeline) {
        let duration = timeline.duration();
        self.load(timeline.into_waypoints(), duration);
    }

    /// Compute stats for a track, build its timeline and load it.
    ///
    /// Returns the stats for the stats panel. The track geometry is left to
    /// the host.
    pub fn load_track(&mut self, track: &Track) -> TrackStats {
        let stats = track.stats();
        let timeline = Timeline::for_track(track, stats.duration_secs);
        info!(
            "loading track {}: {} samples, {:.2} nm, {:.0}s",
            track.id,
            track.samples.len(),
            stats.distance_nm,
            timeline.duration()
        );
        self.load_timeline(timeline);
        stats
    }

    /// Tear the session down: cancel ticking, drop the timeline, disable the
    /// scrubber.
    pub fn dispose(&mut self) {
        self.load(Vec::new(), 0.0);
    }

    // ------------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------------

    /// Start playing. Restarts from 0 when sitting at the end. No-op when idle
    /// or already playing.
    pub fn play(&mut self) {
        match self.status() {
            PlaybackStatus::Idle => {
                debug!("play ignored: nothing to play");
                return;
            }
            PlaybackStatus::Playing => return,
            PlaybackStatus::Paused => {}
        }

        let restart = self.state.current_time >= self.state.duration;
        if restart {
            self.state.current_time = 0.0;
        }
        self.state.playing = true;
        self.state.last_tick_timestamp = None;
        self.schedule();
        debug!("play from {:.1}s at {}x", self.state.current_time, self.state.rate);

        if restart {
            self.sync();
        }
    }

    /// Stop the clock. Idempotent.
    pub fn pause(&mut self) {
        self.cancel_pending();
        if self.state.playing {
            debug!("pause at {:.1}s", self.state.current_time);
        }
        self.state.playing = false;
        self.state.last_tick_timestamp = None;
    }

    /// Play/pause button.
    pub fn toggle(&mut self) {
        if self.state.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move to `t`, clamped to `[0, duration]`. Keeps playing if playing.
    /// `NaN` is ignored.
    pub fn seek(&mut self, t: f64) {
        if t.is_nan() {
            return;
        }
        self.state.current_time = t.clamp(0.0, self.state.duration);
        self.sync();
    }

    /// User dragged the scrubber: pause, then seek.
    pub fn scrub(&mut self, t: f64) {
        self.pause();
        self.seek(t);
    }

    /// Pause, then move by `delta_secs`.
    pub fn step(&mut self, delta_secs: f64) {
        self.pause();
        self.seek(self.state.current_time + delta_secs);
    }

    pub fn step_forward(&mut self) {
        self.step(self.config.step_seconds);
    }

    pub fn step_backward(&mut self) {
        self.step(-self.config.step_seconds);
    }

    /// Change the rate multiplier for later frames. Non-finite or
    /// non-positive values keep the current rate.
    pub fn set_rate(&mut self, rate: f64) {
        if !rate.is_finite() || rate <= 0.0 {
            debug!("rate {} rejected, keeping {}x", rate, self.state.rate);
            return;
        }
        self.state.rate = rate;
        debug!("rate set to {}x", rate);
    }

    /// Apply a rate selector value. Returns the rate now in effect.
    pub fn select_rate(&mut self, input: &str) -> f64 {
        let rate = self.config.parse_rate(input);
        self.set_rate(rate);
        self.state.rate
    }

    /// Deliver a frame requested through the scheduler.
    ///
    /// `timestamp` is the host's monotonic frame time in seconds. Frames with
    /// a handle other than the one currently pending are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: f64) {
        if self.pending != Some(handle) {
            debug!("stale frame {} ignored", handle.id());
            return;
        }
        self.pending = None;
        if !self.state.playing {
            return;
        }

        let delta = match self.state.last_tick_timestamp {
            Some(last) if timestamp.is_finite() => (timestamp - last).max(0.0) * self.state.rate,
            _ => 0.0,
        };
        if timestamp.is_finite() {
            self.state.last_tick_timestamp = Some(timestamp);
        }

        let next = self.state.current_time + delta;
        if next >= self.state.duration {
            self.state.current_time = self.state.duration;
            self.state.playing = false;
            self.state.last_tick_timestamp = None;
            debug!("reached end at {:.1}s", self.state.duration);
        } else {
            self.state.current_time = next;
            self.schedule();
        }

        self.sync();
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn status(&self) -> PlaybackStatus {
        if self.state.duration <= 0.0 {
            PlaybackStatus::Idle
        } else if self.state.playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn current_position(&self) -> Option<GeoPoint> {
        self.timeline.position_at(self.state.current_time)
    }

    pub fn current_speed(&self) -> f64 {
        self.timeline.speed_at(self.state.current_time)
    }

    pub fn current_heading(&self) -> Option<f64> {
        self.timeline.heading_at(self.state.current_time)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn scrubber(&self) -> &U {
        &self.scrubber
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn schedule(&mut self) {
        self.cancel_pending();
        self.pending = Some(self.scheduler.request_frame());
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Push the current time to the sinks. State must be final before this runs.
    fn sync(&mut self) {
        let t = self.state.current_time;
        let Some(position) = self.timeline.position_at(t) else {
            return;
        };
        let speed = self.timeline.speed_at(t);

        self.map.set_marker_position(position);
        self.scrubber.set_value(t);
        self.scrubber.set_label(&playback_label(t, speed));
    }
}

impl<S: FrameScheduler, M: MapSink, U: ScrubberSink> Drop for PlaybackController<S, M, U> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
