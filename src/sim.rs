//! Synthetic tracks for demos and tests.
//!
//! Walks a list of legs at constant speed, dropping a sample every
//! `interval_secs`. Each sample carries the constant SOG and its own timestamp.
//! The last sample of every leg sits exactly on the leg's end point.

use geo::{Destination, Haversine, Point};
use log::debug;

use crate::geo_utils::{haversine_distance, initial_bearing, METERS_PER_NM};
use crate::source::Track;
use crate::{GeoPoint, RawSample};

/// Broughton Island to Newcastle Harbour, NSW, as (lon, lat).
pub const BROUGHTON_TO_NEWCASTLE: [(f64, f64); 5] = [
    (152.40, -32.60), // 5 nm east of Broughton Island
    (152.30, -32.60), // abeam Broughton Island
    (152.17, -32.71), // Port Stephens entrance
    (152.08, -32.79), // Stockton Bight
    (151.79, -32.92), // Newcastle Harbour entrance
];

/// Simulator settings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Speed over ground in knots. Values <= 0 use 6.0.
    pub speed_knots: f64,
    /// Seconds between samples. Values < 1 use 10.
    pub interval_secs: u32,
    /// Epoch seconds of the first sample
    pub start_epoch: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            speed_knots: 6.0,
            interval_secs: 10,
            start_epoch: 0.0,
        }
    }
}

/// Simulate a passage along `route`.
///
/// An empty route gives a track with no samples and no times.
pub fn simulate_route(id: &str, name: &str, route: &[GeoPoint], config: &SimConfig) -> Track {
    let speed_knots = if config.speed_knots.is_finite() && config.speed_knots > 0.0 {
        config.speed_knots
    } else {
        6.0
    };
    let interval = if config.interval_secs < 1 { 10 } else { config.interval_secs };

    let Some(&origin) = route.first() else {
        return Track::new(id, Vec::new()).with_name(name);
    };

    let sog_ms = speed_knots * METERS_PER_NM / 3600.0;
    let step_m = sog_ms * interval as f64;
    let mut t = config.start_epoch;

    let mut samples = vec![RawSample::new(origin).with_sog(sog_ms).with_time(t)];
    let mut current = origin;

    for leg in route.windows(2) {
        let (from, to) = (leg[0], leg[1]);
        let bearing = initial_bearing(&from, &to);
        let distance = haversine_distance(&from, &to);
        let steps = ((distance / step_m).ceil() as usize).max(1);

        for i in 0..steps {
            let next = if i == steps - 1 {
                to
            } else {
                let p = Haversine::destination(Point::new(current.lon, current.lat), bearing, step_m);
                GeoPoint::new(p.x(), p.y())
            };
            t += interval as f64;
            samples.push(RawSample::new(next).with_sog(sog_ms).with_time(t));
            current = next;
        }
    }

    debug!("simulated {} samples over {:.0}s", samples.len(), t - config.start_epoch);

    Track::new(id, samples)
        .with_name(name)
        .with_times(config.start_epoch, t)
}

/// The Broughton → Newcastle passage as a track.
pub fn broughton_to_newcastle(config: &SimConfig) -> Track {
    let route: Vec<GeoPoint> = BROUGHTON_TO_NEWCASTLE
        .iter()
        .map(|&(lon, lat)| GeoPoint::new(lon, lat))
        .collect();
    simulate_route("sim-broughton", "Sim: Broughton→Newcastle (SSW)", &route, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Timeline;

    #[test]
    fn test_empty_route() {
        let track = simulate_route("e", "Empty", &[], &SimConfig::default());
        assert!(track.samples.is_empty());
        assert_eq!(track.started_at, None);
        assert_eq!(track.stats().duration_secs, 0.0);
    }

    #[test]
    fn test_legs_end_on_waypoints() {
        let track = broughton_to_newcastle(&SimConfig::default());
        let positions = track.positions();
        for &(lon, lat) in &BROUGHTON_TO_NEWCASTLE {
            assert!(positions.contains(&GeoPoint::new(lon, lat)));
        }
        assert_eq!(track.samples.last().unwrap().position, GeoPoint::new(151.79, -32.92));
    }

    #[test]
    fn test_times_step_by_interval() {
        let config = SimConfig { speed_knots: 12.0, interval_secs: 30, start_epoch: 1000.0 };
        let track = broughton_to_newcastle(&config);
        let times: Vec<f64> = track.samples.iter().map(|s| s.time.unwrap()).collect();
        assert_eq!(times[0], 1000.0);
        assert!(times.windows(2).all(|w| w[1] - w[0] == 30.0));
        assert_eq!(track.ended_at, times.last().copied());
    }

    #[test]
    fn test_average_speed_close_to_configured() {
        let track = broughton_to_newcastle(&SimConfig::default());
        let stats = track.stats();
        // final step of each leg is short, so the average sits a little under
        assert!(stats.avg_knots > 5.5 && stats.avg_knots <= 6.01);
    }

    #[test]
    fn test_invalid_settings_use_defaults() {
        let config = SimConfig { speed_knots: -1.0, interval_secs: 0, start_epoch: 0.0 };
        let track = broughton_to_newcastle(&config);
        let sog = track.samples[0].sog.unwrap();
        assert!((sog - 6.0 * METERS_PER_NM / 3600.0).abs() < 1e-12);
        assert_eq!(track.samples[1].time, Some(10.0));
    }

    #[test]
    fn test_sim_track_uses_timestamped_timeline() {
        let track = broughton_to_newcastle(&SimConfig::default());
        let timeline = Timeline::for_track(&track, 0.0);
        assert_eq!(timeline.duration(), track.stats().duration_secs);
        assert_eq!(timeline.waypoints().len(), track.samples.len());
    }
}
