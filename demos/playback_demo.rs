//! Simulate a passage, print its stats and play it back at 32x.
//!
//! Run with: cargo run --example playback_demo

use wake_timeline::playback::{ManualClock, MapSink, PlaybackConfig, PlaybackController, ScrubberSink};
use wake_timeline::sim::{broughton_to_newcastle, SimConfig};
use wake_timeline::{geo_utils, GeoPoint, PlaybackStatus};

/// Prints marker moves.
struct ConsoleMap;

impl MapSink for ConsoleMap {
    fn set_marker_position(&mut self, position: GeoPoint) {
        println!("   marker  {}", geo_utils::format_coord(&position));
    }

    fn set_track_geometry(&mut self, positions: &[GeoPoint]) {
        println!("   track line with {} points", positions.len());
    }
}

/// Prints label changes only.
struct ConsoleScrubber;

impl ScrubberSink for ConsoleScrubber {
    fn set_range(&mut self, min: f64, max: f64) {
        println!("   scrubber range {:.0}..{:.0}s", min, max);
    }
    fn set_value(&mut self, _value: f64) {}
    fn set_enabled(&mut self, enabled: bool) {
        println!("   scrubber enabled: {}", enabled);
    }
    fn set_label(&mut self, text: &str) {
        println!("   label   {}", text);
    }
}

fn main() {
    let track = broughton_to_newcastle(&SimConfig {
        speed_knots: 6.0,
        interval_secs: 60,
        start_epoch: 1_700_000_000.0,
    });

    println!("Track Playback Demo\n");

    let mut map = ConsoleMap;
    map.set_track_geometry(&track.positions());

    let mut player = PlaybackController::new(
        PlaybackConfig::default(),
        ManualClock::new(),
        map,
        ConsoleScrubber,
    );

    println!("1. Load track:");
    let stats = player.load_track(&track);
    let summary = stats.summary();
    println!("   {} | {} | {} | {}\n", summary.title, summary.distance, summary.duration, summary.speed);

    if let Some(ends) = track.endpoints() {
        println!("   start  {}", ends.start.coord_text());
        println!("   finish {}\n", ends.finish.coord_text());
    }

    println!("2. Play at {}x, one frame per simulated minute of wall clock:", player.select_rate("32x"));
    player.play();

    let mut frame_time = 0.0;
    let mut frames = 0;
    while player.status() == PlaybackStatus::Playing && frames < 10 {
        for handle in player.scheduler_mut().take_pending() {
            player.on_frame(handle, frame_time);
        }
        frame_time += 60.0;
        frames += 1;
    }

    println!("\n3. Step back and scrub:");
    player.step_backward();
    player.scrub(player.state().duration / 2.0);
    if let Some(heading) = player.current_heading() {
        println!("   heading {:.0}°", heading);
    }

    println!("\n4. Dispose:");
    player.dispose();
    println!("   status {:?}", player.status());
}
