//! Human-readable text for durations, speeds and the playback label.

/// Placeholder shown for zero or non-finite durations.
pub const PLACEHOLDER: &str = "—";

/// Format a duration in seconds.
///
/// - `>= 1h` → `"{h}h {m}m"`
/// - `>= 1m` → `"{m}m {s}s"`
/// - otherwise `"{s}s"`
///
/// Zero, negative and non-finite inputs render as [`PLACEHOLDER`].
///
/// ```rust
/// use wake_timeline::format::format_duration;
///
/// assert_eq!(format_duration(3725.0), "1h 2m");
/// assert_eq!(format_duration(125.0), "2m 5s");
/// assert_eq!(format_duration(42.9), "42s");
/// assert_eq!(format_duration(0.0), "—");
/// ```
pub fn format_duration(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return PLACEHOLDER.to_string();
    }
    let h = (secs / 3600.0).floor() as u64;
    let m = ((secs % 3600.0) / 60.0).floor() as u64;
    let s = (secs % 60.0).floor() as u64;

    if h > 0 {
        format!("{}h {}m", h, m)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Speed in knots with one decimal, e.g. `"6.0 kn"`.
pub fn format_knots(knots: f64) -> String {
    format!("{:.1} kn", knots)
}

/// Scrubber label: `"<time> — <speed> kn"`.
pub fn playback_label(time_secs: f64, speed_knots: f64) -> String {
    format!("{} — {}", format_duration(time_secs), format_knots(speed_knots))
}
