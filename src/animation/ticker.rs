//! Marquee timing for ticker elements.
//!
//! A ticker stores a free-form speed knob, but only a fixed ladder of cycle durations reads
//! well on real screens. Speeds snap to the nearest rung; the marquee then starts with a
//! negative delay so text is already on screen at the first frame.

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// One rung of the speed ladder.
pub struct TickerSpeedPreset {
    /// Stored speed value.
    pub speed: f64,
    /// Full marquee cycle duration in seconds.
    pub seconds: f64,
}

/// Speed ladder, slowest first. Ties snap to the earlier entry.
pub const TICKER_SPEED_PRESETS: [TickerSpeedPreset; 9] = [
    TickerSpeedPreset { speed: 0.15, seconds: 120.0 },
    TickerSpeedPreset { speed: 0.2, seconds: 90.0 },
    TickerSpeedPreset { speed: 0.3, seconds: 60.0 },
    TickerSpeedPreset { speed: 0.5, seconds: 40.0 },
    TickerSpeedPreset { speed: 0.8, seconds: 25.0 },
    TickerSpeedPreset { speed: 1.0, seconds: 20.0 },
    TickerSpeedPreset { speed: 1.5, seconds: 13.0 },
    TickerSpeedPreset { speed: 2.0, seconds: 10.0 },
    TickerSpeedPreset { speed: 3.0, seconds: 7.0 },
];

/// Speed assumed when none (or a non-finite one) is stored.
pub const DEFAULT_TICKER_SPEED: f64 = 1.0;

const START_OFFSET_FRACTION: f64 = 0.25;
const MIN_START_OFFSET_SECONDS: f64 = 2.0;
const MAX_START_OFFSET_SECONDS: f64 = 20.0;
const FALLBACK_DURATION_SECONDS: f64 = 20.0;

/// Preset whose speed is closest to `speed` by absolute difference.
pub fn closest_preset(speed: Option<f64>) -> TickerSpeedPreset {
    let target = speed
        .filter(|s| s.is_finite())
        .unwrap_or(DEFAULT_TICKER_SPEED);
    let mut best = TICKER_SPEED_PRESETS[0];
    for preset in &TICKER_SPEED_PRESETS[1..] {
        if (preset.speed - target).abs() < (best.speed - target).abs() {
            best = *preset;
        }
    }
    best
}

/// Marquee cycle duration for a stored speed.
pub fn duration_seconds(speed: Option<f64>) -> f64 {
    closest_preset(speed).seconds
}

/// How far into the cycle the marquee starts: `clamp(duration * 0.25, 2, 20)`.
pub fn start_offset_seconds(duration_seconds: f64) -> f64 {
    let d = if duration_seconds.is_finite() {
        duration_seconds
    } else {
        FALLBACK_DURATION_SECONDS
    };
    (d * START_OFFSET_FRACTION).clamp(MIN_START_OFFSET_SECONDS, MAX_START_OFFSET_SECONDS)
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Resolved animation parameters for one ticker.
pub struct MarqueeTiming {
    /// Seconds for one full right-to-left pass.
    pub cycle_seconds: f64,
    /// Animation delay; always `<= 0` so the loop starts mid-cycle.
    pub delay_seconds: f64,
}

impl MarqueeTiming {
    pub fn for_speed(speed: Option<f64>) -> Self {
        let cycle_seconds = duration_seconds(speed);
        Self {
            cycle_seconds,
            delay_seconds: -start_offset_seconds(cycle_seconds),
        }
    }

    /// Horizontal translation in percent of the text width, from `100` (fully right) down
    /// to `-100` (fully left), `elapsed_seconds` after the ticker appeared.
    pub fn translate_percent_at(self, elapsed_seconds: f64) -> f64 {
        let t = (elapsed_seconds.max(0.0) - self.delay_seconds).rem_euclid(self.cycle_seconds);
        let phase = t / self.cycle_seconds;
        100.0 - 200.0 * phase
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ticker.rs"]
mod tests;
