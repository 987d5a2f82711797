//! Status page monitor for a 16×16 RGB LED matrix.
//!
//! Polls the public Statuspage v2 JSON API for one or more domains and
//! renders their health onto the panel: a blended overall-status band, a
//! today-status column per component, and a 14-day incident heat strip.
//!
//! The core (cache, color policy, projector) is pure and host-testable;
//! only [`sink::MatrixSink`] touches the `rpi-led-matrix` C library, behind
//! the `hardware` feature. Tests run with `cargo test --no-default-features`.

pub mod cache;
pub mod client;
pub mod driver;
pub mod error;
pub mod render;
pub mod sink;
pub mod status;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Grid geometry ──────────────────────────────────────────────────

/// The panel is a fixed 16×16 matrix.
pub const GRID_SIZE: usize = 16;

/// Component rows 0..=12; anything the API lists beyond this has no room.
pub const MAX_COMPONENTS: usize = 13;

/// Historical window in days: heat-strip columns 0..=13.
pub const MAX_DAYS: i64 = 14;

// ── Freshness thresholds ───────────────────────────────────────────

/// Summary and incident snapshots are trusted for a day.
pub const MAX_AGE_SUMMARY: u64 = 24 * 60 * 60;

/// Past this, the cached summary's indicator is too old for the overall
/// band and `status.json` is fetched live instead.
pub const MAX_AGE_STATUS: u64 = 5 * 60;

// ── Color ──────────────────────────────────────────────────────────

/// Our own color type, decoupled from the hardware crate.
///
/// This lets the projector and its tests run on any host without
/// `rpi-led-matrix`. At the hardware boundary, [`sink::MatrixSink`]
/// converts to the crate's `LedColor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// All LEDs off.
    pub const OFF: Color = Color::new(0, 0, 0);

    /// Scale this color by a brightness factor in `0.0..=1.0`.
    ///
    /// The matrix library has no runtime brightness control, so dimming
    /// happens in software before pixels reach the hardware.
    pub fn scaled(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * factor) as u8,
            g: (self.g as f32 * factor) as u8,
            b: (self.b as f32 * factor) as u8,
        }
    }
}

// ── Shutdown flag ──────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// The poll driver checks the flag between domains, so a frame is never
/// interrupted mid-flush.
pub fn setup_signal_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    running
}

/// Check if the poll loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn color_new() {
        let c = Color::new(10, 20, 30);
        assert_eq!(c.r, 10);
        assert_eq!(c.g, 20);
        assert_eq!(c.b, 30);
    }

    #[test]
    fn scaled_full_brightness_is_identity() {
        let c = Color::new(255, 79, 0);
        assert_eq!(c.scaled(1.0), c);
    }

    #[test]
    fn scaled_clamps_above_one() {
        let c = Color::new(100, 200, 50);
        assert_eq!(c.scaled(3.5), c);
    }

    #[test]
    fn scaled_zero_is_off() {
        assert_eq!(Color::new(255, 255, 255).scaled(0.0), Color::OFF);
    }

    #[rstest]
    #[case(0.5, Color::new(100, 50, 25))]
    #[case(0.2, Color::new(40, 20, 10))]
    fn scaled_dims_each_channel(#[case] factor: f32, #[case] expected: Color) {
        assert_eq!(Color::new(200, 100, 50).scaled(factor), expected);
    }

    #[test]
    fn scaled_negative_is_off() {
        assert_eq!(Color::new(200, 100, 50).scaled(-1.0), Color::OFF);
    }
}
