//! Pixel sink: the hardware boundary between projected frames and LEDs.
//!
//! The projector produces a [`Frame`]; [`push_frame`] drives any
//! [`PixelSink`] through the same fixed sequence once per domain per cycle:
//! clear → rotation/brightness config → 256 pixel writes → flush.
//!
//! [`MatrixSink`] is the real panel, behind the `hardware` feature. The
//! `rpi-led-matrix` canvas has no runtime rotation or brightness controls,
//! so both are applied in software here: coordinates are rotated and colors
//! scaled before they reach the canvas.

use crate::render::Frame;
use crate::{Color, GRID_SIZE};

/// Minimal surface the driver needs from a display.
pub trait PixelSink {
    fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8);
    fn clear(&mut self);
    /// Brightness factor in `0.0..=1.0`, applied to subsequent pixel writes.
    fn brightness(&mut self, level: f32);
    /// Panel rotation in degrees; only multiples of 90 are meaningful.
    fn rotation(&mut self, degrees: u16);
    /// Make everything written since the last clear visible at once.
    fn flush(&mut self);
}

/// Write one projected frame to the sink.
///
/// Full-grid repaint: every one of the 256 cells is written, including the
/// off ones, so the panel never shows remnants of the previous domain.
pub fn push_frame<S: PixelSink>(sink: &mut S, frame: &Frame, brightness: f32, rotation: u16) {
    sink.clear();
    sink.rotation(rotation);
    sink.brightness(brightness);

    for (x, y, color) in frame.iter() {
        sink.set_pixel(x, y, color.r, color.g, color.b);
    }

    sink.flush();
}

/// Map logical grid coordinates to panel coordinates for a given rotation.
///
/// Unrecognized angles (anything that is not a multiple of 90) fall back to
/// the identity mapping.
pub fn rotate(x: usize, y: usize, degrees: u16) -> (usize, usize) {
    match degrees % 360 {
        90 => (GRID_SIZE - 1 - y, x),
        180 => (GRID_SIZE - 1 - x, GRID_SIZE - 1 - y),
        270 => (y, GRID_SIZE - 1 - x),
        _ => (x, y),
    }
}

// ── Hardware sink ────────────────────────────────────────────────────

#[cfg(feature = "hardware")]
pub use hardware::MatrixSink;

#[cfg(feature = "hardware")]
mod hardware {
    use super::{PixelSink, rotate};
    use crate::error::Error;
    use crate::{Color, GRID_SIZE};
    use rpi_led_matrix::{LedCanvas, LedMatrix, LedMatrixOptions, LedRuntimeOptions};

    /// Convert our Color to the hardware crate's LedColor at the boundary.
    impl From<Color> for rpi_led_matrix::LedColor {
        fn from(c: Color) -> Self {
            rpi_led_matrix::LedColor {
                red: c.r,
                green: c.g,
                blue: c.b,
            }
        }
    }

    /// The physical 16×16 panel via `rpi-led-matrix` double buffering:
    /// writes go to an offscreen canvas and `flush` swaps it in whole, so
    /// a partially painted frame is never visible.
    pub struct MatrixSink {
        matrix: LedMatrix,
        canvas: Option<LedCanvas>,
        brightness: f32,
        rotation: u16,
    }

    impl MatrixSink {
        /// Initialize the matrix for our hardware:
        /// Pi + Adafruit Bonnet + 16×16 panel.
        pub fn new() -> Result<Self, Error> {
            let mut options = LedMatrixOptions::new();
            options.set_rows(GRID_SIZE as u32);
            options.set_cols(GRID_SIZE as u32);
            options.set_hardware_mapping("adafruit-hat");

            // Full 8-bit color depth at stable timing (~143Hz refresh)
            options
                .set_pwm_bits(8)
                .map_err(|e| Error::Matrix(e.to_string()))?;
            options.set_pwm_lsb_nanoseconds(130);

            let mut rt_options = LedRuntimeOptions::new();
            rt_options.set_gpio_slowdown(2);

            let matrix = LedMatrix::new(Some(options), Some(rt_options))
                .map_err(|e| Error::Matrix(e.to_string()))?;
            let canvas = matrix.offscreen_canvas();

            Ok(Self {
                matrix,
                canvas: Some(canvas),
                brightness: 1.0,
                rotation: 0,
            })
        }
    }

    impl PixelSink for MatrixSink {
        fn set_pixel(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
            let (px, py) = rotate(x, y, self.rotation);
            let color = Color::new(r, g, b).scaled(self.brightness);
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.set(px as i32, py as i32, &color.into());
            }
        }

        fn clear(&mut self) {
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.clear();
            }
        }

        fn brightness(&mut self, level: f32) {
            self.brightness = level.clamp(0.0, 1.0);
        }

        fn rotation(&mut self, degrees: u16) {
            self.rotation = degrees;
        }

        fn flush(&mut self) {
            if let Some(canvas) = self.canvas.take() {
                self.canvas = Some(self.matrix.swap(canvas));
            }
        }
    }
}
