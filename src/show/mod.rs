//! Show generators (C3): deterministic RGB frame synthesis across three
//! pattern families, driven by a palette sampler and a parameter set.

mod easing;
mod flow_field;
mod noise_morph;
mod payload;
mod sine;

pub use easing::{get_easing_function, list_easing_functions, Easing};
pub use flow_field::FlowField;
pub use noise_morph::NoiseMorph;
pub use payload::{RgbTriple, ShowPayload};
pub use sine::SineWave;

use crate::color::{Rgb8, PaletteLookup};
use crate::error::ShowError;

/// Maximum supported frames per second.
pub const MAX_FPS: f64 = 120.0;
/// Maximum supported LED count.
pub const MAX_LED_COUNT: usize = 4096;

/// One rendered frame: `led_count` RGB pixels.
pub type Frame = Vec<Rgb8>;

/// Common per-generator setup: LED position table and frame timing, shared
/// by all three generators via composition rather than inheritance.
#[derive(Debug, Clone)]
pub(crate) struct ShowBase {
  pub led_count: usize,
  pub fps: f64,
  pub frame_count: usize,
  pub led_positions: Vec<f64>,
}

impl ShowBase {
  pub(crate) fn new(led_count: usize, fps: f64, duration: f64) -> Result<Self, ShowError> {
    if led_count == 0 || led_count > MAX_LED_COUNT {
      return Err(ShowError::InvalidParameter { field: "led_count" });
    }
    if !(fps > 0.0 && fps <= MAX_FPS) {
      return Err(ShowError::InvalidParameter { field: "fps" });
    }
    let frame_count = ((duration * fps).round() as i64).max(1) as usize;
    let led_positions = (0..led_count)
      .map(|i| if led_count > 1 { i as f64 / (led_count - 1) as f64 } else { 0.0 })
      .collect();
    Ok(Self { led_count, fps, frame_count, led_positions })
  }
}

/// A generator that can render any frame index to RGB pixels.
pub trait ShowGenerator {
  /// Number of frames the show will produce.
  fn frame_count(&self) -> usize;
  /// Number of LEDs per frame.
  fn led_count(&self) -> usize;
  /// Render the frame at time `t` (seconds).
  fn frame_at(&self, t: f64) -> Frame;

  /// Render every frame, at `t = i / fps` for `i` in `0..frame_count()`.
  fn generate_frames(&self, fps: f64) -> Vec<Frame> {
    (0..self.frame_count()).map(|i| self.frame_at(i as f64 / fps)).collect()
  }
}

#[inline]
pub(crate) fn clamp01(v: f64) -> f64 {
  v.clamp(0.0, 1.0)
}

pub(crate) fn sample(lookup: &PaletteLookup, v: f64) -> Rgb8 {
  crate::color::sample(lookup, clamp01(v))
}
