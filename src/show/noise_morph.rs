use super::{sample, Frame, ShowBase, ShowGenerator};
use crate::color::PaletteLookup;
use crate::error::ShowError;
use crate::noise::{fractal_noise_1d, FractalParams};

/// Brightness driven by 1-D fractal value noise scrolling past each LED.
pub struct NoiseMorph<'a> {
  base: ShowBase,
  palette: &'a PaletteLookup,
  scale: f64,
  speed: f64,
  noise: FractalParams,
}

impl<'a> NoiseMorph<'a> {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    palette: &'a PaletteLookup,
    led_count: usize,
    fps: f64,
    duration: f64,
    scale: f64,
    speed: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
    seed: u32,
  ) -> Result<Self, ShowError> {
    if scale <= 0.0 {
      return Err(ShowError::InvalidParameter { field: "scale" });
    }
    if speed < 0.0 {
      return Err(ShowError::InvalidParameter { field: "speed" });
    }
    if !(1..=8).contains(&octaves) {
      return Err(ShowError::InvalidParameter { field: "octaves" });
    }
    if !(0.0..=1.0).contains(&persistence) {
      return Err(ShowError::InvalidParameter { field: "persistence" });
    }
    if lacunarity <= 0.0 {
      return Err(ShowError::InvalidParameter { field: "lacunarity" });
    }
    let base = ShowBase::new(led_count, fps, duration)?;
    Ok(Self { base, palette, scale, speed, noise: FractalParams { seed, octaves, persistence, lacunarity } })
  }
}

impl ShowGenerator for NoiseMorph<'_> {
  fn frame_count(&self) -> usize {
    self.base.frame_count
  }

  fn led_count(&self) -> usize {
    self.base.led_count
  }

  fn frame_at(&self, t: f64) -> Frame {
    self
      .base
      .led_positions
      .iter()
      .map(|&p| {
        let sample_pos = p * self.scale + self.speed * t;
        let value = fractal_noise_1d(sample_pos, self.noise);
        sample(self.palette, value)
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::color::{build_palette_lookup, RampSpace};

  #[test]
  fn two_runs_produce_identical_frames() {
    let lookup = build_palette_lookup(&["#000000", "#ffffff"], RampSpace::Hsv, 1024).unwrap();
    let make = || {
      NoiseMorph::new(&lookup, 8, 2.0, 1.0, 1.0, 0.5, 2, 0.5, 2.0, 0x1234).unwrap()
    };
    let a = make();
    let b = make();
    for i in 0..a.frame_count() {
      let t = i as f64 / 2.0;
      assert_eq!(a.frame_at(t), b.frame_at(t));
    }
  }

  #[test]
  fn rejects_octaves_out_of_range() {
    let lookup = build_palette_lookup(&["#000000", "#ffffff"], RampSpace::Hsv, 16).unwrap();
    assert!(NoiseMorph::new(&lookup, 8, 24.0, 1.0, 1.0, 0.5, 9, 0.5, 2.0, 1).is_err());
    assert!(NoiseMorph::new(&lookup, 8, 24.0, 1.0, 1.0, 0.5, 0, 0.5, 2.0, 1).is_err());
  }
}
