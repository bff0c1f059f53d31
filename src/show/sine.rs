use super::{sample, Frame, ShowBase, ShowGenerator};
use crate::color::PaletteLookup;
use crate::error::ShowError;
use crate::noise::rand_float;
use std::f64::consts::TAU;

/// Brightness modulated by a per-LED sine wave, with an optional seeded
/// phase offset per LED.
pub struct SineWave<'a> {
  base: ShowBase,
  palette: &'a PaletteLookup,
  amplitude: f64,
  frequency: f64,
  speed: f64,
  direction: f64,
  phase: f64,
  phase_offsets: Vec<f64>,
}

impl<'a> SineWave<'a> {
  /// Build a sine-wave show. `seed`, if present, derives a per-LED phase
  /// offset via [`rand_float`]; otherwise every LED shares the same phase.
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    palette: &'a PaletteLookup,
    led_count: usize,
    fps: f64,
    duration: f64,
    amplitude: f64,
    frequency: f64,
    speed: f64,
    direction: f64,
    phase: f64,
    seed: Option<u32>,
  ) -> Result<Self, ShowError> {
    if !(0.0..=1.0).contains(&amplitude) {
      return Err(ShowError::InvalidParameter { field: "amplitude" });
    }
    if frequency < 0.0 {
      return Err(ShowError::InvalidParameter { field: "frequency" });
    }
    let base = ShowBase::new(led_count, fps, duration)?;
    let phase_offsets = match seed {
      Some(seed) => (0..led_count).map(|i| rand_float(i as u32, seed) * TAU).collect(),
      None => vec![0.0; led_count],
    };
    Ok(Self { base, palette, amplitude, frequency, speed, direction, phase, phase_offsets })
  }
}

impl ShowGenerator for SineWave<'_> {
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
      .enumerate()
      .map(|(i, &p)| {
        let angle = TAU * (self.frequency * p * self.direction)
          + self.speed * TAU * t
          + self.phase
          + self.phase_offsets[i];
        let value = 0.5 + self.amplitude * angle.sin();
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
  fn single_frame_defaults_sample_palette_midpoint() {
    let lookup = build_palette_lookup(&["#ff0000", "#0000ff"], RampSpace::Hsv, 1024).unwrap();
    let show = SineWave::new(&lookup, 4, 1.0, 1.0 / 24.0, 0.45, 1.0, 0.5, 1.0, 0.0, None).unwrap();
    let frame = show.frame_at(0.0);
    let expected = sample(&lookup, 0.5);
    for px in frame {
      assert_eq!(px, expected);
    }
  }

  #[test]
  fn rejects_out_of_range_amplitude() {
    let lookup = build_palette_lookup(&["#000000", "#ffffff"], RampSpace::Hsv, 16).unwrap();
    assert!(SineWave::new(&lookup, 4, 24.0, 1.0, 1.5, 1.0, 0.5, 1.0, 0.0, None).is_err());
  }

  #[test]
  fn seeded_phase_offsets_are_deterministic() {
    let lookup = build_palette_lookup(&["#000000", "#ffffff"], RampSpace::Hsv, 16).unwrap();
    let a = SineWave::new(&lookup, 8, 24.0, 1.0, 0.4, 1.0, 0.3, 1.0, 0.0, Some(99)).unwrap();
    let b = SineWave::new(&lookup, 8, 24.0, 1.0, 0.4, 1.0, 0.3, 1.0, 0.0, Some(99)).unwrap();
    assert_eq!(a.frame_at(0.25), b.frame_at(0.25));
  }
}
