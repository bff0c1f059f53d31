//! Deterministic RNG & noise (C2): an integer hash that is the entire RNG
//! surface, plus 1-D/2-D value noise with fractal octave stacking.
//!
//! Everything here is a pure function of its inputs, performed in wrapping
//! 32-bit unsigned arithmetic for the hash and `f64` for the interpolation,
//! so output is bit-identical across platforms and across runs.

/// Integer hash: `((x*374761393 + seed*668265263) XOR (>>13)) * 1274126177`,
/// all in wrapping 32-bit arithmetic.
#[inline]
#[must_use]
pub fn hash_int(x: u32, seed: u32) -> u32 {
  let n = x.wrapping_mul(374_761_393).wrapping_add(seed.wrapping_mul(668_265_263));
  let n = n ^ (n >> 13);
  n.wrapping_mul(1_274_126_177)
}

/// `hash_int(x, seed) / 2^32`, a float in `[0, 1)`.
#[inline]
#[must_use]
pub fn rand_float(x: u32, seed: u32) -> f64 {
  f64::from(hash_int(x, seed)) / 4_294_967_296.0
}

/// Two-coordinate variant of [`rand_float`], mixing `iy` through a second
/// hash seeded by `ix`.
#[inline]
#[must_use]
pub fn rand_float_2d(ix: u32, iy: u32, seed: u32) -> f64 {
  let n = hash_int(ix, seed);
  let n = hash_int(iy ^ n, seed.wrapping_mul(1619).wrapping_add(ix.wrapping_mul(31337)));
  f64::from(n) / 4_294_967_296.0
}

/// Perlin fade curve: `t^3 * (t * (6t - 15) + 10)`.
#[inline]
#[must_use]
pub fn fade(t: f64) -> f64 {
  t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
  a + (b - a) * t
}

/// `x`'s floor and fractional part as `(i32, f64)`, with the hash index
/// taken as a wrapping `u32` (negative coordinates wrap the same way a
/// 32-bit hash does on any platform).
#[inline]
fn split(x: f64) -> (u32, f64) {
  let xi = x.floor();
  (xi as i64 as u32, x - xi)
}

/// 1-D value noise: linear interpolation between two integer-lattice hashes
/// under the Perlin fade curve.
#[must_use]
pub fn value_noise_1d(x: f64, seed: u32) -> f64 {
  let (xi, xf) = split(x);
  let v0 = rand_float(xi, seed);
  let v1 = rand_float(xi.wrapping_add(1), seed);
  lerp(v0, v1, fade(xf))
}

/// 2-D value noise: bilinear interpolation between four lattice-corner
/// hashes under the Perlin fade curve.
#[must_use]
pub fn value_noise_2d(x: f64, y: f64, seed: u32) -> f64 {
  let (xi, xf) = split(x);
  let (yi, yf) = split(y);
  let v00 = rand_float_2d(xi, yi, seed);
  let v10 = rand_float_2d(xi.wrapping_add(1), yi, seed);
  let v01 = rand_float_2d(xi, yi.wrapping_add(1), seed);
  let v11 = rand_float_2d(xi.wrapping_add(1), yi.wrapping_add(1), seed);
  let ix0 = lerp(v00, v10, fade(xf));
  let ix1 = lerp(v01, v11, fade(yf));
  lerp(ix0, ix1, fade(yf))
}

/// Parameters shared by the fractal octave stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParams {
  /// RNG seed for the base octave; octave `k` uses `seed + k*101` (1-D) or
  /// `seed + k*131` (2-D).
  pub seed: u32,
  /// Number of octaves summed, `1..=8`.
  pub octaves: u32,
  /// Per-octave amplitude multiplier, `0.0..=1.0`.
  pub persistence: f64,
  /// Per-octave frequency multiplier, `> 0.0`.
  pub lacunarity: f64,
}

/// Sum of `octaves` 1-D value-noise evaluations at doubling (by
/// `lacunarity`) frequency and decaying (by `persistence`) amplitude,
/// normalized by the cumulative amplitude.
#[must_use]
pub fn fractal_noise_1d(x: f64, params: FractalParams) -> f64 {
  let mut amplitude = 1.0;
  let mut frequency = 1.0;
  let mut max_value = 0.0;
  let mut total = 0.0;
  for octave in 0..params.octaves.max(1) {
    let octave_seed = params.seed.wrapping_add(octave.wrapping_mul(101));
    total += amplitude * value_noise_1d(x * frequency, octave_seed);
    max_value += amplitude;
    amplitude *= params.persistence;
    frequency *= params.lacunarity;
  }
  if max_value == 0.0 {
    0.0
  } else {
    total / max_value
  }
}

/// 2-D counterpart of [`fractal_noise_1d`]; octave `k` uses `seed + k*131`.
#[must_use]
pub fn fractal_noise_2d(x: f64, y: f64, params: FractalParams) -> f64 {
  let mut amplitude = 1.0;
  let mut frequency = 1.0;
  let mut max_value = 0.0;
  let mut total = 0.0;
  for octave in 0..params.octaves.max(1) {
    let octave_seed = params.seed.wrapping_add(octave.wrapping_mul(131));
    total += amplitude * value_noise_2d(x * frequency, y * frequency, octave_seed);
    max_value += amplitude;
    amplitude *= params.persistence;
    frequency *= params.lacunarity;
  }
  if max_value == 0.0 {
    0.0
  } else {
    total / max_value
  }
}
