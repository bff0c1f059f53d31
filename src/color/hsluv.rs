//! sRGB <-> HSLuv conversion.
//!
//! HSLuv has no closed-form shortcut from RGB: it goes through linear RGB,
//! CIE XYZ, CIELUV, and finally the LCh-style polar form before the
//! perceptually-bounded saturation remap that makes it "HSLuv" rather than
//! plain CIELCh. This follows the public HSLuv reference algorithm
//! (<https://www.hsluv.org>) closely enough to match its output tables to
//! within rounding.

use super::Rgb8;

const M: [[f64; 3]; 3] = [
  [3.240969941904521, -1.537383177570093, -0.498610760293003],
  [-0.969243636280895, 1.875967501507720, 0.041555057407175],
  [0.055630079696993, -0.203976958888976, 1.056971514242878],
];
const M_INV: [[f64; 3]; 3] = [
  [0.41239079926595, 0.35758433938387, 0.18048078840183],
  [0.21263900587151, 0.71516867876775, 0.072192315360733],
  [0.019330818715591, 0.11919477979462, 0.95053215224966],
];

const REF_Y: f64 = 1.0;
const REF_U: f64 = 0.19783000664283681;
const REF_V: f64 = 0.46831999493879100;
const KAPPA: f64 = 903.2962962962963;
const EPSILON: f64 = 0.0088564516790356308;

fn dot(row: [f64; 3], v: [f64; 3]) -> f64 {
  row[0] * v[0] + row[1] * v[1] + row[2] * v[2]
}

fn from_linear(c: f64) -> f64 {
  if c <= 0.0031308 {
    12.92 * c
  } else {
    1.055 * c.powf(1.0 / 2.4) - 0.055
  }
}

fn to_linear(c: f64) -> f64 {
  if c > 0.04045 {
    ((c + 0.055) / 1.055).powf(2.4)
  } else {
    c / 12.92
  }
}

fn xyz_to_rgb(xyz: [f64; 3]) -> [f64; 3] {
  [from_linear(dot(M[0], xyz)), from_linear(dot(M[1], xyz)), from_linear(dot(M[2], xyz))]
}

fn rgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
  let linear = [to_linear(rgb[0]), to_linear(rgb[1]), to_linear(rgb[2])];
  [dot(M_INV[0], linear), dot(M_INV[1], linear), dot(M_INV[2], linear)]
}

fn y_to_l(y: f64) -> f64 {
  if y <= EPSILON {
    y / REF_Y * KAPPA
  } else {
    116.0 * (y / REF_Y).cbrt() - 16.0
  }
}

fn l_to_y(l: f64) -> f64 {
  if l <= 8.0 {
    REF_Y * l / KAPPA
  } else {
    REF_Y * ((l + 16.0) / 116.0).powi(3)
  }
}

fn xyz_to_luv(xyz: [f64; 3]) -> (f64, f64, f64) {
  let [x, y, z] = xyz;
  let denom = x + 15.0 * y + 3.0 * z;
  let (var_u, var_v) = if denom == 0.0 { (0.0, 0.0) } else { (4.0 * x / denom, 9.0 * y / denom) };
  let l = y_to_l(y);
  if l == 0.0 {
    return (0.0, 0.0, 0.0);
  }
  let u = 13.0 * l * (var_u - REF_U);
  let v = 13.0 * l * (var_v - REF_V);
  (l, u, v)
}

fn luv_to_xyz(l: f64, u: f64, v: f64) -> [f64; 3] {
  if l == 0.0 {
    return [0.0, 0.0, 0.0];
  }
  let var_u = u / (13.0 * l) + REF_U;
  let var_v = v / (13.0 * l) + REF_V;
  let y = l_to_y(l);
  let x = 0.0 - (9.0 * y * var_u) / ((var_u - 4.0) * var_v - var_u * var_v);
  let z = (9.0 * y - (15.0 * var_v * y) - (var_v * x)) / (3.0 * var_v);
  [x, y, z]
}

fn luv_to_lch(l: f64, u: f64, v: f64) -> (f64, f64, f64) {
  let c = (u * u + v * v).sqrt();
  let h = if c < 0.00000001 { 0.0 } else { v.atan2(u).to_degrees().rem_euclid(360.0) };
  (l, c, h)
}

fn lch_to_luv(l: f64, c: f64, h: f64) -> (f64, f64, f64) {
  let rad = h.to_radians();
  (l, rad.cos() * c, rad.sin() * c)
}

/// The maximum chroma achievable for a given lightness and hue before the
/// sRGB gamut clips. Returns `(slope, intercept)` for each of the six gamut
/// boundary lines, following the reference algorithm's `getBounds`.
fn get_bounds(l: f64) -> [(f64, f64); 6] {
  let sub1 = ((l + 16.0).powi(3)) / 1_560_896.0;
  let sub2 = if sub1 > EPSILON { sub1 } else { l / KAPPA };
  let mut bounds = [(0.0, 0.0); 6];
  for (channel, bound) in bounds.chunks_mut(2).enumerate() {
    let [m1, m2, m3] = M[channel];
    for (t, slot) in bound.iter_mut().enumerate() {
      let t = t as f64;
      let top1 = (284.517 * m1 - 94.839 * m3) * sub2;
      let top2 = (838.422 * m3 + 769.860 * m2 + 731.718 * m1) * l * sub2 - 769.860 * t * l;
      let bottom = (632.260 * m3 - 126.452 * m2) * sub2 + 126.452 * t;
      *slot = (top1 / bottom, top2 / bottom);
    }
  }
  bounds
}

fn ray_length_until_intersect(theta: f64, slope: f64, intercept: f64) -> f64 {
  intercept / (theta.sin() - slope * theta.cos())
}

fn max_safe_chroma_for_lh(l: f64, h: f64) -> f64 {
  let hrad = h.to_radians();
  get_bounds(l)
    .iter()
    .map(|&(slope, intercept)| ray_length_until_intersect(hrad, slope, intercept))
    .filter(|len| *len >= 0.0)
    .fold(f64::INFINITY, f64::min)
}

/// Convert `(h degrees, s percent, l percent)` to 8-bit sRGB.
pub fn hsluv_to_rgb(h: f64, s: f64, l: f64) -> Rgb8 {
  if l > 99.9999999 {
    return Rgb8 { r: 255, g: 255, b: 255 };
  }
  if l < 0.00000001 {
    return Rgb8 { r: 0, g: 0, b: 0 };
  }
  let max_chroma = max_safe_chroma_for_lh(l, h);
  let c = max_chroma * s.clamp(0.0, 100.0) / 100.0;
  let (l, u, v) = lch_to_luv(l, c, h);
  let xyz = luv_to_xyz(l, u, v);
  let [r, g, b] = xyz_to_rgb(xyz);
  Rgb8 {
    r: channel_to_u8(r),
    g: channel_to_u8(g),
    b: channel_to_u8(b),
  }
}

/// Convert an 8-bit sRGB color to `(h degrees, s percent, l percent)`.
pub fn rgb_to_hsluv(c: Rgb8) -> (f64, f64, f64) {
  let rgb = [c.r as f64 / 255.0, c.g as f64 / 255.0, c.b as f64 / 255.0];
  let xyz = rgb_to_xyz(rgb);
  let (l, u, v) = xyz_to_luv(xyz);
  let (l, chroma, h) = luv_to_lch(l, u, v);
  if l > 99.9999999 {
    return (h, 0.0, 100.0);
  }
  if l < 0.00000001 {
    return (h, 0.0, 0.0);
  }
  let max_chroma = max_safe_chroma_for_lh(l, h);
  let s = if max_chroma <= 0.0 { 0.0 } else { (chroma / max_chroma * 100.0).clamp(0.0, 100.0) };
  (h, s, l)
}

#[inline]
fn channel_to_u8(v: f64) -> u8 {
  (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn black_and_white_roundtrip() {
    let (h, s, l) = rgb_to_hsluv(Rgb8 { r: 0, g: 0, b: 0 });
    assert_eq!(l, 0.0);
    assert_eq!(s, 0.0);
    let black = hsluv_to_rgb(h, s, l);
    assert_eq!(black, Rgb8 { r: 0, g: 0, b: 0 });

    let (h, s, l) = rgb_to_hsluv(Rgb8 { r: 255, g: 255, b: 255 });
    assert!((l - 100.0).abs() < 1e-6);
    let white = hsluv_to_rgb(h, s, l);
    assert_eq!(white, Rgb8 { r: 255, g: 255, b: 255 });
  }

  #[test]
  fn roundtrip_within_one_bit() {
    for &c in &[
      Rgb8 { r: 255, g: 0, b: 0 },
      Rgb8 { r: 0, g: 128, b: 255 },
      Rgb8 { r: 17, g: 200, b: 90 },
      Rgb8 { r: 128, g: 128, b: 128 },
    ] {
      let (h, s, l) = rgb_to_hsluv(c);
      let back = hsluv_to_rgb(h, s, l);
      let diff = |a: u8, b: u8| (a as i16 - b as i16).abs();
      assert!(diff(c.r, back.r) <= 1, "r: {:?} -> {:?}", c, back);
      assert!(diff(c.g, back.g) <= 1, "g: {:?} -> {:?}", c, back);
      assert!(diff(c.b, back.b) <= 1, "b: {:?} -> {:?}", c, back);
    }
  }
}
