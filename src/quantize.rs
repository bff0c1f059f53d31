//! Palette quantization (C4): agglomerative nearest-pair reduction of a
//! color histogram down to a maximum palette size.
//!
//! Mirrors the packaging tool's merge pass: repeatedly fold the two closest
//! colors (by squared Euclidean distance, ties broken by encounter order)
//! into a count-weighted mean, folding the merged color into an existing
//! entry first if one already has the same rounded value.

use crate::color::Rgb8;
use crate::error::QuantizeError;

#[derive(Debug, Clone)]
struct Entry {
  color: [f64; 3],
  count: u64,
  originals: Vec<usize>,
}

fn rounded(color: [f64; 3]) -> [i64; 3] {
  [color[0].round() as i64, color[1].round() as i64, color[2].round() as i64]
}

fn distance_sq(a: [f64; 3], b: [f64; 3]) -> f64 {
  let dr = a[0] - b[0];
  let dg = a[1] - b[1];
  let db = a[2] - b[2];
  dr * dr + dg * dg + db * db
}

/// The result of [`quantize_palette`]: a reduced color table plus a map from
/// each original histogram index to its slot in that table.
#[derive(Debug, Clone)]
pub struct QuantizedPalette {
  /// The reduced palette, at most `max_size` entries.
  pub colors: Vec<Rgb8>,
  /// `remap[i]` is the index into `colors` that histogram entry `i` was
  /// folded into.
  pub remap: Vec<usize>,
}

/// Reduce `histogram` (distinct colors with pixel counts) to at most
/// `max_size` colors.
///
/// If `histogram.len() <= max_size` already, every color keeps its own slot
/// and `remap` is the identity permutation.
pub fn quantize_palette(
  histogram: &[(Rgb8, u64)],
  max_size: usize,
) -> Result<QuantizedPalette, QuantizeError> {
  if histogram.is_empty() || max_size == 0 {
    return Err(QuantizeError::EmptyHistogram);
  }

  let mut entries: Vec<Entry> = histogram
    .iter()
    .enumerate()
    .map(|(i, &(c, count))| Entry {
      color: [c.r as f64, c.g as f64, c.b as f64],
      count,
      originals: vec![i],
    })
    .collect();

  while entries.len() > max_size {
    let mut best = (0usize, 1usize, f64::INFINITY);
    for i in 0..entries.len() {
      for j in (i + 1)..entries.len() {
        let d = distance_sq(entries[i].color, entries[j].color);
        if d < best.2 {
          best = (i, j, d);
        }
      }
    }
    let (i, j, _) = best;
    let b = entries.remove(j);
    let a = entries.remove(i);
    let total_count = a.count + b.count;
    let merged_color = [
      (a.color[0] * a.count as f64 + b.color[0] * b.count as f64) / total_count as f64,
      (a.color[1] * a.count as f64 + b.color[1] * b.count as f64) / total_count as f64,
      (a.color[2] * a.count as f64 + b.color[2] * b.count as f64) / total_count as f64,
    ];
    let mut originals = a.originals;
    originals.extend(b.originals);
    let target = rounded(merged_color);

    if let Some(existing) = entries.iter_mut().find(|e| rounded(e.color) == target) {
      existing.count += total_count;
      existing.originals.append(&mut originals);
    } else {
      entries.push(Entry { color: merged_color, count: total_count, originals });
    }
  }

  let colors = entries
    .iter()
    .map(|e| Rgb8 {
      r: e.color[0].round().clamp(0.0, 255.0) as u8,
      g: e.color[1].round().clamp(0.0, 255.0) as u8,
      b: e.color[2].round().clamp(0.0, 255.0) as u8,
    })
    .collect();

  let mut remap = vec![0usize; histogram.len()];
  for (idx, e) in entries.iter().enumerate() {
    for &orig in &e.originals {
      remap[orig] = idx;
    }
  }

  Ok(QuantizedPalette { colors, remap })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_empty_histogram() {
    assert!(quantize_palette(&[], 4).is_err());
  }

  #[test]
  fn identity_when_under_max_size() {
    let hist = vec![
      (Rgb8 { r: 255, g: 0, b: 0 }, 10),
      (Rgb8 { r: 0, g: 255, b: 0 }, 5),
    ];
    let q = quantize_palette(&hist, 8).unwrap();
    assert_eq!(q.colors.len(), 2);
    assert_eq!(q.remap, vec![0, 1]);
  }

  #[test]
  fn merges_down_to_max_size() {
    let hist = vec![
      (Rgb8 { r: 0, g: 0, b: 0 }, 1),
      (Rgb8 { r: 1, g: 0, b: 0 }, 1),
      (Rgb8 { r: 255, g: 255, b: 255 }, 1),
    ];
    let q = quantize_palette(&hist, 2).unwrap();
    assert_eq!(q.colors.len(), 2);
    // The two near-black entries should land in the same slot.
    assert_eq!(q.remap[0], q.remap[1]);
    assert_ne!(q.remap[0], q.remap[2]);
  }

  #[test]
  fn weighted_mean_favors_higher_count() {
    let hist = vec![
      (Rgb8 { r: 0, g: 0, b: 0 }, 3),
      (Rgb8 { r: 10, g: 0, b: 0 }, 1),
    ];
    let q = quantize_palette(&hist, 1).unwrap();
    assert_eq!(q.colors.len(), 1);
    // (0*3 + 10*1) / 4 = 2.5, rounds to 3 (away-from-zero round-half).
    assert_eq!(q.colors[0].r, 3);
  }

  #[test]
  fn identical_colors_fold_counts_together() {
    let hist = vec![
      (Rgb8 { r: 5, g: 5, b: 5 }, 1),
      (Rgb8 { r: 5, g: 5, b: 5 }, 1),
    ];
    let q = quantize_palette(&hist, 1).unwrap();
    assert_eq!(q.colors.len(), 1);
    assert_eq!(q.colors[0], Rgb8 { r: 5, g: 5, b: 5 });
  }
}
