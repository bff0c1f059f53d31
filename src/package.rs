//! Artifact assembly (C7): histogram, quantize, encode, build the header,
//! verify the encode round-trips, and append the payload CRC — the same
//! pipeline the original packaging tool's `package()` entry point runs.

use crate::codec::{decode_payload, encode_frameset, FLAG_DELTA, FLAG_RLE};
use crate::color::Rgb8;
use crate::crc32::crc32;
use crate::error::{CodecError, PackageError};
use crate::header::{build_header, HeaderFields};
use crate::quantize::quantize_palette;
use crate::PrismResult;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Instant;

/// A finished `.prism` artifact plus a summary of how it was built.
#[derive(Debug, Clone)]
pub struct Package {
  /// The complete artifact: header, payload, and trailing payload CRC.
  pub bytes: Vec<u8>,
  pub manifest: Manifest,
}

/// A CRC-32, rendered in a sidecar manifest as `"0x…"` rather than a bare
/// integer so it reads unambiguously next to hex palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrcHex(pub u32);

impl fmt::Display for CrcHex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{:08X}", self.0)
  }
}

impl Serialize for CrcHex {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.to_string())
  }
}

/// One frame's entry in [`Manifest::frames`]: size and which codec paths it
/// took.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FrameManifestEntry {
  pub index: usize,
  pub bytes: usize,
  pub delta: bool,
  pub rle: bool,
}

/// Summary stats about an assembled [`Package`], for logging or a sidecar
/// JSON manifest via [`crate::io_doc`].
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
  pub palette: Vec<String>,
  pub palette_size: usize,
  pub led_count: u32,
  pub frame_count: u32,
  pub fps: f64,
  pub payload_crc32: CrcHex,
  pub header_crc32: CrcHex,
  pub roundtrip_hash: CrcHex,
  pub frames: Vec<FrameManifestEntry>,
  pub compression_ratio: f64,
  pub encode_ms: f64,
  pub decode_ms: f64,
  pub file_bytes: usize,
}

fn color_key(c: Rgb8) -> (u8, u8, u8) {
  (c.r, c.g, c.b)
}

fn build_histogram(frames: &[Vec<Rgb8>]) -> Vec<(Rgb8, u64)> {
  let mut order = Vec::new();
  let mut counts: Vec<u64> = Vec::new();
  let mut seen: HashMap<(u8, u8, u8), usize> = HashMap::new();
  for frame in frames {
    for &px in frame {
      let key = color_key(px);
      match seen.get(&key) {
        Some(&idx) => counts[idx] += 1,
        None => {
          seen.insert(key, order.len());
          order.push(px);
          counts.push(1);
        }
      }
    }
  }
  order.into_iter().zip(counts).collect()
}

/// Quantize `frames` (RGB per LED, per frame) to at most `max_palette_size`
/// colors, encode the resulting index stream, build the header, and verify
/// the encode round-trips before returning the finished artifact.
#[allow(clippy::too_many_arguments)]
pub fn package(
  frames: &[Vec<Rgb8>],
  led_count: usize,
  fps: f64,
  max_palette_size: usize,
  sync_mode: u8,
  motion_direction: u8,
  extension: BTreeMap<String, Value>,
) -> PrismResult<Package> {
  let histogram = build_histogram(frames);
  let quantized = quantize_palette(&histogram, max_palette_size)?;

  let color_to_hist_idx: HashMap<(u8, u8, u8), usize> =
    histogram.iter().enumerate().map(|(i, &(c, _))| (color_key(c), i)).collect();

  let index_frames: Vec<Vec<u8>> = frames
    .iter()
    .map(|frame| {
      frame
        .iter()
        .map(|&px| {
          let hist_idx = color_to_hist_idx
            .get(&color_key(px))
            .copied()
            .ok_or(CodecError::IndexOutOfPalette { index: 0xFF })?;
          u8::try_from(quantized.remap[hist_idx])
            .map_err(|_| CodecError::IndexOutOfPalette { index: 0xFF })
        })
        .collect::<Result<Vec<u8>, CodecError>>()
    })
    .collect::<Result<Vec<Vec<u8>>, CodecError>>()?;

  let encode_start = Instant::now();
  let encoded = encode_frameset(&index_frames)?;
  let encode_ms = encode_start.elapsed().as_secs_f64() * 1000.0;

  let decode_start = Instant::now();
  let decoded = decode_payload(&encoded, led_count)?;
  let decode_ms = decode_start.elapsed().as_secs_f64() * 1000.0;
  if decoded != index_frames {
    return Err(PackageError::RoundtripMismatch.into());
  }

  let mut payload = Vec::new();
  let frame_entries: Vec<FrameManifestEntry> = encoded
    .iter()
    .enumerate()
    .map(|(index, (flags, chunk))| {
      payload.push(*flags);
      let len = u16::try_from(chunk.len()).unwrap_or(u16::MAX);
      payload.extend_from_slice(&len.to_le_bytes());
      payload.extend_from_slice(chunk);
      FrameManifestEntry {
        index,
        bytes: 3 + chunk.len(),
        delta: flags & FLAG_DELTA != 0,
        rle: flags & FLAG_RLE != 0,
      }
    })
    .collect();
  let payload_crc_raw = crc32(&payload);

  let palette_hex: Vec<String> =
    quantized.colors.iter().map(|c| format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)).collect();

  let mut ext = extension;
  ext.entry("palette".to_string()).or_insert_with(|| {
    Value::Array(palette_hex.iter().map(|s| json!(s)).collect())
  });

  let header = build_header(&HeaderFields {
    led_count: led_count as u16,
    frame_count: frames.len() as u32,
    fps,
    color_format: 1,
    compression: 0,
    motion_direction,
    sync_mode,
    extension: ext,
  })?;
  let header_crc_raw = crate::header::parse_header(&header)?.header_crc;

  let mut bytes = Vec::with_capacity(header.len() + payload.len() + 4);
  bytes.extend_from_slice(&header);
  bytes.extend_from_slice(&payload);
  bytes.extend_from_slice(&payload_crc_raw.to_le_bytes());
  let file_bytes = bytes.len();

  let decoded_colors: Vec<Vec<[u8; 3]>> = decoded
    .iter()
    .map(|frame| frame.iter().map(|&idx| {
      let c = quantized.colors[idx as usize];
      [c.r, c.g, c.b]
    }).collect())
    .collect();
  let roundtrip_json = serde_json::to_vec(&decoded_colors)?;
  let roundtrip_hash_raw = crc32(&roundtrip_json);

  let raw_bytes = (frames.len() * led_count * 3) as f64;
  let total_bytes = payload.len() as f64;
  let compression_ratio = if total_bytes > 0.0 { raw_bytes / total_bytes } else { f64::INFINITY };

  let manifest = Manifest {
    palette: palette_hex,
    palette_size: quantized.colors.len(),
    led_count: led_count as u32,
    frame_count: frames.len() as u32,
    fps,
    payload_crc32: CrcHex(payload_crc_raw),
    header_crc32: CrcHex(header_crc_raw),
    roundtrip_hash: CrcHex(roundtrip_hash_raw),
    frames: frame_entries,
    compression_ratio,
    encode_ms,
    decode_ms,
    file_bytes,
  };

  Ok(Package { bytes, manifest })
}

/// Verify the trailing 4-byte payload CRC against the bytes preceding it.
/// `header_and_payload_len` is the number of bytes before the CRC trailer.
pub fn verify_payload_crc(artifact: &[u8], header_and_payload_len: usize) -> Result<(), PackageError> {
  let crc_bytes = artifact
    .get(header_and_payload_len..header_and_payload_len + 4)
    .ok_or(PackageError::PayloadCrcMismatch { stored: 0, computed: 0 })?;
  let stored = u32::from_le_bytes(crc_bytes.try_into().unwrap());
  let computed = crc32(&artifact[..header_and_payload_len]);
  if stored != computed {
    return Err(PackageError::PayloadCrcMismatch { stored, computed });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn solid(color: Rgb8, led_count: usize) -> Vec<Rgb8> {
    vec![color; led_count]
  }

  #[test]
  fn packages_a_small_two_color_show() {
    let red = Rgb8 { r: 255, g: 0, b: 0 };
    let blue = Rgb8 { r: 0, g: 0, b: 255 };
    let frames = vec![solid(red, 8), solid(red, 8), solid(blue, 8)];
    let pkg = package(&frames, 8, 24.0, 16, 0, 0, BTreeMap::new()).unwrap();
    assert_eq!(pkg.manifest.led_count, 8);
    assert_eq!(pkg.manifest.frame_count, 3);
    assert_eq!(pkg.manifest.palette_size, 2);
    assert_eq!(pkg.manifest.palette.len(), 2);
    assert_eq!(pkg.manifest.frames.len(), 3);
    assert_eq!(pkg.manifest.file_bytes, pkg.bytes.len());
    verify_payload_crc(&pkg.bytes, pkg.bytes.len() - 4).unwrap();
  }

  #[test]
  fn detects_corrupted_payload_crc() {
    let red = Rgb8 { r: 255, g: 0, b: 0 };
    let frames = vec![solid(red, 4)];
    let mut pkg = package(&frames, 4, 24.0, 4, 0, 0, BTreeMap::new()).unwrap();
    let last = pkg.bytes.len() - 1;
    pkg.bytes[last] ^= 0xFF;
    assert!(verify_payload_crc(&pkg.bytes, pkg.bytes.len() - 4).is_err());
  }

  #[test]
  fn manifest_crc_serializes_as_hex_string() {
    let red = Rgb8 { r: 255, g: 0, b: 0 };
    let frames = vec![solid(red, 4)];
    let pkg = package(&frames, 4, 24.0, 4, 0, 0, BTreeMap::new()).unwrap();
    let value = serde_json::to_value(&pkg.manifest).unwrap();
    let crc = value["payload_crc32"].as_str().unwrap();
    assert!(crc.starts_with("0x"));
    assert_eq!(crc.len(), 10);
    assert!(value["header_crc32"].as_str().unwrap().starts_with("0x"));
    assert!(value["roundtrip_hash"].as_str().unwrap().starts_with("0x"));
  }

  #[test]
  fn palette_metadata_is_recorded_when_absent() {
    let red = Rgb8 { r: 255, g: 0, b: 0 };
    let frames = vec![solid(red, 4)];
    let pkg = package(&frames, 4, 24.0, 4, 0, 0, BTreeMap::new()).unwrap();
    let parsed = crate::header::parse_header(&pkg.bytes).unwrap();
    assert!(parsed.extension.contains_key("palette"));
  }

  #[test]
  fn frame_manifest_entries_report_delta_and_rle_flags() {
    let c = Rgb8 { r: 10, g: 20, b: 30 };
    let frames = vec![solid(c, 16), solid(c, 16)];
    let pkg = package(&frames, 16, 24.0, 4, 0, 0, BTreeMap::new()).unwrap();
    assert!(!pkg.manifest.frames[0].delta);
    assert!(pkg.manifest.frames[1].delta);
    assert!(pkg.manifest.frames[1].rle);
  }

  #[test]
  fn compression_ratio_is_raw_over_encoded() {
    let red = Rgb8 { r: 255, g: 0, b: 0 };
    let frames = vec![solid(red, 64); 10];
    let pkg = package(&frames, 64, 24.0, 4, 0, 0, BTreeMap::new()).unwrap();
    assert!(pkg.manifest.compression_ratio > 1.0);
  }
}
