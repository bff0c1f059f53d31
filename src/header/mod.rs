//! Header assembly and parsing (C6): the 64-byte base header, the 16-byte
//! pattern metadata block, and the optional JSON extension, bound together
//! by a CRC over a non-contiguous prefix of both.

mod extension;
mod raw;

pub use extension::{
  ramp_space_is_valid, validate_optional_fields, Warning, OPTIONAL_METADATA_FIELDS,
  VALID_RAMP_SPACES,
};

use crate::crc32::crc32_chained;
use crate::error::HeaderError;
use pack1::U16LE;
use raw::{
  HeaderBase, MetaV11, BASE_SIZE, CRC_PREFIX_SIZE, MAGIC, META_CRC_PREFIX, META_SIZE,
  VERSION_BASE, VERSION_EXT,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Metadata version stamped into every [`MetaV11`] block this crate builds.
const META_VERSION: u8 = 0x01;

/// Everything needed to assemble a header, short of the CRC (computed
/// internally).
#[derive(Debug, Clone)]
pub struct HeaderFields {
  pub led_count: u16,
  pub frame_count: u32,
  pub fps: f64,
  pub color_format: u8,
  pub compression: u8,
  pub motion_direction: u8,
  pub sync_mode: u8,
  pub extension: BTreeMap<String, Value>,
}

/// A fully parsed header: the fixed fields, the decoded extension, and any
/// non-fatal warnings about recognized-but-invalid optional fields.
#[derive(Debug, Clone)]
pub struct ParsedHeader {
  pub version: u16,
  pub led_count: u16,
  pub frame_count: u32,
  pub fps: f64,
  pub color_format: u8,
  pub compression: u8,
  pub motion_direction: u8,
  pub sync_mode: u8,
  pub extension: BTreeMap<String, Value>,
  pub header_crc: u32,
  pub warnings: Vec<Warning>,
}

/// `round(fps * 256)`, the fixed-point encoding stored in [`HeaderBase::fps`].
fn fps_to_fixed(fps: f64) -> u32 {
  (fps * 256.0).round().clamp(0.0, u32::MAX as f64) as u32
}

fn fixed_to_fps(raw: u32) -> f64 {
  f64::from(raw) / 256.0
}

/// Build a complete header blob: base header, metadata, and (if `extension`
/// is non-empty) the JSON extension block, with the header CRC computed and
/// stamped in.
pub fn build_header(fields: &HeaderFields) -> Result<Vec<u8>, HeaderError> {
  let has_extension = !fields.extension.is_empty();
  let version = if has_extension { VERSION_EXT } else { VERSION_BASE };

  let mut base = HeaderBase {
    magic: MAGIC,
    version: U16LE::from(version),
    led_count: U16LE::from(fields.led_count),
    frame_count: fields.frame_count.into(),
    fps: fps_to_fixed(fields.fps).into(),
    color_format: fields.color_format,
    compression: fields.compression,
    reserved1: U16LE::from(0u16),
    crc32: 0u32.into(),
    padding: [0u8; 40],
  };
  let meta = MetaV11 {
    version: META_VERSION,
    motion_direction: fields.motion_direction,
    sync_mode: fields.sync_mode,
    reserved: 0,
    params: [U16LE::from(0u16); 6],
  };

  let base_bytes = bytemuck::bytes_of(&base);
  let meta_bytes = bytemuck::bytes_of(&meta);
  let crc = crc32_chained(&base_bytes[..CRC_PREFIX_SIZE], &meta_bytes[..META_CRC_PREFIX]);
  base.crc32 = crc.into();

  let mut out = Vec::with_capacity(BASE_SIZE + META_SIZE);
  out.extend_from_slice(bytemuck::bytes_of(&base));
  out.extend_from_slice(bytemuck::bytes_of(&meta));

  if has_extension {
    let ext_bytes = extension::encode_extension(&fields.extension)?;
    let len: u16 = ext_bytes.len().try_into().map_err(|_| HeaderError::ExtensionTooLarge)?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&ext_bytes);
  }

  Ok(out)
}

/// Parse a header blob: validate magic, dispatch on version, check the CRC,
/// and decode the extension block if present.
pub fn parse_header(bytes: &[u8]) -> Result<ParsedHeader, HeaderError> {
  if bytes.len() < BASE_SIZE {
    return Err(HeaderError::HeaderTooShort);
  }
  let base: HeaderBase = bytemuck::pod_read_unaligned(&bytes[..BASE_SIZE]);
  if base.magic != MAGIC {
    return Err(HeaderError::BadMagic);
  }
  let version = base.version.get();
  if version != VERSION_BASE && version != VERSION_EXT {
    return Err(HeaderError::UnsupportedVersion { version });
  }
  if bytes.len() < BASE_SIZE + META_SIZE {
    return Err(HeaderError::HeaderTooShort);
  }
  let meta_bytes = &bytes[BASE_SIZE..BASE_SIZE + META_SIZE];
  let meta: MetaV11 = bytemuck::pod_read_unaligned(meta_bytes);

  let computed = crc32_chained(&bytes[..CRC_PREFIX_SIZE], &meta_bytes[..META_CRC_PREFIX]);
  let stored = base.crc32.get();
  if computed != stored {
    return Err(HeaderError::HeaderCrcMismatch { stored, computed });
  }

  let mut pos = BASE_SIZE + META_SIZE;
  let (extension, warnings) = if version == VERSION_EXT {
    if bytes.len() < pos + 2 {
      return Err(HeaderError::TruncatedExtension);
    }
    let len = u16::from_le_bytes([bytes[pos], bytes[pos + 1]]) as usize;
    pos += 2;
    let ext_bytes = bytes.get(pos..pos + len).ok_or(HeaderError::TruncatedExtension)?;
    extension::decode_extension(ext_bytes)?
  } else {
    (BTreeMap::new(), Vec::new())
  };

  Ok(ParsedHeader {
    version,
    led_count: base.led_count.get(),
    frame_count: base.frame_count.get(),
    fps: fixed_to_fps(base.fps.get()),
    color_format: base.color_format,
    compression: base.compression,
    motion_direction: meta.motion_direction,
    sync_mode: meta.sync_mode,
    extension,
    header_crc: stored,
    warnings,
  })
}
