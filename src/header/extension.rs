//! The optional JSON extension block: a `u16`-length-prefixed, sorted-key
//! JSON object trailing [`super::raw::MetaV11`] when the header version is
//! `VERSION_EXT`.
//!
//! Malformed JSON or a non-object top level is a hard parse failure
//! ([`HeaderError::InvalidExtension`]); a recognized-but-invalid optional
//! field is not — the header still parses, downstream tooling just gets a
//! [`Warning`] back and falls to its own default.

use crate::error::HeaderError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// `ramp_space` values the header format will round-trip, including two
/// (`oklab`, `oklch`) with no ramp implementation in [`crate::color`].
pub const VALID_RAMP_SPACES: [&str; 5] = ["hsv", "hsl", "hsluv", "oklab", "oklch"];

/// Extension keys that are recognised and checked if present, but never
/// required.
pub const OPTIONAL_METADATA_FIELDS: [&str; 3] = ["palette_id", "ramp_space", "show_params"];

/// A non-fatal issue with the extension block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Warning {
  /// `ramp_space` was present but not one of [`VALID_RAMP_SPACES`].
  UnknownRampSpace(String),
  /// `palette_id` was present but was neither a string nor an integer.
  InvalidPaletteId,
  /// `show_params` was present but was not a JSON object.
  InvalidShowParams,
  /// Keys present in the extension block outside [`OPTIONAL_METADATA_FIELDS`].
  /// Informational only — unknown keys are retained, never rejected.
  UnknownFields(Vec<String>),
}

impl fmt::Display for Warning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnknownRampSpace(s) => write!(f, "unrecognized ramp_space {s:?}"),
      Self::InvalidPaletteId => write!(f, "palette_id was not a string or integer"),
      Self::InvalidShowParams => write!(f, "show_params was not a JSON object"),
      Self::UnknownFields(keys) => write!(f, "unrecognized extension fields: {}", keys.join(", ")),
    }
  }
}

/// Encode `fields` as a sorted-key, 64 KiB-capped JSON byte block.
pub fn encode_extension(fields: &BTreeMap<String, Value>) -> Result<Vec<u8>, HeaderError> {
  let bytes = serde_json::to_vec(fields).map_err(|_| HeaderError::ExtensionEncoding)?;
  if bytes.len() > u16::MAX as usize {
    return Err(HeaderError::ExtensionTooLarge);
  }
  Ok(bytes)
}

/// Decode a JSON extension block, returning the field map plus any
/// non-fatal warnings about recognized fields.
pub fn decode_extension(bytes: &[u8]) -> Result<(BTreeMap<String, Value>, Vec<Warning>), HeaderError> {
  let value: Value = serde_json::from_slice(bytes).map_err(|_| HeaderError::InvalidExtension)?;
  match value {
    Value::Object(map) => {
      let fields: BTreeMap<String, Value> = map.into_iter().collect();
      let warnings = validate_optional_fields(&fields);
      Ok((fields, warnings))
    }
    _ => Err(HeaderError::InvalidExtension),
  }
}

/// Check every recognized optional field present in `fields`, collecting a
/// [`Warning`] for each one that doesn't hold up.
#[must_use]
pub fn validate_optional_fields(fields: &BTreeMap<String, Value>) -> Vec<Warning> {
  let mut warnings = Vec::new();
  if let Some(v) = fields.get("ramp_space") {
    match v.as_str() {
      Some(s) if ramp_space_is_valid(s) => {}
      Some(s) => warnings.push(Warning::UnknownRampSpace(s.to_string())),
      None => warnings.push(Warning::UnknownRampSpace(v.to_string())),
    }
  }
  if let Some(v) = fields.get("palette_id") {
    if !(v.is_string() || v.is_u64()) {
      warnings.push(Warning::InvalidPaletteId);
    }
  }
  if let Some(v) = fields.get("show_params") {
    if !v.is_object() {
      warnings.push(Warning::InvalidShowParams);
    }
  }
  let unknown: Vec<String> = fields
    .keys()
    .filter(|k| !OPTIONAL_METADATA_FIELDS.contains(&k.as_str()))
    .cloned()
    .collect();
  if !unknown.is_empty() {
    warnings.push(Warning::UnknownFields(unknown));
  }
  warnings
}

/// Whether `s` is one of [`VALID_RAMP_SPACES`].
#[must_use]
pub fn ramp_space_is_valid(s: &str) -> bool {
  VALID_RAMP_SPACES.contains(&s)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn map(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
  }

  #[test]
  fn round_trips_empty_extension() {
    let fields = BTreeMap::new();
    let bytes = encode_extension(&fields).unwrap();
    let (decoded, warnings) = decode_extension(&bytes).unwrap();
    assert!(decoded.is_empty());
    assert!(warnings.is_empty());
  }

  #[test]
  fn round_trips_known_fields_without_warnings() {
    let fields = map(&[("ramp_space", json!("hsluv")), ("palette_id", json!("sunset"))]);
    let bytes = encode_extension(&fields).unwrap();
    let (decoded, warnings) = decode_extension(&bytes).unwrap();
    assert_eq!(decoded.get("ramp_space").unwrap(), "hsluv");
    assert!(warnings.is_empty());
  }

  #[test]
  fn unknown_fields_pass_through_but_are_reported() {
    let fields = map(&[("experimental_hint", json!(true))]);
    let bytes = encode_extension(&fields).unwrap();
    let (decoded, warnings) = decode_extension(&bytes).unwrap();
    assert_eq!(decoded.get("experimental_hint").unwrap(), true);
    assert_eq!(warnings, vec![Warning::UnknownFields(vec!["experimental_hint".to_string()])]);
  }

  #[test]
  fn invalid_ramp_space_is_a_warning_not_an_error() {
    let fields = map(&[("ramp_space", json!("cmyk"))]);
    let bytes = encode_extension(&fields).unwrap();
    let (_, warnings) = decode_extension(&bytes).unwrap();
    assert_eq!(warnings, vec![Warning::UnknownRampSpace("cmyk".to_string())]);
  }

  #[test]
  fn rejects_non_object_extension_payload() {
    assert!(decode_extension(b"[1,2,3]").is_err());
  }
}
