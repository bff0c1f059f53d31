//! Golden header vectors: headers built through the ordinary assembly path
//! that must always parse cleanly.

use crate::header::{build_header, HeaderFields};
use serde_json::json;
use std::collections::BTreeMap;

/// A named header blob that [`crate::header::parse_header`] must accept.
pub struct GoldenVector {
  pub name: &'static str,
  pub bytes: Vec<u8>,
}

fn base_fields() -> HeaderFields {
  HeaderFields {
    led_count: 64,
    frame_count: 240,
    fps: 24.0,
    color_format: 1,
    compression: 0,
    motion_direction: 0,
    sync_mode: 0,
    extension: BTreeMap::new(),
  }
}

fn default_palette() -> Vec<u8> {
  let mut fields = base_fields();
  fields.extension.insert("ramp_space".into(), json!("hsv"));
  fields.extension.insert("palette_id".into(), json!("default"));
  build_header(&fields).expect("golden vector must build")
}

fn unknown_fields_noop() -> Vec<u8> {
  let mut fields = base_fields();
  fields.extension.insert("future_feature".into(), json!({ "flag": true }));
  build_header(&fields).expect("golden vector must build")
}

fn no_optional_fields() -> Vec<u8> {
  build_header(&base_fields()).expect("golden vector must build")
}

/// All golden vectors: `default_palette`, `unknown_fields_noop`,
/// `no_optional_fields`.
pub fn golden_vectors() -> Vec<GoldenVector> {
  vec![
    GoldenVector { name: "default_palette", bytes: default_palette() },
    GoldenVector { name: "unknown_fields_noop", bytes: unknown_fields_noop() },
    GoldenVector { name: "no_optional_fields", bytes: no_optional_fields() },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::header::parse_header;

  #[test]
  fn all_golden_vectors_parse_cleanly() {
    for vector in golden_vectors() {
      parse_header(&vector.bytes).unwrap_or_else(|e| panic!("{}: {e}", vector.name));
    }
  }

  #[test]
  fn unknown_fields_are_preserved_but_not_required() {
    let vector = golden_vectors().into_iter().find(|v| v.name == "unknown_fields_noop").unwrap();
    let parsed = parse_header(&vector.bytes).unwrap();
    assert!(parsed.extension.contains_key("future_feature"));
  }

  #[test]
  fn no_optional_fields_has_empty_extension() {
    let vector = golden_vectors().into_iter().find(|v| v.name == "no_optional_fields").unwrap();
    let parsed = parse_header(&vector.bytes).unwrap();
    assert!(parsed.extension.is_empty());
  }
}
