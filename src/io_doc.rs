//! The on-disk envelope for auxiliary JSON documents (palettes, manifests,
//! vector sets): `{"version", "data", "meta"}`, sorted and pretty-printed,
//! matching the original tooling's `write_json` helper.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::PrismResult;

/// Current envelope version written by [`write`].
pub const DOCUMENT_VERSION: &str = "1.0";

/// A versioned JSON document: `data` is the payload, `meta` is free-form
/// provenance (tool name, generation timestamp, source file, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
  pub version: String,
  pub data: T,
  #[serde(default)]
  pub meta: serde_json::Map<String, serde_json::Value>,
}

impl<T> Document<T> {
  /// Wrap `data` at [`DOCUMENT_VERSION`] with no metadata.
  pub fn new(data: T) -> Self {
    Self { version: DOCUMENT_VERSION.to_string(), data, meta: serde_json::Map::new() }
  }

  /// Attach a metadata field, builder-style.
  #[must_use]
  pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
    self.meta.insert(key.into(), value.into());
    self
  }
}

/// Serialize `doc` as indented, key-sorted JSON and write it to `path`,
/// creating parent directories as needed.
pub fn write<T: Serialize>(path: &Path, doc: &Document<T>) -> PrismResult<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }
  let value = serde_json::to_value(doc)?;
  let sorted = sort_keys(value);
  let text = serde_json::to_string_pretty(&sorted)?;
  fs::write(path, text)?;
  Ok(())
}

/// Read and parse a [`Document`] previously written by [`write`].
pub fn read<T: for<'de> Deserialize<'de>>(path: &Path) -> PrismResult<Document<T>> {
  let text = fs::read_to_string(path)?;
  let doc = serde_json::from_str(&text)?;
  Ok(doc)
}

/// Recursively sort object keys so the serialized form is stable across
/// `serde_json::Map`'s insertion-order iteration.
fn sort_keys(value: serde_json::Value) -> serde_json::Value {
  match value {
    serde_json::Value::Object(map) => {
      let sorted: std::collections::BTreeMap<String, serde_json::Value> =
        map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
      serde_json::Value::Object(sorted.into_iter().collect())
    }
    serde_json::Value::Array(items) => {
      serde_json::Value::Array(items.into_iter().map(sort_keys).collect())
    }
    other => other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::env;

  #[test]
  fn round_trips_through_disk() {
    let dir = env::temp_dir().join(format!("prism-io-doc-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("doc.json");

    let doc = Document::new(json!({"led_count": 16})).with_meta("tool", "unit-test");
    write(&path, &doc).unwrap();

    let loaded: Document<serde_json::Value> = read(&path).unwrap();
    assert_eq!(loaded.version, DOCUMENT_VERSION.to_string());
    assert_eq!(loaded.data["led_count"], 16);
    assert_eq!(loaded.meta["tool"], "unit-test");

    fs::remove_dir_all(&dir).ok();
  }

  #[test]
  fn sort_keys_orders_nested_objects() {
    let value = json!({"b": 1, "a": {"z": 1, "y": 2}});
    let sorted = sort_keys(value);
    let text = serde_json::to_string(&sorted).unwrap();
    assert_eq!(text, r#"{"a":{"y":2,"z":1},"b":1}"#);
  }
}
