//! The on-disk parser vector format: a `.bin` payload and a sidecar `.json`
//! record (name, category, manifest, expected outcome, description, tags),
//! matching the original tooling's `ParserVector`.

use crate::error::HeaderError;
use crate::header::{parse_header, Warning};
use crate::io_doc::{self, Document};
use crate::PrismResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which half of the corpus a [`Vector`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorCategory {
  Golden,
  Mutation,
}

/// The outcome [`validate_vector`] expects from parsing a vector's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOutcome {
  Pass,
  CrcMismatch,
  LengthError,
  InvalidRampSpace,
}

/// One parser test vector: the header bytes under test, plus everything
/// needed to judge whether the parser handled them correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vector {
  pub name: String,
  pub category: VectorCategory,
  /// The header bytes under test. Stored as a sibling `.bin` file, not
  /// inline in the `.json` record.
  #[serde(skip)]
  pub payload: Vec<u8>,
  pub manifest: serde_json::Value,
  pub expected_outcome: ExpectedOutcome,
  pub description: String,
  pub tags: Vec<String>,
}

/// The result of checking one [`Vector`] against [`crate::header::parse_header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
  pub name: String,
  pub passed: bool,
  pub detail: String,
}

/// Parse `vector.payload` and check the result matches `vector.expected_outcome`.
#[must_use]
pub fn validate_vector(vector: &Vector) -> ValidationResult {
  let result = parse_header(&vector.payload);
  let (passed, detail) = match (vector.expected_outcome, &result) {
    (ExpectedOutcome::Pass, Ok(_)) => (true, "parsed cleanly".to_string()),
    (ExpectedOutcome::CrcMismatch, Err(HeaderError::HeaderCrcMismatch { .. })) => {
      (true, "rejected with a header CRC mismatch".to_string())
    }
    (
      ExpectedOutcome::LengthError,
      Err(HeaderError::HeaderTooShort | HeaderError::TruncatedExtension),
    ) => (true, "rejected as too short".to_string()),
    (ExpectedOutcome::InvalidRampSpace, Ok(parsed)) => {
      let flagged = parsed.warnings.iter().any(|w| matches!(w, Warning::UnknownRampSpace(_)));
      let detail = if flagged {
        "parsed with an unknown-ramp-space warning".to_string()
      } else {
        "parsed but produced no ramp-space warning".to_string()
      };
      (flagged, detail)
    }
    _ => (false, format!("unexpected result: {result:?}")),
  };
  ValidationResult { name: vector.name.clone(), passed, detail }
}

/// `(passed, total)` across a batch of [`ValidationResult`]s.
#[must_use]
pub fn summarise_results(results: &[ValidationResult]) -> (usize, usize) {
  (results.iter().filter(|r| r.passed).count(), results.len())
}

/// Log every result at `debug` (pass) or `error` (fail), then an `info`
/// summary line.
pub fn log_results(results: &[ValidationResult]) {
  for r in results {
    if r.passed {
      log::debug!("vector {}: {}", r.name, r.detail);
    } else {
      log::error!("vector {}: {}", r.name, r.detail);
    }
  }
  let (passed, total) = summarise_results(results);
  log::info!("testbed vectors: {passed}/{total} passed");
}

/// Write `vector` as `<dir>/<name>.bin` + `<dir>/<name>.json`.
pub fn write_vector(dir: &Path, vector: &Vector) -> PrismResult<()> {
  std::fs::create_dir_all(dir)?;
  std::fs::write(dir.join(format!("{}.bin", vector.name)), &vector.payload)?;
  let doc = Document::new(serde_json::to_value(vector)?);
  io_doc::write(&dir.join(format!("{}.json", vector.name)), &doc)
}

/// Write every vector in `vectors` into `dir`.
pub fn write_vectors(dir: &Path, vectors: &[Vector]) -> PrismResult<()> {
  for vector in vectors {
    write_vector(dir, vector)?;
  }
  Ok(())
}

/// Load a single vector previously written by [`write_vector`].
pub fn load_vector(dir: &Path, name: &str) -> PrismResult<Vector> {
  let payload = std::fs::read(dir.join(format!("{name}.bin")))?;
  let doc: Document<Vector> = io_doc::read(&dir.join(format!("{name}.json")))?;
  let mut vector = doc.data;
  vector.payload = payload;
  Ok(vector)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::env;
  use std::fs;

  fn sample_vector(name: &str, payload: Vec<u8>, expected: ExpectedOutcome) -> Vector {
    Vector {
      name: name.to_string(),
      category: VectorCategory::Golden,
      payload,
      manifest: serde_json::json!({}),
      expected_outcome: expected,
      description: "test vector".to_string(),
      tags: vec![],
    }
  }

  #[test]
  fn write_then_load_round_trips() {
    let dir = env::temp_dir().join(format!("prism-vector-test-{}", std::process::id()));
    let vector = sample_vector("roundtrip", vec![1, 2, 3, 4], ExpectedOutcome::LengthError);
    write_vector(&dir, &vector).unwrap();
    let loaded = load_vector(&dir, "roundtrip").unwrap();
    assert_eq!(loaded.payload, vector.payload);
    assert_eq!(loaded.expected_outcome, ExpectedOutcome::LengthError);
    fs::remove_dir_all(&dir).ok();
  }

  #[test]
  fn summarise_counts_passes() {
    let results = vec![
      ValidationResult { name: "a".into(), passed: true, detail: String::new() },
      ValidationResult { name: "b".into(), passed: false, detail: String::new() },
    ];
    assert_eq!(summarise_results(&results), (1, 2));
  }
}
