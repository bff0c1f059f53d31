//! Mutated vectors: a golden header with one specific corruption applied,
//! each paired with the exact outcome [`super::vector::validate_vector`]
//! must observe.

use super::golden::golden_vectors;
use super::vector::ExpectedOutcome;
use crate::error::HeaderError;
use crate::header::{parse_header, Warning};

/// A corrupted header blob plus the outcome [`super::vector::validate_vector`]
/// checks for.
pub struct MutationVector {
  pub name: &'static str,
  pub bytes: Vec<u8>,
  pub expected: ExpectedOutcome,
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  haystack.windows(needle.len()).position(|w| w == needle)
}

fn crc_corrupted(base: &[u8]) -> MutationVector {
  let mut bytes = base.to_vec();
  bytes[5] ^= 0x01; // inside base[0..16), the CRC-covered prefix
  MutationVector { name: "crc_corrupted", bytes, expected: ExpectedOutcome::CrcMismatch }
}

fn meta_bitflip_crc(base: &[u8]) -> MutationVector {
  let mut bytes = base.to_vec();
  bytes[64 + 2] ^= 0x01; // sync_mode byte, inside meta's CRC-covered prefix
  MutationVector { name: "meta_bitflip_crc", bytes, expected: ExpectedOutcome::CrcMismatch }
}

fn truncated_extended_metadata(base: &[u8]) -> MutationVector {
  let mut bytes = base.to_vec();
  let cut = bytes.len().saturating_sub(3);
  bytes.truncate(cut);
  MutationVector { name: "truncated_extended_metadata", bytes, expected: ExpectedOutcome::LengthError }
}

fn invalid_ramp_space(base: &[u8]) -> MutationVector {
  let mut bytes = base.to_vec();
  if let Some(pos) = find_subslice(&bytes, b"\"hsv\"") {
    bytes[pos + 1..pos + 4].copy_from_slice(b"xyz");
  }
  MutationVector { name: "invalid_ramp_space", bytes, expected: ExpectedOutcome::InvalidRampSpace }
}

/// All mutation vectors, derived from the `default_palette` golden vector:
/// `crc_corrupted`, `meta_bitflip_crc`, `truncated_extended_metadata`,
/// `invalid_ramp_space`.
pub fn mutation_vectors() -> Vec<MutationVector> {
  let base = golden_vectors().into_iter().find(|v| v.name == "default_palette").unwrap().bytes;
  vec![
    crc_corrupted(&base),
    meta_bitflip_crc(&base),
    truncated_extended_metadata(&base),
    invalid_ramp_space(&base),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn crc_corrupted_fails_with_mismatch() {
    let vector = mutation_vectors().into_iter().find(|v| v.name == "crc_corrupted").unwrap();
    assert!(matches!(parse_header(&vector.bytes), Err(HeaderError::HeaderCrcMismatch { .. })));
  }

  #[test]
  fn meta_bitflip_fails_with_mismatch() {
    let vector = mutation_vectors().into_iter().find(|v| v.name == "meta_bitflip_crc").unwrap();
    assert!(matches!(parse_header(&vector.bytes), Err(HeaderError::HeaderCrcMismatch { .. })));
  }

  #[test]
  fn truncated_metadata_fails_as_too_short() {
    let vector =
      mutation_vectors().into_iter().find(|v| v.name == "truncated_extended_metadata").unwrap();
    assert!(matches!(
      parse_header(&vector.bytes),
      Err(HeaderError::HeaderTooShort | HeaderError::TruncatedExtension)
    ));
  }

  #[test]
  fn invalid_ramp_space_parses_with_a_warning() {
    let vector = mutation_vectors().into_iter().find(|v| v.name == "invalid_ramp_space").unwrap();
    let parsed = parse_header(&vector.bytes).unwrap();
    assert!(parsed.warnings.iter().any(|w| matches!(w, Warning::UnknownRampSpace(s) if s == "xyz")));
  }
}
