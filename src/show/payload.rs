//! The Show JSON payload: the `data` field of an [`crate::io_doc::Document`]
//! wrapping either a full frame sequence or a single RGB frame, matching the
//! original tooling's assembler input format.

use crate::color::Rgb8;
use serde::Deserialize;

/// One `[r, g, b]` triple as it appears in a Show JSON payload.
pub type RgbTriple = [u8; 3];

/// `data` in `{ version, data, meta }`: either a full frame sequence or a
/// single RGB frame, treated as a one-frame show.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShowPayload {
  Frames { frames: Vec<Vec<RgbTriple>> },
  SingleFrame { rgb: Vec<RgbTriple> },
}

impl ShowPayload {
  /// Expand into the frame sequence the rest of the crate works with. A
  /// `rgb` payload becomes a single frame.
  pub fn into_frames(self) -> Vec<Vec<Rgb8>> {
    match self {
      Self::Frames { frames } => frames.into_iter().map(triples_to_frame).collect(),
      Self::SingleFrame { rgb } => vec![triples_to_frame(rgb)],
    }
  }
}

fn triples_to_frame(triples: Vec<RgbTriple>) -> Vec<Rgb8> {
  triples.into_iter().map(|[r, g, b]| Rgb8 { r, g, b }).collect()
}
