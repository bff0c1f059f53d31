//! Frame codec (C5): inter-frame XOR delta plus run-length coding over
//! streams of quantized palette indices.

mod rle;

pub use rle::{rle_decode, rle_encode};

use crate::error::CodecError;

/// Payload is the XOR of this frame's indices against the previous frame's,
/// rather than the raw indices.
pub const FLAG_DELTA: u8 = 0x01;
/// Payload (raw or delta'd) was additionally run-length encoded.
pub const FLAG_RLE: u8 = 0x02;

/// Minimum fraction of bytes that must go to zero under XOR-against-previous
/// before delta coding is preferred over raw indices.
const DELTA_ZERO_RATIO_THRESHOLD: f64 = 0.4;

fn xor_delta(a: &[u8], b: &[u8]) -> Vec<u8> {
  a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// Encode one frame of palette indices against the previous frame's indices
/// (`None` for the first frame in a stream). Returns the flag byte and the
/// smallest of {raw, RLE} applied atop {raw, delta}.
///
/// Fails if any index is `>= 0x80` — see [`rle_encode`].
pub fn encode_frame(prev: Option<&[u8]>, indices: &[u8]) -> Result<(u8, Vec<u8>), CodecError> {
  if let Some(&index) = indices.iter().find(|&&b| b & 0x80 != 0) {
    return Err(CodecError::IndexOutOfPalette { index });
  }

  let (delta_flag, base) = match prev {
    Some(prev) if prev.len() == indices.len() && !indices.is_empty() => {
      let xored = xor_delta(prev, indices);
      let zero_ratio =
        xored.iter().filter(|&&b| b == 0).count() as f64 / xored.len() as f64;
      if zero_ratio >= DELTA_ZERO_RATIO_THRESHOLD {
        (FLAG_DELTA, xored)
      } else {
        (0, indices.to_vec())
      }
    }
    _ => (0, indices.to_vec()),
  };

  // `base` (raw indices, or their XOR against the previous frame) can never
  // carry the marker bit here: both operands already passed the check above.
  let rle = rle_encode(&base).expect("base indices validated below 0x80");
  if rle.len() < base.len() {
    Ok((delta_flag | FLAG_RLE, rle))
  } else {
    Ok((delta_flag, base))
  }
}

/// Decode one frame, given the previous frame's already-decoded indices and
/// the `(flags, payload)` pair [`encode_frame`] produced.
pub fn decode_frame(
  prev: Option<&[u8]>,
  flags: u8,
  payload: &[u8],
  led_count: usize,
) -> Result<Vec<u8>, CodecError> {
  let base = if flags & FLAG_RLE != 0 {
    rle_decode(payload, led_count)?
  } else {
    payload.to_vec()
  };
  if base.len() != led_count {
    return Err(CodecError::LengthMismatch { expected: led_count, actual: base.len() });
  }
  if flags & FLAG_DELTA != 0 {
    let prev = prev.ok_or(CodecError::DeltaWithoutPredecessor)?;
    if prev.len() != led_count {
      return Err(CodecError::LengthMismatch { expected: led_count, actual: prev.len() });
    }
    Ok(xor_delta(prev, &base))
  } else {
    Ok(base)
  }
}

/// Encode a sequence of frames, each chained against the previous frame's
/// indices.
pub fn encode_frameset(frames: &[Vec<u8>]) -> Result<Vec<(u8, Vec<u8>)>, CodecError> {
  let mut out = Vec::with_capacity(frames.len());
  let mut prev: Option<&[u8]> = None;
  for frame in frames {
    out.push(encode_frame(prev, frame)?);
    prev = Some(frame.as_slice());
  }
  Ok(out)
}

/// Decode a sequence of `(flags, payload)` pairs back to index frames.
pub fn decode_payload(
  encoded: &[(u8, Vec<u8>)],
  led_count: usize,
) -> Result<Vec<Vec<u8>>, CodecError> {
  let mut frames = Vec::with_capacity(encoded.len());
  let mut prev: Option<Vec<u8>> = None;
  for (flags, payload) in encoded {
    let frame = decode_frame(prev.as_deref(), *flags, payload, led_count)?;
    prev = Some(frame.clone());
    frames.push(frame);
  }
  Ok(frames)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn frameset_round_trips() {
    let frames = vec![
      vec![0u8, 1, 2, 3, 4, 5, 6, 7],
      vec![0u8, 1, 2, 3, 4, 5, 6, 7],
      vec![0u8, 1, 9, 3, 4, 5, 6, 7],
    ];
    let encoded = encode_frameset(&frames).unwrap();
    let decoded = decode_payload(&encoded, 8).unwrap();
    assert_eq!(decoded, frames);
  }

  #[test]
  fn identical_consecutive_frames_use_delta() {
    let frame = vec![3u8; 32];
    let encoded = encode_frameset(&[frame.clone(), frame.clone()]).unwrap();
    assert_eq!(encoded[1].0 & FLAG_DELTA, FLAG_DELTA);
  }

  #[test]
  fn decode_rejects_delta_on_first_frame() {
    let (_, payload) = encode_frame(None, &[1, 2, 3]).unwrap();
    assert!(decode_frame(None, FLAG_DELTA, &payload, 3).is_err());
  }

  #[test]
  fn decode_rejects_length_mismatch() {
    let (flags, payload) = encode_frame(None, &[1, 2, 3]).unwrap();
    assert!(decode_frame(None, flags, &payload, 4).is_err());
  }

  #[test]
  fn single_frame_has_no_delta_flag() {
    let (flags, _) = encode_frame(None, &[5, 5, 5, 5]).unwrap();
    assert_eq!(flags & FLAG_DELTA, 0);
  }

  #[test]
  fn rejects_index_at_or_above_0x80() {
    assert!(encode_frame(None, &[1, 2, 0x80]).is_err());
  }
}
