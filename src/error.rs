//! Crate-wide error taxonomy.
//!
//! Every fallible subsystem gets its own `non_exhaustive` enum with a hand
//! written [`core::fmt::Display`] and [`std::error::Error`] impl, the same
//! shape the teacher crate uses for `PngError`/`BmpError`. [`PrismError`]
//! wraps each of them with a `From` impl so a caller who doesn't care which
//! stage failed can just propagate one type with `?`.

use core::fmt;

/// Failures from [`crate::color`]: hex parsing, palette stop validation,
/// ramp space selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ColorError {
  /// A hex string was not `#RGB` or `#RRGGBB`, or contained non-hex digits.
  InvalidHex {
    /// The offending input, for diagnostics.
    input: String,
  },
  /// Fewer than two palette stops were supplied.
  InvalidPalette {
    /// Human-readable reason (empty palette, single stop, unknown space).
    reason: &'static str,
  },
}

impl fmt::Display for ColorError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidHex { input } => write!(f, "invalid hex color: {input:?}"),
      Self::InvalidPalette { reason } => write!(f, "invalid palette: {reason}"),
    }
  }
}
impl std::error::Error for ColorError {}

/// Failures from [`crate::show`]: out-of-range generator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShowError {
  /// A parameter fell outside the range the generator requires.
  InvalidParameter {
    /// Name of the out-of-range field.
    field: &'static str,
  },
}

impl fmt::Display for ShowError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidParameter { field } => write!(f, "invalid parameter: {field}"),
    }
  }
}
impl std::error::Error for ShowError {}

/// Failures from [`crate::quantize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuantizeError {
  /// The input histogram was empty.
  EmptyHistogram,
}

impl fmt::Display for QuantizeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmptyHistogram => write!(f, "cannot quantize an empty color histogram"),
    }
  }
}
impl std::error::Error for QuantizeError {}

/// Failures from [`crate::codec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
  /// A palette index could not be encoded: either a pixel color had no entry
  /// in the palette remap table, or the index was `>= 0x80` and would
  /// collide with the RLE run marker's high bit.
  IndexOutOfPalette {
    /// The offending index, or `0xFF` if the index itself is unknown (a
    /// missing remap entry, rather than an out-of-range one).
    index: u8,
  },
  /// A delta-flagged frame was the first frame in the stream.
  DeltaWithoutPredecessor,
  /// A decoded frame did not have exactly `led_count` indices.
  LengthMismatch {
    /// Number of indices the frame was expected to decode to.
    expected: usize,
    /// Number of indices actually produced.
    actual: usize,
  },
  /// An RLE run byte claimed a value but no run-length byte followed it.
  TruncatedRun,
}

impl fmt::Display for CodecError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::IndexOutOfPalette { index } => {
        write!(f, "palette index {index} cannot be encoded (missing remap entry, or >= 0x80)")
      }
      Self::DeltaWithoutPredecessor => {
        write!(f, "delta frame encountered without a preceding baseline")
      }
      Self::LengthMismatch { expected, actual } => {
        write!(f, "decoded frame length mismatch: expected {expected}, got {actual}")
      }
      Self::TruncatedRun => write!(f, "RLE run marker with no following value byte"),
    }
  }
}
impl std::error::Error for CodecError {}

/// Failures from [`crate::header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderError {
  /// The extension JSON block, once canonicalized, exceeded 65535 bytes.
  ExtensionTooLarge,
  /// The extension fields could not be serialized as JSON.
  ExtensionEncoding,
  /// Fewer than 64 bytes were available to parse a base header from.
  HeaderTooShort,
  /// The 4-byte magic tag was not `PRSM`.
  BadMagic,
  /// `version` was neither `0x0100` nor `0x0101`.
  UnsupportedVersion {
    /// The version field that failed to dispatch.
    version: u16,
  },
  /// The extension length prefix claimed more bytes than were present.
  TruncatedExtension,
  /// The extension payload did not decode to a JSON object.
  InvalidExtension,
  /// The recomputed CRC did not match the stored CRC.
  HeaderCrcMismatch {
    /// The CRC stored in the header.
    stored: u32,
    /// The CRC recomputed from the parsed bytes.
    computed: u32,
  },
}

impl fmt::Display for HeaderError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ExtensionTooLarge => write!(f, "extension JSON block exceeds 65535 bytes"),
      Self::ExtensionEncoding => write!(f, "extension fields failed to serialize as JSON"),
      Self::HeaderTooShort => write!(f, "buffer shorter than the 64-byte base header"),
      Self::BadMagic => write!(f, "magic bytes were not \"PRSM\""),
      Self::UnsupportedVersion { version } => {
        write!(f, "unsupported header version 0x{version:04X}")
      }
      Self::TruncatedExtension => {
        write!(f, "extension length prefix claims more bytes than are present")
      }
      Self::InvalidExtension => write!(f, "extension payload did not decode to a JSON object"),
      Self::HeaderCrcMismatch { stored, computed } => {
        write!(f, "header CRC mismatch: stored 0x{stored:08X}, computed 0x{computed:08X}")
      }
    }
  }
}
impl std::error::Error for HeaderError {}

/// Failures from [`crate::package`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PackageError {
  /// The payload CRC stored in the artifact did not match the recomputed
  /// value.
  PayloadCrcMismatch {
    /// The CRC stored in the artifact.
    stored: u32,
    /// The CRC recomputed from the payload bytes.
    computed: u32,
  },
  /// Decoding the just-encoded payload did not reproduce the quantized
  /// frames. Indicates a codec bug, never a caller input error.
  RoundtripMismatch,
}

impl fmt::Display for PackageError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::PayloadCrcMismatch { stored, computed } => {
        write!(f, "payload CRC mismatch: stored 0x{stored:08X}, computed 0x{computed:08X}")
      }
      Self::RoundtripMismatch => write!(f, "round-trip decode did not match the encoded frames"),
    }
  }
}
impl std::error::Error for PackageError {}

/// Aggregate error type for callers that want a single `Result<_, E>`
/// instead of tracking which subsystem produced the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PrismError {
  /// See [`ColorError`].
  Color(ColorError),
  /// See [`ShowError`].
  Show(ShowError),
  /// See [`QuantizeError`].
  Quantize(QuantizeError),
  /// See [`CodecError`].
  Codec(CodecError),
  /// See [`HeaderError`].
  Header(HeaderError),
  /// See [`PackageError`].
  Package(PackageError),
  /// A JSON document failed to parse or did not match the shape expected.
  Json(String),
  /// An I/O operation failed while reading or writing an artifact.
  Io(String),
}

impl fmt::Display for PrismError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Color(e) => write!(f, "{e}"),
      Self::Show(e) => write!(f, "{e}"),
      Self::Quantize(e) => write!(f, "{e}"),
      Self::Codec(e) => write!(f, "{e}"),
      Self::Header(e) => write!(f, "{e}"),
      Self::Package(e) => write!(f, "{e}"),
      Self::Json(msg) => write!(f, "JSON error: {msg}"),
      Self::Io(msg) => write!(f, "I/O error: {msg}"),
    }
  }
}
impl std::error::Error for PrismError {}

impl From<ColorError> for PrismError {
  #[inline]
  fn from(e: ColorError) -> Self {
    Self::Color(e)
  }
}
impl From<ShowError> for PrismError {
  #[inline]
  fn from(e: ShowError) -> Self {
    Self::Show(e)
  }
}
impl From<QuantizeError> for PrismError {
  #[inline]
  fn from(e: QuantizeError) -> Self {
    Self::Quantize(e)
  }
}
impl From<CodecError> for PrismError {
  #[inline]
  fn from(e: CodecError) -> Self {
    Self::Codec(e)
  }
}
impl From<HeaderError> for PrismError {
  #[inline]
  fn from(e: HeaderError) -> Self {
    Self::Header(e)
  }
}
impl From<PackageError> for PrismError {
  #[inline]
  fn from(e: PackageError) -> Self {
    Self::Package(e)
  }
}
impl From<serde_json::Error> for PrismError {
  #[inline]
  fn from(e: serde_json::Error) -> Self {
    Self::Json(e.to_string())
  }
}
impl From<std::io::Error> for PrismError {
  #[inline]
  fn from(e: std::io::Error) -> Self {
    Self::Io(e.to_string())
  }
}
