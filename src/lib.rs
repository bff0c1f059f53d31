#![forbid(unsafe_code)]
//#![warn(missing_docs)]

//! Host-side authoring toolchain for PRISM, a fixed-count LED strand
//! playback format.
//!
//! The crate turns a palette + show description into a byte-exact `.prism`
//! artifact (see [`header`] and [`package`]) and back, and provides the
//! deterministic building blocks (palette ramps, noise, show generators,
//! palette quantization, the frame codec) that the assembler is built from.

pub mod codec;
pub mod color;
pub mod error;
pub mod header;
pub mod io_doc;
pub mod noise;
pub mod package;
pub mod quantize;
pub mod show;
pub mod testbed;

mod crc32;

pub use error::PrismError;

/// Crate-wide result alias, for functions that fail with [`PrismError`].
pub type PrismResult<T> = Result<T, PrismError>;
