//! Wire-exact header structs: plain old data, little-endian, no padding.
//! Same shape the teacher uses for its own file-format headers — `repr(C)`
//! plus `bytemuck`'s `Zeroable`/`Pod` derives over `pack1`'s explicit-endian
//! integers, so a `&HeaderBase` can be read directly out of a byte buffer
//! with `bytemuck::from_bytes` and written back out the same way.
//!
//! Field order and widths mirror the firmware-side layout byte for byte:
//! `magic[4], version u16, led_count u16, frame_count u32, fps u32,
//! color_format u8, compression u8, reserved1 u16, crc32 u32, padding[40]`.

use pack1::{U16LE, U32LE};

/// `b"PRSM"`.
pub(super) const MAGIC: [u8; 4] = *b"PRSM";
/// Header version with no extension block.
pub(super) const VERSION_BASE: u16 = 0x0100;
/// Header version with a trailing JSON extension block.
pub(super) const VERSION_EXT: u16 = 0x0101;

pub(super) const BASE_SIZE: usize = 64;
pub(super) const META_SIZE: usize = 16;
/// Bytes of [`HeaderBase`] covered by the header CRC: every field up to but
/// not including `crc32` itself (`magic..reserved1`, 20 bytes).
pub(super) const CRC_PREFIX_SIZE: usize = 20;
/// Bytes of [`MetaV11`] covered by the header CRC: `version`,
/// `motion_direction`, `sync_mode`, `reserved`, and the first `params` entry.
pub(super) const META_CRC_PREFIX: usize = 6;

/// The fixed 64-byte prefix of every `.prism` artifact.
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
pub(super) struct HeaderBase {
  pub magic: [u8; 4],
  pub version: U16LE,
  pub led_count: U16LE,
  pub frame_count: U32LE,
  /// Fixed-point fps, scaled by 256 (`round(fps * 256)`).
  pub fps: U32LE,
  pub color_format: u8,
  pub compression: u8,
  pub reserved1: U16LE,
  pub crc32: U32LE,
  pub padding: [u8; 40],
}

const _: () = assert!(core::mem::size_of::<HeaderBase>() == BASE_SIZE);

/// Pattern metadata immediately following [`HeaderBase`].
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
pub(super) struct MetaV11 {
  pub version: u8,
  pub motion_direction: u8,
  pub sync_mode: u8,
  pub reserved: u8,
  pub params: [U16LE; 6],
}

const _: () = assert!(core::mem::size_of::<MetaV11>() == META_SIZE);
