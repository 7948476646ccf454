//! # Binary Codec
//!
//! Position-tracked byte-buffer wrapper and typed wire primitives.
//!
//! This module provides the serialization layer for plugin-messaging
//! payloads: a mutable buffer with independent read and write cursors over a
//! fixed-capacity backing store, plus symmetric encode/decode operations for
//! primitives, length-prefixed blocks, strings, enums, UUIDs, and
//! collections.
//!
//! ## Components
//! - **MessageBuf**: the buffer wrapper and its read/write operation pairs
//! - **WireEnum**: index-based enum codec trait
//!
//! ## Wire Format
//! Every multi-byte field is **little-endian**. Length-prefixed blocks come in
//! two fixed widths with different capacity ceilings:
//! ```text
//! block:       [u16 len][len bytes]     payload <= 65534 bytes
//! large block: [u32 len][len bytes]     payload bound by buffer capacity
//! ```
//! Strings are UTF-8 bytes in a u16 block. Enums are a u16 index. UUIDs are
//! two consecutive u64 values, most-significant half first. Collections are a
//! u32 element count followed by each element.
//!
//! ## Failure Semantics
//! Overflowing the backing buffer, reading past the written region, an
//! oversized block payload, and an unknown enum index are all hard errors;
//! there is no internal recovery or retry.

pub mod buffer;
pub mod wire;

pub use buffer::MessageBuf;
pub use wire::WireEnum;

/// Default backing-buffer capacity in bytes
pub const DEFAULT_CAPACITY: usize = 65535;

/// Maximum payload length of a u16-prefixed block
pub const MAX_BLOCK_LEN: usize = (u16::MAX as usize) - 1;
