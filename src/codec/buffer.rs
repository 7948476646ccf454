//! # Message Buffer
//!
//! Mutable byte buffer with independent read and write cursors.
//!
//! `MessageBuf` owns a fixed-size backing store and tracks a read cursor and
//! a write cursor separately, so decoding can proceed over data that was just
//! encoded without copying. Each instance is meant to be confined to a single
//! logical owner, typically one in-flight message; move it across boundaries
//! instead of sharing it.
//!
//! ## Usage
//! ```rust
//! use plugin_messaging::codec::MessageBuf;
//!
//! # fn main() -> plugin_messaging::error::Result<()> {
//! let mut buf = MessageBuf::new();
//! buf.write_str("hello")?;
//! buf.write_u32(42)?;
//!
//! assert_eq!(buf.read_str()?, "hello");
//! assert_eq!(buf.read_u32()?, 42);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::hash::Hash;

use uuid::Uuid;

use crate::codec::wire::WireEnum;
use crate::codec::{DEFAULT_CAPACITY, MAX_BLOCK_LEN};
use crate::error::{MessagingError, Result};

/// Fixed-capacity byte buffer with independent read/write cursors.
///
/// All multi-byte fields are little-endian. Writes past the backing capacity
/// and reads past the written region fail hard; see the module docs for the
/// full failure semantics.
pub struct MessageBuf {
    buf: Box<[u8]>,
    read_pos: usize,
    write_pos: usize,
}

impl MessageBuf {
    /// Create an empty buffer with the default capacity (65535 bytes).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer with the given backing capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Wrap received bytes for reading. The write cursor starts at the end of
    /// the data, so the whole input is readable and the buffer is full.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let write_pos = data.len();
        Self {
            buf: data.into_boxed_slice(),
            read_pos: 0,
            write_pos,
        }
    }

    /// Wrap a copy of received bytes for reading.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Backing capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Current read cursor offset.
    pub fn reader_pos(&self) -> usize {
        self.read_pos
    }

    /// Current write cursor offset.
    pub fn writer_pos(&self) -> usize {
        self.write_pos
    }

    /// Unread byte count (written region past the read cursor).
    pub fn remaining(&self) -> usize {
        self.write_pos - self.read_pos
    }

    /// Reset the read cursor to the start of the buffer.
    pub fn reset_reader(&mut self) {
        self.read_pos = 0;
    }

    /// Reset the write cursor to the start of the buffer.
    pub fn reset_writer(&mut self) {
        self.write_pos = 0;
    }

    /// The written region as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.write_pos]
    }

    /// Copy the written region into a new `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Consume the buffer, returning the written region.
    pub fn into_vec(self) -> Vec<u8> {
        let mut v = Vec::from(self.buf);
        v.truncate(self.write_pos);
        v
    }

    fn check_write(&self, needed: usize) -> Result<()> {
        let remaining = self.buf.len() - self.write_pos;
        if needed > remaining {
            return Err(MessagingError::BufferOverflow { needed, remaining });
        }
        Ok(())
    }

    fn check_read(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(MessagingError::BufferUnderflow { needed, remaining });
        }
        Ok(())
    }

    // Bytes

    /// Write raw bytes, advancing the write cursor.
    pub fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        self.check_write(src.len())?;
        self.buf[self.write_pos..self.write_pos + src.len()].copy_from_slice(src);
        self.write_pos += src.len();
        Ok(())
    }

    /// Fill `dst` from the buffer, advancing the read cursor.
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        self.check_read(dst.len())?;
        dst.copy_from_slice(&self.buf[self.read_pos..self.read_pos + dst.len()]);
        self.read_pos += dst.len();
        Ok(())
    }

    /// Read `len` raw bytes into a new `Vec`.
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        // Bounds check before allocating: the length may come off the wire.
        self.check_read(len)?;
        let out = self.buf[self.read_pos..self.read_pos + len].to_vec();
        self.read_pos += len;
        Ok(out)
    }

    // Blocks

    /// Write a u16-length-prefixed block. Payloads of 65535 bytes or more do
    /// not fit the length field and fail with `OversizedBlock`.
    pub fn write_block(&mut self, data: &[u8]) -> Result<()> {
        if data.len() > MAX_BLOCK_LEN {
            return Err(MessagingError::OversizedBlock(data.len()));
        }
        self.write_u16(data.len() as u16)?;
        self.write_bytes(data)
    }

    /// Read a u16-length-prefixed block.
    pub fn read_block(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u16()? as usize;
        self.read_vec(len)
    }

    /// Write a u32-length-prefixed block for payloads beyond the u16 ceiling.
    pub fn write_large_block(&mut self, data: &[u8]) -> Result<()> {
        let len =
            u32::try_from(data.len()).map_err(|_| MessagingError::OversizedBlock(data.len()))?;
        self.write_u32(len)?;
        self.write_bytes(data)
    }

    /// Read a u32-length-prefixed block.
    pub fn read_large_block(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32()? as usize;
        self.read_vec(len)
    }

    // Fixed-width integers

    /// Write a little-endian u16.
    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.write_bytes(&v.to_le_bytes())
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut b = [0u8; 2];
        self.read_bytes(&mut b)?;
        Ok(u16::from_le_bytes(b))
    }

    /// Write a little-endian i16.
    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        self.write_u16(v as u16)
    }

    /// Read a little-endian i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.write_bytes(&v.to_le_bytes())
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut b = [0u8; 4];
        self.read_bytes(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    /// Write a little-endian i32.
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.write_u32(v as u32)
    }

    /// Read a little-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Write a little-endian u64.
    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.write_bytes(&v.to_le_bytes())
    }

    /// Read a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        let mut b = [0u8; 8];
        self.read_bytes(&mut b)?;
        Ok(u64::from_le_bytes(b))
    }

    /// Write a little-endian i64.
    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.write_u64(v as u64)
    }

    /// Read a little-endian i64.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    // Strings

    /// Write a string as UTF-8 bytes in a u16 block.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_block(s.as_bytes())
    }

    /// Read a u16-block UTF-8 string.
    pub fn read_str(&mut self) -> Result<String> {
        let bytes = self.read_block()?;
        Ok(String::from_utf8(bytes)?)
    }

    // Enums

    /// Write an enum value as its u16 wire index.
    pub fn write_enum<E: WireEnum>(&mut self, value: E) -> Result<()> {
        self.write_u16(value.index())
    }

    /// Read an enum value by wire index. An index with no matching value
    /// fails with `InvalidEnumIndex`.
    pub fn read_enum<E: WireEnum>(&mut self) -> Result<E> {
        let index = self.read_u16()?;
        E::from_index(index).ok_or(MessagingError::InvalidEnumIndex(index))
    }

    /// Read an enum value by wire index, yielding `None` instead of an error
    /// when the index has no matching value.
    pub fn try_read_enum<E: WireEnum>(&mut self) -> Result<Option<E>> {
        Ok(E::from_index(self.read_u16()?))
    }

    // UUIDs

    /// Write a UUID as two u64 values, most-significant half first.
    pub fn write_uuid(&mut self, id: Uuid) -> Result<()> {
        let (msb, lsb) = id.as_u64_pair();
        self.write_u64(msb)?;
        self.write_u64(lsb)
    }

    /// Read a UUID written as two u64 values.
    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let msb = self.read_u64()?;
        let lsb = self.read_u64()?;
        Ok(Uuid::from_u64_pair(msb, lsb))
    }

    // Collections

    /// Write a u32 element count followed by each element through `write`.
    pub fn write_seq<T>(
        &mut self,
        items: &[T],
        write: impl Fn(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        let count =
            u32::try_from(items.len()).map_err(|_| MessagingError::OversizedBlock(items.len()))?;
        self.write_u32(count)?;
        for item in items {
            write(self, item)?;
        }
        Ok(())
    }

    /// Read a u32-counted sequence through `read`, preserving element order.
    pub fn read_seq<T>(&mut self, read: impl Fn(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let count = self.read_u32()? as usize;
        let mut out = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            out.push(read(self)?);
        }
        Ok(out)
    }

    /// Read a u32-counted sequence into a set. Duplicate elements collapse
    /// and insertion order is not preserved.
    pub fn read_set<T: Eq + Hash>(
        &mut self,
        read: impl Fn(&mut Self) -> Result<T>,
    ) -> Result<HashSet<T>> {
        let count = self.read_u32()? as usize;
        let mut out = HashSet::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            out.insert(read(self)?);
        }
        Ok(out)
    }

    /// Write a sequence of strings.
    pub fn write_str_seq<S: AsRef<str>>(&mut self, items: &[S]) -> Result<()> {
        self.write_seq(items, |buf, s| buf.write_str(s.as_ref()))
    }

    /// Read a sequence of strings, preserving order.
    pub fn read_str_seq(&mut self) -> Result<Vec<String>> {
        self.read_seq(|buf| buf.read_str())
    }

    /// Read a sequence of strings into a set.
    pub fn read_str_set(&mut self) -> Result<HashSet<String>> {
        self.read_set(|buf| buf.read_str())
    }
}

impl Default for MessageBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBuf")
            .field("capacity", &self.buf.len())
            .field("read_pos", &self.read_pos)
            .field("write_pos", &self.write_pos)
            .finish()
    }
}
