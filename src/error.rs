//! # Error Types
//!
//! Error handling for the messaging core.
//!
//! This module defines all error variants that can occur while encoding or
//! decoding message buffers, signing payloads, and operating channels.
//!
//! ## Error Categories
//! - **Codec Errors**: buffer overflow/underflow, oversized blocks, invalid
//!   enum indices, malformed UTF-8
//! - **Signing Errors**: signing requested while no key is configured
//! - **Channel Errors**: operating a closed channel, listener dispatch
//!   failures tagged with channel and peer
//! - **Transport Errors**: failures reported by the host transport binding
//!
//! Signature mismatches on receive are deliberately *not* part of this
//! taxonomy: an invalid signature means "no valid message received" and is
//! surfaced as an explicit absent result, never as an error or as data.
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Lock-related error messages
    pub const ERR_TRANSPORT_WRITE_LOCK: &str = "Failed to acquire write lock on transport registry";
    pub const ERR_TRANSPORT_READ_LOCK: &str = "Failed to acquire read lock on transport registry";
    pub const ERR_KEY_WRITE_LOCK: &str = "Failed to acquire write lock on signing key";
    pub const ERR_KEY_READ_LOCK: &str = "Failed to acquire read lock on signing key";

    /// Channel errors
    pub const ERR_CHANNEL_CLOSED: &str = "Using a closed channel";
    pub const ERR_CHANNEL_UNREGISTERED: &str = "Channel not registered on transport";

    /// Signing errors
    pub const ERR_SIGNING_UNAVAILABLE: &str = "Signing not available";
}

/// Primary error type for all messaging operations
#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Buffer overflow: needed {needed} bytes, {remaining} remaining")]
    BufferOverflow { needed: usize, remaining: usize },

    #[error("Buffer underflow: needed {needed} bytes, {remaining} remaining")]
    BufferUnderflow { needed: usize, remaining: usize },

    #[error("Block payload too large: {0} bytes")]
    OversizedBlock(usize),

    #[error("Invalid enum index: {0}")]
    InvalidEnumIndex(u16),

    #[error("Invalid UTF-8 in string field: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Signing not available")]
    SigningUnavailable,

    #[error("Channel `{0}` is closed")]
    ChannelClosed(String),

    #[error("({channel}) Error handling plugin message from {peer}")]
    Handler {
        channel: String,
        peer: String,
        #[source]
        source: Box<MessagingError>,
    },

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl From<MessagingError> for io::Error {
    /// Map onto `io::Error` for callers that operate at the I/O layer.
    /// `ChannelClosed` is the crate's I/O-kind failure and maps to
    /// `BrokenPipe`.
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::Io(e) => e,
            MessagingError::ChannelClosed(_) => io::Error::new(io::ErrorKind::BrokenPipe, err),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

/// Type alias for Results using MessagingError
pub type Result<T> = std::result::Result<T, MessagingError>;
