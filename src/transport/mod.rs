//! # Transport Seam
//!
//! Abstraction over the host plugin-messaging transport.
//!
//! On a real server the transport is owned by the host runtime (a game
//! server's or proxy's plugin channel registry); this crate only consumes it.
//! [`Transport`] captures exactly that surface: registering and unregistering
//! the two directions of a named channel, and sending raw bytes to a peer.
//! Host bindings implement the trait; the channel layer stays platform
//! neutral.
//!
//! ## Components
//! - **Transport**: the host-side binding, object safe and shareable
//! - **InboundHandler**: callback seam for delivering received frames
//! - **Peer**: identity of the player/connection a frame travels through
//! - **MemoryTransport**: synchronous in-process loopback binding for tests
//!   and demos

pub mod memory;

pub use memory::MemoryTransport;

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::error::Result;

/// Identity of the peer a plugin message travels through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Peer {
    pub id: Uuid,
    pub name: String,
}

impl Peer {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Receiver seam for frames arriving on a registered incoming channel.
///
/// A returned error is a channel-handling failure: the transport reports it
/// and keeps the channel registered.
pub trait InboundHandler: Send + Sync {
    fn receive(&self, channel: &str, peer: &Peer, payload: Bytes) -> Result<()>;
}

/// Host plugin-messaging transport.
///
/// Duplicate registration of a channel name is the transport's concern; the
/// layers above do not deduplicate.
pub trait Transport: Send + Sync {
    /// Bind the outgoing direction of `channel`.
    fn register_outgoing(&self, channel: &str) -> Result<()>;

    /// Bind the incoming direction of `channel`, delivering frames to
    /// `handler`.
    fn register_incoming(&self, channel: &str, handler: Arc<dyn InboundHandler>) -> Result<()>;

    /// Release the outgoing direction of `channel`.
    fn unregister_outgoing(&self, channel: &str);

    /// Release the incoming direction of `channel`.
    fn unregister_incoming(&self, channel: &str);

    /// Send raw bytes on `channel` through `peer`.
    fn send(&self, peer: &Peer, channel: &str, payload: Bytes) -> Result<()>;
}
