//! # plugin-messaging
//!
//! Platform-neutral plugin messaging core: signed channels and a binary wire
//! codec for Minecraft server and proxy plugins.
//!
//! Host runtimes own the actual plugin-messaging transport; this crate
//! provides everything above it behind one [`transport::Transport`] seam
//! that host bindings implement: a position-tracked binary codec for
//! structured payloads, per-channel registration contexts, and optional
//! HMAC-SHA256 payload authentication.
//!
//! ## Components
//! - **[`codec`]**: `MessageBuf` byte-buffer wrapper with typed read/write
//!   pairs (primitives, blocks, strings, enums, UUIDs, collections)
//! - **[`signing`]**: HMAC-SHA256 signer and the two-block signed envelope
//! - **[`channel`]**: `Messaging` helper and `ChannelContext` lifecycle
//! - **[`transport`]**: the host transport seam plus an in-process loopback
//!   binding for tests and demos
//! - **[`config`]**: TOML/env configuration
//!
//! ## Wire Format
//! All multi-byte fields are little-endian. With signing enabled, a message
//! travels as:
//! ```text
//! [u16 sigLen][sig bytes][u16 payloadLen][payload bytes]
//! ```
//!
//! ## Threading
//! The codec and channel objects are synchronous and meant to run on
//! whatever thread the host delivers events on. A `MessageBuf` belongs to
//! one logical owner at a time; move it across boundaries instead of
//! sharing it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use plugin_messaging::channel::Messaging;
//! use plugin_messaging::codec::MessageBuf;
//! use plugin_messaging::transport::{MemoryTransport, Peer};
//!
//! # fn main() -> plugin_messaging::error::Result<()> {
//! let messaging = Messaging::new(Arc::new(MemoryTransport::new()));
//! let ctx = messaging.register("myplugin:main", |_: &str, _: &Peer, mut buf: MessageBuf| {
//!     println!("got: {}", buf.read_str()?);
//!     Ok(())
//! })?;
//!
//! let mut buf = messaging.buffer();
//! buf.write_str("hello")?;
//! ctx.send(&Peer::new(uuid::Uuid::new_v4(), "Steve"), &buf)?;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod codec;
pub mod config;
pub mod error;
pub mod signing;
pub mod transport;

pub use channel::{ChannelContext, MessageListener, Messaging};
pub use codec::{MessageBuf, WireEnum};
pub use config::MessagingConfig;
pub use error::{MessagingError, Result};
pub use signing::Signer;
pub use transport::{InboundHandler, MemoryTransport, Peer, Transport};
