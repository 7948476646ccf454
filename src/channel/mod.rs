//! # Signed Messaging Channels
//!
//! Per-channel registration over the host transport, with optional
//! HMAC-SHA256 payload authentication.
//!
//! [`Messaging`] is the per-plugin helper: it owns the transport handle and
//! the (optional) shared signing key, and hands out a [`ChannelContext`] per
//! registered channel. Setting a key on the helper takes effect immediately
//! for every context created from it: all future sends are enveloped and
//! all future receives are validated.
//!
//! ## Lifecycle
//! ```text
//! Unregistered --register--> Registered(open) --close--> Closed (terminal)
//! ```
//! A closed context fails every send with the crate's I/O-kind error and
//! silently drops anything still arriving. `close()` is idempotent.
//!
//! ## Usage
//! ```rust
//! use std::sync::Arc;
//! use plugin_messaging::channel::Messaging;
//! use plugin_messaging::codec::MessageBuf;
//! use plugin_messaging::transport::{MemoryTransport, Peer};
//!
//! # fn main() -> plugin_messaging::error::Result<()> {
//! let transport = Arc::new(MemoryTransport::new());
//! let messaging = Messaging::new(transport);
//! messaging.set_key(&[0x5A; 64])?;
//!
//! let ctx = messaging.register("myplugin:sync", |_: &str, _: &Peer, mut buf: MessageBuf| {
//!     let _who = buf.read_uuid()?;
//!     Ok(())
//! })?;
//!
//! let peer = Peer::new(uuid::Uuid::new_v4(), "Steve");
//! let mut buf = messaging.buffer();
//! buf.write_uuid(peer.id)?;
//! ctx.send(&peer, &buf)?;
//! ctx.close();
//! # Ok(())
//! # }
//! ```

pub mod context;

pub use context::ChannelContext;

use std::sync::{Arc, RwLock};

use crate::codec::{MessageBuf, DEFAULT_CAPACITY};
use crate::config::MessagingConfig;
use crate::error::{constants, MessagingError, Result};
use crate::signing::Signer;
use crate::transport::{Peer, Transport};

/// Callback for decoded messages arriving on a registered channel.
///
/// Implemented for any matching `Fn` closure. An error return is wrapped
/// with channel and peer context and reported as a handling failure; the
/// channel stays registered.
pub trait MessageListener: Send + Sync {
    fn on_message(&self, channel: &str, peer: &Peer, buf: MessageBuf) -> Result<()>;
}

impl<F> MessageListener for F
where
    F: Fn(&str, &Peer, MessageBuf) -> Result<()> + Send + Sync,
{
    fn on_message(&self, channel: &str, peer: &Peer, buf: MessageBuf) -> Result<()> {
        self(channel, peer, buf)
    }
}

pub(crate) type SharedSigner = Arc<RwLock<Option<Signer>>>;

/// Messaging helper with signing support.
pub struct Messaging {
    transport: Arc<dyn Transport>,
    signer: SharedSigner,
    buffer_capacity: usize,
}

impl Messaging {
    /// Create a helper over the given transport, without a signing key.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            signer: Arc::new(RwLock::new(None)),
            buffer_capacity: DEFAULT_CAPACITY,
        }
    }

    /// Create a helper configured from a [`MessagingConfig`]: buffer capacity
    /// is applied, and a signing key is installed when a secret is present.
    pub fn with_config(transport: Arc<dyn Transport>, config: &MessagingConfig) -> Result<Self> {
        let mut messaging = Self::new(transport);
        messaging.buffer_capacity = config.codec.buffer_capacity;
        if let Some(secret) = &config.signing.secret {
            messaging.set_key(secret.as_bytes())?;
        }
        Ok(messaging)
    }

    /// Register the incoming and outgoing directions of `channel`, delivering
    /// decoded messages to `listener`. Returns the context that owns the
    /// binding until closed.
    pub fn register(
        &self,
        channel: &str,
        listener: impl MessageListener + 'static,
    ) -> Result<Arc<ChannelContext>> {
        let context = Arc::new(ChannelContext::new(
            channel,
            self.transport.clone(),
            self.signer.clone(),
            Box::new(listener),
        ));
        self.transport.register_outgoing(channel)?;
        self.transport
            .register_incoming(channel, context.clone())?;
        Ok(context)
    }

    /// Set the signing key (HMAC-SHA256) shared by every context created from
    /// this helper. The recommended secret size is 64 bytes.
    pub fn set_key(&self, secret: &[u8]) -> Result<()> {
        let signer = Signer::from_secret(secret)?;
        let mut guard = self
            .signer
            .write()
            .map_err(|_| MessagingError::Custom(constants::ERR_KEY_WRITE_LOCK.into()))?;
        *guard = Some(signer);
        Ok(())
    }

    /// Whether a signing key has been set.
    pub fn signing_available(&self) -> bool {
        self.signer
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Compute the signature of `data`. Fails with `SigningUnavailable` when
    /// no key is set.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(self.current_signer()?.sign(data))
    }

    /// Check `sig` against `data` in constant time. Fails with
    /// `SigningUnavailable` when no key is set.
    pub fn verify(&self, sig: &[u8], data: &[u8]) -> Result<bool> {
        Ok(self.current_signer()?.verify(sig, data))
    }

    /// Sign `payload` and frame it as the two-block wire envelope.
    pub fn combine_sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        self.current_signer()?.combine_sign(payload)
    }

    /// Parse and verify a two-block envelope, returning the inner payload
    /// when valid and `None` when the signature does not match.
    pub fn validate_combined(&self, envelope: &[u8]) -> Result<Option<Vec<u8>>> {
        self.current_signer()?.validate_combined(envelope)
    }

    /// A fresh [`MessageBuf`] at the configured capacity.
    pub fn buffer(&self) -> MessageBuf {
        MessageBuf::with_capacity(self.buffer_capacity)
    }

    /// The underlying transport handle.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    fn current_signer(&self) -> Result<Signer> {
        let guard = self
            .signer
            .read()
            .map_err(|_| MessagingError::Custom(constants::ERR_KEY_READ_LOCK.into()))?;
        guard.clone().ok_or(MessagingError::SigningUnavailable)
    }
}
