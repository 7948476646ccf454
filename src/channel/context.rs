//! Channel context: the owner of one registered channel binding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::channel::{MessageListener, SharedSigner};
use crate::codec::MessageBuf;
use crate::error::{constants, MessagingError, Result};
use crate::signing::Signer;
use crate::transport::{InboundHandler, Peer, Transport};

/// Context for one registered channel.
///
/// Created by [`Messaging::register`](crate::channel::Messaging::register)
/// and sole owner of the binding until [`close`](ChannelContext::close) is
/// called. Signing follows the helper's shared key: the moment a key is set,
/// sends are enveloped and receives are validated.
pub struct ChannelContext {
    channel: String,
    transport: Arc<dyn Transport>,
    signer: SharedSigner,
    listener: Box<dyn MessageListener>,
    closed: AtomicBool,
}

impl ChannelContext {
    pub(crate) fn new(
        channel: &str,
        transport: Arc<dyn Transport>,
        signer: SharedSigner,
        listener: Box<dyn MessageListener>,
    ) -> Self {
        Self {
            channel: channel.to_string(),
            transport,
            signer,
            listener,
            closed: AtomicBool::new(false),
        }
    }

    /// The channel name this context is bound to.
    pub fn name(&self) -> &str {
        &self.channel
    }

    /// Whether the context has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Send the written region of `buf` on this channel through `peer`.
    ///
    /// When signing is available the payload travels inside the signed
    /// envelope, otherwise as raw bytes. Fails with `ChannelClosed` once the
    /// context is closed.
    pub fn send(&self, peer: &Peer, buf: &MessageBuf) -> Result<()> {
        if self.is_closed() {
            return Err(MessagingError::ChannelClosed(self.channel.clone()));
        }

        let data = match self.current_signer()? {
            Some(signer) => signer.combine_sign(buf.as_slice())?,
            None => buf.to_vec(),
        };
        self.transport.send(peer, &self.channel, Bytes::from(data))
    }

    /// Unregister both channel directions and mark the context closed.
    /// Idempotent; calls after the first are no-ops.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.transport.unregister_incoming(&self.channel);
        self.transport.unregister_outgoing(&self.channel);
    }

    fn current_signer(&self) -> Result<Option<Signer>> {
        let guard = self
            .signer
            .read()
            .map_err(|_| MessagingError::Custom(constants::ERR_KEY_READ_LOCK.into()))?;
        Ok(guard.clone())
    }

    fn handle(&self, channel: &str, peer: &Peer, payload: &[u8]) -> Result<()> {
        let buf = match self.current_signer()? {
            Some(signer) => match signer.validate_combined(payload)? {
                Some(inner) => MessageBuf::from_vec(inner),
                None => {
                    debug!(channel, peer = %peer, "Dropping message with invalid signature");
                    return Ok(());
                }
            },
            None => MessageBuf::from_slice(payload),
        };
        self.listener.on_message(channel, peer, buf)
    }
}

impl InboundHandler for ChannelContext {
    fn receive(&self, channel: &str, peer: &Peer, payload: Bytes) -> Result<()> {
        if channel != self.channel {
            return Ok(());
        }
        if self.is_closed() {
            debug!(channel, "Message on closed channel dropped");
            return Ok(());
        }

        self.handle(channel, peer, &payload)
            .map_err(|e| MessagingError::Handler {
                channel: channel.to_string(),
                peer: peer.to_string(),
                source: Box::new(e),
            })
    }
}

impl std::fmt::Debug for ChannelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelContext")
            .field("channel", &self.channel)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
