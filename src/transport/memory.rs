//! In-process loopback transport.
//!
//! `MemoryTransport` routes every sent frame synchronously back into the
//! incoming handler registered for the same channel name, and keeps a capture
//! log of sent frames. It stands in for a host binding in tests and demos:
//! the full send path (signing, enveloping, dispatch, validation) runs
//! exactly as it would against a real host transport.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use bytes::Bytes;
use tracing::{debug, error};

use crate::error::{constants, MessagingError, Result};
use crate::transport::{InboundHandler, Peer, Transport};

/// A frame captured by [`MemoryTransport::send`].
#[derive(Debug, Clone)]
pub struct SentFrame {
    pub peer: Peer,
    pub channel: String,
    pub payload: Bytes,
}

/// Synchronous in-process transport with loopback delivery.
#[derive(Default)]
pub struct MemoryTransport {
    outgoing: RwLock<HashSet<String>>,
    incoming: RwLock<HashMap<String, Arc<dyn InboundHandler>>>,
    sent: Mutex<Vec<SentFrame>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an incoming handler is currently bound for `channel`.
    pub fn has_incoming(&self, channel: &str) -> bool {
        self.incoming
            .read()
            .map(|reg| reg.contains_key(channel))
            .unwrap_or(false)
    }

    /// Whether the outgoing direction of `channel` is currently bound.
    pub fn has_outgoing(&self, channel: &str) -> bool {
        self.outgoing
            .read()
            .map(|reg| reg.contains(channel))
            .unwrap_or(false)
    }

    /// Drain and return the captured frame log.
    pub fn drain_sent(&self) -> Vec<SentFrame> {
        self.sent.lock().map(|mut log| log.split_off(0)).unwrap_or_default()
    }

    /// Inject a frame as if it arrived from the host, bypassing the outgoing
    /// path. Handler failures are reported the same way as on delivery.
    pub fn deliver(&self, peer: &Peer, channel: &str, payload: Bytes) -> Result<()> {
        let handler = {
            let reg = self
                .incoming
                .read()
                .map_err(|_| MessagingError::Custom(constants::ERR_TRANSPORT_READ_LOCK.into()))?;
            reg.get(channel).cloned()
        };

        match handler {
            Some(handler) => {
                if let Err(e) = handler.receive(channel, peer, payload) {
                    error!(channel, peer = %peer, error = %e, "Channel handler failed");
                }
                Ok(())
            }
            None => {
                debug!(channel, "No incoming handler, frame dropped");
                Ok(())
            }
        }
    }
}

impl Transport for MemoryTransport {
    fn register_outgoing(&self, channel: &str) -> Result<()> {
        let mut reg = self
            .outgoing
            .write()
            .map_err(|_| MessagingError::Custom(constants::ERR_TRANSPORT_WRITE_LOCK.into()))?;
        reg.insert(channel.to_string());
        Ok(())
    }

    fn register_incoming(&self, channel: &str, handler: Arc<dyn InboundHandler>) -> Result<()> {
        let mut reg = self
            .incoming
            .write()
            .map_err(|_| MessagingError::Custom(constants::ERR_TRANSPORT_WRITE_LOCK.into()))?;
        // Last registration wins, as on a host channel registry.
        reg.insert(channel.to_string(), handler);
        Ok(())
    }

    fn unregister_outgoing(&self, channel: &str) {
        if let Ok(mut reg) = self.outgoing.write() {
            reg.remove(channel);
        }
    }

    fn unregister_incoming(&self, channel: &str) {
        if let Ok(mut reg) = self.incoming.write() {
            reg.remove(channel);
        }
    }

    fn send(&self, peer: &Peer, channel: &str, payload: Bytes) -> Result<()> {
        {
            let reg = self
                .outgoing
                .read()
                .map_err(|_| MessagingError::Custom(constants::ERR_TRANSPORT_READ_LOCK.into()))?;
            if !reg.contains(channel) {
                return Err(MessagingError::TransportError(
                    constants::ERR_CHANNEL_UNREGISTERED.into(),
                ));
            }
        }

        if let Ok(mut log) = self.sent.lock() {
            log.push(SentFrame {
                peer: peer.clone(),
                channel: channel.to_string(),
                payload: payload.clone(),
            });
        }

        self.deliver(peer, channel, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct Counter(AtomicUsize);

    impl InboundHandler for Counter {
        fn receive(&self, _channel: &str, _peer: &Peer, _payload: Bytes) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn peer() -> Peer {
        Peer::new(Uuid::new_v4(), "Steve")
    }

    #[test]
    fn test_loopback_delivery() {
        let transport = MemoryTransport::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));

        transport.register_outgoing("test:main").unwrap();
        transport
            .register_incoming("test:main", counter.clone())
            .unwrap();

        transport
            .send(&peer(), "test:main", Bytes::from_static(b"hi"))
            .unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        let frames = transport.drain_sent();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].channel, "test:main");
        assert_eq!(&frames[0].payload[..], b"hi");
    }

    #[test]
    fn test_send_requires_outgoing_registration() {
        let transport = MemoryTransport::new();
        let err = transport
            .send(&peer(), "test:main", Bytes::from_static(b"hi"))
            .unwrap_err();
        assert!(matches!(err, MessagingError::TransportError(_)));
    }

    #[test]
    fn test_unregister_stops_delivery() {
        let transport = MemoryTransport::new();
        let counter = Arc::new(Counter(AtomicUsize::new(0)));

        transport.register_outgoing("test:main").unwrap();
        transport
            .register_incoming("test:main", counter.clone())
            .unwrap();
        transport.unregister_incoming("test:main");

        transport
            .send(&peer(), "test:main", Bytes::from_static(b"hi"))
            .unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }
}
