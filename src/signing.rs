//! # Payload Signing
//!
//! HMAC-SHA256 authentication for plugin-messaging payloads.
//!
//! A [`Signer`] is derived from a caller-supplied symmetric secret and signs
//! the raw encoded bytes of a payload. On the wire, a signed message is a
//! two-block envelope:
//!
//! ```text
//! [u16 sigLen][sig bytes][u16 payloadLen][payload bytes]
//! ```
//!
//! ## Security
//! - Signature verification is constant-time (`Mac::verify_slice`), so a
//!   receiver leaks no timing information about how much of a forged
//!   signature matched.
//! - A signature mismatch is an expected condition, not an error: validation
//!   yields an explicit absent result and the caller drops the message.
//! - The recommended secret length is 64 bytes or more. No length is
//!   enforced here; configuration validation reports short secrets.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::codec::MessageBuf;
use crate::error::{MessagingError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 signature in bytes.
pub const SIGNATURE_LEN: usize = 32;

/// Keyed HMAC-SHA256 signer for message payloads.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    /// Derive a signer from a symmetric secret. Any length is accepted;
    /// 64 bytes or more is recommended.
    pub fn from_secret(secret: &[u8]) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| MessagingError::Custom(format!("Invalid HMAC key: {e}")))?;
        Ok(Self { mac })
    }

    /// Compute the signature of `data`.
    pub fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    /// Check `sig` against `data` in constant time.
    pub fn verify(&self, sig: &[u8], data: &[u8]) -> bool {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.verify_slice(sig).is_ok()
    }

    /// Sign `payload` and frame both signature and payload as the two-block
    /// wire envelope.
    pub fn combine_sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut buf = MessageBuf::with_capacity(payload.len() + SIGNATURE_LEN + 4);
        buf.write_block(&self.sign(payload))?;
        buf.write_block(payload)?;
        Ok(buf.into_vec())
    }

    /// Parse a two-block envelope and verify its signature.
    ///
    /// Returns the inner payload when the signature checks out, `Ok(None)`
    /// when it does not. A malformed envelope is a decode error.
    pub fn validate_combined(&self, envelope: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut buf = MessageBuf::from_slice(envelope);
        let sig = buf.read_block()?;
        let payload = buf.read_block()?;
        if !self.verify(&sig, &payload) {
            return Ok(None);
        }
        Ok(Some(payload))
    }
}

impl std::fmt::Debug for Signer {
    // Key material stays out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> Signer {
        Signer::from_secret(&[0x42u8; 64]).unwrap()
    }

    #[test]
    fn test_sign_verify() {
        let s = signer();
        let sig = s.sign(b"payload");
        assert_eq!(sig.len(), SIGNATURE_LEN);
        assert!(s.verify(&sig, b"payload"));
    }

    #[test]
    fn test_verify_rejects_tampered_data() {
        let s = signer();
        let sig = s.sign(b"payload");
        assert!(!s.verify(&sig, b"payloae"));
    }

    #[test]
    fn test_verify_rejects_truncated_sig() {
        let s = signer();
        let sig = s.sign(b"payload");
        assert!(!s.verify(&sig[..16], b"payload"));
    }

    #[test]
    fn test_envelope_roundtrip() {
        let s = signer();
        let envelope = s.combine_sign(b"inner payload").unwrap();
        let payload = s.validate_combined(&envelope).unwrap();
        assert_eq!(payload.as_deref(), Some(&b"inner payload"[..]));
    }

    #[test]
    fn test_envelope_key_mismatch() {
        let envelope = signer().combine_sign(b"inner payload").unwrap();
        let other = Signer::from_secret(&[0x43u8; 64]).unwrap();
        assert_eq!(other.validate_combined(&envelope).unwrap(), None);
    }

    #[test]
    fn test_envelope_tamper_detected() {
        let s = signer();
        let mut envelope = s.combine_sign(b"inner payload").unwrap();
        let last = envelope.len() - 1;
        envelope[last] ^= 0x01;
        assert_eq!(s.validate_combined(&envelope).unwrap(), None);
    }

    #[test]
    fn test_malformed_envelope_is_decode_error() {
        let s = signer();
        let err = s.validate_combined(&[0xFF, 0xFF, 0x00]).unwrap_err();
        assert!(matches!(err, MessagingError::BufferUnderflow { .. }));
    }
}
