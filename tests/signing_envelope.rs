#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Signing and envelope tests at the wire level

use plugin_messaging::codec::MessageBuf;
use plugin_messaging::error::MessagingError;
use plugin_messaging::signing::{Signer, SIGNATURE_LEN};

const SECRET_A: &[u8] = &[0x11; 64];
const SECRET_B: &[u8] = &[0x22; 64];

#[test]
fn test_sign_validate_roundtrip() {
    let signer = Signer::from_secret(SECRET_A).unwrap();
    let data = b"cross-server payload";

    let sig = signer.sign(data);
    assert!(signer.verify(&sig, data));
}

#[test]
fn test_validate_rejects_any_tampering() {
    let signer = Signer::from_secret(SECRET_A).unwrap();
    let data = b"cross-server payload".to_vec();
    let sig = signer.sign(&data);

    for i in 0..data.len() {
        let mut tampered = data.clone();
        tampered[i] ^= 0x01;
        assert!(!signer.verify(&sig, &tampered), "byte {i}");
    }
}

#[test]
fn test_envelope_wire_layout() {
    let signer = Signer::from_secret(SECRET_A).unwrap();
    let envelope = signer.combine_sign(b"abc").unwrap();

    // [u16 sigLen][sig][u16 payloadLen][payload], little-endian lengths
    let mut buf = MessageBuf::from_vec(envelope);
    let sig = buf.read_block().unwrap();
    let payload = buf.read_block().unwrap();

    assert_eq!(sig.len(), SIGNATURE_LEN);
    assert_eq!(payload, b"abc");
    assert_eq!(buf.remaining(), 0);
    assert_eq!(sig, signer.sign(b"abc"));
}

#[test]
fn test_envelope_roundtrip_same_key() {
    let signer = Signer::from_secret(SECRET_A).unwrap();
    let envelope = signer.combine_sign(b"payload").unwrap();
    assert_eq!(
        signer.validate_combined(&envelope).unwrap().as_deref(),
        Some(&b"payload"[..])
    );
}

#[test]
fn test_envelope_invalid_across_keys() {
    let envelope = Signer::from_secret(SECRET_A)
        .unwrap()
        .combine_sign(b"payload")
        .unwrap();

    let other = Signer::from_secret(SECRET_B).unwrap();
    assert_eq!(other.validate_combined(&envelope).unwrap(), None);
}

#[test]
fn test_oversized_payload_cannot_be_enveloped() {
    let signer = Signer::from_secret(SECRET_A).unwrap();
    let payload = vec![0u8; u16::MAX as usize];
    assert!(matches!(
        signer.combine_sign(&payload),
        Err(MessagingError::OversizedBlock(_))
    ));
}

#[test]
fn test_short_secret_accepted() {
    // No length validation at this layer; config validation reports it.
    let signer = Signer::from_secret(b"tiny").unwrap();
    let envelope = signer.combine_sign(b"x").unwrap();
    assert!(signer.validate_combined(&envelope).unwrap().is_some());
}

#[test]
fn test_empty_payload_envelope() {
    let signer = Signer::from_secret(SECRET_A).unwrap();
    let envelope = signer.combine_sign(b"").unwrap();
    assert_eq!(
        signer.validate_combined(&envelope).unwrap().as_deref(),
        Some(&b""[..])
    );
}
