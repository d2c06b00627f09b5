// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{secp256k1_ecdsa, traits::*};
use claims::{assert_err, assert_ok};
use rand::{rngs::StdRng, SeedableRng};

const PRIVATE_KEY_HEX: &str = "d107155adf816a0a94c6db3c9489c13ad8a1eda7ada2e558ba3bfa47c020347e";
const MESSAGE: &[u8] = b"hello world";
// Low-S reference signature for the key and message above; the node accepts
// only this normalization.
const SIGNATURE_HEX: &str = "d0d634e843b61339473b028105930ace022980708b2855954b977da09df84a770c0b68c29c8ca1b5409a5085b0ec263be80e433c83fcf6debb82f3447e71edca";

fn reference_key() -> secp256k1_ecdsa::PrivateKey {
    let bytes = hex::decode(PRIVATE_KEY_HEX).unwrap();
    secp256k1_ecdsa::PrivateKey::try_from(bytes.as_slice()).unwrap()
}

#[test]
fn deterministic_signing_matches_reference_vector() {
    let private_key = reference_key();
    let signature = private_key.sign_arbitrary_message(MESSAGE);
    assert_eq!(hex::encode(signature.to_bytes()), SIGNATURE_HEX);
    assert_ok!(signature.verify_arbitrary_msg(MESSAGE, &private_key.public_key()));
}

#[test]
fn public_key_is_65_byte_uncompressed() {
    let public_key = reference_key().public_key();
    let bytes = public_key.to_bytes();
    assert_eq!(bytes.len(), secp256k1_ecdsa::PUBLIC_KEY_LENGTH);
    assert_eq!(bytes[0], 0x04);
    assert_eq!(
        secp256k1_ecdsa::PublicKey::try_from(bytes.as_slice()).unwrap(),
        public_key
    );
}

#[test]
fn high_s_is_rejected() {
    let private_key = reference_key();
    let public_key = private_key.public_key();
    let signature = private_key.sign_arbitrary_message(MESSAGE);

    // Negate S modulo the group order to build the high-S twin.
    let mut inner = signature.0.clone();
    assert!(!inner.s.is_high());
    inner.s = -inner.s;
    assert!(inner.s.is_high());
    let high_s = secp256k1_ecdsa::Signature(inner);
    assert_err!(high_s.verify_arbitrary_msg(MESSAGE, &public_key));
}

#[test]
fn verification_rejects_any_bit_flip() {
    let private_key = reference_key();
    let public_key = private_key.public_key();
    let signature = private_key.sign_arbitrary_message(MESSAGE);

    let mut tampered_message = MESSAGE.to_vec();
    tampered_message[0] ^= 0x01;
    assert_err!(signature.verify_arbitrary_msg(&tampered_message, &public_key));

    let mut bytes = signature.to_bytes();
    bytes[10] ^= 0x01;
    if let Ok(bad) = secp256k1_ecdsa::Signature::try_from(bytes.as_slice()) {
        assert_err!(bad.verify_arbitrary_msg(MESSAGE, &public_key));
    }

    let mut rng = StdRng::from_seed([9u8; 32]);
    let other = secp256k1_ecdsa::PrivateKey::generate(&mut rng).public_key();
    assert_err!(signature.verify_arbitrary_msg(MESSAGE, &other));
}

#[test]
fn material_roundtrips_through_bcs() {
    let private_key = reference_key();
    let public_key = private_key.public_key();
    let signature = private_key.sign_arbitrary_message(MESSAGE);

    let pk_bytes = aptos_bcs::to_bytes(&public_key).unwrap();
    assert_eq!(pk_bytes.len(), 66); // ULEB length byte + 65 bytes of key
    assert_eq!(
        aptos_bcs::from_bytes::<secp256k1_ecdsa::PublicKey>(&pk_bytes).unwrap(),
        public_key
    );

    let sig_bytes = aptos_bcs::to_bytes(&signature).unwrap();
    assert_eq!(
        aptos_bcs::from_bytes::<secp256k1_ecdsa::Signature>(&sig_bytes).unwrap(),
        signature
    );
}

#[test]
fn dummy_signature_is_zeroed_and_never_verifies() {
    let dummy = secp256k1_ecdsa::Signature::dummy_signature();
    assert_eq!(dummy.to_bytes(), [0u8; secp256k1_ecdsa::SIGNATURE_LENGTH]);
    let key = reference_key();
    assert_err!(dummy.verify_arbitrary_msg(MESSAGE, &key.public_key()));
}
