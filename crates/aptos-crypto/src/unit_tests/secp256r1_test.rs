// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{secp256r1_ecdsa, traits::*};
use claims::{assert_err, assert_ok};
use rand::{rngs::StdRng, SeedableRng};

const MESSAGE: &[u8] = b"nist p256 probe";

fn keypair() -> (secp256r1_ecdsa::PrivateKey, secp256r1_ecdsa::PublicKey) {
    let mut rng = StdRng::from_seed([13u8; 32]);
    let private_key = secp256r1_ecdsa::PrivateKey::generate(&mut rng);
    let public_key = private_key.public_key();
    (private_key, public_key)
}

#[test]
fn sign_verify_roundtrip() {
    let (private_key, public_key) = keypair();
    let signature = private_key.sign_arbitrary_message(MESSAGE);
    assert_ok!(signature.verify_arbitrary_msg(MESSAGE, &public_key));
    assert_err!(signature.verify_arbitrary_msg(b"different message", &public_key));
}

#[test]
fn public_key_is_65_byte_uncompressed() {
    let (_, public_key) = keypair();
    let bytes = public_key.to_bytes();
    assert_eq!(bytes.len(), secp256r1_ecdsa::PUBLIC_KEY_LENGTH);
    assert_eq!(bytes[0], 0x04);
    assert_eq!(
        secp256r1_ecdsa::PublicKey::try_from(bytes.as_slice()).unwrap(),
        public_key
    );
}

#[test]
fn signature_material_roundtrips() {
    let (private_key, public_key) = keypair();
    let signature = private_key.sign_arbitrary_message(MESSAGE);
    let bytes = signature.to_bytes();
    assert_eq!(bytes.len(), secp256r1_ecdsa::SIGNATURE_LENGTH);
    let decoded = secp256r1_ecdsa::Signature::try_from(bytes.as_slice()).unwrap();
    assert_ok!(decoded.verify_arbitrary_msg(MESSAGE, &public_key));
}

#[test]
fn wrong_lengths_are_rejected() {
    assert!(secp256r1_ecdsa::PublicKey::try_from([0u8; 33].as_slice()).is_err());
    assert!(secp256r1_ecdsa::Signature::try_from([0u8; 63].as_slice()).is_err());
    assert!(secp256r1_ecdsa::PrivateKey::try_from([0u8; 31].as_slice()).is_err());
}
