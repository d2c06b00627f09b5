// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    ed25519::{Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature},
    test_utils::TestAptosCrypto,
    traits::*,
};
use claims::{assert_err, assert_ok};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

// Reference vector produced against the node: key, message, and the
// deterministic RFC 8032 signature expected for them.
const PRIVATE_KEY_HEX: &str = "c5338cd251c22daa8c9c9cc94f498cc8a5c7e1d2e75287a5dda91096fe64efa5";
const MESSAGE_HEX: &str = "68656c6c6f20776f726c64"; // "hello world"
const SIGNATURE_HEX: &str = "9e653d56a09247570bb174a389e85b9226abd5c403ea6c504b386626a145158cd4efd66fc5e071c0e19538a96a05ddbda24d3c51e1e6a9dacc6bb1ce775cce07";

fn reference_key() -> Ed25519PrivateKey {
    let bytes = hex::decode(PRIVATE_KEY_HEX).unwrap();
    Ed25519PrivateKey::try_from(bytes.as_slice()).unwrap()
}

#[test]
fn deterministic_signing_matches_reference_vector() {
    let private_key = reference_key();
    let message = hex::decode(MESSAGE_HEX).unwrap();
    let signature = private_key.sign_arbitrary_message(&message);
    assert_eq!(hex::encode(Signature::to_bytes(&signature)), SIGNATURE_HEX);
    assert_ok!(signature.verify_arbitrary_msg(&message, &private_key.public_key()));
}

#[test]
fn verification_rejects_any_bit_flip() {
    let private_key = reference_key();
    let public_key = private_key.public_key();
    let message = b"bit flip probe".to_vec();
    let signature = private_key.sign_arbitrary_message(&message);
    assert_ok!(signature.verify_arbitrary_msg(&message, &public_key));

    // Flipped message.
    let mut tampered = message.clone();
    tampered[3] ^= 0x01;
    assert_err!(signature.verify_arbitrary_msg(&tampered, &public_key));

    // Flipped signature bytes, one probe in each half.
    let sig_bytes = Signature::to_bytes(&signature);
    for position in [0usize, 40] {
        let mut bytes = sig_bytes.clone();
        bytes[position] ^= 0x80;
        if let Ok(bad) = Ed25519Signature::try_from(bytes.as_slice()) {
            assert_err!(bad.verify_arbitrary_msg(&message, &public_key));
        }
    }

    // A different public key.
    let mut rng = StdRng::from_seed([7u8; 32]);
    let other = Ed25519PrivateKey::generate(&mut rng).public_key();
    assert_err!(signature.verify_arbitrary_msg(&message, &other));
}

#[test]
fn struct_signing_uses_the_salted_transcript() {
    let private_key = reference_key();
    let message = TestAptosCrypto("struct signing".to_string());
    let signature = private_key.sign(&message).unwrap();
    assert_ok!(signature.verify(&message, &private_key.public_key()));

    // The transcript is seed || bcs(message); signing the raw BCS without
    // the seed must not verify as the struct.
    let raw = aptos_bcs::to_bytes(&message).unwrap();
    let unsalted = private_key.sign_arbitrary_message(&raw);
    assert_err!(unsalted.verify(&message, &private_key.public_key()));
}

#[test]
fn signing_message_is_prefixed_with_the_type_seed() {
    let message = TestAptosCrypto("prefix".to_string());
    let bytes = signing_message(&message).unwrap();
    let seed = crate::hash::HashValue::sha3_256_of(b"APTOS::TestAptosCrypto");
    assert_eq!(&bytes[..32], seed.as_ref());
    assert_eq!(&bytes[32..], aptos_bcs::to_bytes(&message).unwrap().as_slice());
}

#[test]
fn non_canonical_s_is_rejected() {
    // L (the group order) serialized little-endian: S == L is non-canonical.
    let mut bytes = [0u8; 64];
    bytes[32..].copy_from_slice(&[
        0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
        0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x10,
    ]);
    assert!(Ed25519Signature::try_from(bytes.as_slice()).is_err());
    // One below L is canonical again (as an encoding, not as a valid sig).
    bytes[32] = 0xec;
    assert!(Ed25519Signature::try_from(bytes.as_slice()).is_ok());
}

#[test]
fn public_key_rejects_bad_points() {
    // 32 bytes that decompress to the identity (small order).
    let identity = {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        bytes
    };
    assert_eq!(
        Ed25519PublicKey::try_from(identity.as_slice()).unwrap_err(),
        CryptoMaterialError::SmallSubgroupError
    );
    assert_eq!(
        Ed25519PublicKey::try_from([0u8; 31].as_slice()).unwrap_err(),
        CryptoMaterialError::WrongLengthError
    );
}

#[test]
fn material_roundtrips_through_bcs() {
    let private_key = reference_key();
    let public_key = private_key.public_key();
    let signature = private_key.sign_arbitrary_message(b"roundtrip");

    let pk_bytes = aptos_bcs::to_bytes(&public_key).unwrap();
    assert_eq!(pk_bytes.len(), 33); // ULEB length byte + 32 bytes of key
    assert_eq!(
        aptos_bcs::from_bytes::<Ed25519PublicKey>(&pk_bytes).unwrap(),
        public_key
    );

    let sig_bytes = aptos_bcs::to_bytes(&signature).unwrap();
    assert_eq!(sig_bytes.len(), 65);
    assert_eq!(
        aptos_bcs::from_bytes::<Ed25519Signature>(&sig_bytes).unwrap(),
        signature
    );
}

#[test]
fn dummy_signature_is_zeroed_and_never_verifies() {
    let dummy = Ed25519Signature::dummy_signature();
    assert_eq!(Signature::to_bytes(&dummy), vec![0u8; 64]);
    let key = reference_key();
    assert_err!(dummy.verify_arbitrary_msg(b"anything", &key.public_key()));
}

proptest! {
    /// For every key and message, a fresh signature verifies.
    #[test]
    fn sign_verify_roundtrip(
        seed in any::<[u8; 32]>(),
        message in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut rng = StdRng::from_seed(seed);
        let private_key = Ed25519PrivateKey::generate(&mut rng);
        let signature = private_key.sign_arbitrary_message(&message);
        prop_assert!(signature
            .verify_arbitrary_msg(&message, &private_key.public_key())
            .is_ok());
    }
}
