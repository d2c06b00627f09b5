// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    ed25519::{Ed25519PrivateKey, Ed25519Signature},
    multi_ed25519::{MultiEd25519PrivateKey, MultiEd25519PublicKey, MultiEd25519Signature},
    traits::*,
};
use claims::{assert_err, assert_ok};
use rand::{rngs::StdRng, SeedableRng};

const MESSAGE: &[u8] = b"multi ed25519 aggregate";

fn keys(count: usize) -> Vec<Ed25519PrivateKey> {
    let mut rng = StdRng::from_seed([42u8; 32]);
    (0..count)
        .map(|_| Ed25519PrivateKey::generate(&mut rng))
        .collect()
}

fn aggregate_with(
    private_keys: &[Ed25519PrivateKey],
    indices: &[u8],
) -> MultiEd25519Signature {
    let signatures: Vec<(Ed25519Signature, u8)> = indices
        .iter()
        .map(|&index| {
            (
                private_keys[index as usize].sign_arbitrary_message(MESSAGE),
                index,
            )
        })
        .collect();
    MultiEd25519Signature::new(signatures).unwrap()
}

#[test]
fn threshold_bounds_are_enforced() {
    let private_keys = keys(3);
    assert!(MultiEd25519PrivateKey::new(keys(3), 0).is_err());
    assert!(MultiEd25519PrivateKey::new(keys(3), 4).is_err());
    assert!(MultiEd25519PrivateKey::new(vec![], 1).is_err());
    assert!(MultiEd25519PublicKey::new(
        private_keys.iter().map(|k| k.public_key()).collect(),
        2
    )
    .is_ok());
}

#[test]
fn serialized_form_is_keys_then_threshold() {
    let private_keys = keys(3);
    let public_keys: Vec<_> = private_keys.iter().map(|k| k.public_key()).collect();
    let aggregate = MultiEd25519PublicKey::new(public_keys.clone(), 2).unwrap();
    let bytes = aggregate.to_bytes();
    assert_eq!(bytes.len(), 3 * 32 + 1);
    assert_eq!(*bytes.last().unwrap(), 2);
    assert_eq!(&bytes[..32], public_keys[0].to_bytes().as_slice());
    assert_eq!(
        MultiEd25519PublicKey::try_from(bytes.as_slice()).unwrap(),
        aggregate
    );
}

#[test]
fn signature_form_is_sigs_then_bitmap() {
    let private_keys = keys(3);
    let aggregate = aggregate_with(&private_keys, &[2, 0]);
    let bytes = aggregate.to_bytes();
    assert_eq!(bytes.len(), 2 * 64 + 4);
    // Bits 0 and 2, most significant first within the fixed 4-byte bitmap.
    assert_eq!(&bytes[128..], &[0b1010_0000, 0, 0, 0]);
    assert_eq!(
        MultiEd25519Signature::try_from(bytes.as_slice()).unwrap(),
        aggregate
    );
}

#[test]
fn signatures_are_ordered_by_key_index_not_submission_order() {
    let private_keys = keys(3);
    let forward = aggregate_with(&private_keys, &[0, 2]);
    let reversed = aggregate_with(&private_keys, &[2, 0]);
    assert_eq!(forward, reversed);
}

#[test]
fn duplicate_index_is_rejected() {
    let private_keys = keys(2);
    let sig = private_keys[0].sign_arbitrary_message(MESSAGE);
    assert!(matches!(
        MultiEd25519Signature::new(vec![(sig.clone(), 1), (sig, 1)]),
        Err(CryptoMaterialError::BitVecError(_))
    ));
}

#[test]
fn verification_honors_the_threshold() {
    let private_keys = keys(4);
    let public_key = MultiEd25519PublicKey::new(
        private_keys.iter().map(|k| k.public_key()).collect(),
        3,
    )
    .unwrap();

    // Exactly the threshold.
    assert_ok!(
        aggregate_with(&private_keys, &[0, 1, 3]).verify_arbitrary_msg(MESSAGE, &public_key)
    );
    // More than the threshold.
    assert_ok!(aggregate_with(&private_keys, &[0, 1, 2, 3])
        .verify_arbitrary_msg(MESSAGE, &public_key));
    // One short.
    assert_err!(
        aggregate_with(&private_keys, &[1, 2]).verify_arbitrary_msg(MESSAGE, &public_key)
    );
}

#[test]
fn bitmap_must_match_the_key_set() {
    let private_keys = keys(2);
    let public_key =
        MultiEd25519PublicKey::new(private_keys.iter().map(|k| k.public_key()).collect(), 1)
            .unwrap();
    // Bit 5 points past the two keys that exist.
    let stray = aggregate_with(&keys(6), &[5]);
    assert_err!(stray.verify_arbitrary_msg(MESSAGE, &public_key));
}

#[test]
fn changing_the_bitmap_invalidates_the_aggregate() {
    let private_keys = keys(3);
    let public_key =
        MultiEd25519PublicKey::new(private_keys.iter().map(|k| k.public_key()).collect(), 2)
            .unwrap();
    let aggregate = aggregate_with(&private_keys, &[0, 1]);
    assert_ok!(aggregate.verify_arbitrary_msg(MESSAGE, &public_key));

    // Same signatures, shifted bitmap: every flagged pair now mismatches.
    let mut bytes = aggregate.to_bytes();
    let bitmap_offset = bytes.len() - 4;
    bytes[bitmap_offset] = 0b0110_0000;
    let shifted = MultiEd25519Signature::try_from(bytes.as_slice()).unwrap();
    assert_err!(shifted.verify_arbitrary_msg(MESSAGE, &public_key));
}

#[test]
fn legacy_one_of_one_conversions() {
    let private_keys = keys(1);
    let single_public = private_keys[0].public_key();
    let aggregate_public: MultiEd25519PublicKey = single_public.into();
    let aggregate_signature: MultiEd25519Signature =
        private_keys[0].sign_arbitrary_message(MESSAGE).into();
    assert_ok!(aggregate_signature.verify_arbitrary_msg(MESSAGE, &aggregate_public));
}
