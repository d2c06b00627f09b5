// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{from_bytes, to_bytes, Error, MAX_CONTAINER_DEPTH};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn roundtrip<T>(value: T, expected: &[u8])
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
{
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(bytes, expected);
    assert_eq!(from_bytes::<T>(&bytes).unwrap(), value);
}

#[test]
fn integers_are_little_endian_fixed_width() {
    roundtrip(0x42u8, &[0x42]);
    roundtrip(0x4251u16, &[0x51, 0x42]);
    roundtrip(0x4251_6374u32, &[0x74, 0x63, 0x51, 0x42]);
    roundtrip(0x4251_6374_8593_a6b7u64, &[
        0xb7, 0xa6, 0x93, 0x85, 0x74, 0x63, 0x51, 0x42,
    ]);
    roundtrip(42u64, &[0x2a, 0, 0, 0, 0, 0, 0, 0]);
    roundtrip(1u128, &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    roundtrip(-1i8, &[0xff]);
    roundtrip(-2i16, &[0xfe, 0xff]);
}

#[test]
fn bools_are_strict() {
    roundtrip(false, &[0]);
    roundtrip(true, &[1]);
    assert_eq!(from_bytes::<bool>(&[2]), Err(Error::ExpectedBoolean));
    assert_eq!(from_bytes::<bool>(&[0xff]), Err(Error::ExpectedBoolean));
}

#[test]
fn options_are_strict() {
    roundtrip(None::<u8>, &[0]);
    roundtrip(Some(0x42u8), &[1, 0x42]);
    assert_eq!(from_bytes::<Option<u8>>(&[2, 0x42]), Err(Error::ExpectedOption));
}

#[test]
fn strings_are_length_prefixed_utf8() {
    roundtrip("hello".to_string(), &[5, b'h', b'e', b'l', b'l', b'o']);
    roundtrip(String::new(), &[0]);
    // 0xc3 starts a two-byte UTF-8 sequence that never completes.
    assert_eq!(from_bytes::<String>(&[1, 0xc3]), Err(Error::Utf8));
}

#[test]
fn sequences_and_fixed_arrays() {
    roundtrip(vec![1u8, 2, 3], &[3, 1, 2, 3]);
    roundtrip(Vec::<u8>::new(), &[0]);
    // Fixed-size arrays carry no length prefix.
    roundtrip([1u8, 2, 3], &[1, 2, 3]);
    roundtrip((1u8, 0x0203u16), &[1, 3, 2]);
}

#[test]
fn uleb128_lengths() {
    let value = vec![0u8; 128];
    let bytes = to_bytes(&value).unwrap();
    assert_eq!(&bytes[..2], &[0x80, 0x01]);
    assert_eq!(from_bytes::<Vec<u8>>(&bytes).unwrap(), value);
}

#[test]
fn uleb128_must_be_minimal() {
    // [0x80, 0x00] encodes 0 with a gratuitous continuation byte.
    let mut bytes = vec![0x80, 0x00];
    assert_eq!(
        from_bytes::<Vec<u8>>(&bytes),
        Err(Error::NonCanonicalUleb128Encoding)
    );
    // A sixth ULEB byte can never be needed for a 32-bit length.
    bytes = vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
    assert_eq!(
        from_bytes::<Vec<u8>>(&bytes),
        Err(Error::IntegerOverflowDuringUleb128Decoding)
    );
}

#[test]
fn truncation_is_detected() {
    assert_eq!(from_bytes::<u64>(&[1, 2, 3]), Err(Error::Eof));
    assert_eq!(from_bytes::<Vec<u8>>(&[3, 1]), Err(Error::Eof));
    assert_eq!(from_bytes::<String>(&[]), Err(Error::Eof));
}

#[test]
fn trailing_bytes_are_rejected() {
    assert_eq!(from_bytes::<u8>(&[1, 2]), Err(Error::RemainingInput));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Record {
    first: u8,
    second: Option<u32>,
    #[serde(skip)]
    cache: u64,
    third: Vec<u16>,
}

#[test]
fn struct_fields_in_declaration_order_skipping_non_persisted() {
    let record = Record {
        first: 7,
        second: Some(0x0100),
        cache: 999,
        third: vec![1, 2],
    };
    let bytes = to_bytes(&record).unwrap();
    assert_eq!(bytes, vec![7, 1, 0, 1, 0, 0, 2, 1, 0, 2, 0]);
    let decoded: Record = from_bytes(&bytes).unwrap();
    // The skipped field deserializes to its default rather than from input.
    assert_eq!(decoded.cache, 0);
    assert_eq!(decoded.first, 7);
    assert_eq!(decoded.third, vec![1, 2]);
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum Tagged {
    Unit,
    Newtype(u8),
    Struct { a: u16 },
}

#[test]
fn enum_variants_are_uleb_tagged() {
    roundtrip(Tagged::Unit, &[0]);
    roundtrip(Tagged::Newtype(9), &[1, 9]);
    roundtrip(Tagged::Struct { a: 0x0201 }, &[2, 1, 2]);
    assert!(matches!(from_bytes::<Tagged>(&[3]), Err(Error::Custom(_))));
}

#[test]
fn maps_sort_by_encoded_key() {
    let mut map = BTreeMap::new();
    map.insert(2u8, 20u8);
    map.insert(1u8, 10u8);
    assert_eq!(to_bytes(&map).unwrap(), vec![2, 1, 10, 2, 20]);
    // Out-of-order keys on the wire are rejected.
    assert_eq!(
        from_bytes::<BTreeMap<u8, u8>>(&[2, 2, 20, 1, 10]),
        Err(Error::NonCanonicalMap)
    );
    assert_eq!(
        from_bytes::<BTreeMap<u8, u8>>(&[2, 1, 10, 1, 10]),
        Err(Error::NonCanonicalMap)
    );
}

#[test]
fn bytes_via_serde_bytes() {
    let value = serde_bytes::ByteBuf::from(vec![1u8, 2, 3]);
    assert_eq!(to_bytes(&value).unwrap(), vec![3, 1, 2, 3]);
}

#[derive(Serialize)]
enum Tree {
    Leaf,
    Node(Box<Tree>),
}

#[test]
fn container_depth_is_limited() {
    let mut value = Tree::Leaf;
    for _ in 0..=MAX_CONTAINER_DEPTH {
        value = Tree::Node(Box::new(value));
    }
    assert!(matches!(
        to_bytes(&value),
        Err(Error::ExceededContainerDepthLimit(_))
    ));
}

proptest! {
    #[test]
    fn roundtrip_u64(value in any::<u64>()) {
        prop_assert_eq!(from_bytes::<u64>(&to_bytes(&value).unwrap()).unwrap(), value);
    }

    #[test]
    fn roundtrip_nested(value in any::<Vec<(String, Option<u32>)>>()) {
        let bytes = to_bytes(&value).unwrap();
        prop_assert_eq!(from_bytes::<Vec<(String, Option<u32>)>>(&bytes).unwrap(), value.clone());
        // Determinism: encoding twice yields identical bytes.
        prop_assert_eq!(to_bytes(&value).unwrap(), bytes);
    }
}
