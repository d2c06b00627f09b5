// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use aptos_crypto::hash::HashValue;
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A fixed 32-byte on-chain account identifier.
///
/// Rendering follows the convention the node and the indexer agree on: a
/// "special" address (first 31 bytes zero, last byte below 0x10) prints as
/// `0x` plus the single hex digit, every other address prints as the full
/// 64 hex digits. Parsing is more forgiving: the `0x` prefix is optional,
/// odd-length hex is padded with a leading zero nibble, and short strings
/// right-align into the 32-byte buffer.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AccountAddress([u8; AccountAddress::LENGTH]);

impl AccountAddress {
    /// The number of bytes in an address.
    pub const LENGTH: usize = 32;
    /// Address of the core framework account, `0x1`.
    pub const ONE: Self = Self::get_hex_address_one();
    /// Address of the two-byte special range start, `0x2` (object code
    /// deployment and friends live in the low range).
    pub const TWO: Self = Self::get_hex_address_two();
    /// The all-zero address, `0x0`.
    pub const ZERO: Self = Self([0u8; Self::LENGTH]);

    const fn get_hex_address_one() -> Self {
        let mut addr = [0u8; Self::LENGTH];
        addr[Self::LENGTH - 1] = 1u8;
        Self(addr)
    }

    const fn get_hex_address_two() -> Self {
        let mut addr = [0u8; Self::LENGTH];
        addr[Self::LENGTH - 1] = 2u8;
        Self(addr)
    }

    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// An address is special iff its first 31 bytes are zero and its last
    /// byte is below 0x10.
    pub fn is_special(&self) -> bool {
        self.0[..Self::LENGTH - 1].iter().all(|byte| *byte == 0)
            && self.0[Self::LENGTH - 1] < 0x10
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn into_bytes(self) -> [u8; Self::LENGTH] {
        self.0
    }

    /// The full 64-hex-digit form without a prefix.
    pub fn to_canonical_string(&self) -> String {
        hex::encode(self.0)
    }

    /// The canonical display form: short for special addresses, full
    /// otherwise, always `0x`-prefixed.
    pub fn to_standard_string(&self) -> String {
        if self.is_special() {
            format!("0x{:x}", self.0[Self::LENGTH - 1])
        } else {
            format!("0x{}", self.to_canonical_string())
        }
    }

    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self, AccountAddressParseError> {
        <[u8; Self::LENGTH]>::try_from(bytes.as_ref())
            .map(Self)
            .map_err(|_| AccountAddressParseError::IncorrectNumberOfBytes(bytes.as_ref().len()))
    }

    /// Parses hex with or without a `0x` prefix. Odd-length input gains a
    /// leading zero nibble; anything under 64 nibbles right-aligns.
    pub fn from_hex_literal(literal: &str) -> Result<Self, AccountAddressParseError> {
        let hex = literal.strip_prefix("0x").unwrap_or(literal);
        if hex.is_empty() {
            return Err(AccountAddressParseError::EmptyInput);
        }
        if hex.len() > Self::LENGTH * 2 {
            return Err(AccountAddressParseError::TooLong(hex.len()));
        }
        let padded;
        let hex = if hex.len() % 2 != 0 {
            padded = format!("0{}", hex);
            &padded
        } else {
            hex
        };
        let decoded = hex::decode(hex).map_err(|_| AccountAddressParseError::InvalidHex)?;
        let mut bytes = [0u8; Self::LENGTH];
        bytes[Self::LENGTH - decoded.len()..].copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_standard_string())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_standard_string())
    }
}

impl fmt::LowerHex for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for AccountAddress {
    type Err = AccountAddressParseError;

    fn from_str(s: &str) -> Result<Self, AccountAddressParseError> {
        Self::from_hex_literal(s)
    }
}

impl From<[u8; AccountAddress::LENGTH]> for AccountAddress {
    fn from(bytes: [u8; AccountAddress::LENGTH]) -> Self {
        Self::new(bytes)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_standard_string())
        } else {
            // See comment in deserialize.
            serializer.serialize_newtype_struct("AccountAddress", &self.0)
        }
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = <String>::deserialize(deserializer)?;
            AccountAddress::from_str(&s).map_err(de::Error::custom)
        } else {
            // In order to preserve the Serde data model and help analysis tools,
            // make sure to wrap our value in a container with the same name
            // as the original type.
            #[derive(Deserialize)]
            #[serde(rename = "AccountAddress")]
            struct Value([u8; AccountAddress::LENGTH]);

            let value = Value::deserialize(deserializer)?;
            Ok(AccountAddress::new(value.0))
        }
    }
}

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum AccountAddressParseError {
    #[error("address string is empty")]
    EmptyInput,
    #[error("hex string is too long: {0} nibbles, max 64")]
    TooLong(usize),
    #[error("invalid hex characters in address")]
    InvalidHex,
    #[error("expected 32 bytes, got {0}")]
    IncorrectNumberOfBytes(usize),
}

/// Scheme byte used when hashing a creator address and seed into a derived
/// object address.
pub const DERIVE_OBJECT_ADDRESS_FROM_OBJECT: u8 = 0xFC;
/// Scheme byte for named objects.
pub const DERIVE_OBJECT_ADDRESS_FROM_SEED: u8 = 0xFE;
/// Scheme byte for resource accounts.
pub const DERIVE_RESOURCE_ACCOUNT_ADDRESS: u8 = 0xFF;

fn derive_address(source: &AccountAddress, seed: &[u8], scheme: u8) -> AccountAddress {
    let mut input = source.to_vec();
    input.extend(seed);
    input.push(scheme);
    AccountAddress::new(*HashValue::sha3_256_of(&input).as_ref())
}

/// Address of the named object created by `creator` with `seed`.
pub fn create_object_address(creator: AccountAddress, seed: &[u8]) -> AccountAddress {
    derive_address(&creator, seed, DERIVE_OBJECT_ADDRESS_FROM_SEED)
}

/// Address of the resource account created by `source` with `seed`.
pub fn create_resource_address(source: AccountAddress, seed: &[u8]) -> AccountAddress {
    derive_address(&source, seed, DERIVE_RESOURCE_ACCOUNT_ADDRESS)
}

/// Address of an object derived from another object owned by `source`.
pub fn create_derived_object_address(
    source: AccountAddress,
    object_address: AccountAddress,
) -> AccountAddress {
    derive_address(
        &source,
        object_address.as_ref(),
        DERIVE_OBJECT_ADDRESS_FROM_OBJECT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn special_addresses_render_short() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x01;
        assert_eq!(AccountAddress::new(bytes).to_string(), "0x1");
        bytes[31] = 0x0f;
        assert_eq!(AccountAddress::new(bytes).to_string(), "0xf");
        bytes[31] = 0x00;
        assert_eq!(AccountAddress::new(bytes).to_string(), "0x0");
    }

    #[test]
    fn non_special_addresses_render_full() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x10;
        assert_eq!(
            AccountAddress::new(bytes).to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000010"
        );
        bytes[0] = 0x01;
        bytes[31] = 0x01;
        assert_eq!(
            AccountAddress::new(bytes).to_string(),
            "0x0100000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn parsing_is_relaxed() {
        assert_eq!(AccountAddress::from_str("0x1").unwrap(), AccountAddress::ONE);
        assert_eq!(AccountAddress::from_str("1").unwrap(), AccountAddress::ONE);
        assert_eq!(AccountAddress::from_str("0x01").unwrap(), AccountAddress::ONE);
        // Odd length pads a leading nibble and right-aligns.
        let parsed = AccountAddress::from_str("0x123").unwrap();
        assert_eq!(&parsed.as_ref()[30..], &[0x01, 0x23]);
        assert_eq!(
            AccountAddress::from_str(&format!("0x{}", "ff".repeat(32))).unwrap().as_ref(),
            &[0xff; 32]
        );
    }

    #[test]
    fn parsing_rejects_garbage() {
        assert_eq!(
            AccountAddress::from_str(""),
            Err(AccountAddressParseError::EmptyInput)
        );
        assert_eq!(
            AccountAddress::from_str("0x"),
            Err(AccountAddressParseError::EmptyInput)
        );
        assert!(matches!(
            AccountAddress::from_str(&"a".repeat(65)),
            Err(AccountAddressParseError::TooLong(65))
        ));
        assert_eq!(
            AccountAddress::from_str("0xzz"),
            Err(AccountAddressParseError::InvalidHex)
        );
    }

    #[test]
    fn bcs_form_is_raw_32_bytes() {
        let bytes = aptos_bcs::to_bytes(&AccountAddress::ONE).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 1);
        assert_eq!(
            aptos_bcs::from_bytes::<AccountAddress>(&bytes).unwrap(),
            AccountAddress::ONE
        );
    }

    #[test]
    fn derived_addresses_differ_by_scheme() {
        let creator = AccountAddress::from_str("0xcafe").unwrap();
        let object = create_object_address(creator, b"seed");
        let resource = create_resource_address(creator, b"seed");
        assert_ne!(object, resource);
        assert_ne!(create_derived_object_address(creator, object), object);
    }

    proptest! {
        #[test]
        fn display_parse_roundtrip(bytes in any::<[u8; 32]>()) {
            let address = AccountAddress::new(bytes);
            let parsed = AccountAddress::from_str(&address.to_string()).unwrap();
            prop_assert_eq!(parsed, address);
        }
    }
}
