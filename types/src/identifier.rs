// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! A string type for Move identifiers: module names, struct names, and
//! function names all share the same lexical rules.

use serde::{de, Deserialize, Serialize};
use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};
use thiserror::Error;

/// Returns true if `s` is a well-formed Move identifier: a letter or an
/// underscore followed by letters, digits, or underscores. A lone underscore
/// is reserved and not an identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some('_') => {
            if s.len() == 1 {
                return false;
            }
        },
        Some(c) if c.is_ascii_alphabetic() => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// An owned, validated Move identifier.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Identifier(Box<str>);

impl Identifier {
    pub fn new(s: impl Into<Box<str>>) -> Result<Self, InvalidIdentifierError> {
        let s = s.into();
        if is_valid_identifier(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidIdentifierError(s.into_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0.into_string()
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("invalid identifier {0:?}")]
pub struct InvalidIdentifierError(String);

impl FromStr for Identifier {
    type Err = InvalidIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String>::deserialize(deserializer)?;
        Identifier::new(s).map_err(de::Error::custom)
    }
}

impl Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_identifiers() {
        for ok in ["foo", "FOO", "foo_bar", "_foo", "foo123", "f"] {
            assert!(Identifier::new(ok).is_ok(), "{} should parse", ok);
        }
    }

    #[test]
    fn invalid_identifiers() {
        for bad in ["", "_", "1foo", "foo-bar", "foo::bar", "0x1", "fo o"] {
            assert!(Identifier::new(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn bcs_form_is_a_string() {
        let id = Identifier::new("transfer").unwrap();
        let bytes = aptos_bcs::to_bytes(&id).unwrap();
        assert_eq!(bytes[0], 8);
        assert_eq!(&bytes[1..], b"transfer");
        assert_eq!(aptos_bcs::from_bytes::<Identifier>(&bytes).unwrap(), id);
    }
}
