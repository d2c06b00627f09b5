// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use serde::{de, ser};
use std::fmt::Display;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("unexpected end of input")]
    Eof,
    #[error("invalid bool: byte must be 0 or 1")]
    ExpectedBoolean,
    #[error("invalid option length: tag must be 0 or 1")]
    ExpectedOption,
    #[error("sequence length exceeds maximum of {0}")]
    ExceededMaxLen(usize),
    #[error("container depth exceeds maximum while processing {0}")]
    ExceededContainerDepthLimit(&'static str),
    #[error("ULEB128 length does not fit in u32")]
    IntegerOverflowDuringUleb128Decoding,
    #[error("ULEB128 encoding is not minimal")]
    NonCanonicalUleb128Encoding,
    #[error("map keys are not in canonical order")]
    NonCanonicalMap,
    #[error("sequence is missing a length")]
    MissingLen,
    #[error("invalid UTF-8 in string")]
    Utf8,
    #[error("remaining input after deserialization")]
    RemainingInput,
    #[error("not supported: {0}")]
    NotSupported(&'static str),
    #[error("{0}")]
    Custom(String),
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}
