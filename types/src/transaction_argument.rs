// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Script arguments and the entry-function argument encoder.
//!
//! Entry-function arguments travel as pre-encoded BCS byte strings. The
//! encoder here takes the declared parameter type, a JSON-shaped user value,
//! and the caller's type-argument bindings, and produces exactly the bytes
//! the VM expects for that parameter.

use crate::{
    account_address::AccountAddress,
    language_storage::{StructTag, TypeTag},
};
use ethnum::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Script transaction arguments, a closed primitive set with its own wire
/// tags.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TransactionArgument {
    U8(u8),
    U64(u64),
    U128(u128),
    Address(AccountAddress),
    U8Vector(#[serde(with = "serde_bytes")] Vec<u8>),
    Bool(bool),
    U16(u16),
    U32(u32),
    U256([u8; 32]),
}

impl fmt::Display for TransactionArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionArgument::U8(value) => write!(f, "{{U8: {}}}", value),
            TransactionArgument::U16(value) => write!(f, "{{U16: {}}}", value),
            TransactionArgument::U32(value) => write!(f, "{{U32: {}}}", value),
            TransactionArgument::U64(value) => write!(f, "{{U64: {}}}", value),
            TransactionArgument::U128(value) => write!(f, "{{U128: {}}}", value),
            TransactionArgument::U256(value) => {
                write!(f, "{{U256: {}}}", U256::from_le_bytes(*value))
            },
            TransactionArgument::Address(address) => write!(f, "{{ADDRESS: {}}}", address),
            TransactionArgument::U8Vector(vector) => {
                write!(f, "{{U8Vector: 0x{}}}", hex::encode(vector))
            },
            TransactionArgument::Bool(value) => write!(f, "{{BOOL: {}}}", value),
        }
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ArgumentEncodeError {
    #[error("expected {expected} but got value {value}")]
    TypeMismatch { expected: String, value: String },
    #[error("integer {value} out of range for {ty}")]
    OutOfRange { ty: &'static str, value: String },
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("a vector argument requires a value; pass an empty list for none")]
    MissingVector,
    #[error("generic T{index} exceeds the {arity} provided type arguments")]
    UnboundGeneric { index: u64, arity: usize },
    #[error("cannot encode an argument of type {0}")]
    UnsupportedType(String),
}

/// Encodes `value` as the BCS bytes of an entry-function argument declared as
/// `type_tag`. `type_args` are the caller's type-argument bindings, consulted
/// for `T<i>` generics.
pub fn encode_entry_function_argument(
    type_tag: &TypeTag,
    value: &Value,
    type_args: &[TypeTag],
) -> Result<Vec<u8>, ArgumentEncodeError> {
    match type_tag {
        TypeTag::Bool => encode_bool(value),
        TypeTag::U8 => Ok(to_bcs(&u8::try_from(parse_integer(value, "u8")?).map_err(
            |_| out_of_range("u8", value),
        )?)),
        TypeTag::U16 => Ok(to_bcs(&u16::try_from(parse_integer(value, "u16")?)
            .map_err(|_| out_of_range("u16", value))?)),
        TypeTag::U32 => Ok(to_bcs(&u32::try_from(parse_integer(value, "u32")?)
            .map_err(|_| out_of_range("u32", value))?)),
        TypeTag::U64 => Ok(to_bcs(&u64::try_from(parse_integer(value, "u64")?)
            .map_err(|_| out_of_range("u64", value))?)),
        TypeTag::U128 => {
            let wide = parse_integer(value, "u128")?;
            let narrowed = u128::try_from(wide).map_err(|_| out_of_range("u128", value))?;
            Ok(to_bcs(&narrowed))
        },
        TypeTag::U256 => {
            let wide = parse_integer(value, "u256")?;
            Ok(wide.to_le_bytes().to_vec())
        },
        TypeTag::Address => encode_address(value),
        TypeTag::Signer => Err(ArgumentEncodeError::UnsupportedType("signer".to_string())),
        TypeTag::Vector(inner) => encode_vector(inner, value, type_args),
        TypeTag::Struct(tag) => encode_struct(tag, value, type_args),
        // References are transparent: the callee receives the value itself.
        TypeTag::Reference(inner) => encode_entry_function_argument(inner, value, type_args),
        TypeTag::Generic(index) => {
            let bound =
                type_args
                    .get(*index as usize)
                    .ok_or(ArgumentEncodeError::UnboundGeneric {
                        index: *index,
                        arity: type_args.len(),
                    })?;
            encode_entry_function_argument(bound, value, type_args)
        },
    }
}

fn to_bcs<T: Serialize>(value: &T) -> Vec<u8> {
    aptos_bcs::to_bytes(value).expect("primitive BCS encoding cannot fail")
}

fn type_mismatch(expected: &str, value: &Value) -> ArgumentEncodeError {
    ArgumentEncodeError::TypeMismatch {
        expected: expected.to_string(),
        value: value.to_string(),
    }
}

fn out_of_range(ty: &'static str, value: &Value) -> ArgumentEncodeError {
    ArgumentEncodeError::OutOfRange {
        ty,
        value: value.to_string(),
    }
}

fn encode_bool(value: &Value) -> Result<Vec<u8>, ArgumentEncodeError> {
    match value {
        Value::Bool(b) => Ok(to_bcs(b)),
        Value::String(s) => match s.as_str() {
            "true" => Ok(to_bcs(&true)),
            "false" => Ok(to_bcs(&false)),
            _ => Err(type_mismatch("bool", value)),
        },
        _ => Err(type_mismatch("bool", value)),
    }
}

/// Integers arrive as JSON numbers, decimal strings, or `0x`-prefixed hex
/// strings; everything is range-checked against the declared width before
/// emission.
fn parse_integer(value: &Value, ty: &'static str) -> Result<U256, ArgumentEncodeError> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| out_of_range(ty, value)),
        Value::String(s) => {
            let trimmed = s.trim();
            let parsed = if let Some(hex) = trimmed.strip_prefix("0x") {
                U256::from_str_radix(hex, 16)
            } else {
                U256::from_str_radix(trimmed, 10)
            };
            parsed.map_err(|_| out_of_range(ty, value))
        },
        _ => Err(type_mismatch(ty, value)),
    }
}

fn encode_address(value: &Value) -> Result<Vec<u8>, ArgumentEncodeError> {
    match value {
        Value::String(s) => {
            let address = AccountAddress::from_hex_literal(s)
                .map_err(|_| ArgumentEncodeError::InvalidAddress(s.clone()))?;
            Ok(to_bcs(&address))
        },
        _ => Err(type_mismatch("address", value)),
    }
}

fn encode_vector(
    inner: &TypeTag,
    value: &Value,
    type_args: &[TypeTag],
) -> Result<Vec<u8>, ArgumentEncodeError> {
    // vector<u8> additionally accepts hex text.
    if matches!(inner, TypeTag::U8) {
        if let Value::String(s) = value {
            let hex_str = s.strip_prefix("0x").unwrap_or(s);
            let bytes = hex::decode(hex_str)
                .map_err(|_| ArgumentEncodeError::InvalidHex(s.clone()))?;
            return Ok(to_bcs(&serde_bytes::ByteBuf::from(bytes)));
        }
    }
    match value {
        Value::Array(elements) => {
            let mut out = Vec::new();
            write_uleb128(&mut out, elements.len() as u32);
            for element in elements {
                out.extend(encode_entry_function_argument(inner, element, type_args)?);
            }
            Ok(out)
        },
        Value::Null => Err(ArgumentEncodeError::MissingVector),
        _ => Err(type_mismatch(&format!("vector<{}>", inner), value)),
    }
}

fn encode_struct(
    tag: &StructTag,
    value: &Value,
    type_args: &[TypeTag],
) -> Result<Vec<u8>, ArgumentEncodeError> {
    if tag.is_framework_struct("string", "String") {
        return match value {
            Value::String(s) => Ok(to_bcs(s)),
            _ => Err(type_mismatch("0x1::string::String", value)),
        };
    }
    if tag.is_framework_struct("option", "Option") {
        let inner = tag
            .type_args
            .first()
            .ok_or_else(|| ArgumentEncodeError::UnsupportedType(tag.to_string()))?;
        return match value {
            Value::Null => Ok(vec![0]),
            present => {
                let mut out = vec![1];
                out.extend(encode_entry_function_argument(inner, present, type_args)?);
                Ok(out)
            },
        };
    }
    if tag.is_framework_struct("object", "Object") {
        return encode_address(value);
    }
    Err(ArgumentEncodeError::UnsupportedType(tag.to_string()))
}

fn write_uleb128(out: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        out.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}
