// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Binary Canonical Serialization (BCS).
//!
//! BCS is the deterministic, length-prefixed, little-endian binary encoding
//! used for every signed-over-the-wire object. Signatures are computed over
//! BCS bytes, so two conforming encoders must produce the same byte string
//! for the same logical value:
//!
//! * Integers are fixed-width little-endian; u128 is 16 bytes.
//! * Sequence lengths and enum variant tags are ULEB128 (max 32 bits, and
//!   the encoding must be minimal).
//! * Booleans are exactly `0x00` or `0x01`.
//! * Byte strings and UTF-8 strings carry a ULEB128 length prefix; fixed
//!   arrays and tuples do not.
//! * `Option<T>` is a one-byte tag (`0x00` absent, `0x01` present).
//! * Struct fields are encoded in declaration order; `#[serde(skip)]` fields
//!   are not persisted on either side.
//! * Map entries are sorted by their encoded key bytes.
//!
//! Any truncation, unknown variant tag, or length mismatch aborts decoding
//! with a typed [`Error`] and leaves no partial state visible.

#![forbid(unsafe_code)]

mod de;
mod error;
mod ser;

pub use de::{from_bytes, Deserializer};
pub use error::{Error, Result};
pub use ser::{serialized_size, to_bytes, Serializer};

/// Containers (structs, enums, sequences, maps) may nest at most this deep.
/// Protects decoders from stack exhaustion on adversarial input.
pub const MAX_CONTAINER_DEPTH: usize = 500;

/// Sequences and byte strings may hold at most this many elements.
pub const MAX_SEQUENCE_LENGTH: usize = (1 << 31) - 1;

#[cfg(test)]
mod tests;
