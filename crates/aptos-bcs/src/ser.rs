// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    error::{Error, Result},
    MAX_CONTAINER_DEPTH, MAX_SEQUENCE_LENGTH,
};
use serde::{ser, Serialize};

/// Serialize `value` to its canonical BCS byte representation.
///
/// Deterministic: the same logical value always yields the same bytes,
/// across runs and platforms.
pub fn to_bytes<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut output = Vec::new();
    value.serialize(Serializer::new(&mut output, MAX_CONTAINER_DEPTH))?;
    Ok(output)
}

/// Number of bytes `value` occupies once BCS-serialized.
pub fn serialized_size<T>(value: &T) -> Result<usize>
where
    T: ?Sized + Serialize,
{
    Ok(to_bytes(value)?.len())
}

/// A BCS serializer writing into a byte buffer. Consumed per value; nested
/// containers get a child serializer with one less unit of remaining depth.
pub struct Serializer<'a> {
    output: &'a mut Vec<u8>,
    max_remaining_depth: usize,
}

impl<'a> Serializer<'a> {
    pub fn new(output: &'a mut Vec<u8>, max_remaining_depth: usize) -> Self {
        Serializer {
            output,
            max_remaining_depth,
        }
    }

    fn output_u32_as_uleb128(&mut self, mut value: u32) {
        while value >= 0x80 {
            self.output.push((value & 0x7f) as u8 | 0x80);
            value >>= 7;
        }
        self.output.push(value as u8);
    }

    fn output_variant_index(&mut self, index: u32) {
        self.output_u32_as_uleb128(index);
    }

    fn output_seq_len(&mut self, len: usize) -> Result<()> {
        if len > MAX_SEQUENCE_LENGTH {
            return Err(Error::ExceededMaxLen(len));
        }
        self.output_u32_as_uleb128(len as u32);
        Ok(())
    }

    fn enter_container(self, name: &'static str) -> Result<Self> {
        if self.max_remaining_depth == 0 {
            return Err(Error::ExceededContainerDepthLimit(name));
        }
        Ok(Serializer {
            output: self.output,
            max_remaining_depth: self.max_remaining_depth - 1,
        })
    }

    fn reborrow(&mut self) -> Serializer<'_> {
        Serializer {
            output: &mut *self.output,
            max_remaining_depth: self.max_remaining_depth,
        }
    }
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Error = Error;
    type Ok = ();
    type SerializeMap = MapSerializer<'a>;
    type SerializeSeq = Compound<'a>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = Compound<'a>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = Compound<'a>;

    fn serialize_bool(mut self, v: bool) -> Result<()> {
        self.output.push(v as u8);
        Ok(())
    }

    fn serialize_i8(mut self, v: i8) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_i16(mut self, v: i16) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_i32(mut self, v: i32) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_i64(mut self, v: i64) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_i128(mut self, v: i128) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_u8(mut self, v: u8) -> Result<()> {
        self.output.push(v);
        Ok(())
    }

    fn serialize_u16(mut self, v: u16) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_u32(mut self, v: u32) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_u64(mut self, v: u64) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_u128(mut self, v: u128) -> Result<()> {
        self.output.extend_from_slice(&v.to_le_bytes());
        Ok(())
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(Error::NotSupported("serialize_f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(Error::NotSupported("serialize_f64"))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(Error::NotSupported("serialize_char"))
    }

    // Strings are not NUL-terminated: ULEB128 length, then the UTF-8 bytes.
    fn serialize_str(self, v: &str) -> Result<()> {
        self.serialize_bytes(v.as_bytes())
    }

    fn serialize_bytes(mut self, v: &[u8]) -> Result<()> {
        self.output_seq_len(v.len())?;
        self.output.extend_from_slice(v);
        Ok(())
    }

    fn serialize_none(mut self) -> Result<()> {
        self.output.push(0);
        Ok(())
    }

    fn serialize_some<T>(mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.output.push(1);
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        mut self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        self.output_variant_index(variant_index);
        Ok(())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        mut self,
        name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.output_variant_index(variant_index);
        value.serialize(self.enter_container(name)?)
    }

    fn serialize_seq(mut self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        let len = len.ok_or(Error::MissingLen)?;
        self.output_seq_len(len)?;
        Ok(Compound(self.enter_container("sequence")?))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(Compound(self.enter_container("tuple")?))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(Compound(self.enter_container(name)?))
    }

    fn serialize_tuple_variant(
        mut self,
        name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.output_variant_index(variant_index);
        Ok(Compound(self.enter_container(name)?))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        let inner = self.enter_container("map")?;
        Ok(MapSerializer {
            inner,
            entries: Vec::new(),
            next_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(Compound(self.enter_container(name)?))
    }

    fn serialize_struct_variant(
        mut self,
        name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.output_variant_index(variant_index);
        Ok(Compound(self.enter_container(name)?))
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

/// Shared compound serializer for sequences, tuples, and structs: elements
/// and fields are emitted back to back in declaration order.
pub struct Compound<'a>(Serializer<'a>);

impl ser::SerializeSeq for Compound<'_> {
    type Error = Error;
    type Ok = ();

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.0.reborrow())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for Compound<'_> {
    type Error = Error;
    type Ok = ();

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.0.reborrow())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for Compound<'_> {
    type Error = Error;
    type Ok = ();

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.0.reborrow())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for Compound<'_> {
    type Error = Error;
    type Ok = ();

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.0.reborrow())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for Compound<'_> {
    type Error = Error;
    type Ok = ();

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.0.reborrow())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for Compound<'_> {
    type Error = Error;
    type Ok = ();

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self.0.reborrow())
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Map entries are buffered, sorted by their encoded key bytes, and only then
/// written out, so that logically equal maps encode identically.
pub struct MapSerializer<'a> {
    inner: Serializer<'a>,
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    next_key: Option<Vec<u8>>,
}

impl ser::SerializeMap for MapSerializer<'_> {
    type Error = Error;
    type Ok = ();

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let mut bytes = Vec::new();
        key.serialize(Serializer::new(&mut bytes, self.inner.max_remaining_depth))?;
        self.next_key = Some(bytes);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key.take().ok_or(Error::MissingLen)?;
        let mut bytes = Vec::new();
        value.serialize(Serializer::new(&mut bytes, self.inner.max_remaining_depth))?;
        self.entries.push((key, bytes));
        Ok(())
    }

    fn end(mut self) -> Result<()> {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self.inner.output_seq_len(self.entries.len())?;
        for (key, value) in self.entries {
            self.inner.output.extend_from_slice(&key);
            self.inner.output.extend_from_slice(&value);
        }
        Ok(())
    }
}
