// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Runtime representations of on-chain generic types: `TypeTag` for any
//! instantiated type, `StructTag` for a struct and its type arguments, and
//! `ModuleId` for a published module.

use crate::{account_address::AccountAddress, identifier::Identifier, parser};
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The on-wire variant order of `TypeTag`. `Reference` and `Generic` exist
/// only between the parser and the argument encoder: references marshal as
/// their pointee and generics are resolved by index before anything is
/// encoded, so neither has a wire tag.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
    /// `&T`, parser-level only.
    Reference(Box<TypeTag>),
    /// `T<index>`, parser-level only.
    Generic(u64),
}

impl TypeTag {
    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    pub fn struct_tag(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => write!(f, "{}", tag),
            TypeTag::Reference(inner) => write!(f, "&{}", inner),
            TypeTag::Generic(index) => write!(f, "T{}", index),
        }
    }
}

impl FromStr for TypeTag {
    type Err = parser::TypeTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_type_tag(s)
    }
}

impl Serialize for TypeTag {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            return serializer.serialize_str(&self.to_string());
        }
        match self {
            TypeTag::Bool => serializer.serialize_unit_variant("TypeTag", 0, "bool"),
            TypeTag::U8 => serializer.serialize_unit_variant("TypeTag", 1, "u8"),
            TypeTag::U64 => serializer.serialize_unit_variant("TypeTag", 2, "u64"),
            TypeTag::U128 => serializer.serialize_unit_variant("TypeTag", 3, "u128"),
            TypeTag::Address => serializer.serialize_unit_variant("TypeTag", 4, "address"),
            TypeTag::Signer => serializer.serialize_unit_variant("TypeTag", 5, "signer"),
            TypeTag::Vector(inner) => {
                serializer.serialize_newtype_variant("TypeTag", 6, "vector", inner)
            },
            TypeTag::Struct(tag) => {
                serializer.serialize_newtype_variant("TypeTag", 7, "struct", tag)
            },
            TypeTag::U16 => serializer.serialize_unit_variant("TypeTag", 8, "u16"),
            TypeTag::U32 => serializer.serialize_unit_variant("TypeTag", 9, "u32"),
            TypeTag::U256 => serializer.serialize_unit_variant("TypeTag", 10, "u256"),
            TypeTag::Reference(_) | TypeTag::Generic(_) => Err(ser::Error::custom(
                "reference and generic type tags have no wire representation",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = <String>::deserialize(deserializer)?;
            return TypeTag::from_str(&s).map_err(de::Error::custom);
        }

        const VARIANTS: &[&str] = &[
            "bool", "u8", "u64", "u128", "address", "signer", "vector", "struct", "u16", "u32",
            "u256",
        ];

        struct TypeTagVisitor;

        impl<'de> de::Visitor<'de> for TypeTagVisitor {
            type Value = TypeTag;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a TypeTag variant")
            }

            fn visit_enum<A: de::EnumAccess<'de>>(
                self,
                data: A,
            ) -> Result<Self::Value, A::Error> {
                use de::VariantAccess;
                let (index, variant): (u32, _) = data.variant()?;
                match index {
                    0 => variant.unit_variant().map(|_| TypeTag::Bool),
                    1 => variant.unit_variant().map(|_| TypeTag::U8),
                    2 => variant.unit_variant().map(|_| TypeTag::U64),
                    3 => variant.unit_variant().map(|_| TypeTag::U128),
                    4 => variant.unit_variant().map(|_| TypeTag::Address),
                    5 => variant.unit_variant().map(|_| TypeTag::Signer),
                    6 => variant.newtype_variant().map(TypeTag::Vector),
                    7 => variant.newtype_variant().map(TypeTag::Struct),
                    8 => variant.unit_variant().map(|_| TypeTag::U16),
                    9 => variant.unit_variant().map(|_| TypeTag::U32),
                    10 => variant.unit_variant().map(|_| TypeTag::U256),
                    _ => Err(de::Error::invalid_value(
                        de::Unexpected::Unsigned(index as u64),
                        &"a TypeTag variant index in 0..=10",
                    )),
                }
            }
        }

        deserializer.deserialize_enum("TypeTag", VARIANTS, TypeTagVisitor)
    }
}

/// An instantiated struct type: defining address, module, name, and type
/// arguments.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: Identifier,
    pub name: Identifier,
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(self.address, self.module.clone())
    }

    /// True for the well-known `0x1::<module>::<name>` instantiations the
    /// argument encoder special-cases.
    pub fn is_framework_struct(&self, module: &str, name: &str) -> bool {
        self.address == AccountAddress::ONE
            && self.module.as_str() == module
            && self.name.as_str() == name
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if let Some(first) = self.type_args.first() {
            write!(f, "<{}", first)?;
            for tag in self.type_args.iter().skip(1) {
                write!(f, ", {}", tag)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl FromStr for StructTag {
    type Err = parser::TypeTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_struct_tag(s)
    }
}

/// The identifier of a published module.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: Identifier,
}

impl ModuleId {
    pub fn new(address: AccountAddress, name: Identifier) -> Self {
        ModuleId { address, name }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_store() -> StructTag {
        StructTag {
            address: AccountAddress::ONE,
            module: Identifier::new("coin").unwrap(),
            name: Identifier::new("CoinStore").unwrap(),
            type_args: vec![TypeTag::struct_tag(StructTag {
                address: AccountAddress::ONE,
                module: Identifier::new("aptos_coin").unwrap(),
                name: Identifier::new("AptosCoin").unwrap(),
                type_args: vec![],
            })],
        }
    }

    #[test]
    fn display_forms() {
        assert_eq!(TypeTag::vector(TypeTag::U8).to_string(), "vector<u8>");
        assert_eq!(
            coin_store().to_string(),
            "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>"
        );
        assert_eq!(
            TypeTag::Reference(Box::new(TypeTag::U64)).to_string(),
            "&u64"
        );
        assert_eq!(TypeTag::Generic(2).to_string(), "T2");
    }

    #[test]
    fn wire_variant_indices() {
        assert_eq!(aptos_bcs::to_bytes(&TypeTag::Bool).unwrap(), vec![0]);
        assert_eq!(aptos_bcs::to_bytes(&TypeTag::U256).unwrap(), vec![10]);
        assert_eq!(
            aptos_bcs::to_bytes(&TypeTag::vector(TypeTag::U8)).unwrap(),
            vec![6, 1]
        );
        let tag = TypeTag::struct_tag(coin_store());
        let bytes = aptos_bcs::to_bytes(&tag).unwrap();
        assert_eq!(bytes[0], 7);
        assert_eq!(aptos_bcs::from_bytes::<TypeTag>(&bytes).unwrap(), tag);
    }

    #[test]
    fn parser_level_tags_refuse_to_serialize() {
        assert!(aptos_bcs::to_bytes(&TypeTag::Reference(Box::new(TypeTag::U8))).is_err());
        assert!(aptos_bcs::to_bytes(&TypeTag::Generic(0)).is_err());
    }
}
