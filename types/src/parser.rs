// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for the textual type grammar:
//!
//! ```text
//! Tag    := Prim | "vector<" Tag ">" | "&" Tag | Generic | Struct
//! Prim   := "bool" | "u8" | "u16" | "u32" | "u64" | "u128" | "u256"
//!         | "address" | "signer"
//! Generic:= "T" digit+
//! Struct := Addr "::" Ident "::" Ident ( "<" Tag ("," Tag)* ">" )?
//! Addr   := "0x" hex+
//! ```
//!
//! Whitespace is permitted between tokens. `&mut` is not a type, primitives
//! take no type parameters, and every bracket must close.

use crate::{
    account_address::AccountAddress,
    identifier::Identifier,
    language_storage::{StructTag, TypeTag},
};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TypeTagParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected token {0:?}")]
    UnexpectedToken(String),
    #[error("trailing input after type tag: {0:?}")]
    TrailingInput(String),
    #[error("mutable references are not valid argument types")]
    MutableReference,
    #[error("invalid address {0:?}")]
    InvalidAddress(String),
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Token {
    /// A bare word: a primitive name, `vector`, a generic, or an identifier.
    Ident(String),
    /// A `0x`-prefixed address literal.
    Address(String),
    Lt,
    Gt,
    Comma,
    Amp,
    ColonColon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) | Token::Address(s) => write!(f, "{}", s),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Comma => write!(f, ","),
            Token::Amp => write!(f, "&"),
            Token::ColonColon => write!(f, "::"),
        }
    }
}

fn tokenize(s: &str) -> Result<Vec<Token>, TypeTagParseError> {
    let mut tokens = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            },
            '<' => {
                chars.next();
                tokens.push(Token::Lt);
            },
            '>' => {
                chars.next();
                tokens.push(Token::Gt);
            },
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            },
            '&' => {
                chars.next();
                tokens.push(Token::Amp);
            },
            ':' => {
                chars.next();
                if chars.next_if_eq(&':').is_some() {
                    tokens.push(Token::ColonColon);
                } else {
                    return Err(TypeTagParseError::InvalidCharacter(':'));
                }
            },
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(hex) = word.strip_prefix("0x") {
                    if hex.is_empty()
                        || hex.len() > AccountAddress::LENGTH * 2
                        || !hex.bytes().all(|b| b.is_ascii_hexdigit())
                    {
                        return Err(TypeTagParseError::InvalidAddress(word));
                    }
                    tokens.push(Token::Address(word));
                } else {
                    tokens.push(Token::Ident(word));
                }
            },
            c => return Err(TypeTagParseError::InvalidCharacter(c)),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Result<Token, TypeTagParseError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or(TypeTagParseError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> Result<(), TypeTagParseError> {
        let token = self.next()?;
        if &token == expected {
            Ok(())
        } else {
            Err(TypeTagParseError::UnexpectedToken(token.to_string()))
        }
    }

    fn parse_tag(&mut self) -> Result<TypeTag, TypeTagParseError> {
        match self.next()? {
            Token::Amp => {
                // `&mut T` is a borrow-checker concept, not a type argument.
                if let Some(Token::Ident(word)) = self.peek() {
                    if word == "mut" {
                        return Err(TypeTagParseError::MutableReference);
                    }
                }
                Ok(TypeTag::Reference(Box::new(self.parse_tag()?)))
            },
            Token::Ident(word) => self.parse_ident(word),
            Token::Address(literal) => self.parse_struct(literal).map(TypeTag::struct_tag),
            token => Err(TypeTagParseError::UnexpectedToken(token.to_string())),
        }
    }

    fn parse_ident(&mut self, word: String) -> Result<TypeTag, TypeTagParseError> {
        let tag = match word.as_str() {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            "vector" => {
                self.expect(&Token::Lt)?;
                let inner = self.parse_tag()?;
                self.expect(&Token::Gt)?;
                return Ok(TypeTag::vector(inner));
            },
            _ => {
                if let Some(index) = parse_generic_index(&word) {
                    return Ok(TypeTag::Generic(index));
                }
                return Err(TypeTagParseError::UnexpectedToken(word));
            },
        };
        // A primitive followed by `<` is a primitive with type parameters.
        if self.peek() == Some(&Token::Lt) {
            return Err(TypeTagParseError::UnexpectedToken(format!("{}<", word)));
        }
        Ok(tag)
    }

    fn parse_struct(&mut self, literal: String) -> Result<StructTag, TypeTagParseError> {
        let address = AccountAddress::from_hex_literal(&literal)
            .map_err(|_| TypeTagParseError::InvalidAddress(literal))?;
        self.expect(&Token::ColonColon)?;
        let module = self.parse_identifier()?;
        self.expect(&Token::ColonColon)?;
        let name = self.parse_identifier()?;

        let mut type_args = Vec::new();
        if self.peek() == Some(&Token::Lt) {
            self.next()?;
            loop {
                type_args.push(self.parse_tag()?);
                match self.next()? {
                    Token::Comma => continue,
                    Token::Gt => break,
                    token => return Err(TypeTagParseError::UnexpectedToken(token.to_string())),
                }
            }
        }
        Ok(StructTag {
            address,
            module,
            name,
            type_args,
        })
    }

    fn parse_identifier(&mut self) -> Result<Identifier, TypeTagParseError> {
        match self.next()? {
            Token::Ident(word) => {
                Identifier::new(word.clone()).map_err(|_| TypeTagParseError::InvalidIdentifier(word))
            },
            token => Err(TypeTagParseError::UnexpectedToken(token.to_string())),
        }
    }

    fn expect_end(&self) -> Result<(), TypeTagParseError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(TypeTagParseError::TrailingInput(token.to_string())),
        }
    }
}

/// Parses a single type tag, requiring the whole input to be consumed.
pub fn parse_type_tag(s: &str) -> Result<TypeTag, TypeTagParseError> {
    let mut parser = Parser {
        tokens: tokenize(s)?,
        position: 0,
    };
    let tag = parser.parse_tag()?;
    parser.expect_end()?;
    Ok(tag)
}

/// Parses a fully qualified struct tag such as `0x1::coin::CoinStore<T>`.
pub fn parse_struct_tag(s: &str) -> Result<StructTag, TypeTagParseError> {
    match parse_type_tag(s)? {
        TypeTag::Struct(tag) => Ok(*tag),
        tag => Err(TypeTagParseError::UnexpectedToken(tag.to_string())),
    }
}

/// `T<digits>` produces a generic parameter index; anything else is an
/// ordinary identifier.
fn parse_generic_index(word: &str) -> Option<u64> {
    let digits = word.strip_prefix('T')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn primitives() {
        for (input, expected) in [
            ("bool", TypeTag::Bool),
            ("u8", TypeTag::U8),
            ("u16", TypeTag::U16),
            ("u32", TypeTag::U32),
            ("u64", TypeTag::U64),
            ("u128", TypeTag::U128),
            ("u256", TypeTag::U256),
            ("address", TypeTag::Address),
            ("signer", TypeTag::Signer),
        ] {
            assert_eq!(parse_type_tag(input).unwrap(), expected);
        }
    }

    #[test]
    fn vectors_and_references() {
        assert_eq!(
            parse_type_tag("vector<u8>").unwrap(),
            TypeTag::vector(TypeTag::U8)
        );
        assert_eq!(
            parse_type_tag("vector< vector<address> >").unwrap(),
            TypeTag::vector(TypeTag::vector(TypeTag::Address))
        );
        assert_eq!(
            parse_type_tag("&u8").unwrap(),
            TypeTag::Reference(Box::new(TypeTag::U8))
        );
        assert_eq!(parse_type_tag("T3").unwrap(), TypeTag::Generic(3));
    }

    #[test]
    fn structs() {
        let tag = parse_type_tag("0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>").unwrap();
        match tag {
            TypeTag::Struct(outer) => {
                assert_eq!(outer.address, crate::AccountAddress::ONE);
                assert_eq!(outer.module.as_str(), "coin");
                assert_eq!(outer.name.as_str(), "CoinStore");
                assert_eq!(outer.type_args.len(), 1);
                match &outer.type_args[0] {
                    TypeTag::Struct(inner) => {
                        assert_eq!(inner.module.as_str(), "aptos_coin");
                        assert_eq!(inner.name.as_str(), "AptosCoin");
                        assert!(inner.type_args.is_empty());
                    },
                    other => panic!("expected struct, got {}", other),
                }
            },
            other => panic!("expected struct, got {}", other),
        }

        let multi = parse_type_tag("0x1::pair::Pair<u8, vector<u64>>").unwrap();
        assert_eq!(
            multi.to_string(),
            "0x1::pair::Pair<u8, vector<u64>>"
        );
    }

    #[test]
    fn whitespace_is_permitted_between_tokens() {
        assert_eq!(
            parse_type_tag(" 0x1 :: coin :: CoinStore < u8 > ").unwrap().to_string(),
            "0x1::coin::CoinStore<u8>"
        );
    }

    #[test]
    fn negative_grammar_cases() {
        for bad in [
            "",
            " ",
            "vector<u8",
            "vector<u8>>",
            "vector<>",
            "u8>",
            "u8,",
            ",u8",
            "&mut u8",
            "u8<u8>",
            "vector<u8<u8>>",
            "0x1::coin",
            "0x1:coin:CoinStore",
            "0x1::coin::CoinStore<",
            "0x1::coin::CoinStore<u8,>",
            "0x1::coin::CoinStore<,u8>",
            "0x1::1coin::CoinStore",
            "0x1::coin::2Store",
            "0xzz::coin::CoinStore",
            "1::coin::CoinStore",
            "not_a_type",
            "T",
            "Tx",
        ] {
            assert!(parse_type_tag(bad).is_err(), "{:?} should fail", bad);
        }
    }

    #[test]
    fn address_length_is_bounded() {
        let long = format!("0x{}::m::S", "a".repeat(65));
        assert!(matches!(
            parse_type_tag(&long),
            Err(TypeTagParseError::InvalidAddress(_))
        ));
        let max = format!("0x{}::m::S", "a".repeat(64));
        assert!(parse_type_tag(&max).is_ok());
    }

    proptest! {
        /// The printed form of any parseable tag parses back to an equal tag.
        #[test]
        fn print_parse_roundtrip(tag in arbitrary_type_tag(3)) {
            let printed = tag.to_string();
            prop_assert_eq!(parse_type_tag(&printed).unwrap(), tag);
        }
    }

    fn arbitrary_type_tag(depth: u32) -> impl Strategy<Value = TypeTag> {
        let leaf = prop_oneof![
            Just(TypeTag::Bool),
            Just(TypeTag::U8),
            Just(TypeTag::U64),
            Just(TypeTag::U256),
            Just(TypeTag::Address),
            Just(TypeTag::Signer),
            (0u64..10).prop_map(TypeTag::Generic),
        ];
        leaf.prop_recursive(depth, 16, 4, |inner| {
            prop_oneof![
                inner.clone().prop_map(TypeTag::vector),
                inner
                    .clone()
                    .prop_map(|t| TypeTag::Reference(Box::new(t))),
                (prop::collection::vec(inner, 0..3), any::<[u8; 32]>()).prop_map(
                    |(type_args, addr)| {
                        TypeTag::struct_tag(StructTag {
                            address: crate::AccountAddress::new(addr),
                            module: Identifier::new("generated").unwrap(),
                            name: Identifier::new("Tag").unwrap(),
                            type_args,
                        })
                    }
                ),
            ]
        })
    }
}
