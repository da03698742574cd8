// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Field values and the literal grammar used by `set` commands
//!
//! A literal is classified by its first character:
//!
//! | first char            | meaning                              |
//! |-----------------------|--------------------------------------|
//! | `/`                   | path reference                       |
//! | `n` / `N`             | null                                 |
//! | `"`                   | quoted string                        |
//! | `t` / `T`             | boolean true                         |
//! | `f` / `F`             | boolean false                        |
//! | digit, `-` then digit | signed integer                       |

use super::error::{CatalogError, CatalogResult};
use super::node::NodeId;
use crate::schema::kinds::FieldType;

/// Value stored in a node field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Str(String),
    /// Integers and booleans
    Int(i64),
    /// Non-owning reference to another node; `None` is the null reference
    Ref(Option<NodeId>),
}

impl FieldValue {
    /// Default value for a field of the given declared type
    pub fn default_for(ty: FieldType) -> Self {
        match ty {
            FieldType::String | FieldType::Payload => FieldValue::Str(String::new()),
            FieldType::Integer | FieldType::Boolean => FieldValue::Int(0),
            FieldType::Reference => FieldValue::Ref(None),
        }
    }

    /// Value stored for a `null` literal
    pub fn null_for(ty: Option<FieldType>) -> Self {
        match ty {
            Some(FieldType::Reference) => FieldValue::Ref(None),
            _ => FieldValue::Int(0),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_int().map(|i| i != 0)
    }

    pub fn as_ref_id(&self) -> Option<NodeId> {
        match self {
            FieldValue::Ref(id) => *id,
            _ => None,
        }
    }
}

/// Parsed form of a `set` literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal<'a> {
    Path(&'a str),
    Null,
    Str(&'a str),
    Bool(bool),
    Int(i64),
}

impl<'a> Literal<'a> {
    /// Parse `text` as the value for `field`
    pub fn parse(field: &str, text: &'a str) -> CatalogResult<Literal<'a>> {
        let invalid = || CatalogError::InvalidValue {
            field: field.to_string(),
            value: text.to_string(),
        };

        let mut chars = text.chars();
        let first = chars.next().ok_or_else(invalid)?;

        match first {
            '/' => Ok(Literal::Path(text)),
            'n' | 'N' => Ok(Literal::Null),
            '"' => {
                if text.len() < 2 || !text.ends_with('"') {
                    return Err(invalid());
                }
                Ok(Literal::Str(&text[1..text.len() - 1]))
            }
            't' | 'T' => Ok(Literal::Bool(true)),
            'f' | 'F' => Ok(Literal::Bool(false)),
            '-' if chars.next().is_some_and(|c| c.is_ascii_digit()) => {
                text.parse::<i64>().map(Literal::Int).map_err(|_| invalid())
            }
            c if c.is_ascii_digit() => text.parse::<i64>().map(Literal::Int).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

/// Quote a string value for the command protocol
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_dispatch() {
        assert_eq!(
            Literal::parse("f", "/clusters#c").unwrap(),
            Literal::Path("/clusters#c")
        );
        assert_eq!(Literal::parse("f", "null").unwrap(), Literal::Null);
        assert_eq!(Literal::parse("f", "NULL").unwrap(), Literal::Null);
        assert_eq!(Literal::parse("f", "\"a b\"").unwrap(), Literal::Str("a b"));
        assert_eq!(Literal::parse("f", "\"\"").unwrap(), Literal::Str(""));
        assert_eq!(Literal::parse("f", "true").unwrap(), Literal::Bool(true));
        assert_eq!(Literal::parse("f", "False").unwrap(), Literal::Bool(false));
        assert_eq!(Literal::parse("f", "42").unwrap(), Literal::Int(42));
        assert_eq!(Literal::parse("f", "-7").unwrap(), Literal::Int(-7));
    }

    #[test]
    fn test_invalid_literals() {
        for text in ["", "x", "-", "-x", "\"open", "\"", "12abc", "?"] {
            let err = Literal::parse("field", text).unwrap_err();
            assert!(
                matches!(err, CatalogError::InvalidValue { .. }),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_null_storage_depends_on_declared_type() {
        assert_eq!(
            FieldValue::null_for(Some(FieldType::Reference)),
            FieldValue::Ref(None)
        );
        assert_eq!(
            FieldValue::null_for(Some(FieldType::String)),
            FieldValue::Int(0)
        );
        assert_eq!(FieldValue::null_for(None), FieldValue::Int(0));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(FieldValue::Int(1).as_bool(), Some(true));
        assert_eq!(FieldValue::Int(0).as_bool(), Some(false));
        assert_eq!(FieldValue::Str("x".into()).as_str(), Some("x"));
        assert_eq!(FieldValue::Str("x".into()).as_int(), None);
        assert_eq!(FieldValue::Ref(None).as_ref_id(), None);
    }
}
