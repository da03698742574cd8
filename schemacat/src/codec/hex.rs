// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Uppercase hex encoding of binary payloads
//!
//! Serialized plans and expressions travel inside quoted `set` literals, one
//! byte per two hex digits.

use crate::catalog::error::{CatalogError, CatalogResult};

/// Encode bytes as uppercase hex
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Encode the UTF-8 bytes of a string as uppercase hex
pub fn hex_encode_str(text: &str) -> String {
    hex_encode(text.as_bytes())
}

/// Decode hex digits (either case) back into bytes
pub fn hex_decode(text: &str) -> CatalogResult<Vec<u8>> {
    Ok(hex::decode(text)?)
}

/// Decode hex digits into a UTF-8 string
pub fn hex_decode_to_string(text: &str) -> CatalogResult<String> {
    let bytes = hex_decode(text)?;
    String::from_utf8(bytes).map_err(|e| CatalogError::InvalidHex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_uppercase() {
        assert_eq!(hex_encode(&[0x00, 0xab, 0xff, 0x10]), "00ABFF10");
        assert_eq!(hex_encode(&[]), "");
        assert_eq!(hex_encode_str("{}"), "7B7D");
    }

    #[test]
    fn test_decode_accepts_both_cases() {
        assert_eq!(hex_decode("00ABff10").unwrap(), vec![0x00, 0xab, 0xff, 0x10]);
        assert_eq!(hex_decode_to_string("7B7D").unwrap(), "{}");
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(hex_decode("ABC"), Err(CatalogError::InvalidHex(_))));
        assert!(matches!(hex_decode("ZZ"), Err(CatalogError::InvalidHex(_))));
        assert!(matches!(
            hex_decode_to_string("FF"),
            Err(CatalogError::InvalidHex(_))
        ));
    }
}
