// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Encodings used to carry binary payloads through the text command protocol

pub mod hex;

pub use self::hex::{hex_decode, hex_decode_to_string, hex_encode, hex_encode_str};
