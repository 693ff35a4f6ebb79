// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message encoding/decoding implementations.
//!
//! This module provides:
//! - [`wire`] - TCPROS little-endian binary encoding/decoding
//! - [`json`] - JSON marshal/unmarshal and JSON-Schema generation
//! - [`codec`] - Transport-facing message interface

pub mod codec;
pub mod json;
pub mod wire;

pub use codec::MessageCodec;
pub use json::{JsonDecoder, JsonEncoder};
pub use wire::{WireDecoder, WireEncoder};
