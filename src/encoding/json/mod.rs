// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON encoding and decoding of message instances.
//!
//! The JSON form is lossless against the wire form:
//! - `uint8` arrays are standard base64 strings
//! - non-finite floats are the strings `"nan"`, `"+inf"` and `"-inf"`
//! - `time` and `duration` are `{"Sec": u32, "NSec": u32}` objects
//! - object keys follow field declaration order

pub mod decoder;
pub mod encoder;
pub mod schema;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;

/// Key of the seconds part of a time or duration object.
pub const SEC_KEY: &str = "Sec";

/// Key of the nanoseconds part of a time or duration object.
pub const NSEC_KEY: &str = "NSec";

/// Sentinel string for NaN.
pub const NAN_LITERAL: &str = "nan";

/// Sentinel string for positive infinity.
pub const POS_INF_LITERAL: &str = "+inf";

/// Sentinel string for negative infinity.
pub const NEG_INF_LITERAL: &str = "-inf";
