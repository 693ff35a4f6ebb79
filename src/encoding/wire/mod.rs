// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! TCPROS wire format.
//!
//! Fields are written in declaration order, little-endian, with no alignment padding:
//!
//! | Field | Encoding |
//! |---|---|
//! | `bool`, `int8`, `uint8` | 1 byte |
//! | `int16`..`uint64`, `float32`, `float64` | N/8 bytes |
//! | `string` | `u32` byte length, then the bytes |
//! | `time`, `duration` | `u32` sec, `u32` nsec |
//! | `T[]` | `u32` element count, then the elements |
//! | `T[N]` | exactly N elements, no prefix |
//! | nested message | its fields, inline |

pub mod decoder;
pub mod encoder;

pub use decoder::WireDecoder;
pub use encoder::WireEncoder;

use crate::core::Value;
use crate::message::Message;
use crate::schema::{Cardinality, FieldDescriptor, FieldKind, MessageType};

/// Size of a length or count prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Exact number of bytes [`WireEncoder`] writes for a message.
///
/// Follows the encoder's fixed-array rules: short arrays count their zero padding, long
/// arrays count only the first N elements.
pub fn encoded_len(msg: &Message) -> usize {
    let owner = msg.msg_type();
    msg.fields()
        .map(|(field, value)| field_len(owner, field, value))
        .sum()
}

fn field_len(owner: &MessageType, field: &FieldDescriptor, value: &Value) -> usize {
    match field.cardinality() {
        Cardinality::Scalar => scalar_len(value),
        Cardinality::Dynamic => LENGTH_PREFIX_SIZE + elements_len(value, usize::MAX),
        Cardinality::Fixed(n) => {
            let present = value.array_len().unwrap_or(0).min(n);
            let padding = (n - present) * zero_element_len(owner, field);
            elements_len(value, n) + padding
        }
    }
}

fn scalar_len(value: &Value) -> usize {
    match value {
        Value::String(s) => LENGTH_PREFIX_SIZE + s.len(),
        Value::Message(m) => encoded_len(m),
        other => other.primitive().and_then(|p| p.size()).unwrap_or(0),
    }
}

/// Size of the first `limit` elements of an array value.
fn elements_len(value: &Value, limit: usize) -> usize {
    match value {
        Value::StringArray(v) => v
            .iter()
            .take(limit)
            .map(|s| LENGTH_PREFIX_SIZE + s.len())
            .sum(),
        Value::MessageArray(v) => v.iter().take(limit).map(encoded_len).sum(),
        other => {
            let count = other.array_len().unwrap_or(0).min(limit);
            let element = other.primitive().and_then(|p| p.size()).unwrap_or(0);
            count * element
        }
    }
}

fn zero_element_len(owner: &MessageType, field: &FieldDescriptor) -> usize {
    match field.kind() {
        FieldKind::Builtin(prim) => prim.min_size(),
        FieldKind::Message(id) => owner.child(id).min_wire_size(),
    }
}
