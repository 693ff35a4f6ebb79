// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Field value type system.
//!
//! Every field of a [`Message`] holds exactly one [`Value`]. The variant set mirrors the
//! builtin primitive set: one scalar and one homogeneous array variant per primitive, plus
//! nested messages and arrays of nested messages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::schema::PrimitiveType;

/// ROS time: seconds and nanoseconds since the epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    /// Seconds
    #[serde(rename = "Sec")]
    pub sec: u32,
    /// Nanoseconds
    #[serde(rename = "NSec")]
    pub nsec: u32,
}

impl Time {
    /// Create a time from seconds and nanoseconds.
    pub const fn new(sec: u32, nsec: u32) -> Self {
        Self { sec, nsec }
    }

    /// Total nanoseconds.
    pub fn as_nanos(&self) -> u64 {
        u64::from(self.sec) * 1_000_000_000 + u64::from(self.nsec)
    }
}

/// ROS duration: seconds and nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Duration {
    /// Seconds
    #[serde(rename = "Sec")]
    pub sec: u32,
    /// Nanoseconds
    #[serde(rename = "NSec")]
    pub nsec: u32,
}

impl Duration {
    /// Create a duration from seconds and nanoseconds.
    pub const fn new(sec: u32, nsec: u32) -> Self {
        Self { sec, nsec }
    }

    /// Total nanoseconds.
    pub fn as_nanos(&self) -> u64 {
        u64::from(self.sec) * 1_000_000_000 + u64::from(self.nsec)
    }
}

/// Value of one message field.
///
/// The concrete variant is determined by the field's descriptor: the primitive tag selects
/// the element type and the cardinality selects scalar or array.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Scalars
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Time(Time),
    Duration(Duration),
    Message(Message),

    // Arrays (fixed or dynamic, per descriptor)
    BoolArray(Vec<bool>),
    Int8Array(Vec<i8>),
    Int16Array(Vec<i16>),
    Int32Array(Vec<i32>),
    Int64Array(Vec<i64>),
    UInt8Array(Vec<u8>),
    UInt16Array(Vec<u16>),
    UInt32Array(Vec<u32>),
    UInt64Array(Vec<u64>),
    Float32Array(Vec<f32>),
    Float64Array(Vec<f64>),
    StringArray(Vec<String>),
    TimeArray(Vec<Time>),
    DurationArray(Vec<Duration>),
    MessageArray(Vec<Message>),
}

impl Value {
    /// Canonical zero value of a scalar primitive.
    pub fn zero_scalar(prim: PrimitiveType) -> Self {
        match prim {
            PrimitiveType::Bool => Value::Bool(false),
            PrimitiveType::Int8 => Value::Int8(0),
            PrimitiveType::Int16 => Value::Int16(0),
            PrimitiveType::Int32 => Value::Int32(0),
            PrimitiveType::Int64 => Value::Int64(0),
            PrimitiveType::UInt8 => Value::UInt8(0),
            PrimitiveType::UInt16 => Value::UInt16(0),
            PrimitiveType::UInt32 => Value::UInt32(0),
            PrimitiveType::UInt64 => Value::UInt64(0),
            PrimitiveType::Float32 => Value::Float32(0.0),
            PrimitiveType::Float64 => Value::Float64(0.0),
            PrimitiveType::String => Value::String(String::new()),
            PrimitiveType::Time => Value::Time(Time::default()),
            PrimitiveType::Duration => Value::Duration(Duration::default()),
        }
    }

    /// Array of `len` zero elements of a primitive.
    pub fn zero_array(prim: PrimitiveType, len: usize) -> Self {
        match prim {
            PrimitiveType::Bool => Value::BoolArray(vec![false; len]),
            PrimitiveType::Int8 => Value::Int8Array(vec![0; len]),
            PrimitiveType::Int16 => Value::Int16Array(vec![0; len]),
            PrimitiveType::Int32 => Value::Int32Array(vec![0; len]),
            PrimitiveType::Int64 => Value::Int64Array(vec![0; len]),
            PrimitiveType::UInt8 => Value::UInt8Array(vec![0; len]),
            PrimitiveType::UInt16 => Value::UInt16Array(vec![0; len]),
            PrimitiveType::UInt32 => Value::UInt32Array(vec![0; len]),
            PrimitiveType::UInt64 => Value::UInt64Array(vec![0; len]),
            PrimitiveType::Float32 => Value::Float32Array(vec![0.0; len]),
            PrimitiveType::Float64 => Value::Float64Array(vec![0.0; len]),
            PrimitiveType::String => Value::StringArray(vec![String::new(); len]),
            PrimitiveType::Time => Value::TimeArray(vec![Time::default(); len]),
            PrimitiveType::Duration => Value::DurationArray(vec![Duration::default(); len]),
        }
    }

    /// Schema-style name of this value's type, used in mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int8(_) => "int8",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt8(_) => "uint8",
            Value::UInt16(_) => "uint16",
            Value::UInt32(_) => "uint32",
            Value::UInt64(_) => "uint64",
            Value::Float32(_) => "float32",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Time(_) => "time",
            Value::Duration(_) => "duration",
            Value::Message(_) => "message",
            Value::BoolArray(_) => "bool[]",
            Value::Int8Array(_) => "int8[]",
            Value::Int16Array(_) => "int16[]",
            Value::Int32Array(_) => "int32[]",
            Value::Int64Array(_) => "int64[]",
            Value::UInt8Array(_) => "uint8[]",
            Value::UInt16Array(_) => "uint16[]",
            Value::UInt32Array(_) => "uint32[]",
            Value::UInt64Array(_) => "uint64[]",
            Value::Float32Array(_) => "float32[]",
            Value::Float64Array(_) => "float64[]",
            Value::StringArray(_) => "string[]",
            Value::TimeArray(_) => "time[]",
            Value::DurationArray(_) => "duration[]",
            Value::MessageArray(_) => "message[]",
        }
    }

    /// Primitive element type, or `None` for nested messages.
    pub fn primitive(&self) -> Option<PrimitiveType> {
        let prim = match self {
            Value::Bool(_) | Value::BoolArray(_) => PrimitiveType::Bool,
            Value::Int8(_) | Value::Int8Array(_) => PrimitiveType::Int8,
            Value::Int16(_) | Value::Int16Array(_) => PrimitiveType::Int16,
            Value::Int32(_) | Value::Int32Array(_) => PrimitiveType::Int32,
            Value::Int64(_) | Value::Int64Array(_) => PrimitiveType::Int64,
            Value::UInt8(_) | Value::UInt8Array(_) => PrimitiveType::UInt8,
            Value::UInt16(_) | Value::UInt16Array(_) => PrimitiveType::UInt16,
            Value::UInt32(_) | Value::UInt32Array(_) => PrimitiveType::UInt32,
            Value::UInt64(_) | Value::UInt64Array(_) => PrimitiveType::UInt64,
            Value::Float32(_) | Value::Float32Array(_) => PrimitiveType::Float32,
            Value::Float64(_) | Value::Float64Array(_) => PrimitiveType::Float64,
            Value::String(_) | Value::StringArray(_) => PrimitiveType::String,
            Value::Time(_) | Value::TimeArray(_) => PrimitiveType::Time,
            Value::Duration(_) | Value::DurationArray(_) => PrimitiveType::Duration,
            Value::Message(_) | Value::MessageArray(_) => return None,
        };
        Some(prim)
    }

    /// Check if this is one of the array variants.
    pub fn is_array(&self) -> bool {
        self.array_len().is_some()
    }

    /// Number of elements for array variants.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Value::BoolArray(v) => Some(v.len()),
            Value::Int8Array(v) => Some(v.len()),
            Value::Int16Array(v) => Some(v.len()),
            Value::Int32Array(v) => Some(v.len()),
            Value::Int64Array(v) => Some(v.len()),
            Value::UInt8Array(v) => Some(v.len()),
            Value::UInt16Array(v) => Some(v.len()),
            Value::UInt32Array(v) => Some(v.len()),
            Value::UInt64Array(v) => Some(v.len()),
            Value::Float32Array(v) => Some(v.len()),
            Value::Float64Array(v) => Some(v.len()),
            Value::StringArray(v) => Some(v.len()),
            Value::TimeArray(v) => Some(v.len()),
            Value::DurationArray(v) => Some(v.len()),
            Value::MessageArray(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Try to convert a numeric scalar to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int8(v) => Some(f64::from(*v)),
            Value::Int16(v) => Some(f64::from(*v)),
            Value::Int32(v) => Some(f64::from(*v)),
            Value::Int64(v) => Some(*v as f64),
            Value::UInt8(v) => Some(f64::from(*v)),
            Value::UInt16(v) => Some(f64::from(*v)),
            Value::UInt32(v) => Some(f64::from(*v)),
            Value::UInt64(v) => Some(*v as f64),
            Value::Float32(v) => Some(f64::from(*v)),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the inner string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the inner byte array.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::UInt8Array(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get the nested message.
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get a mutable reference to the nested message.
    pub fn as_message_mut(&mut self) -> Option<&mut Message> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get the nested message array.
    pub fn as_messages(&self) -> Option<&[Message]> {
        match self {
            Value::MessageArray(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get a mutable reference to the nested message array.
    pub fn as_messages_mut(&mut self) -> Option<&mut Vec<Message>> {
        match self {
            Value::MessageArray(m) => Some(m),
            _ => None,
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $scalar:ident, $array:ident;)*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$scalar(v)
                }
            }

            impl From<Vec<$ty>> for Value {
                fn from(v: Vec<$ty>) -> Self {
                    Value::$array(v)
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool, BoolArray;
    i8 => Int8, Int8Array;
    i16 => Int16, Int16Array;
    i32 => Int32, Int32Array;
    i64 => Int64, Int64Array;
    u8 => UInt8, UInt8Array;
    u16 => UInt16, UInt16Array;
    u32 => UInt32, UInt32Array;
    u64 => UInt64, UInt64Array;
    f32 => Float32, Float32Array;
    f64 => Float64, Float64Array;
    String => String, StringArray;
    Time => Time, TimeArray;
    Duration => Duration, DurationArray;
    Message => Message, MessageArray;
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.sec, self.nsec)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt8(v) => write!(f, "{v}"),
            Value::UInt16(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::Duration(v) => write!(f, "{v}"),
            Value::Message(v) => write!(f, "{v}"),
            Value::BoolArray(v) => write_list(f, v),
            Value::Int8Array(v) => write_list(f, v),
            Value::Int16Array(v) => write_list(f, v),
            Value::Int32Array(v) => write_list(f, v),
            Value::Int64Array(v) => write_list(f, v),
            Value::UInt8Array(v) => write_list(f, v),
            Value::UInt16Array(v) => write_list(f, v),
            Value::UInt32Array(v) => write_list(f, v),
            Value::UInt64Array(v) => write_list(f, v),
            Value::Float32Array(v) => write_list(f, v),
            Value::Float64Array(v) => write_list(f, v),
            Value::StringArray(v) => {
                let quoted: Vec<String> = v.iter().map(|s| format!("{s:?}")).collect();
                write_list(f, &quoted)
            }
            Value::TimeArray(v) => write_list(f, v),
            Value::DurationArray(v) => write_list(f, v),
            Value::MessageArray(v) => write_list(f, v),
        }
    }
}
