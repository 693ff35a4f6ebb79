// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Resolved field descriptors.

use std::fmt;

/// Builtin ROS1 primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Boolean
    Bool,
    /// 8-bit signed integer (also `byte`)
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 8-bit unsigned integer (also `char`)
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
    /// Length-prefixed byte string
    String,
    /// Timestamp (sec:uint32, nsec:uint32)
    Time,
    /// Duration (sec:uint32, nsec:uint32)
    Duration,
}

impl PrimitiveType {
    /// Parse a builtin type token, normalizing the deprecated ROS1 aliases.
    pub fn try_from_str(s: &str) -> Option<Self> {
        match s {
            "bool" => Some(PrimitiveType::Bool),
            "int8" | "byte" => Some(PrimitiveType::Int8),
            "int16" => Some(PrimitiveType::Int16),
            "int32" => Some(PrimitiveType::Int32),
            "int64" => Some(PrimitiveType::Int64),
            "uint8" | "char" => Some(PrimitiveType::UInt8),
            "uint16" => Some(PrimitiveType::UInt16),
            "uint32" => Some(PrimitiveType::UInt32),
            "uint64" => Some(PrimitiveType::UInt64),
            "float32" => Some(PrimitiveType::Float32),
            "float64" => Some(PrimitiveType::Float64),
            "string" => Some(PrimitiveType::String),
            "time" => Some(PrimitiveType::Time),
            "duration" => Some(PrimitiveType::Duration),
            _ => None,
        }
    }

    /// Canonical schema token.
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Int8 => "int8",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::UInt8 => "uint8",
            PrimitiveType::UInt16 => "uint16",
            PrimitiveType::UInt32 => "uint32",
            PrimitiveType::UInt64 => "uint64",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::String => "string",
            PrimitiveType::Time => "time",
            PrimitiveType::Duration => "duration",
        }
    }

    /// Encoded size in bytes, if fixed.
    pub fn size(self) -> Option<usize> {
        match self {
            PrimitiveType::Bool | PrimitiveType::Int8 | PrimitiveType::UInt8 => Some(1),
            PrimitiveType::Int16 | PrimitiveType::UInt16 => Some(2),
            PrimitiveType::Int32 | PrimitiveType::UInt32 | PrimitiveType::Float32 => Some(4),
            PrimitiveType::Int64 | PrimitiveType::UInt64 | PrimitiveType::Float64 => Some(8),
            PrimitiveType::Time | PrimitiveType::Duration => Some(8),
            PrimitiveType::String => None,
        }
    }

    /// Smallest possible encoded size (an empty string is its 4-byte length prefix).
    pub fn min_size(self) -> usize {
        self.size().unwrap_or(4)
    }

    /// Check if this is a floating-point type.
    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveType::Float32 | PrimitiveType::Float64)
    }

    /// Check if this is an integer type (signed or unsigned).
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveType::Int8
                | PrimitiveType::Int16
                | PrimitiveType::Int32
                | PrimitiveType::Int64
                | PrimitiveType::UInt8
                | PrimitiveType::UInt16
                | PrimitiveType::UInt32
                | PrimitiveType::UInt64
        )
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Array shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Single value
    Scalar,
    /// Variable-length array, count carried on the wire
    Dynamic,
    /// Fixed-length array, count implied by the schema
    Fixed(usize),
}

impl Cardinality {
    /// Build from the schema source's `(is_array, array_length)` pair.
    ///
    /// Returns `None` for the contradictory `is_array && array_length == 0`.
    pub fn from_raw(is_array: bool, array_length: i32) -> Option<Self> {
        if !is_array {
            return Some(Cardinality::Scalar);
        }
        match array_length {
            n if n < 0 => Some(Cardinality::Dynamic),
            0 => None,
            n => usize::try_from(n).ok().map(Cardinality::Fixed),
        }
    }

    /// Integer form: `0` scalar, `-1` dynamic, `n` fixed.
    pub fn array_length(self) -> i64 {
        match self {
            Cardinality::Scalar => 0,
            Cardinality::Dynamic => -1,
            Cardinality::Fixed(n) => n as i64,
        }
    }

    /// Check if this is an array (fixed or dynamic).
    pub fn is_array(self) -> bool {
        !matches!(self, Cardinality::Scalar)
    }
}

/// Index of a message spec inside its type graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

/// What a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Builtin primitive
    Builtin(PrimitiveType),
    /// Nested message, resolved in the owning graph
    Message(TypeId),
}

/// Static description of one schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) declared_type: String,
    pub(crate) package: String,
    pub(crate) kind: FieldKind,
    pub(crate) cardinality: Cardinality,
}

impl FieldDescriptor {
    /// Field name, unique within the owning type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type token as given by the schema source.
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Package token as given by the schema source (may be empty).
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Resolved field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Array shape.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Normalized primitive tag, or `None` for nested messages.
    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self.kind {
            FieldKind::Builtin(prim) => Some(prim),
            FieldKind::Message(_) => None,
        }
    }

    /// Check if the field is a builtin primitive.
    pub fn is_builtin(&self) -> bool {
        matches!(self.kind, FieldKind::Builtin(_))
    }

    /// Check if the field is an array.
    pub fn is_array(&self) -> bool {
        self.cardinality.is_array()
    }

    /// Integer array length: `0` scalar, `-1` dynamic, `n` fixed.
    pub fn array_length(&self) -> i64 {
        self.cardinality.array_length()
    }

    /// Check if the field is a `uint8` array (bulk-encoded, base64 in JSON).
    pub fn is_byte_array(&self) -> bool {
        self.is_array() && self.kind == FieldKind::Builtin(PrimitiveType::UInt8)
    }
}
