// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for robomsg.
//!
//! Errors are split by the phase that raises them:
//! - [`SchemaError`] - type resolution (unknown type, malformed field, recursion)
//! - [`CodecError`] - binary and JSON encoding/decoding, always tagged with a [`FieldPath`]
//! - [`Error`] - the crate-level union of both plus configuration failures

use std::fmt;

/// One step of a field path: a field name or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named field of a message
    Field(String),
    /// Element of an array field
    Index(usize),
}

/// Location of a value inside a (possibly nested) message.
///
/// Rendered as `pose.position.x` or `points[3].y`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Create an empty path (the message itself).
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the path points at the message root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the path segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<message>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Errors raised while resolving a schema into a message type.
///
/// Always fatal to the resolution call that raised it; no partial type is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Type name not known to the schema source or the well-known types
    #[error("unknown message type '{type_name}'")]
    UnknownType {
        /// Fully-qualified type name that was looked up
        type_name: String,
    },

    /// Field specification rejected during resolution
    #[error("malformed field '{field}' in '{type_name}': {reason}")]
    MalformedField {
        /// Type owning the field
        type_name: String,
        /// Field name as given by the source
        field: String,
        /// Why the field was rejected
        reason: String,
    },

    /// Type reachable from itself
    #[error("recursive message type '{type_name}' (chain: {})", .chain.join(" -> "))]
    Recursive {
        /// Type that appeared twice
        type_name: String,
        /// Resolution chain from the top-level type to the repeated one
        chain: Vec<String>,
    },

    /// Schema source collaborator failed
    #[error("schema source failed for '{type_name}': {message}")]
    Source {
        /// Type being loaded
        type_name: String,
        /// Collaborator's error message
        message: String,
    },

    /// Schema cache lock was poisoned by a panicking writer
    #[error("schema cache lock poisoned")]
    CachePoisoned,
}

impl SchemaError {
    /// Create an unknown type error.
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        SchemaError::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Create a malformed field error.
    pub fn malformed_field(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SchemaError::MalformedField {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema source error.
    pub fn source(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Source {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// What went wrong in a codec operation.
#[derive(Debug, thiserror::Error)]
pub enum CodecErrorKind {
    /// Buffer ended before the value was complete
    #[error("unexpected end of buffer: requested {requested} bytes, {available} available")]
    UnexpectedEof {
        /// Bytes needed
        requested: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Declared array count cannot be satisfied
    #[error("array length {length} exceeds limit {limit}")]
    LengthExceeded {
        /// Count read from the wire
        length: usize,
        /// Largest count the remaining data or configuration allows
        limit: usize,
    },

    /// Runtime value disagrees with its field descriptor
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// What the schema requires
        expected: String,
        /// What was supplied
        found: String,
    },

    /// JSON key with no matching field
    #[error("unknown field '{name}'")]
    UnknownField {
        /// Offending key
        name: String,
    },

    /// Time or duration object lacking `Sec` or `NSec`
    #[error("time/duration object is missing '{name}'")]
    MissingTemporalField {
        /// Missing key
        name: &'static str,
    },

    /// JSON document could not be parsed or produced
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Wire string bytes are not valid UTF-8
    #[error("string is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 {
        /// Length of the valid prefix
        valid_up_to: usize,
    },

    /// Byte array string is not valid base64
    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    /// Float string is neither a number nor a sentinel
    #[error("invalid float literal '{0}'")]
    InvalidFloat(String),

    /// JSON number does not fit the field's integer width
    #[error("value {value} out of range for {target}")]
    OutOfRange {
        /// Rendered JSON number
        value: String,
        /// Target primitive name
        target: &'static str,
    },

    /// Underlying writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Codec failure tagged with the path of the offending field.
#[derive(Debug, thiserror::Error)]
#[error("field '{path}': {kind}")]
pub struct CodecError {
    path: FieldPath,
    #[source]
    kind: CodecErrorKind,
}

impl CodecError {
    /// Create an error at the message root.
    pub fn new(kind: CodecErrorKind) -> Self {
        Self {
            path: FieldPath::new(),
            kind,
        }
    }

    /// Create an unexpected end of buffer error.
    pub fn eof(requested: usize, available: usize) -> Self {
        Self::new(CodecErrorKind::UnexpectedEof {
            requested,
            available,
        })
    }

    /// Create a length exceeded error.
    pub fn length_exceeded(length: usize, limit: usize) -> Self {
        Self::new(CodecErrorKind::LengthExceeded { length, limit })
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::new(CodecErrorKind::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Create an unknown field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::new(CodecErrorKind::UnknownField { name: name.into() })
    }

    /// Create a missing `Sec`/`NSec` error.
    pub fn missing_temporal(name: &'static str) -> Self {
        Self::new(CodecErrorKind::MissingTemporalField { name })
    }

    /// Create an invalid JSON error.
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(CodecErrorKind::InvalidJson(message.into()))
    }

    /// Create an invalid UTF-8 error.
    pub fn invalid_utf8(valid_up_to: usize) -> Self {
        Self::new(CodecErrorKind::InvalidUtf8 { valid_up_to })
    }

    /// Create an invalid base64 error.
    pub fn invalid_base64(message: impl Into<String>) -> Self {
        Self::new(CodecErrorKind::InvalidBase64(message.into()))
    }

    /// Create an invalid float literal error.
    pub fn invalid_float(literal: impl Into<String>) -> Self {
        Self::new(CodecErrorKind::InvalidFloat(literal.into()))
    }

    /// Create an integer out of range error.
    pub fn out_of_range(value: impl fmt::Display, target: &'static str) -> Self {
        Self::new(CodecErrorKind::OutOfRange {
            value: value.to_string(),
            target,
        })
    }

    /// Prefix the path with a field name (used while unwinding out of a message).
    #[must_use]
    pub fn at(mut self, field: &str) -> Self {
        self.path.prepend(PathSegment::Field(field.to_string()));
        self
    }

    /// Prefix the path with an array index.
    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.prepend(PathSegment::Index(index));
        self
    }

    /// Get the path of the offending field.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Get the failure kind.
    pub fn kind(&self) -> &CodecErrorKind {
        &self.kind
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("field", self.path.to_string())];
        match &self.kind {
            CodecErrorKind::UnexpectedEof {
                requested,
                available,
            } => {
                fields.push(("requested", requested.to_string()));
                fields.push(("available", available.to_string()));
            }
            CodecErrorKind::LengthExceeded { length, limit } => {
                fields.push(("length", length.to_string()));
                fields.push(("limit", limit.to_string()));
            }
            CodecErrorKind::TypeMismatch { expected, found } => {
                fields.push(("expected", expected.clone()));
                fields.push(("found", found.clone()));
            }
            CodecErrorKind::UnknownField { name } => fields.push(("key", name.clone())),
            CodecErrorKind::MissingTemporalField { name } => {
                fields.push(("missing", (*name).to_string()))
            }
            CodecErrorKind::InvalidUtf8 { valid_up_to } => {
                fields.push(("valid_up_to", valid_up_to.to_string()))
            }
            CodecErrorKind::InvalidJson(msg)
            | CodecErrorKind::InvalidBase64(msg)
            | CodecErrorKind::InvalidFloat(msg) => fields.push(("message", msg.clone())),
            CodecErrorKind::OutOfRange { value, target } => {
                fields.push(("value", value.clone()));
                fields.push(("target", (*target).to_string()));
            }
            CodecErrorKind::Io(err) => fields.push(("io", err.to_string())),
        }
        fields
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::new(CodecErrorKind::Io(err))
    }
}

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Schema resolution failed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Encoding or decoding failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Configuration could not be loaded
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for robomsg operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_display() {
        let err = CodecError::eof(4, 1).at("x").at_index(3).at("points");
        assert_eq!(err.path().to_string(), "points[3].x");
        assert_eq!(
            err.to_string(),
            "field 'points[3].x': unexpected end of buffer: requested 4 bytes, 1 available"
        );
    }

    #[test]
    fn test_root_path_display() {
        let err = CodecError::unknown_field("bogus");
        assert!(err.path().is_empty());
        assert_eq!(err.to_string(), "field '<message>': unknown field 'bogus'");
    }

    #[test]
    fn test_recursive_error_display() {
        let err = SchemaError::Recursive {
            type_name: "test/A".to_string(),
            chain: vec!["test/A".to_string(), "test/B".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "recursive message type 'test/A' (chain: test/A -> test/B)"
        );
    }

    #[test]
    fn test_malformed_field_display() {
        let err = SchemaError::malformed_field("test/Msg", "x", "empty type");
        assert_eq!(
            err.to_string(),
            "malformed field 'x' in 'test/Msg': empty type"
        );
    }

    #[test]
    fn test_log_fields_type_mismatch() {
        let err = CodecError::type_mismatch("int32", "string").at("value");
        let fields = err.log_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("field", "value".to_string()));
        assert_eq!(fields[1], ("expected", "int32".to_string()));
        assert_eq!(fields[2], ("found", "string".to_string()));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: CodecError = io_err.into();
        assert!(matches!(err.kind(), CodecErrorKind::Io(_)));
        assert_eq!(
            err.at("data").to_string(),
            "field 'data': I/O error: pipe closed"
        );
    }

    #[test]
    fn test_crate_error_transparent() {
        let err: Error = SchemaError::unknown_type("pkg/Missing").into();
        assert_eq!(err.to_string(), "unknown message type 'pkg/Missing'");
    }
}
