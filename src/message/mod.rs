// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message instances.
//!
//! A [`Message`] pairs a resolved [`MessageType`] with one [`Value`] per field, stored in
//! declaration order. The value slots are created from the schema, so an instance always
//! carries exactly the schema's fields.

use std::fmt;
use std::io::Write;

use crate::core::{CodecError, Value};
use crate::encoding::json::{JsonDecoder, JsonEncoder};
use crate::encoding::wire::{self, WireDecoder, WireEncoder};
use crate::schema::{Cardinality, FieldDescriptor, FieldKind, MessageType};

/// Dynamically typed message instance.
#[derive(Debug, Clone)]
pub struct Message {
    msg_type: MessageType,
    values: Vec<Value>,
}

impl Message {
    /// Create a zero-valued instance of a type.
    ///
    /// Scalars are zero, false or empty; fixed arrays hold N zero elements; dynamic arrays
    /// are empty; nested messages are zero-valued recursively.
    pub fn new(msg_type: &MessageType) -> Self {
        let values = msg_type
            .fields()
            .iter()
            .map(|field| zero_value(msg_type, field))
            .collect();
        Self {
            msg_type: msg_type.clone(),
            values,
        }
    }

    pub(crate) fn from_parts(msg_type: MessageType, values: Vec<Value>) -> Self {
        debug_assert_eq!(msg_type.fields().len(), values.len());
        Self { msg_type, values }
    }

    /// Get the message type.
    pub fn msg_type(&self) -> &MessageType {
        &self.msg_type
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.msg_type.field_index(name).map(|idx| &self.values[idx])
    }

    /// Get a mutable field value by name.
    ///
    /// Replacing the value with a different variant is caught when the message is encoded.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.msg_type
            .field_index(name)
            .map(move |idx| &mut self.values[idx])
    }

    /// Set a field value, checking it against the field's descriptor.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CodecError> {
        let idx = self
            .msg_type
            .field_index(name)
            .ok_or_else(|| CodecError::unknown_field(name))?;
        let value = value.into();
        check_value(&self.msg_type, &self.msg_type.fields()[idx], &value)
            .map_err(|e| e.at(name))?;
        self.values[idx] = value;
        Ok(())
    }

    /// Iterate over fields and their values in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &Value)> {
        self.msg_type.fields().iter().zip(self.values.iter())
    }

    /// Get all values in declaration order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Write the wire form to a sink.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<(), CodecError> {
        WireEncoder::new(writer).encode(self)
    }

    /// Encode the wire form into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::with_capacity(self.wire_size());
        self.serialize(&mut buf)?;
        Ok(buf)
    }

    /// Exact length of the wire form.
    pub fn wire_size(&self) -> usize {
        wire::encoded_len(self)
    }

    /// Replace this instance's values with the ones decoded from a frame.
    ///
    /// Returns the number of bytes consumed. On error the instance is left unchanged.
    pub fn deserialize(&mut self, data: &[u8]) -> Result<usize, CodecError> {
        let mut decoder =
            WireDecoder::new(data).with_max_array_length(self.msg_type.max_array_length());
        let decoded = decoder.decode(&self.msg_type)?;
        self.values = decoded.values;
        Ok(decoder.position())
    }

    /// Decode a new instance from a frame.
    pub fn from_bytes(msg_type: &MessageType, data: &[u8]) -> Result<Self, CodecError> {
        WireDecoder::new(data)
            .with_max_array_length(msg_type.max_array_length())
            .decode(msg_type)
    }

    /// Marshal to a JSON document.
    pub fn to_json(&self) -> Result<Vec<u8>, CodecError> {
        JsonEncoder::new().encode(self)
    }

    /// Marshal to a JSON value tree.
    pub fn to_json_value(&self) -> Result<serde_json::Value, CodecError> {
        JsonEncoder::new().encode_value(self)
    }

    /// Replace this instance's values with the ones in a JSON document.
    ///
    /// Keys missing from the document keep their zero values. On error the instance is left
    /// unchanged.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<(), CodecError> {
        let decoded = JsonDecoder::new().decode(&self.msg_type, data)?;
        self.values = decoded.values;
        Ok(())
    }

    /// Unmarshal a new instance from a JSON document.
    pub fn from_json(msg_type: &MessageType, data: &[u8]) -> Result<Self, CodecError> {
        JsonDecoder::new().decode(msg_type, data)
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.msg_type == other.msg_type && self.values == other.values
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.msg_type.name())?;
        for (i, (field, value)) in self.fields().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", field.name(), value)?;
        }
        if self.values.is_empty() {
            write!(f, "}}")
        } else {
            write!(f, " }}")
        }
    }
}

/// Zero value of one field of `owner`.
pub(crate) fn zero_value(owner: &MessageType, field: &FieldDescriptor) -> Value {
    match (field.kind(), field.cardinality()) {
        (FieldKind::Builtin(prim), Cardinality::Scalar) => Value::zero_scalar(prim),
        (FieldKind::Builtin(prim), Cardinality::Dynamic) => Value::zero_array(prim, 0),
        (FieldKind::Builtin(prim), Cardinality::Fixed(n)) => Value::zero_array(prim, n),
        (FieldKind::Message(id), Cardinality::Scalar) => {
            Value::Message(Message::new(&owner.child(id)))
        }
        (FieldKind::Message(_), Cardinality::Dynamic) => Value::MessageArray(Vec::new()),
        (FieldKind::Message(id), Cardinality::Fixed(n)) => {
            let child = owner.child(id);
            Value::MessageArray((0..n).map(|_| Message::new(&child)).collect())
        }
    }
}

/// Schema-style name of a field's type (`int32[]`, `geometry_msgs/Point`).
pub(crate) fn expected_type_name(owner: &MessageType, field: &FieldDescriptor) -> String {
    let element = match field.kind() {
        FieldKind::Builtin(prim) => prim.as_str().to_string(),
        FieldKind::Message(id) => owner.child(id).name().to_string(),
    };
    match field.cardinality() {
        Cardinality::Scalar => element,
        Cardinality::Dynamic => format!("{element}[]"),
        Cardinality::Fixed(n) => format!("{element}[{n}]"),
    }
}

/// Check that a value's variant matches a field of `owner`.
///
/// Array lengths are not checked; fixed arrays are padded or truncated on encode.
pub(crate) fn check_value(
    owner: &MessageType,
    field: &FieldDescriptor,
    value: &Value,
) -> Result<(), CodecError> {
    let mismatch = || CodecError::type_mismatch(expected_type_name(owner, field), value.type_name());
    if field.is_array() != value.is_array() {
        return Err(mismatch());
    }
    match field.kind() {
        FieldKind::Builtin(prim) => {
            if value.primitive() != Some(prim) {
                return Err(mismatch());
            }
        }
        FieldKind::Message(id) => {
            let child = owner.child(id);
            match value {
                Value::Message(m) if m.msg_type() == &child => {}
                Value::MessageArray(items) => {
                    if let Some(pos) = items.iter().position(|m| m.msg_type() != &child) {
                        return Err(CodecError::type_mismatch(
                            child.name(),
                            items[pos].msg_type().name(),
                        )
                        .at_index(pos));
                    }
                }
                Value::Message(m) => {
                    return Err(CodecError::type_mismatch(child.name(), m.msg_type().name()));
                }
                _ => return Err(mismatch()),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::{CodecErrorKind, Time};
    use crate::schema::{MemorySchemaSource, RawField, RawSchema, Resolver, SchemaCache};

    fn resolve() -> MessageType {
        let source = MemorySchemaSource::new()
            .with(
                RawSchema::new("geometry_msgs/Point")
                    .field(RawField::new("x", "float64"))
                    .field(RawField::new("y", "float64")),
            )
            .with(
                RawSchema::new("test/Shape")
                    .field(RawField::new("header", "Header"))
                    .field(RawField::new("name", "string"))
                    .field(RawField::fixed_array("corners", "int16", 2))
                    .field(RawField::dynamic_array("tags", "string"))
                    .field(RawField::new("center", "geometry_msgs/Point"))
                    .field(RawField::fixed_array("ends", "geometry_msgs/Point", 2))
                    .field(RawField::dynamic_array("path", "geometry_msgs/Point")),
            );
        Resolver::with_cache(source, Arc::new(SchemaCache::new()))
            .resolve("test/Shape")
            .unwrap()
    }

    #[test]
    fn test_zero_values() {
        let ty = resolve();
        let msg = ty.new_message();

        assert_eq!(msg.get("name"), Some(&Value::String(String::new())));
        assert_eq!(msg.get("corners"), Some(&Value::Int16Array(vec![0, 0])));
        assert_eq!(msg.get("tags"), Some(&Value::StringArray(vec![])));
        assert_eq!(msg.get("path").and_then(Value::as_messages).map(<[_]>::len), Some(0));
        assert_eq!(msg.get("ends").and_then(Value::as_messages).map(<[_]>::len), Some(2));

        let header = msg.get("header").and_then(Value::as_message).unwrap();
        assert_eq!(header.msg_type().name(), "std_msgs/Header");
        assert_eq!(header.get("stamp"), Some(&Value::Time(Time::default())));

        let center = msg.get("center").and_then(Value::as_message).unwrap();
        assert_eq!(center.get("x"), Some(&Value::Float64(0.0)));
    }

    #[test]
    fn test_set_checks_type() {
        let ty = resolve();
        let mut msg = ty.new_message();
        msg.set("name", "box").unwrap();
        assert_eq!(msg.get("name").and_then(Value::as_str), Some("box"));

        let err = msg.set("name", 5i32).unwrap_err();
        assert_eq!(err.path().to_string(), "name");
        assert!(matches!(err.kind(), CodecErrorKind::TypeMismatch { expected, found }
            if expected == "string" && found == "int32"));

        let err = msg.set("corners", 1i16).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::TypeMismatch { expected, .. }
            if expected == "int16[2]"));

        let err = msg.set("missing", 1i16).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::UnknownField { .. }));
    }

    #[test]
    fn test_set_nested_message_type_checked() {
        let ty = resolve();
        let mut msg = ty.new_message();
        let point = ty.nested("geometry_msgs/Point").unwrap();
        msg.set("path", vec![point.new_message(), point.new_message()])
            .unwrap();

        let header = ty.nested("std_msgs/Header").unwrap().new_message();
        let err = msg.set("center", header).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::TypeMismatch { expected, found }
            if expected == "geometry_msgs/Point" && found == "std_msgs/Header"));
    }

    #[test]
    fn test_equality() {
        let ty = resolve();
        let mut a = ty.new_message();
        let b = ty.new_message();
        assert_eq!(a, b);
        a.set("corners", vec![1i16, 2]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let ty = resolve();
        let point = ty.nested("geometry_msgs/Point").unwrap();
        let mut msg = point.new_message();
        msg.set("x", 1.5f64).unwrap();
        assert_eq!(msg.to_string(), "geometry_msgs/Point { x: 1.5, y: 0 }");
    }
}
