// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON unmarshalling into message instances.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let ty: robomsg::MessageType = unimplemented!();
//! use robomsg::encoding::json::JsonDecoder;
//!
//! let msg = JsonDecoder::new().decode(&ty, br#"{"x": 1.0, "y": 2.0}"#)?;
//! # Ok(())
//! # }
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Value as JsonValue};

use super::{NAN_LITERAL, NEG_INF_LITERAL, NSEC_KEY, POS_INF_LITERAL, SEC_KEY};
use crate::core::{CodecError, Duration, Time, Value};
use crate::message::Message;
use crate::schema::{Cardinality, FieldDescriptor, FieldKind, MessageType, PrimitiveType};

/// JSON decoder for message instances.
///
/// Keys without a matching field are rejected. Keys missing from the document keep the
/// field's zero value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder {
    _private: (),
}

impl JsonDecoder {
    /// Create a new JSON decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode JSON bytes into a new message of the given type.
    pub fn decode(&self, msg_type: &MessageType, data: &[u8]) -> Result<Message, CodecError> {
        let value: JsonValue =
            serde_json::from_slice(data).map_err(|e| CodecError::invalid_json(e.to_string()))?;
        self.decode_value(msg_type, &value)
    }

    /// Decode a parsed JSON value into a new message of the given type.
    pub fn decode_value(
        &self,
        msg_type: &MessageType,
        value: &JsonValue,
    ) -> Result<Message, CodecError> {
        decode_message(msg_type, value)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn as_object<'v>(
    value: &'v JsonValue,
    expected: &str,
) -> Result<&'v Map<String, JsonValue>, CodecError> {
    value
        .as_object()
        .ok_or_else(|| CodecError::type_mismatch(expected, json_kind(value)))
}

fn decode_message(msg_type: &MessageType, value: &JsonValue) -> Result<Message, CodecError> {
    let obj = as_object(value, msg_type.name())?;
    let mut msg = Message::new(msg_type);
    for (key, item) in obj {
        let idx = msg_type
            .field_index(key)
            .ok_or_else(|| CodecError::unknown_field(key.as_str()))?;
        let field = &msg_type.fields()[idx];
        let decoded = decode_field(msg_type, field, item).map_err(|e| e.at(key))?;
        msg.values_mut()[idx] = decoded;
    }
    Ok(msg)
}

fn decode_field(
    owner: &MessageType,
    field: &FieldDescriptor,
    value: &JsonValue,
) -> Result<Value, CodecError> {
    match (field.kind(), field.cardinality()) {
        (FieldKind::Builtin(prim), Cardinality::Scalar) => decode_scalar(prim, value),
        (FieldKind::Builtin(PrimitiveType::UInt8), _) => decode_bytes(value),
        (FieldKind::Builtin(prim), _) => decode_array(prim, array_items(value)?),
        (FieldKind::Message(id), Cardinality::Scalar) => {
            Ok(Value::Message(decode_message(&owner.child(id), value)?))
        }
        (FieldKind::Message(id), _) => {
            let child = owner.child(id);
            let items = collect(array_items(value)?, |v| decode_message(&child, v))?;
            Ok(Value::MessageArray(items))
        }
    }
}

fn array_items(value: &JsonValue) -> Result<&[JsonValue], CodecError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| CodecError::type_mismatch("array", json_kind(value)))
}

fn collect<T>(
    items: &[JsonValue],
    decode: impl Fn(&JsonValue) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| decode(v).map_err(|e| e.at_index(i)))
        .collect()
}

fn decode_bytes(value: &JsonValue) -> Result<Value, CodecError> {
    let encoded = value
        .as_str()
        .ok_or_else(|| CodecError::type_mismatch("base64 string", json_kind(value)))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| CodecError::invalid_base64(e.to_string()))?;
    Ok(Value::UInt8Array(bytes))
}

fn decode_scalar(prim: PrimitiveType, value: &JsonValue) -> Result<Value, CodecError> {
    let decoded = match prim {
        PrimitiveType::Bool => Value::Bool(decode_bool(value)?),
        PrimitiveType::Int8 => Value::Int8(decode_int(value, "int8")?),
        PrimitiveType::Int16 => Value::Int16(decode_int(value, "int16")?),
        PrimitiveType::Int32 => Value::Int32(decode_int(value, "int32")?),
        PrimitiveType::Int64 => Value::Int64(decode_int(value, "int64")?),
        PrimitiveType::UInt8 => Value::UInt8(decode_int(value, "uint8")?),
        PrimitiveType::UInt16 => Value::UInt16(decode_int(value, "uint16")?),
        PrimitiveType::UInt32 => Value::UInt32(decode_int(value, "uint32")?),
        PrimitiveType::UInt64 => Value::UInt64(decode_int(value, "uint64")?),
        PrimitiveType::Float32 => Value::Float32(decode_float32(value)?),
        PrimitiveType::Float64 => Value::Float64(decode_float(value)?),
        PrimitiveType::String => Value::String(decode_string(value)?),
        PrimitiveType::Time => {
            let (sec, nsec) = decode_temporal(value)?;
            Value::Time(Time::new(sec, nsec))
        }
        PrimitiveType::Duration => {
            let (sec, nsec) = decode_temporal(value)?;
            Value::Duration(Duration::new(sec, nsec))
        }
    };
    Ok(decoded)
}

fn decode_array(prim: PrimitiveType, items: &[JsonValue]) -> Result<Value, CodecError> {
    let decoded = match prim {
        PrimitiveType::Bool => Value::BoolArray(collect(items, decode_bool)?),
        PrimitiveType::Int8 => Value::Int8Array(collect(items, |v| decode_int(v, "int8"))?),
        PrimitiveType::Int16 => Value::Int16Array(collect(items, |v| decode_int(v, "int16"))?),
        PrimitiveType::Int32 => Value::Int32Array(collect(items, |v| decode_int(v, "int32"))?),
        PrimitiveType::Int64 => Value::Int64Array(collect(items, |v| decode_int(v, "int64"))?),
        PrimitiveType::UInt8 => Value::UInt8Array(collect(items, |v| decode_int(v, "uint8"))?),
        PrimitiveType::UInt16 => {
            Value::UInt16Array(collect(items, |v| decode_int(v, "uint16"))?)
        }
        PrimitiveType::UInt32 => {
            Value::UInt32Array(collect(items, |v| decode_int(v, "uint32"))?)
        }
        PrimitiveType::UInt64 => {
            Value::UInt64Array(collect(items, |v| decode_int(v, "uint64"))?)
        }
        PrimitiveType::Float32 => {
            Value::Float32Array(collect(items, decode_float32)?)
        }
        PrimitiveType::Float64 => Value::Float64Array(collect(items, decode_float)?),
        PrimitiveType::String => Value::StringArray(collect(items, decode_string)?),
        PrimitiveType::Time => Value::TimeArray(collect(items, |v| {
            decode_temporal(v).map(|(sec, nsec)| Time::new(sec, nsec))
        })?),
        PrimitiveType::Duration => Value::DurationArray(collect(items, |v| {
            decode_temporal(v).map(|(sec, nsec)| Duration::new(sec, nsec))
        })?),
    };
    Ok(decoded)
}

fn decode_bool(value: &JsonValue) -> Result<bool, CodecError> {
    value
        .as_bool()
        .ok_or_else(|| CodecError::type_mismatch("bool", json_kind(value)))
}

fn decode_string(value: &JsonValue) -> Result<String, CodecError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CodecError::type_mismatch("string", json_kind(value)))
}

/// Integer field; the JSON number must be integral and fit the target width.
fn decode_int<T>(value: &JsonValue, target: &'static str) -> Result<T, CodecError>
where
    T: TryFrom<u64> + TryFrom<i64>,
{
    let number = value
        .as_number()
        .ok_or_else(|| CodecError::type_mismatch(target, json_kind(value)))?;
    if let Some(u) = number.as_u64() {
        <T as TryFrom<u64>>::try_from(u).map_err(|_| CodecError::out_of_range(number, target))
    } else if let Some(i) = number.as_i64() {
        <T as TryFrom<i64>>::try_from(i).map_err(|_| CodecError::out_of_range(number, target))
    } else {
        Err(CodecError::out_of_range(number, target))
    }
}

/// Float field; accepts numbers, the non-finite sentinels and numeric strings.
fn decode_float(value: &JsonValue) -> Result<f64, CodecError> {
    match value {
        JsonValue::Number(n) => n
            .as_f64()
            .ok_or_else(|| CodecError::invalid_float(n.to_string())),
        JsonValue::String(s) => match s.as_str() {
            NAN_LITERAL => Ok(f64::NAN),
            POS_INF_LITERAL => Ok(f64::INFINITY),
            NEG_INF_LITERAL => Ok(f64::NEG_INFINITY),
            other => other
                .trim()
                .parse::<f64>()
                .map_err(|_| CodecError::invalid_float(other)),
        },
        other => Err(CodecError::type_mismatch("number", json_kind(other))),
    }
}

/// Float32 field; finite inputs beyond the f32 range are rejected rather than saturated.
fn decode_float32(value: &JsonValue) -> Result<f32, CodecError> {
    let wide = decode_float(value)?;
    let narrow = wide as f32;
    if wide.is_finite() && narrow.is_infinite() {
        return Err(CodecError::out_of_range(wide, "float32"));
    }
    Ok(narrow)
}

fn decode_temporal(value: &JsonValue) -> Result<(u32, u32), CodecError> {
    let obj = as_object(value, "time object")?;
    if let Some(key) = obj.keys().find(|k| *k != SEC_KEY && *k != NSEC_KEY) {
        return Err(CodecError::unknown_field(key.as_str()));
    }
    let sec = obj
        .get(SEC_KEY)
        .ok_or_else(|| CodecError::missing_temporal(SEC_KEY))?;
    let nsec = obj
        .get(NSEC_KEY)
        .ok_or_else(|| CodecError::missing_temporal(NSEC_KEY))?;
    Ok((
        decode_int(sec, "uint32").map_err(|e| e.at(SEC_KEY))?,
        decode_int(nsec, "uint32").map_err(|e| e.at(NSEC_KEY))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CodecErrorKind;
    use serde_json::json;

    #[test]
    fn test_decode_int_range() {
        assert_eq!(decode_int::<u8>(&json!(255), "uint8").unwrap(), 255);
        assert_eq!(decode_int::<i8>(&json!(-128), "int8").unwrap(), -128);

        let err = decode_int::<u8>(&json!(256), "uint8").unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::OutOfRange { target: "uint8", .. }));

        let err = decode_int::<u32>(&json!(-1), "uint32").unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::OutOfRange { .. }));

        let err = decode_int::<i32>(&json!(1.5), "int32").unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::OutOfRange { .. }));
    }

    #[test]
    fn test_decode_float_forms() {
        assert_eq!(decode_float(&json!(1.25)).unwrap(), 1.25);
        assert_eq!(decode_float(&json!("+inf")).unwrap(), f64::INFINITY);
        assert_eq!(decode_float(&json!("-inf")).unwrap(), f64::NEG_INFINITY);
        assert!(decode_float(&json!("nan")).unwrap().is_nan());
        assert_eq!(decode_float(&json!("3.5")).unwrap(), 3.5);

        let err = decode_float(&json!("fast")).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::InvalidFloat(s) if s == "fast"));
    }

    #[test]
    fn test_decode_float32_range() {
        assert_eq!(decode_float32(&json!(3.4028235e38)).unwrap(), f32::MAX);
        assert_eq!(decode_float32(&json!(-0.5)).unwrap(), -0.5);
        assert_eq!(decode_float32(&json!("+inf")).unwrap(), f32::INFINITY);
        assert!(decode_float32(&json!("nan")).unwrap().is_nan());

        let err = decode_float32(&json!(1e39)).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::OutOfRange { target: "float32", .. }));
        let err = decode_float32(&json!("-1e39")).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::OutOfRange { target: "float32", .. }));
    }

    #[test]
    fn test_decode_temporal() {
        assert_eq!(decode_temporal(&json!({"Sec": 1, "NSec": 2})).unwrap(), (1, 2));

        let err = decode_temporal(&json!({"Sec": 1})).unwrap_err();
        assert!(matches!(
            err.kind(),
            CodecErrorKind::MissingTemporalField { name: "NSec" }
        ));

        let err = decode_temporal(&json!({"Sec": 1, "NSec": 2, "Extra": 3})).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::UnknownField { name } if name == "Extra"));
    }

    #[test]
    fn test_decode_bytes() {
        assert_eq!(
            decode_bytes(&json!("8N4=")).unwrap(),
            Value::UInt8Array(vec![0xf0, 0xde])
        );
        let err = decode_bytes(&json!("not base64!")).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::InvalidBase64(_)));
        let err = decode_bytes(&json!([1, 2])).unwrap_err();
        assert!(matches!(err.kind(), CodecErrorKind::TypeMismatch { .. }));
    }
}
