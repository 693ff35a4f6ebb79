// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON marshalling of message instances.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Number, Value as JsonValue};

use super::{NAN_LITERAL, NEG_INF_LITERAL, NSEC_KEY, POS_INF_LITERAL, SEC_KEY};
use crate::core::{CodecError, Value};
use crate::message::{check_value, Message};

/// JSON encoder for message instances.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let msg: robomsg::Message = unimplemented!();
/// use robomsg::encoding::json::JsonEncoder;
///
/// let json = JsonEncoder::new().with_pretty(true).encode(&msg)?;
/// println!("{}", String::from_utf8_lossy(&json));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    /// Create a compact encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable indented output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Encode a message to JSON bytes.
    ///
    /// The output buffer starts at the largest size seen for this type so far.
    pub fn encode(&self, msg: &Message) -> Result<Vec<u8>, CodecError> {
        let value = self.encode_value(msg)?;
        let msg_type = msg.msg_type();
        let mut buf = Vec::with_capacity(msg_type.json_capacity_hint());
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut buf, &value)
        } else {
            serde_json::to_writer(&mut buf, &value)
        };
        written.map_err(|e| CodecError::invalid_json(e.to_string()))?;
        msg_type.record_json_len(buf.len());
        Ok(buf)
    }

    /// Encode a message to a JSON value tree.
    pub fn encode_value(&self, msg: &Message) -> Result<JsonValue, CodecError> {
        encode_message(msg).map(JsonValue::Object)
    }
}

fn encode_message(msg: &Message) -> Result<Map<String, JsonValue>, CodecError> {
    let owner = msg.msg_type();
    let mut obj = Map::with_capacity(owner.fields().len());
    for (field, value) in msg.fields() {
        check_value(owner, field, value).map_err(|e| e.at(field.name()))?;
        let json = encode_value(value).map_err(|e| e.at(field.name()))?;
        obj.insert(field.name().to_string(), json);
    }
    Ok(obj)
}

fn encode_value(value: &Value) -> Result<JsonValue, CodecError> {
    let json = match value {
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Int8(v) => JsonValue::from(*v),
        Value::Int16(v) => JsonValue::from(*v),
        Value::Int32(v) => JsonValue::from(*v),
        Value::Int64(v) => JsonValue::from(*v),
        Value::UInt8(v) => JsonValue::from(*v),
        Value::UInt16(v) => JsonValue::from(*v),
        Value::UInt32(v) => JsonValue::from(*v),
        Value::UInt64(v) => JsonValue::from(*v),
        Value::Float32(v) => float32_to_json(*v),
        Value::Float64(v) => float64_to_json(*v),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Time(t) => temporal_to_json(t.sec, t.nsec),
        Value::Duration(d) => temporal_to_json(d.sec, d.nsec),
        Value::Message(m) => JsonValue::Object(encode_message(m)?),

        Value::UInt8Array(bytes) => JsonValue::String(STANDARD.encode(bytes)),
        Value::BoolArray(v) => list(v, |x| JsonValue::Bool(*x)),
        Value::Int8Array(v) => list(v, |x| JsonValue::from(*x)),
        Value::Int16Array(v) => list(v, |x| JsonValue::from(*x)),
        Value::Int32Array(v) => list(v, |x| JsonValue::from(*x)),
        Value::Int64Array(v) => list(v, |x| JsonValue::from(*x)),
        Value::UInt16Array(v) => list(v, |x| JsonValue::from(*x)),
        Value::UInt32Array(v) => list(v, |x| JsonValue::from(*x)),
        Value::UInt64Array(v) => list(v, |x| JsonValue::from(*x)),
        Value::Float32Array(v) => list(v, |x| float32_to_json(*x)),
        Value::Float64Array(v) => list(v, |x| float64_to_json(*x)),
        Value::StringArray(v) => list(v, |s| JsonValue::String(s.clone())),
        Value::TimeArray(v) => list(v, |t| temporal_to_json(t.sec, t.nsec)),
        Value::DurationArray(v) => list(v, |d| temporal_to_json(d.sec, d.nsec)),
        Value::MessageArray(v) => {
            let mut items = Vec::with_capacity(v.len());
            for (i, m) in v.iter().enumerate() {
                items.push(JsonValue::Object(
                    encode_message(m).map_err(|e| e.at_index(i))?,
                ));
            }
            JsonValue::Array(items)
        }
    };
    Ok(json)
}

fn list<T>(items: &[T], convert: impl Fn(&T) -> JsonValue) -> JsonValue {
    JsonValue::Array(items.iter().map(convert).collect())
}

fn non_finite(v: f64) -> Option<JsonValue> {
    let literal = if v.is_nan() {
        NAN_LITERAL
    } else if v == f64::INFINITY {
        POS_INF_LITERAL
    } else if v == f64::NEG_INFINITY {
        NEG_INF_LITERAL
    } else {
        return None;
    };
    Some(JsonValue::String(literal.to_string()))
}

pub(crate) fn float64_to_json(v: f64) -> JsonValue {
    non_finite(v)
        .or_else(|| Number::from_f64(v).map(JsonValue::Number))
        .unwrap_or(JsonValue::Null)
}

/// f32 in its own shortest form, so `0.1f32` is written as `0.1`.
pub(crate) fn float32_to_json(v: f32) -> JsonValue {
    if let Some(sentinel) = non_finite(f64::from(v)) {
        return sentinel;
    }
    let shortest = v.to_string().parse::<f64>().unwrap_or(f64::from(v));
    float64_to_json(shortest)
}

fn temporal_to_json(sec: u32, nsec: u32) -> JsonValue {
    let mut obj = Map::with_capacity(2);
    obj.insert(SEC_KEY.to_string(), JsonValue::from(sec));
    obj.insert(NSEC_KEY.to_string(), JsonValue::from(nsec));
    JsonValue::Object(obj)
}
