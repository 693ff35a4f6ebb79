// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire encoder for writing TCPROS-encoded messages.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use crate::core::{CodecError, Duration, Time, Value};
use crate::message::{check_value, Message};
use crate::schema::{Cardinality, FieldDescriptor, MessageType};

/// Wire encoder writing to any [`Write`] sink.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let msg: robomsg::Message = unimplemented!();
/// use robomsg::encoding::wire::WireEncoder;
///
/// let mut buf = Vec::new();
/// WireEncoder::new(&mut buf).encode(&msg)?;
/// # Ok(())
/// # }
/// ```
pub struct WireEncoder<W: Write> {
    writer: W,
}

impl<W: Write> WireEncoder<W> {
    /// Create an encoder over a sink.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Get the sink back.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Encode a message's fields in declaration order.
    ///
    /// The frame is built in memory first and handed to the sink in one `write_all`, so a
    /// value error leaves the sink untouched. Errors carry the path of the field that failed.
    pub fn encode(&mut self, msg: &Message) -> Result<(), CodecError> {
        let mut frame = WireEncoder::new(Vec::with_capacity(super::encoded_len(msg)));
        frame.encode_message(msg)?;
        self.writer.write_all(&frame.writer)?;
        Ok(())
    }

    fn encode_message(&mut self, msg: &Message) -> Result<(), CodecError> {
        let owner = msg.msg_type();
        for (field, value) in msg.fields() {
            self.encode_field(owner, field, value)
                .map_err(|e| e.at(field.name()))?;
        }
        Ok(())
    }

    fn encode_field(
        &mut self,
        owner: &MessageType,
        field: &FieldDescriptor,
        value: &Value,
    ) -> Result<(), CodecError> {
        check_value(owner, field, value)?;
        match field.cardinality() {
            Cardinality::Scalar => self.encode_scalar(value),
            Cardinality::Dynamic => {
                let len = value.array_len().unwrap_or(0);
                self.write_len(len)?;
                self.encode_array(owner, field, value, len)
            }
            Cardinality::Fixed(n) => {
                let len = value.array_len().unwrap_or(0);
                if len > n {
                    debug!(
                        field = field.name(),
                        len,
                        fixed_len = n,
                        "truncating over-long fixed array"
                    );
                }
                self.encode_array(owner, field, value, n)
            }
        }
    }

    fn encode_scalar(&mut self, value: &Value) -> Result<(), CodecError> {
        if let Value::Message(m) = value {
            return self.encode_message(m);
        }
        let w = &mut self.writer;
        match value {
            Value::Bool(v) => w.write_u8(u8::from(*v))?,
            Value::Int8(v) => w.write_i8(*v)?,
            Value::Int16(v) => w.write_i16::<LittleEndian>(*v)?,
            Value::Int32(v) => w.write_i32::<LittleEndian>(*v)?,
            Value::Int64(v) => w.write_i64::<LittleEndian>(*v)?,
            Value::UInt8(v) => w.write_u8(*v)?,
            Value::UInt16(v) => w.write_u16::<LittleEndian>(*v)?,
            Value::UInt32(v) => w.write_u32::<LittleEndian>(*v)?,
            Value::UInt64(v) => w.write_u64::<LittleEndian>(*v)?,
            Value::Float32(v) => w.write_f32::<LittleEndian>(*v)?,
            Value::Float64(v) => w.write_f64::<LittleEndian>(*v)?,
            Value::String(s) => write_string(w, s)?,
            Value::Time(t) => write_time(w, t)?,
            Value::Duration(d) => write_duration(w, d)?,
            other => {
                return Err(CodecError::type_mismatch("scalar", other.type_name()));
            }
        }
        Ok(())
    }

    /// Write exactly `count` elements, zero-padding past the end of the value.
    fn encode_array(
        &mut self,
        owner: &MessageType,
        field: &FieldDescriptor,
        value: &Value,
        count: usize,
    ) -> Result<(), CodecError> {
        match value {
            Value::BoolArray(v) => {
                self.write_seq(v, count, &false, |w, x| Ok(w.write_u8(u8::from(*x))?))
            }
            Value::Int8Array(v) => self.write_seq(v, count, &0, |w, x| Ok(w.write_i8(*x)?)),
            Value::Int16Array(v) => {
                self.write_seq(v, count, &0, |w, x| Ok(w.write_i16::<LittleEndian>(*x)?))
            }
            Value::Int32Array(v) => {
                self.write_seq(v, count, &0, |w, x| Ok(w.write_i32::<LittleEndian>(*x)?))
            }
            Value::Int64Array(v) => {
                self.write_seq(v, count, &0, |w, x| Ok(w.write_i64::<LittleEndian>(*x)?))
            }
            Value::UInt8Array(v) => {
                let present = v.len().min(count);
                self.writer.write_all(&v[..present])?;
                if count > present {
                    self.writer.write_all(&vec![0u8; count - present])?;
                }
                Ok(())
            }
            Value::UInt16Array(v) => {
                self.write_seq(v, count, &0, |w, x| Ok(w.write_u16::<LittleEndian>(*x)?))
            }
            Value::UInt32Array(v) => {
                self.write_seq(v, count, &0, |w, x| Ok(w.write_u32::<LittleEndian>(*x)?))
            }
            Value::UInt64Array(v) => {
                self.write_seq(v, count, &0, |w, x| Ok(w.write_u64::<LittleEndian>(*x)?))
            }
            Value::Float32Array(v) => {
                self.write_seq(v, count, &0.0, |w, x| Ok(w.write_f32::<LittleEndian>(*x)?))
            }
            Value::Float64Array(v) => {
                self.write_seq(v, count, &0.0, |w, x| Ok(w.write_f64::<LittleEndian>(*x)?))
            }
            Value::StringArray(v) => self.write_seq(v, count, &String::new(), |w, s| write_string(w, s)),
            Value::TimeArray(v) => self.write_seq(v, count, &Time::default(), |w, t| write_time(w, t)),
            Value::DurationArray(v) => {
                self.write_seq(v, count, &Duration::default(), |w, d| write_duration(w, d))
            }
            Value::MessageArray(v) => {
                let padding = if count > v.len() {
                    owner.field_type(field).map(|child| child.new_message())
                } else {
                    None
                };
                for i in 0..count {
                    let item = match (v.get(i), &padding) {
                        (Some(m), _) => m,
                        (None, Some(zero)) => zero,
                        (None, None) => break,
                    };
                    self.encode_message(item).map_err(|e| e.at_index(i))?;
                }
                Ok(())
            }
            other => Err(CodecError::type_mismatch("array", other.type_name())),
        }
    }

    fn write_seq<T>(
        &mut self,
        items: &[T],
        count: usize,
        zero: &T,
        mut write: impl FnMut(&mut W, &T) -> Result<(), CodecError>,
    ) -> Result<(), CodecError> {
        for i in 0..count {
            let item = items.get(i).unwrap_or(zero);
            write(&mut self.writer, item).map_err(|e| e.at_index(i))?;
        }
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<(), CodecError> {
        write_len(&mut self.writer, len)
    }
}

fn write_len<W: Write>(w: &mut W, len: usize) -> Result<(), CodecError> {
    let len32 =
        u32::try_from(len).map_err(|_| CodecError::length_exceeded(len, u32::MAX as usize))?;
    w.write_u32::<LittleEndian>(len32)?;
    Ok(())
}

fn write_string<W: Write>(w: &mut W, s: &str) -> Result<(), CodecError> {
    write_len(w, s.len())?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn write_time<W: Write>(w: &mut W, t: &Time) -> Result<(), CodecError> {
    w.write_u32::<LittleEndian>(t.sec)?;
    w.write_u32::<LittleEndian>(t.nsec)?;
    Ok(())
}

fn write_duration<W: Write>(w: &mut W, d: &Duration) -> Result<(), CodecError> {
    w.write_u32::<LittleEndian>(d.sec)?;
    w.write_u32::<LittleEndian>(d.nsec)?;
    Ok(())
}
