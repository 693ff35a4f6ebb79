// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire decoder for reading TCPROS-encoded messages from a frame.

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::core::config::DEFAULT_MAX_ARRAY_LENGTH;
use crate::core::{CodecError, Duration, Time, Value};
use crate::message::Message;
use crate::schema::{Cardinality, FieldDescriptor, FieldKind, MessageType, PrimitiveType};

/// Largest count accepted for an array whose elements occupy no wire bytes.
///
/// Such elements cannot be bounded by the remaining frame length.
pub const MAX_ZERO_SIZED_ARRAY_LENGTH: usize = 1 << 16;

/// Cursor over one wire frame.
///
/// Decoding allocates a fresh value tree; the frame itself is only borrowed.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let ty: robomsg::MessageType = unimplemented!();
/// use robomsg::encoding::wire::WireDecoder;
///
/// let frame = [0x2A, 0x00, 0x00, 0x00];
/// let mut decoder = WireDecoder::new(&frame);
/// let msg = decoder.decode(&ty)?;
/// assert_eq!(decoder.position(), 4);
/// # Ok(())
/// # }
/// ```
pub struct WireDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    max_array_length: usize,
}

impl<'a> WireDecoder<'a> {
    /// Create a decoder at the start of a frame.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
        }
    }

    /// Set the largest dynamic array count accepted.
    pub fn with_max_array_length(mut self, max_array_length: usize) -> Self {
        self.max_array_length = max_array_length;
        self
    }

    /// Get the number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the number of bytes left in the frame.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Decode one message of the given type.
    ///
    /// Errors carry the path of the field that failed.
    pub fn decode(&mut self, msg_type: &MessageType) -> Result<Message, CodecError> {
        let mut values = Vec::with_capacity(msg_type.fields().len());
        for field in msg_type.fields() {
            let value = self
                .decode_field(msg_type, field)
                .map_err(|e| e.at(field.name()))?;
            values.push(value);
        }
        Ok(Message::from_parts(msg_type.clone(), values))
    }

    fn decode_field(
        &mut self,
        owner: &MessageType,
        field: &FieldDescriptor,
    ) -> Result<Value, CodecError> {
        match field.kind() {
            FieldKind::Builtin(prim) => match field.cardinality() {
                Cardinality::Scalar => self.read_scalar(prim),
                Cardinality::Dynamic => {
                    let count = self.read_count(prim.min_size())?;
                    self.read_array(prim, count)
                }
                Cardinality::Fixed(n) => self.read_array(prim, n),
            },
            FieldKind::Message(id) => {
                let child = owner.child(id);
                match field.cardinality() {
                    Cardinality::Scalar => Ok(Value::Message(self.decode(&child)?)),
                    Cardinality::Dynamic => {
                        let count = self.read_count(child.min_wire_size())?;
                        let items = self.collect(count, |d| d.decode(&child))?;
                        Ok(Value::MessageArray(items))
                    }
                    Cardinality::Fixed(n) => {
                        let items = self.collect(n, |d| d.decode(&child))?;
                        Ok(Value::MessageArray(items))
                    }
                }
            }
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::eof(n, self.remaining()));
        }
        let data = self.data;
        let bytes = &data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Read a dynamic array count and check it against the frame and the configured limit.
    fn read_count(&mut self, min_element_size: usize) -> Result<usize, CodecError> {
        let count = self.read_u32()? as usize;
        if count > self.max_array_length {
            return Err(CodecError::length_exceeded(count, self.max_array_length));
        }
        let limit = if min_element_size > 0 {
            self.remaining() / min_element_size
        } else {
            self.max_array_length.min(MAX_ZERO_SIZED_ARRAY_LENGTH)
        };
        if count > limit {
            return Err(CodecError::length_exceeded(count, limit));
        }
        Ok(count)
    }

    fn collect<T>(
        &mut self,
        count: usize,
        mut read: impl FnMut(&mut Self) -> Result<T, CodecError>,
    ) -> Result<Vec<T>, CodecError> {
        let mut items = Vec::with_capacity(count);
        for i in 0..count {
            items.push(read(self).map_err(|e| e.at_index(i))?);
        }
        Ok(items)
    }

    fn read_scalar(&mut self, prim: PrimitiveType) -> Result<Value, CodecError> {
        let value = match prim {
            PrimitiveType::Bool => Value::Bool(self.read_u8()? != 0),
            PrimitiveType::Int8 => Value::Int8(self.read_u8()? as i8),
            PrimitiveType::Int16 => Value::Int16(LittleEndian::read_i16(self.take(2)?)),
            PrimitiveType::Int32 => Value::Int32(LittleEndian::read_i32(self.take(4)?)),
            PrimitiveType::Int64 => Value::Int64(LittleEndian::read_i64(self.take(8)?)),
            PrimitiveType::UInt8 => Value::UInt8(self.read_u8()?),
            PrimitiveType::UInt16 => Value::UInt16(LittleEndian::read_u16(self.take(2)?)),
            PrimitiveType::UInt32 => Value::UInt32(self.read_u32()?),
            PrimitiveType::UInt64 => Value::UInt64(LittleEndian::read_u64(self.take(8)?)),
            PrimitiveType::Float32 => Value::Float32(LittleEndian::read_f32(self.take(4)?)),
            PrimitiveType::Float64 => Value::Float64(LittleEndian::read_f64(self.take(8)?)),
            PrimitiveType::String => Value::String(self.read_string()?),
            PrimitiveType::Time => Value::Time(self.read_time()?),
            PrimitiveType::Duration => Value::Duration(self.read_duration()?),
        };
        Ok(value)
    }

    fn read_array(&mut self, prim: PrimitiveType, count: usize) -> Result<Value, CodecError> {
        let value = match prim {
            PrimitiveType::Bool => Value::BoolArray(self.collect(count, |d| Ok(d.read_u8()? != 0))?),
            PrimitiveType::Int8 => {
                Value::Int8Array(self.take(count)?.iter().map(|b| *b as i8).collect())
            }
            PrimitiveType::UInt8 => Value::UInt8Array(self.take(count)?.to_vec()),
            PrimitiveType::Int16 => Value::Int16Array(self.read_fixed(count, 2, LittleEndian::read_i16)?),
            PrimitiveType::Int32 => Value::Int32Array(self.read_fixed(count, 4, LittleEndian::read_i32)?),
            PrimitiveType::Int64 => Value::Int64Array(self.read_fixed(count, 8, LittleEndian::read_i64)?),
            PrimitiveType::UInt16 => {
                Value::UInt16Array(self.read_fixed(count, 2, LittleEndian::read_u16)?)
            }
            PrimitiveType::UInt32 => {
                Value::UInt32Array(self.read_fixed(count, 4, LittleEndian::read_u32)?)
            }
            PrimitiveType::UInt64 => {
                Value::UInt64Array(self.read_fixed(count, 8, LittleEndian::read_u64)?)
            }
            PrimitiveType::Float32 => {
                Value::Float32Array(self.read_fixed(count, 4, LittleEndian::read_f32)?)
            }
            PrimitiveType::Float64 => {
                Value::Float64Array(self.read_fixed(count, 8, LittleEndian::read_f64)?)
            }
            PrimitiveType::String => Value::StringArray(self.collect(count, Self::read_string)?),
            PrimitiveType::Time => Value::TimeArray(self.collect(count, Self::read_time)?),
            PrimitiveType::Duration => {
                Value::DurationArray(self.collect(count, Self::read_duration)?)
            }
        };
        Ok(value)
    }

    /// Read `count` fixed-width elements in one bounds check.
    fn read_fixed<T>(
        &mut self,
        count: usize,
        width: usize,
        read: fn(&[u8]) -> T,
    ) -> Result<Vec<T>, CodecError> {
        let total = count
            .checked_mul(width)
            .ok_or_else(|| CodecError::length_exceeded(count, usize::MAX / width))?;
        let bytes = self.take(total)?;
        Ok(bytes.chunks_exact(width).map(read).collect())
    }

    fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn read_string(&mut self) -> Result<String, CodecError> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(err) => {
                debug!(len, valid_up_to = err.valid_up_to(), "rejecting non-UTF-8 wire string");
                Err(CodecError::invalid_utf8(err.valid_up_to()))
            }
        }
    }

    fn read_time(&mut self) -> Result<Time, CodecError> {
        let sec = self.read_u32()?;
        let nsec = self.read_u32()?;
        Ok(Time::new(sec, nsec))
    }

    fn read_duration(&mut self) -> Result<Duration, CodecError> {
        let sec = self.read_u32()?;
        let nsec = self.read_u32()?;
        Ok(Duration::new(sec, nsec))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::CodecErrorKind;
    use crate::schema::{MemorySchemaSource, RawField, RawSchema, Resolver, SchemaCache};

    fn resolve(source: MemorySchemaSource, name: &str) -> MessageType {
        Resolver::with_cache(source, Arc::new(SchemaCache::new()))
            .resolve(name)
            .unwrap()
    }

    #[test]
    fn test_decode_scalars() {
        let ty = resolve(
            MemorySchemaSource::new().with(
                RawSchema::new("test/Mixed")
                    .field(RawField::new("flag", "bool"))
                    .field(RawField::new("v", "int16"))
                    .field(RawField::new("s", "string")),
            ),
            "test/Mixed",
        );
        let frame = [0x02, 0xFF, 0xFF, 2, 0, 0, 0, b'h', b'i'];
        let mut decoder = WireDecoder::new(&frame);
        let msg = decoder.decode(&ty).unwrap();

        assert_eq!(msg.get("flag"), Some(&Value::Bool(true)));
        assert_eq!(msg.get("v"), Some(&Value::Int16(-1)));
        assert_eq!(msg.get("s"), Some(&Value::String("hi".to_string())));
        assert_eq!(decoder.position(), frame.len());
        assert_eq!(decoder.remaining(), 0);
    }

    #[test]
    fn test_count_exceeding_frame() {
        let ty = resolve(
            MemorySchemaSource::new()
                .with(RawSchema::new("test/Arr").field(RawField::dynamic_array("v", "int32"))),
            "test/Arr",
        );
        let frame = [5, 0, 0, 0, 1, 2, 3, 4];
        let err = WireDecoder::new(&frame).decode(&ty).unwrap_err();
        assert_eq!(err.path().to_string(), "v");
        assert!(matches!(
            err.kind(),
            CodecErrorKind::LengthExceeded { limit: 1, .. }
        ));
    }

    #[test]
    fn test_count_exceeding_configured_limit() {
        let ty = resolve(
            MemorySchemaSource::new()
                .with(RawSchema::new("test/Bytes").field(RawField::dynamic_array("data", "uint8"))),
            "test/Bytes",
        );
        let frame = [3, 0, 0, 0, 1, 2, 3];
        let err = WireDecoder::new(&frame)
            .with_max_array_length(2)
            .decode(&ty)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            CodecErrorKind::LengthExceeded { length: 3, limit: 2 }
        ));
    }

    #[test]
    fn test_truncated_nested_path() {
        let source = MemorySchemaSource::new()
            .with(
                RawSchema::new("test/Named")
                    .field(RawField::new("name", "string"))
                    .field(RawField::new("x", "float64")),
            )
            .with(RawSchema::new("test/Path").field(RawField::dynamic_array("points", "Named")));
        let ty = resolve(source, "test/Path");
        assert_eq!(ty.nested("test/Named").unwrap().min_wire_size(), 12);

        let mut frame = vec![2, 0, 0, 0];
        frame.extend_from_slice(&[0u8; 12]);
        frame.extend_from_slice(&[4, 0, 0, 0, b'a', b'b', b'c', b'd']);
        frame.extend_from_slice(&[0u8; 4]);
        let err = WireDecoder::new(&frame).decode(&ty).unwrap_err();
        assert_eq!(err.path().to_string(), "points[1].x");
        assert!(matches!(
            err.kind(),
            CodecErrorKind::UnexpectedEof { requested: 8, available: 4 }
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let ty = resolve(
            MemorySchemaSource::new().with(RawSchema::new("test/S").field(RawField::new("s", "string"))),
            "test/S",
        );
        let frame = [2, 0, 0, 0, 0xC3, 0x28];
        let err = WireDecoder::new(&frame).decode(&ty).unwrap_err();
        assert_eq!(err.path().to_string(), "s");
        assert!(matches!(
            err.kind(),
            CodecErrorKind::InvalidUtf8 { valid_up_to: 0 }
        ));
    }

    #[test]
    fn test_zero_sized_element_count_capped() {
        let source = MemorySchemaSource::new()
            .with(RawSchema::new("test/Empty"))
            .with(RawSchema::new("test/Many").field(RawField::dynamic_array("items", "Empty")));
        let ty = resolve(source, "test/Many");
        assert_eq!(ty.nested("test/Empty").unwrap().min_wire_size(), 0);

        let msg = WireDecoder::new(&[3, 0, 0, 0]).decode(&ty).unwrap();
        assert_eq!(msg.get("items").and_then(Value::as_messages).map(<[_]>::len), Some(3));

        let count = (MAX_ZERO_SIZED_ARRAY_LENGTH as u32 + 1).to_le_bytes();
        let err = WireDecoder::new(&count).decode(&ty).unwrap_err();
        assert_eq!(err.path().to_string(), "items");
        assert!(matches!(
            err.kind(),
            CodecErrorKind::LengthExceeded { limit: MAX_ZERO_SIZED_ARRAY_LENGTH, .. }
        ));
    }
}
