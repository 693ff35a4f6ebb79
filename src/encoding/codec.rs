// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message interface consumed by transport layers.
//!
//! Publishers, subscribers and service/action layers only need a message's identity (type
//! name and md5sum, exchanged in connection headers) and its wire codec. [`MessageCodec`]
//! is that narrow surface; [`Message`] implements it.

use std::io::Write;

use crate::core::CodecError;
use crate::message::Message;

/// Wire-level view of a message.
pub trait MessageCodec: Send {
    /// Fully-qualified type name (`pkg/Name`).
    fn type_name(&self) -> &str;

    /// Content hash used to check both peers agree on the definition.
    fn md5sum(&self) -> &str;

    /// Raw definition text, sent in connection headers.
    fn definition(&self) -> &str;

    /// Write the wire form to a sink.
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), CodecError>
    where
        Self: Sized;

    /// Replace the contents with a decoded frame, returning the bytes consumed.
    fn decode(&mut self, data: &[u8]) -> Result<usize, CodecError>;

    /// Exact length of the wire form.
    fn encoded_len(&self) -> usize;
}

impl MessageCodec for Message {
    fn type_name(&self) -> &str {
        self.msg_type().name()
    }

    fn md5sum(&self) -> &str {
        self.msg_type().md5sum()
    }

    fn definition(&self) -> &str {
        self.msg_type().text()
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), CodecError> {
        self.serialize(writer)
    }

    fn decode(&mut self, data: &[u8]) -> Result<usize, CodecError> {
        self.deserialize(data)
    }

    fn encoded_len(&self) -> usize {
        self.wire_size()
    }
}
