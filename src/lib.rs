// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robomsg
//!
//! Runtime message codec for ROS1-style robotics buses.
//!
//! Message schemas are discovered at runtime from a [`SchemaSource`]. The library:
//! - resolves a type name into a typed field graph with [`Resolver`]
//! - creates zero-valued [`Message`] instances of a resolved [`MessageType`]
//! - encodes and decodes instances in the TCPROS wire format ([`encoding::wire`])
//! - marshals instances to and from JSON, and generates JSON-Schema ([`encoding::json`])
//!
//! ## Architecture
//!
//! - `core/` - errors, field values, configuration
//! - `schema/` - schema source, resolver, resolved types, cache
//! - `message/` - message instances
//! - `encoding/` - wire and JSON codecs, transport-facing trait
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use robomsg::{MemorySchemaSource, Message, RawField, RawSchema, Resolver, SchemaCache};
//!
//! let source = MemorySchemaSource::new().with(
//!     RawSchema::new("geometry_msgs/Point")
//!         .field(RawField::new("x", "float64"))
//!         .field(RawField::new("y", "float64"))
//!         .field(RawField::new("z", "float64")),
//! );
//! let resolver = Resolver::with_cache(source, Arc::new(SchemaCache::new()));
//! let point = resolver.resolve("geometry_msgs/Point")?;
//!
//! let mut msg = point.new_message();
//! msg.set("x", 1.5f64)?;
//!
//! let frame = msg.to_bytes()?;
//! assert_eq!(frame.len(), 24);
//! assert_eq!(Message::from_bytes(&point, &frame)?, msg);
//!
//! let json = msg.to_json()?;
//! assert_eq!(json, br#"{"x":1.5,"y":0.0,"z":0.0}"#);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    CodecConfig, CodecError, CodecErrorKind, Duration, Error, FieldPath, Result, SchemaError,
    Time, Value,
};

// Schema resolution
pub mod schema;

pub use schema::{
    Cardinality, FieldDescriptor, FieldKind, MemorySchemaSource, MessageType, PrimitiveType,
    RawField, RawSchema, Resolver, SchemaCache, SchemaSource,
};

// Message instances
pub mod message;

pub use message::Message;

// Encoding/decoding
pub mod encoding;

pub use encoding::MessageCodec;
