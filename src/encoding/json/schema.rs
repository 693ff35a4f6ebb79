// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON-Schema (draft-07) generation for message types.
//!
//! The schema describes exactly the documents [`JsonEncoder`](super::JsonEncoder) produces
//! and [`JsonDecoder`](super::JsonDecoder) accepts.

use serde_json::{json, Map, Value as JsonValue};

use super::{NSEC_KEY, SEC_KEY};
use crate::core::CodecError;
use crate::schema::{Cardinality, FieldDescriptor, FieldKind, MessageType, PrimitiveType};

/// Draft-07 meta-schema URI.
pub const JSON_SCHEMA_DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

impl MessageType {
    /// Generate a JSON-Schema document for this type.
    ///
    /// The root `$id` is `id_prefix + topic`; each nested message's `$id` extends it with
    /// `/` and the field path.
    pub fn generate_json_schema(&self, id_prefix: &str, topic: &str) -> Result<Vec<u8>, CodecError> {
        let id = format!("{id_prefix}{topic}");
        let mut root = Map::new();
        root.insert("$schema".to_string(), json!(JSON_SCHEMA_DRAFT_07));
        root.extend(message_schema(self, &id));
        serde_json::to_vec(&JsonValue::Object(root))
            .map_err(|e| CodecError::invalid_json(e.to_string()))
    }
}

fn message_schema(msg_type: &MessageType, id: &str) -> Map<String, JsonValue> {
    let mut properties = Map::with_capacity(msg_type.fields().len());
    for field in msg_type.fields() {
        let field_id = format!("{id}/{}", field.name());
        properties.insert(field.name().to_string(), field_schema(msg_type, field, &field_id));
    }

    let mut schema = Map::new();
    schema.insert("$id".to_string(), json!(id));
    schema.insert("title".to_string(), json!(msg_type.name()));
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), JsonValue::Object(properties));
    schema.insert("additionalProperties".to_string(), json!(false));
    schema
}

fn field_schema(owner: &MessageType, field: &FieldDescriptor, id: &str) -> JsonValue {
    if field.is_byte_array() {
        return json!({
            "type": "string",
            "contentEncoding": "base64",
        });
    }
    let element = match field.kind() {
        FieldKind::Builtin(prim) => primitive_schema(prim),
        FieldKind::Message(child) => JsonValue::Object(message_schema(&owner.child(child), id)),
    };
    match field.cardinality() {
        Cardinality::Scalar => element,
        Cardinality::Dynamic | Cardinality::Fixed(_) => json!({ "type": "array", "items": element }),
    }
}

fn primitive_schema(prim: PrimitiveType) -> JsonValue {
    match prim {
        PrimitiveType::Bool => json!({ "type": "boolean" }),
        PrimitiveType::String => json!({ "type": "string" }),
        PrimitiveType::Float32 | PrimitiveType::Float64 => json!({ "type": ["number", "string"] }),
        PrimitiveType::Time | PrimitiveType::Duration => json!({
            "type": "object",
            "properties": {
                SEC_KEY: { "type": "integer" },
                NSEC_KEY: { "type": "integer" },
            },
            "required": [SEC_KEY, NSEC_KEY],
            "additionalProperties": false,
        }),
        _ => json!({ "type": "integer" }),
    }
}
