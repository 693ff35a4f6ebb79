// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Resolved message types.
//!
//! A resolution call produces one [`TypeGraph`]: an arena holding the root spec and every
//! spec reachable from it, each exactly once. [`MessageType`] is a cheap handle into that
//! arena, so nested types are shared rather than copied.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::CodecConfig;
use crate::message::Message;
use crate::schema::ast::{FieldDescriptor, FieldKind, TypeId};
use crate::schema::source::package_of;

/// One resolved schema inside a type graph.
#[derive(Debug)]
pub(crate) struct MessageSpec {
    pub(crate) name: String,
    pub(crate) text: String,
    pub(crate) md5sum: String,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) field_index: HashMap<String, usize>,
    pub(crate) min_wire_size: usize,
    pub(crate) json_capacity: AtomicUsize,
}

impl MessageSpec {
    pub(crate) fn new(name: String, text: String, md5sum: String, json_capacity: usize) -> Self {
        Self {
            name,
            text,
            md5sum,
            fields: Vec::new(),
            field_index: HashMap::new(),
            min_wire_size: 0,
            json_capacity: AtomicUsize::new(json_capacity),
        }
    }
}

/// Arena of specs produced by one top-level resolution.
#[derive(Debug)]
pub(crate) struct TypeGraph {
    pub(crate) specs: Vec<MessageSpec>,
    pub(crate) by_name: HashMap<String, TypeId>,
    pub(crate) config: CodecConfig,
}

/// Handle to a resolved, immutable message type.
///
/// Cloning is cheap; all clones and all nested handles share one arena.
#[derive(Clone)]
pub struct MessageType {
    graph: Arc<TypeGraph>,
    id: TypeId,
}

impl MessageType {
    pub(crate) fn new(graph: Arc<TypeGraph>, id: TypeId) -> Self {
        Self { graph, id }
    }

    fn spec(&self) -> &MessageSpec {
        &self.graph.specs[self.id.0]
    }

    /// Fully-qualified type name (`pkg/Name`).
    pub fn name(&self) -> &str {
        &self.spec().name
    }

    /// Package part of the name.
    pub fn package(&self) -> &str {
        package_of(self.name())
    }

    /// Name without the package.
    pub fn short_name(&self) -> &str {
        let name = self.name();
        name.rsplit_once('/').map(|(_, short)| short).unwrap_or(name)
    }

    /// Raw definition text.
    pub fn text(&self) -> &str {
        &self.spec().text
    }

    /// Content hash (wire compatibility fingerprint).
    pub fn md5sum(&self) -> &str {
        &self.spec().md5sum
    }

    /// Fields in declaration (wire) order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.spec().fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_index(name).map(|idx| &self.spec().fields[idx])
    }

    /// Position of a field in declaration order.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.spec().field_index.get(name).copied()
    }

    /// Nested type of a message field, `None` for builtin fields.
    pub fn field_type(&self, field: &FieldDescriptor) -> Option<MessageType> {
        match field.kind() {
            FieldKind::Message(id) => Some(self.child(id)),
            FieldKind::Builtin(_) => None,
        }
    }

    /// Look up a nested type by fully-qualified name.
    pub fn nested(&self, type_name: &str) -> Option<MessageType> {
        self.graph
            .by_name
            .get(type_name)
            .filter(|id| **id != self.id)
            .map(|id| self.child(*id))
    }

    /// Every nested type reachable from this one, each once, in first-use order.
    pub fn nested_types(&self) -> Vec<MessageType> {
        let mut seen = HashSet::new();
        seen.insert(self.id);
        let mut out = Vec::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            for field in self.graph.specs[id.0].fields.iter().rev() {
                if let FieldKind::Message(child) = field.kind() {
                    if seen.insert(child) {
                        out.push(self.child(child));
                        stack.push(child);
                    }
                }
            }
        }
        out
    }

    /// Smallest possible encoded size of an instance.
    pub fn min_wire_size(&self) -> usize {
        self.spec().min_wire_size
    }

    /// Largest dynamic array count the decoder accepts for this type.
    pub fn max_array_length(&self) -> usize {
        self.graph.config.max_array_length
    }

    /// Configuration the type was resolved with.
    pub fn config(&self) -> &CodecConfig {
        &self.graph.config
    }

    /// Create a zero-valued instance.
    pub fn new_message(&self) -> Message {
        Message::new(self)
    }

    /// Check if both handles point at the same spec of the same arena.
    pub fn same_type(&self, other: &MessageType) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph) && self.id == other.id
    }

    pub(crate) fn child(&self, id: TypeId) -> MessageType {
        MessageType {
            graph: Arc::clone(&self.graph),
            id,
        }
    }

    pub(crate) fn json_capacity_hint(&self) -> usize {
        self.spec().json_capacity.load(Ordering::Relaxed)
    }

    pub(crate) fn record_json_len(&self, len: usize) {
        self.spec().json_capacity.fetch_max(len, Ordering::Relaxed);
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        self.same_type(other) || (self.name() == other.name() && self.md5sum() == other.md5sum())
    }
}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageType")
            .field("name", &self.name())
            .field("md5sum", &self.md5sum())
            .field("fields", &self.fields().len())
            .finish()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
