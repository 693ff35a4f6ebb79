// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema source abstraction.
//!
//! The resolver never reads message definition files itself. It asks a [`SchemaSource`]
//! for the raw field list of a type name and resolves the type tokens it gets back.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::SchemaError;

/// One field as reported by the schema source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Field name
    pub name: String,
    /// Type token (`int32`, `Point`, `geometry_msgs/Point`, `Header`)
    pub type_name: String,
    /// Package token (empty when the type token is unqualified)
    pub package: String,
    /// Whether the field was declared with `[]` or `[N]`
    pub is_array: bool,
    /// `-1` for `[]`, `N` for `[N]`, ignored when `is_array` is false
    pub array_length: i32,
}

impl RawField {
    /// Create a scalar field.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            package: String::new(),
            is_array: false,
            array_length: 0,
        }
    }

    /// Create a dynamic array field (`T[] name`).
    pub fn dynamic_array(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            is_array: true,
            array_length: -1,
            ..Self::new(name, type_name)
        }
    }

    /// Create a fixed array field (`T[len] name`).
    pub fn fixed_array(name: impl Into<String>, type_name: impl Into<String>, len: i32) -> Self {
        Self {
            is_array: true,
            array_length: len,
            ..Self::new(name, type_name)
        }
    }

    /// Set the package token.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }
}

/// Raw definition of one message type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSchema {
    /// Fully-qualified name (`pkg/Name`)
    pub name: String,
    /// Definition text, carried through for connection headers
    pub text: String,
    /// Content hash used as a wire compatibility fingerprint
    pub md5sum: String,
    /// Fields in declaration order
    pub fields: Vec<RawField>,
}

impl RawSchema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a field.
    pub fn field(mut self, field: RawField) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the definition text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the content hash.
    pub fn with_md5sum(mut self, md5sum: impl Into<String>) -> Self {
        self.md5sum = md5sum.into();
        self
    }

    /// Package part of the name (empty for unqualified names).
    pub fn package(&self) -> &str {
        package_of(&self.name)
    }
}

/// Package part of a `pkg/Name` type name.
pub fn package_of(type_name: &str) -> &str {
    type_name
        .rsplit_once('/')
        .map(|(pkg, _)| pkg)
        .unwrap_or("")
}

/// Provider of raw schemas by fully-qualified name.
pub trait SchemaSource: Send + Sync {
    /// Look up a type; `Ok(None)` means the type is unknown to this source.
    fn lookup(&self, type_name: &str) -> Result<Option<RawSchema>, SchemaError>;

    /// Check if the source knows a type.
    fn contains(&self, type_name: &str) -> bool {
        matches!(self.lookup(type_name), Ok(Some(_)))
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for Arc<T> {
    fn lookup(&self, type_name: &str) -> Result<Option<RawSchema>, SchemaError> {
        (**self).lookup(type_name)
    }

    fn contains(&self, type_name: &str) -> bool {
        (**self).contains(type_name)
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn lookup(&self, type_name: &str) -> Result<Option<RawSchema>, SchemaError> {
        (**self).lookup(type_name)
    }

    fn contains(&self, type_name: &str) -> bool {
        (**self).contains(type_name)
    }
}

/// In-memory schema source, filled by the caller.
#[derive(Debug, Clone, Default)]
pub struct MemorySchemaSource {
    schemas: HashMap<String, RawSchema>,
}

impl MemorySchemaSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, replacing any previous one with the same name.
    pub fn insert(&mut self, schema: RawSchema) {
        self.schemas.insert(schema.name.clone(), schema);
    }

    /// Register a schema (builder style).
    pub fn with(mut self, schema: RawSchema) -> Self {
        self.insert(schema);
        self
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if no schemas are registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl SchemaSource for MemorySchemaSource {
    fn lookup(&self, type_name: &str) -> Result<Option<RawSchema>, SchemaError> {
        Ok(self.schemas.get(type_name).cloned())
    }

    fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_field_builders() {
        let f = RawField::fixed_array("arr", "int16", 2);
        assert!(f.is_array);
        assert_eq!(f.array_length, 2);

        let f = RawField::dynamic_array("points", "Point").with_package("geometry_msgs");
        assert_eq!(f.array_length, -1);
        assert_eq!(f.package, "geometry_msgs");
    }

    #[test]
    fn test_package_of() {
        assert_eq!(package_of("geometry_msgs/Point"), "geometry_msgs");
        assert_eq!(package_of("Point"), "");
        assert_eq!(RawSchema::new("std_msgs/Header").package(), "std_msgs");
    }

    #[test]
    fn test_memory_source_lookup() {
        let source = MemorySchemaSource::new()
            .with(RawSchema::new("test/Msg").field(RawField::new("x", "int32")));
        assert!(source.contains("test/Msg"));
        assert!(!source.contains("test/Other"));
        let schema = source.lookup("test/Msg").unwrap().unwrap();
        assert_eq!(schema.fields.len(), 1);
        assert_eq!(source.len(), 1);
    }
}
