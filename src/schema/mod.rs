// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Runtime schema resolution.
//!
//! This module provides:
//! - [`SchemaSource`] - the collaborator that supplies raw field lists by type name
//! - [`Resolver`] - turns a type name into a fully resolved [`MessageType`]
//! - [`SchemaCache`] - process-wide cache of resolved top-level types
//! - [`builtin_types`] - well-known types resolved without a source entry

pub mod ast;
pub mod builtin_types;
pub mod cache;
pub mod message_type;
pub mod resolver;
pub mod source;

pub use ast::{Cardinality, FieldDescriptor, FieldKind, PrimitiveType, TypeId};
pub use cache::SchemaCache;
pub use message_type::MessageType;
pub use resolver::Resolver;
pub use source::{MemorySchemaSource, RawField, RawSchema, SchemaSource};
