// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema resolution.
//!
//! Turns a type name into a [`MessageType`] by walking the schema source depth-first. One
//! top-level call builds one arena; every nested type is resolved once and shared by all
//! fields that reference it. A type reachable from itself is rejected.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, trace};

use crate::core::{CodecConfig, SchemaError};
use crate::schema::ast::{Cardinality, FieldDescriptor, FieldKind, PrimitiveType, TypeId};
use crate::schema::builtin_types;
use crate::schema::cache::SchemaCache;
use crate::schema::message_type::{MessageSpec, MessageType, TypeGraph};
use crate::schema::source::{package_of, RawField, RawSchema, SchemaSource};

fn ident_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

fn type_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z0-9_]*/)?[A-Za-z][A-Za-z0-9_]*$")
            .expect("valid type token regex")
    })
}

/// Names currently being resolved, outermost first.
#[derive(Debug, Default)]
struct CycleGuard {
    active: HashSet<String>,
    chain: Vec<String>,
}

impl CycleGuard {
    fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    fn enter(&mut self, name: &str) {
        self.active.insert(name.to_string());
        self.chain.push(name.to_string());
    }

    fn leave(&mut self, name: &str) {
        self.active.remove(name);
        if self.chain.last().map(String::as_str) == Some(name) {
            self.chain.pop();
        }
    }

    fn recursion_error(&self, name: &str) -> SchemaError {
        let mut chain = self.chain.clone();
        chain.push(name.to_string());
        SchemaError::Recursive {
            type_name: name.to_string(),
            chain,
        }
    }
}

/// Builds the arena for one top-level resolution.
struct GraphBuilder<'a, S: SchemaSource + ?Sized> {
    source: &'a S,
    config: &'a CodecConfig,
    specs: Vec<MessageSpec>,
    by_name: HashMap<String, TypeId>,
    guard: CycleGuard,
}

impl<'a, S: SchemaSource + ?Sized> GraphBuilder<'a, S> {
    fn new(source: &'a S, config: &'a CodecConfig) -> Self {
        Self {
            source,
            config,
            specs: Vec::new(),
            by_name: HashMap::new(),
            guard: CycleGuard::default(),
        }
    }

    fn build(mut self, type_name: &str) -> Result<MessageType, SchemaError> {
        let root = self.resolve_type(type_name)?;
        let graph = TypeGraph {
            specs: self.specs,
            by_name: self.by_name,
            config: self.config.clone(),
        };
        Ok(MessageType::new(Arc::new(graph), root))
    }

    fn load(&self, type_name: &str) -> Result<RawSchema, SchemaError> {
        if let Some(schema) = self.source.lookup(type_name)? {
            return Ok(schema);
        }
        builtin_types::lookup(type_name).ok_or_else(|| SchemaError::unknown_type(type_name))
    }

    fn resolve_type(&mut self, type_name: &str) -> Result<TypeId, SchemaError> {
        if self.guard.is_active(type_name) {
            return Err(self.guard.recursion_error(type_name));
        }
        if let Some(id) = self.by_name.get(type_name) {
            trace!(type_name, "reusing nested type");
            return Ok(*id);
        }

        let raw = self.load(type_name)?;
        self.guard.enter(type_name);

        // Registered before its fields so siblings can share it once it is complete.
        let id = TypeId(self.specs.len());
        self.specs.push(MessageSpec::new(
            type_name.to_string(),
            raw.text.clone(),
            raw.md5sum.clone(),
            self.config.json_capacity_hint,
        ));
        self.by_name.insert(type_name.to_string(), id);

        let parent_package = package_of(type_name).to_string();
        let mut fields = Vec::with_capacity(raw.fields.len());
        let mut field_index = HashMap::with_capacity(raw.fields.len());
        for raw_field in &raw.fields {
            let field = self.resolve_field(type_name, &parent_package, raw_field)?;
            if field_index.insert(field.name.clone(), fields.len()).is_some() {
                return Err(SchemaError::malformed_field(
                    type_name,
                    &raw_field.name,
                    "duplicate field name",
                ));
            }
            fields.push(field);
        }

        let min_wire_size = fields
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(self.field_min_size(f)));

        let spec = &mut self.specs[id.0];
        spec.fields = fields;
        spec.field_index = field_index;
        spec.min_wire_size = min_wire_size;

        self.guard.leave(type_name);
        debug!(
            type_name,
            fields = raw.fields.len(),
            min_wire_size,
            "resolved message type"
        );
        Ok(id)
    }

    fn resolve_field(
        &mut self,
        owner: &str,
        parent_package: &str,
        raw: &RawField,
    ) -> Result<FieldDescriptor, SchemaError> {
        let malformed = |reason: &str| SchemaError::malformed_field(owner, &raw.name, reason);

        if raw.name.is_empty() {
            return Err(malformed("empty field name"));
        }
        if !ident_regex().is_match(&raw.name) {
            return Err(malformed("invalid field name"));
        }
        if raw.type_name.is_empty() {
            return Err(malformed("empty type"));
        }
        if !type_token_regex().is_match(&raw.type_name) {
            return Err(malformed(&format!("invalid type token '{}'", raw.type_name)));
        }
        if !raw.package.is_empty() && !ident_regex().is_match(&raw.package) {
            return Err(malformed(&format!("invalid package '{}'", raw.package)));
        }
        let cardinality = Cardinality::from_raw(raw.is_array, raw.array_length)
            .ok_or_else(|| malformed("array declared with length 0"))?;

        let kind = match PrimitiveType::try_from_str(&raw.type_name) {
            Some(_) if !raw.package.is_empty() => {
                return Err(malformed(&format!(
                    "builtin type '{}' cannot carry package '{}'",
                    raw.type_name, raw.package
                )));
            }
            Some(prim) => FieldKind::Builtin(prim),
            None => {
                let qualified = self.qualify(parent_package, raw);
                FieldKind::Message(self.resolve_type(&qualified)?)
            }
        };

        Ok(FieldDescriptor {
            name: raw.name.clone(),
            declared_type: raw.type_name.clone(),
            package: raw.package.clone(),
            kind,
            cardinality,
        })
    }

    /// Fully-qualified name of a non-builtin type token.
    fn qualify(&self, parent_package: &str, raw: &RawField) -> String {
        let token = raw.type_name.as_str();
        if token.contains('/') {
            token.to_string()
        } else if !raw.package.is_empty() {
            format!("{}/{}", raw.package, token)
        } else if token == "Header" {
            self.config.header_type.clone()
        } else if parent_package.is_empty() || self.source.contains(token) {
            token.to_string()
        } else {
            format!("{parent_package}/{token}")
        }
    }

    fn field_min_size(&self, field: &FieldDescriptor) -> usize {
        let element = match field.kind {
            FieldKind::Builtin(prim) => prim.min_size(),
            FieldKind::Message(id) => self.specs[id.0].min_wire_size,
        };
        match field.cardinality {
            Cardinality::Scalar => element,
            Cardinality::Dynamic => 4,
            Cardinality::Fixed(n) => element.saturating_mul(n),
        }
    }
}

/// Resolves type names against a schema source, caching top-level results.
pub struct Resolver<S: SchemaSource> {
    source: S,
    cache: Arc<SchemaCache>,
    config: CodecConfig,
}

impl<S: SchemaSource> Resolver<S> {
    /// Create a resolver backed by the process-wide cache.
    pub fn new(source: S) -> Self {
        Self::with_cache(source, SchemaCache::global())
    }

    /// Create a resolver backed by a caller-owned cache.
    pub fn with_cache(source: S, cache: Arc<SchemaCache>) -> Self {
        Self {
            source,
            cache,
            config: CodecConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the cache.
    pub fn cache(&self) -> &Arc<SchemaCache> {
        &self.cache
    }

    /// Get the schema source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Resolve a fully-qualified type name.
    ///
    /// Fails with the first error found; nothing is cached on failure.
    pub fn resolve(&self, type_name: &str) -> Result<MessageType, SchemaError> {
        if let Some(cached) = self.cache.get(type_name, &self.config)? {
            trace!(type_name, "schema cache hit");
            return Ok(cached);
        }
        self.cache.get_or_try_insert_with(type_name, &self.config, || {
            GraphBuilder::new(&self.source, &self.config).build(type_name)
        })
    }
}
