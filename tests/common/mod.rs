// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use robomsg::{MemorySchemaSource, MessageType, RawField, RawSchema, Resolver, SchemaCache};

// ============================================================================
// Schema Fixtures
// ============================================================================

/// Schemas shaped like the common ROS1 message packages.
pub fn ros_source() -> MemorySchemaSource {
    MemorySchemaSource::new()
        .with(
            RawSchema::new("geometry_msgs/Point")
                .with_md5sum("4a842b65f413084dc2b10fb484ea7f17")
                .with_text("float64 x\nfloat64 y\nfloat64 z\n")
                .field(RawField::new("x", "float64"))
                .field(RawField::new("y", "float64"))
                .field(RawField::new("z", "float64")),
        )
        .with(
            RawSchema::new("geometry_msgs/Quaternion")
                .with_md5sum("a779879fadf0160734f906b8c19c7004")
                .field(RawField::new("x", "float64"))
                .field(RawField::new("y", "float64"))
                .field(RawField::new("z", "float64"))
                .field(RawField::new("w", "float64")),
        )
        .with(
            RawSchema::new("geometry_msgs/Pose")
                .with_md5sum("e45d45a5a1ce597b249e23fb30fc871f")
                .field(RawField::new("position", "Point"))
                .field(RawField::new("orientation", "Quaternion")),
        )
        .with(
            RawSchema::new("geometry_msgs/PoseStamped")
                .field(RawField::new("header", "Header"))
                .field(RawField::new("pose", "Pose")),
        )
        .with(
            RawSchema::new("nav_msgs/Path")
                .field(RawField::new("header", "Header"))
                .field(RawField::dynamic_array("poses", "PoseStamped").with_package("geometry_msgs")),
        )
        .with(
            RawSchema::new("sensor_msgs/CompressedImage")
                .field(RawField::new("header", "Header"))
                .field(RawField::new("format", "string"))
                .field(RawField::dynamic_array("data", "uint8")),
        )
        .with(
            RawSchema::new("test_msgs/Scenario")
                .field(RawField::new("u8", "uint8"))
                .field(RawField::new("s", "string"))
                .field(RawField::fixed_array("arr", "int16", 2)),
        )
        .with(
            RawSchema::new("test_msgs/Lists")
                .field(RawField::dynamic_array("ints", "int32"))
                .field(RawField::dynamic_array("names", "string"))
                .field(RawField::dynamic_array("points", "geometry_msgs/Point")),
        )
        .with(
            RawSchema::new("test_msgs/AllTypes")
                .field(RawField::new("b", "bool"))
                .field(RawField::new("i8", "int8"))
                .field(RawField::new("i16", "int16"))
                .field(RawField::new("i32", "int32"))
                .field(RawField::new("i64", "int64"))
                .field(RawField::new("u8", "uint8"))
                .field(RawField::new("u16", "uint16"))
                .field(RawField::new("u32", "uint32"))
                .field(RawField::new("u64", "uint64"))
                .field(RawField::new("f32", "float32"))
                .field(RawField::new("f64", "float64"))
                .field(RawField::new("s", "string"))
                .field(RawField::new("t", "time"))
                .field(RawField::new("d", "duration"))
                .field(RawField::dynamic_array("bytes", "uint8"))
                .field(RawField::fixed_array("fixed_bytes", "uint8", 3))
                .field(RawField::dynamic_array("floats", "float32"))
                .field(RawField::dynamic_array("names", "string"))
                .field(RawField::fixed_array("stamps", "time", 2))
                .field(RawField::dynamic_array("points", "geometry_msgs/Point")),
        )
}

/// Resolver over [`ros_source`] with its own cache, so tests never share state.
pub fn resolver() -> Resolver<MemorySchemaSource> {
    Resolver::with_cache(ros_source(), Arc::new(SchemaCache::new()))
}

/// Resolve a type from [`ros_source`].
pub fn resolve(type_name: &str) -> MessageType {
    resolver()
        .resolve(type_name)
        .unwrap_or_else(|e| panic!("failed to resolve {type_name}: {e}"))
}

/// Resolve a type from a single ad-hoc schema set.
pub fn resolve_from(source: MemorySchemaSource, type_name: &str) -> MessageType {
    Resolver::with_cache(source, Arc::new(SchemaCache::new()))
        .resolve(type_name)
        .unwrap_or_else(|e| panic!("failed to resolve {type_name}: {e}"))
}

// ============================================================================
// Byte Helpers
// ============================================================================

/// Render bytes as space-separated uppercase hex, for readable assertion failures.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
