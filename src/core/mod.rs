// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout robomsg.
//!
//! This module provides the foundational types for the library:
//! - [`Error`], [`SchemaError`], [`CodecError`] - Error handling
//! - [`Value`] - Tagged field value representation
//! - [`CodecConfig`] - Resolution and decoding tunables

pub mod config;
pub mod error;
pub mod value;

pub use config::CodecConfig;
pub use error::{CodecError, CodecErrorKind, Error, FieldPath, PathSegment, Result, SchemaError};
pub use value::{Duration, Time, Value};
