// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Predefined well-known message types.
//!
//! These are resolved even when the schema source does not provide them.
//!
//! ## Supported Types
//!
//! - `std_msgs/Header` - ROS1 header with sequence number, stamp and frame id
//!
//! ```text
//! uint32 seq
//! time stamp
//! string frame_id
//! ```

use crate::schema::source::{RawField, RawSchema};

/// Fully-qualified name of the well-known header type.
pub const HEADER_TYPE: &str = "std_msgs/Header";

/// Content hash of the ROS1 `std_msgs/Header` definition.
pub const HEADER_MD5SUM: &str = "2176decaecbce78abc3b96ef049fabed";

const HEADER_TEXT: &str = "uint32 seq\ntime stamp\nstring frame_id\n";

/// Create the predefined std_msgs/Header type.
fn builtin_header() -> RawSchema {
    RawSchema::new(HEADER_TYPE)
        .with_text(HEADER_TEXT)
        .with_md5sum(HEADER_MD5SUM)
        .field(RawField::new("seq", "uint32"))
        .field(RawField::new("stamp", "time"))
        .field(RawField::new("frame_id", "string"))
}

/// Get all predefined message types.
pub fn get_all() -> Vec<RawSchema> {
    vec![builtin_header()]
}

/// Look up a predefined type by fully-qualified name.
pub fn lookup(type_name: &str) -> Option<RawSchema> {
    get_all().into_iter().find(|schema| schema.name == type_name)
}
