// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codec configuration.
//!
//! Every field has a default, so a partial TOML document is enough:
//!
//! ```
//! use robomsg::CodecConfig;
//!
//! let config = CodecConfig::from_toml_str("max_array_length = 4096").unwrap();
//! assert_eq!(config.max_array_length, 4096);
//! assert_eq!(config.header_type, "std_msgs/Header");
//! ```

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Maximum array length accepted from the wire by default.
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 10_000_000;

/// Initial JSON output buffer size for a type that has never been marshalled.
pub const DEFAULT_JSON_CAPACITY_HINT: usize = 128;

/// Well-known header type that the bare `Header` token resolves to.
pub const DEFAULT_HEADER_TYPE: &str = "std_msgs/Header";

/// Tunables for resolution and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest dynamic array count the decoder will pre-allocate
    pub max_array_length: usize,

    /// Starting JSON buffer capacity per message type
    pub json_capacity_hint: usize,

    /// Type the bare `Header` token maps to
    pub header_type: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            json_capacity_hint: DEFAULT_JSON_CAPACITY_HINT,
            header_type: DEFAULT_HEADER_TYPE.to_string(),
        }
    }
}

impl CodecConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    /// Set the maximum dynamic array length.
    pub fn with_max_array_length(mut self, max_array_length: usize) -> Self {
        self.max_array_length = max_array_length;
        self
    }

    /// Set the initial JSON capacity hint.
    pub fn with_json_capacity_hint(mut self, hint: usize) -> Self {
        self.json_capacity_hint = hint;
        self
    }

    /// Set the type the bare `Header` token maps to.
    pub fn with_header_type(mut self, header_type: impl Into<String>) -> Self {
        self.header_type = header_type.into();
        self
    }
}
