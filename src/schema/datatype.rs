//! Canonical display strings for catalog type descriptors.
//!
//! Column listings carry the type as a serialized JSON object, e.g.
//! `{"type":"FIXED","precision":38,"scale":0,"nullable":true}`.

use serde::Deserialize;
use thiserror::Error;

/// Datatype used when a descriptor cannot be parsed
pub const UNKNOWN_DATATYPE: &str = "unknown";

/// Error raised when a type descriptor is not usable
#[derive(Debug, Error)]
pub enum TypeParseError {
    #[error("malformed type descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("type descriptor has an empty base type")]
    EmptyType,
}

/// Parsed catalog type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeDescriptor {
    /// Base type tag (FIXED, TEXT, REAL, ...)
    #[serde(rename = "type")]
    pub base: String,
    /// Whether the column accepts NULL
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Fixed-width flag for textual types
    #[serde(default)]
    pub fixed: Option<bool>,
    /// Character length
    #[serde(default)]
    pub length: Option<u64>,
    /// Numeric precision
    #[serde(default)]
    pub precision: Option<i64>,
    /// Numeric scale
    #[serde(default)]
    pub scale: Option<i64>,
}

fn default_nullable() -> bool {
    true
}

impl TypeDescriptor {
    /// Parse a serialized descriptor
    pub fn parse(raw: &str) -> Result<Self, TypeParseError> {
        let descriptor: TypeDescriptor = serde_json::from_str(raw)?;
        if descriptor.base.trim().is_empty() {
            return Err(TypeParseError::EmptyType);
        }
        Ok(descriptor)
    }

    /// Render the canonical, lowercase display datatype
    pub fn normalize(&self) -> String {
        let mut datatype = if self.base == "FIXED" {
            "NUMBER".to_string()
        } else {
            match self.fixed {
                Some(true) if self.base == "TEXT" => "CHAR".to_string(),
                Some(false) if self.base == "TEXT" => "VARCHAR".to_string(),
                _ => self.base.clone(),
            }
        };

        if let Some(length) = self.length {
            datatype.push_str(&format!("({})", length));
        } else if let Some(precision) = self.precision.filter(|p| *p > 0) {
            let scale = self.scale.unwrap_or(0);
            if scale == 0 {
                datatype.push_str(&format!("({})", precision));
            } else {
                datatype.push_str(&format!("({},{})", precision, scale));
            }
        }

        datatype.to_lowercase()
    }
}

/// Parse and normalize in one go, for callers that only need the string
pub fn normalize_datatype(raw: &str) -> Result<String, TypeParseError> {
    TypeDescriptor::parse(raw).map(|d| d.normalize())
}
