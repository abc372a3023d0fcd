//! Typed row schemas, one per catalog listing.
//!
//! Catalog values are loosely typed: comments may be null, key positions may
//! come back as numbers or numeric strings. The deserializers here accept
//! those shapes and nothing else, so the importer works with plain fields.

use super::{CatalogError, CatalogQuery, RawRow};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// `SHOW DATABASES` / `SHOW SCHEMAS` row
#[derive(Debug, Clone, Deserialize)]
pub struct NameRow {
    #[serde(deserialize_with = "text")]
    pub name: String,
}

/// `SHOW TABLES` / `SHOW VIEWS` row
#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub comment: String,
}

/// `SHOW COLUMNS` row
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnRow {
    #[serde(deserialize_with = "text")]
    pub table_name: String,
    #[serde(deserialize_with = "text")]
    pub column_name: String,
    /// Serialized type descriptor, parsed later so one bad column cannot fail the batch
    #[serde(default, deserialize_with = "text_or_empty")]
    pub data_type: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub autoincrement: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub comment: String,
}

/// `SHOW UNIQUE KEYS` row
#[derive(Debug, Clone, Deserialize)]
pub struct UniqueKeyRow {
    #[serde(deserialize_with = "text")]
    pub table_name: String,
    #[serde(deserialize_with = "text")]
    pub column_name: String,
    #[serde(deserialize_with = "text")]
    pub constraint_name: String,
}

/// `SHOW PRIMARY KEYS` row
#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryKeyRow {
    #[serde(deserialize_with = "text")]
    pub table_name: String,
    #[serde(deserialize_with = "text")]
    pub column_name: String,
    #[serde(deserialize_with = "text")]
    pub constraint_name: String,
    /// 1-based position within the key
    #[serde(deserialize_with = "position")]
    pub key_sequence: u32,
}

/// `SHOW IMPORTED KEYS` row
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedKeyRow {
    #[serde(deserialize_with = "text")]
    pub pk_table_name: String,
    #[serde(deserialize_with = "text")]
    pub pk_column_name: String,
    #[serde(deserialize_with = "text")]
    pub fk_table_name: String,
    #[serde(deserialize_with = "text")]
    pub fk_column_name: String,
    #[serde(deserialize_with = "text")]
    pub fk_name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub pk_schema_name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub fk_schema_name: String,
}

/// Decode a whole result set into typed rows, failing on the first bad row
pub fn decode_rows<T: DeserializeOwned>(
    query: &CatalogQuery,
    rows: &[RawRow],
) -> Result<Vec<T>, CatalogError> {
    rows.iter().map(|row| decode_row(query, row)).collect()
}

/// Decode a single row
pub fn decode_row<T: DeserializeOwned>(
    query: &CatalogQuery,
    row: &RawRow,
) -> Result<T, CatalogError> {
    T::deserialize(Value::Object(row.clone())).map_err(|source| CatalogError::Decode {
        query: query.sql(),
        source,
    })
}

/// Render a scalar catalog value as text
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    scalar_text(value).ok_or_else(|| de::Error::custom("expected a value, found null"))
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(value).unwrap_or_default())
}

fn position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid key position: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| de::Error::custom(format!("invalid key position: {}", s))),
        other => Err(de::Error::custom(format!("invalid key position: {}", other))),
    }
}
