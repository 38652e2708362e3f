//! Data models for dataset loading
//!
//! This module contains the wire types fetched from the remote source
//! (manifest and schema), the decoded row representation, and the
//! provenance attached to every load result.

use std::fmt;
use std::ops::Index;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Dataset manifest describing where the payload lives and how to verify it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Payload location, absolute or relative to the manifest URL
    pub url: String,
    /// Opaque cache-busting token for the payload
    #[serde(default, deserialize_with = "deserialize_token")]
    pub version: Option<String>,
    /// Token used to fetch the matching schema
    #[serde(default, deserialize_with = "deserialize_token")]
    pub schema_version: Option<String>,
    /// Expected SHA-256 digest of the payload text
    #[serde(default)]
    pub sha256: Option<String>,
}

/// Version tokens are opaque; publishers write them as strings or numbers
fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Token {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Token>::deserialize(deserializer)?.map(|token| match token {
        Token::Text(text) => text,
        Token::Number(number) => number.to_string(),
    }))
}

/// Declared shape of the dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Columns that must appear in the first row
    #[serde(default)]
    pub required_columns: Vec<String>,
    /// Columns expected to hold numeric-like values
    #[serde(default)]
    pub numeric_columns: Vec<String>,
}

/// A single cell of a decoded row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
    /// Empty cell
    Empty,
}

impl CellValue {
    /// Build a cell from raw CSV text; blank text becomes `Empty`
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(field.to_string())
        }
    }

    /// Whether the cell carries no value
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_field(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Decoded row: column name to cell value, in CSV header order
///
/// Serializes as a JSON object whose keys keep that order. Re-inserting an
/// existing column replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's value, returning the previous one
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) -> Option<CellValue> {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.cells.push((column, value));
                None
            }
        }
    }

    /// Value of a column
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Whether the row has a column
    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Columns and values in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Index<&str> for Row {
    type Output = CellValue;

    fn index(&self, column: &str) -> &CellValue {
        match self.get(column) {
            Some(value) => value,
            None => panic!("no column named {:?} in row", column),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of column names to cell values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some((column, value)) = access.next_entry::<String, CellValue>()? {
                    row.insert(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Where a load result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Freshly fetched and validated
    Network,
    /// Last-known-good copy
    Cache,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Network => write!(f, "network"),
            Source::Cache => write!(f, "cache"),
        }
    }
}

/// Provenance of a load result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Path the rows were obtained through
    pub source: Source,
    /// Manifest used for the network load that produced the rows
    #[serde(default)]
    pub manifest: Option<Manifest>,
    /// When the rows were fetched from the network
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Provenance {
    /// Provenance for a fresh network load
    pub fn network(manifest: Manifest) -> Self {
        Self {
            source: Source::Network,
            manifest: Some(manifest),
            fetched_at: Some(Utc::now()),
        }
    }

    /// Same provenance, marked as served from the cache
    pub fn into_cached(self) -> Self {
        Self {
            source: Source::Cache,
            ..self
        }
    }
}

/// Rows plus their provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    /// Decoded rows, in payload order
    pub rows: Vec<Row>,
    /// Where the rows came from
    pub meta: Provenance,
}

impl LoadResult {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names of the first row, in header order
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().collect())
            .unwrap_or_default()
    }
}
