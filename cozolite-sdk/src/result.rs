//! Result handling and typed deserialization
//!
//! This module provides utilities for working with script results, including
//! type-safe deserialization into Rust structs.

use crate::error::{Error, Result};
use cozolite::{NamedRows, Row, Value};
use serde::de::DeserializeOwned;

/// Wrapper around [`NamedRows`] with type-safe accessors
///
/// # Examples
///
/// ```no_run
/// use serde::Deserialize;
/// use cozolite_sdk::{CozoDb, RecordingClient, ScriptExecutor, TypedResult};
///
/// #[derive(Deserialize, Debug)]
/// struct Airport {
///     code: String,
///     lat: f64,
/// }
///
/// # fn main() -> Result<(), cozolite_sdk::Error> {
/// # let db = CozoDb::new(RecordingClient::new());
/// let result = db.script("?[code, lat] := *airport{code, lat}")?;
/// let typed = TypedResult::from(result);
///
/// for airport in typed.deserialize_rows::<Airport>()? {
///     println!("Airport: {:?}", airport);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TypedResult {
    inner: NamedRows,
}

impl TypedResult {
    pub fn new(result: NamedRows) -> Self {
        TypedResult { inner: result }
    }

    pub fn inner(&self) -> &NamedRows {
        &self.inner
    }

    pub fn into_inner(self) -> NamedRows {
        self.inner
    }

    pub fn row_count(&self) -> usize {
        self.inner.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.inner.headers
    }

    /// Row at `index` keyed by column name
    ///
    /// A row narrower or wider than the headers is a validation error.
    pub fn get_row(&self, index: usize) -> Result<Option<Row>> {
        Ok(self.inner.row_map(index)?)
    }

    /// Deserialize every row into `T`, matching fields by column name
    pub fn deserialize_rows<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.inner
            .to_maps()?
            .iter()
            .map(|row| self.deserialize_row(row))
            .collect()
    }

    pub fn deserialize_row<T: DeserializeOwned>(&self, row: &Row) -> Result<T> {
        let object: serde_json::Map<String, serde_json::Value> = row
            .iter()
            .map(|(column, value)| (column.clone(), value.to_json()))
            .collect();
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }

    pub fn first<T: DeserializeOwned>(&self) -> Result<T> {
        let row = self
            .get_row(0)?
            .ok_or_else(|| Error::NotFound("No rows returned".to_string()))?;

        self.deserialize_row(&row)
    }

    /// The first column of the first row
    pub fn scalar<T: DeserializeOwned>(&self) -> Result<T> {
        if self.inner.headers.is_empty() {
            return Err(Error::NotFound("No columns returned".to_string()));
        }

        let value = self
            .inner
            .rows
            .first()
            .ok_or_else(|| Error::NotFound("No rows returned".to_string()))?
            .first()
            .ok_or_else(|| Error::NotFound("Column value not found".to_string()))?;

        value_to_type(value)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.inner.rows
    }
}

impl From<NamedRows> for TypedResult {
    fn from(result: NamedRows) -> Self {
        TypedResult::new(result)
    }
}

fn value_to_type<T: DeserializeOwned>(value: &Value) -> Result<T> {
    serde_json::from_value(value.to_json()).map_err(|e| e.into())
}
