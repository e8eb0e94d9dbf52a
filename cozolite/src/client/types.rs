// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Types exchanged with a database client

use crate::error::{ScriptError, ScriptResult};
use crate::script::Row;
use crate::value::Value;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Named script parameters, referenced as `$name` inside scripts
pub type Params = BTreeMap<String, Value>;

/// Failure reported by the engine behind a client
///
/// Passed through the facade unchanged.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Tabular result of a script
///
/// Chained scripts return one block per statement, linked through `next`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRows {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<NamedRows>>,
}

impl NamedRows {
    pub fn new<H: Into<String>>(headers: impl IntoIterator<Item = H>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows,
            next: None,
        }
    }

    /// The `status: OK` table mutations and system operations report
    pub fn status_ok() -> Self {
        Self::new(["status"], vec![vec![Value::from("OK")]])
    }

    pub fn with_next(mut self, next: NamedRows) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(index)).collect())
    }

    /// Row `index` keyed by header; `None` past the last row
    ///
    /// A row whose width differs from the headers is rejected.
    pub fn row_map(&self, index: usize) -> ScriptResult<Option<Row>> {
        self.rows
            .get(index)
            .map(|values| self.keyed(index, values))
            .transpose()
    }

    /// Rows as header-keyed maps; fails on the first ragged row
    pub fn to_maps(&self) -> ScriptResult<Vec<Row>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, values)| self.keyed(index, values))
            .collect()
    }

    fn keyed(&self, index: usize, values: &[Value]) -> ScriptResult<Row> {
        if values.len() != self.headers.len() {
            return Err(ScriptError::RaggedRow {
                index,
                expected: self.headers.len(),
                found: values.len(),
            });
        }
        Ok(self.headers.iter().cloned().zip(values.iter().cloned()).collect())
    }

    /// This block followed by every chained block
    pub fn blocks(&self) -> impl Iterator<Item = &NamedRows> {
        std::iter::successors(Some(self), |block| block.next.as_deref())
    }

    /// Rows as a JSON array of objects
    ///
    /// Meant for display and export, so cells without a header are left out.
    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .headers
                    .iter()
                    .cloned()
                    .zip(row.iter().map(Value::to_json))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

impl fmt::Display for NamedRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(self.headers.iter().map(Cell::new));
        for row in &self.rows {
            table.add_row(row.iter().map(|value| match value {
                Value::String(s) => Cell::new(s),
                other => Cell::new(other.to_string()),
            }));
        }
        write!(f, "{}", table)
    }
}

/// Kind of change reported to a relation callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallbackOp {
    Put,
    Rm,
}

/// Change listener: operation, new rows, old rows
pub type Callback = Box<dyn Fn(CallbackOp, NamedRows, NamedRows) + Send + Sync>;

/// Custom fixed rule body: input relations and options in, output rows out
pub type FixedRuleFn =
    Box<dyn Fn(&[NamedRows], &BTreeMap<String, Value>) -> ClientResult<NamedRows> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    fn airports() -> NamedRows {
        NamedRows::new(
            ["code", "lon"],
            vec![
                vec![Value::from("JFK"), Value::from(-73.7781)],
                vec![Value::from("LAX"), Value::from(-118.4085)],
            ],
        )
    }

    #[test]
    fn test_lookup() {
        let rows = airports();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.get(1, "code"), Some(&Value::from("LAX")));
        assert_eq!(rows.get(0, "missing"), None);
        assert_eq!(rows.column("code").map(|c| c.len()), Some(2));
    }

    #[test]
    fn test_maps_and_json() {
        let rows = airports();
        let maps = rows.to_maps().unwrap();
        assert_eq!(maps[0].get("code"), Some(&Value::from("JFK")));
        assert_eq!(rows.to_json()[1]["code"], serde_json::json!("LAX"));
        assert_eq!(rows.row_map(1).unwrap(), Some(maps[1].clone()));
        assert_eq!(rows.row_map(2).unwrap(), None);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let narrow = NamedRows::new(["code", "lon"], vec![vec![Value::from("JFK")]]);
        let wide = NamedRows::new(
            ["code"],
            vec![vec![Value::from("JFK")], vec![Value::from("LAX"), Value::from(1)]],
        );

        let expected_narrow = ScriptError::RaggedRow {
            index: 0,
            expected: 2,
            found: 1,
        };
        assert_eq!(narrow.to_maps().unwrap_err(), expected_narrow);
        assert_eq!(narrow.row_map(0).unwrap_err(), expected_narrow);
        assert_eq!(
            wide.to_maps().unwrap_err(),
            ScriptError::RaggedRow {
                index: 1,
                expected: 1,
                found: 2,
            }
        );
        assert!(wide.row_map(0).unwrap().is_some());
    }

    #[test]
    fn test_chained_blocks() {
        let rows = NamedRows::status_ok().with_next(airports());
        assert_eq!(rows.blocks().count(), 2);
    }

    #[test]
    fn test_table_display() {
        let rendered = airports().to_string();
        assert!(rendered.contains("JFK"));
        assert!(rendered.contains("code"));
    }
}
