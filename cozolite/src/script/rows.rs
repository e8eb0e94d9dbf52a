// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Row input normalization

use crate::client::NamedRows;
use crate::error::{ScriptError, ScriptResult};
use crate::value::{format_value, Value};
use std::collections::BTreeMap;

/// A row keyed by column name
pub type Row = BTreeMap<String, Value>;

/// Row input accepted by mutations and structured client calls
///
/// Normalized to an ordered sequence of rows before any builder runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    One(Row),
    Many(Vec<Row>),
    /// Tabular input: one row per entry of `rows`, keyed by `headers`
    Table(NamedRows),
}

impl Rows {
    /// Flatten into rows; a table row whose width differs from its headers is rejected
    pub fn normalize(self) -> ScriptResult<Vec<Row>> {
        match self {
            Rows::One(row) => Ok(vec![row]),
            Rows::Many(rows) => Ok(rows),
            Rows::Table(table) => {
                let expected = table.headers.len();
                table
                    .rows
                    .into_iter()
                    .enumerate()
                    .map(|(index, values)| {
                        if values.len() != expected {
                            return Err(ScriptError::RaggedRow {
                                index,
                                expected,
                                found: values.len(),
                            });
                        }
                        Ok(table.headers.iter().cloned().zip(values).collect())
                    })
                    .collect()
            }
        }
    }
}

impl From<Row> for Rows {
    fn from(row: Row) -> Self {
        Rows::One(row)
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Rows::Many(rows)
    }
}

impl From<&[Row]> for Rows {
    fn from(rows: &[Row]) -> Self {
        Rows::Many(rows.to_vec())
    }
}

impl From<NamedRows> for Rows {
    fn from(table: NamedRows) -> Self {
        Rows::Table(table)
    }
}

/// Render a row for messages, e.g. `{b: "three"}`
pub fn render_row(row: &Row) -> String {
    let fields: Vec<String> = row
        .iter()
        .map(|(k, v)| format!("{}: {}", k, format_value(v)))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

/// Build a [`Row`] from `column => value` pairs
///
/// ```no_run
/// let row = cozolite::row! { "code" => "JFK", "lat" => 40.6413 };
/// ```
#[macro_export]
macro_rules! row {
    ($($column:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut row = $crate::script::Row::new();
        $(
            row.insert(($column).to_string(), $crate::value::Value::from($value));
        )*
        row
    }};
}
