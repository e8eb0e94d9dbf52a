// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Stored relation schemas

use serde::{Deserialize, Serialize};

/// A column of a stored relation, optionally typed and defaulted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
        }
    }

    /// Column type as written in a schema, e.g. `Float` or `String?`
    pub fn typed(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// Default expression used when a put omits the column
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    pub fn render(&self) -> String {
        let mut out = self.name.clone();
        if let Some(ty) = &self.ty {
            out.push_str(": ");
            out.push_str(ty);
        }
        if let Some(default) = &self.default {
            out.push_str(" default ");
            out.push_str(default);
        }
        out
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::new(name)
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::new(name)
    }
}

/// Schema of a stored relation
///
/// The trailing key column of a temporal relation holds the validity marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    pub name: String,
    pub keys: Vec<Column>,
    #[serde(default)]
    pub values: Vec<Column>,
    #[serde(default)]
    pub temporal: bool,
}

impl RelationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            values: Vec::new(),
            temporal: false,
        }
    }

    pub fn key(mut self, column: impl Into<Column>) -> Self {
        self.keys.push(column.into());
        self
    }

    pub fn keys<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Column>,
    {
        self.keys.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn value(mut self, column: impl Into<Column>) -> Self {
        self.values.push(column.into());
        self
    }

    pub fn values<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Column>,
    {
        self.values.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn temporal(mut self, temporal: bool) -> Self {
        self.temporal = temporal;
        self
    }

    pub fn key_names(&self) -> Vec<String> {
        self.keys.iter().map(|c| c.name.clone()).collect()
    }

    pub fn value_names(&self) -> Vec<String> {
        self.values.iter().map(|c| c.name.clone()).collect()
    }

    /// Keys followed by values, in declaration order
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.key_names();
        names.extend(self.value_names());
        names
    }

    /// Schema body for `:create` and `:replace`, e.g. `state, year: Validity => hos`
    pub fn schema(&self) -> String {
        let last = self.keys.len().saturating_sub(1);
        let keys: Vec<String> = self
            .keys
            .iter()
            .enumerate()
            .map(|(i, column)| {
                if self.temporal && i == last && column.ty.is_none() {
                    column.clone().typed("Validity").render()
                } else {
                    column.render()
                }
            })
            .collect();

        if self.values.is_empty() {
            keys.join(", ")
        } else {
            let values: Vec<String> = self.values.iter().map(Column::render).collect();
            format!("{} => {}", keys.join(", "), values.join(", "))
        }
    }

    /// Brace-delimited key/value shape for mutation directives, e.g. `{code => desc, lon}`
    pub fn mutation_spec(&self) -> String {
        render_spec(&self.key_names(), &self.value_names())
    }
}

pub(crate) fn render_spec(keys: &[String], values: &[String]) -> String {
    if values.is_empty() {
        format!("{{{}}}", keys.join(", "))
    } else {
        format!("{{{} => {}}}", keys.join(", "), values.join(", "))
    }
}
