// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Stored relation access atoms

use crate::value::{format_validity, format_value, Value};

/// Access to a stored relation inside a rule body
///
/// `atom()` binds the requested columns by name, e.g. `*airport{code, desc}`.
/// Equality filters never bind a constant inside the atom: each one becomes a
/// separate `column == literal` atom, and a filtered column that was not
/// requested is bound as a plain variable so that comparison can see it.
/// A validity marker turns the access into a time-travel read.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationAccess {
    relation: String,
    columns: Vec<String>,
    filters: Vec<(String, Value)>,
    validity: Option<Value>,
}

impl RelationAccess {
    pub fn new(relation: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            validity: None,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Require `column` to equal `value`; a repeated column replaces its earlier value
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.filters.iter_mut().find(|(c, _)| *c == column) {
            Some(existing) => existing.1 = value,
            None => self.filters.push((column, value)),
        }
        self
    }

    pub fn filters<I, S, V>(self, filters: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        filters
            .into_iter()
            .fold(self, |access, (column, value)| access.filter(column, value))
    }

    /// Read the relation as of `validity` (a timestamp or a keyword such as `"NOW"`)
    pub fn at(mut self, validity: impl Into<Value>) -> Self {
        self.validity = Some(validity.into());
        self
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn requested_columns(&self) -> &[String] {
        &self.columns
    }

    /// Every column bound by the atom: requested columns, then unrequested filter columns
    pub fn bindings(&self) -> Vec<String> {
        let mut bindings = self.columns.clone();
        for (column, _) in &self.filters {
            if !bindings.contains(column) {
                bindings.push(column.clone());
            }
        }
        bindings
    }

    /// The relation atom alone, e.g. `*hos{hos, year @ 'NOW'}`
    pub fn atom(&self) -> String {
        let bindings = self.bindings();
        let mut body = bindings.join(", ");
        if let Some(validity) = &self.validity {
            if !bindings.is_empty() {
                body.push_str(" @ ");
                body.push_str(&format_validity(validity));
            }
        }
        format!("*{}{{{}}}", self.relation, body)
    }

    /// The relation atom followed by one equality atom per filter
    ///
    /// A filter column that was not requested is still bound in the relation
    /// atom (`*airport{code, desc, country}`, not `*airport{code, desc}`) so
    /// the equality atom never refers to an unbound variable.
    pub fn atoms(&self) -> Vec<String> {
        let mut atoms = vec![self.atom()];
        atoms.extend(
            self.filters
                .iter()
                .map(|(column, value)| format!("{} == {}", column, format_value(value))),
        );
        atoms
    }
}
