// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Mutation scripts over constant rules
//!
//! Every mutation renders as a constant rule carrying the rows, followed by
//! the directive naming the target relation and its key/value shape:
//!
//! ```text
//! ?[a, b] <- [[1, "one"], [2, "two"]]
//! :put rel {a => b}
//! :returning
//! ```

use super::relation::{render_spec, RelationSpec};
use super::rows::{render_row, Row, Rows};
use super::rule::ConstantRule;
use crate::error::{ScriptError, ScriptResult};
use crate::value::Value;
use std::fmt;

/// Mutation directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOp {
    /// Upsert rows
    Put,
    /// Add rows, failing if a key already exists
    Insert,
    /// Change the supplied value columns of existing rows
    Update,
    /// Remove rows, failing if a key does not exist
    Delete,
    /// Check the rows exist as given, for transaction consistency
    Ensure,
    /// Check the keys do not exist, for transaction consistency
    EnsureNot,
    /// Remove rows by key
    Rm,
}

impl MutationOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationOp::Put => "put",
            MutationOp::Insert => "insert",
            MutationOp::Update => "update",
            MutationOp::Delete => "delete",
            MutationOp::Ensure => "ensure",
            MutationOp::EnsureNot => "ensure_not",
            MutationOp::Rm => "rm",
        }
    }

    /// Whether the directive only takes key columns
    pub fn keys_only(&self) -> bool {
        matches!(self, MutationOp::Rm | MutationOp::EnsureNot)
    }

    /// Whether `:returning` may follow the directive
    pub fn supports_returning(&self) -> bool {
        !matches!(self, MutationOp::Ensure | MutationOp::EnsureNot)
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutation against the relation described by a [`RelationSpec`]
#[derive(Debug, Clone)]
pub struct Mutation<'a> {
    op: MutationOp,
    spec: &'a RelationSpec,
    returning: bool,
}

impl<'a> Mutation<'a> {
    pub fn new(op: MutationOp, spec: &'a RelationSpec) -> Self {
        Self {
            op,
            spec,
            returning: false,
        }
    }

    /// Ask the engine to return the affected rows
    pub fn returning(mut self, returning: bool) -> Self {
        self.returning = returning;
        self
    }

    pub fn op(&self) -> MutationOp {
        self.op
    }

    /// Validate `rows` and render the full mutation script
    ///
    /// Fails before rendering anything when the input is empty or a row lacks
    /// one of the declared key columns.
    pub fn render(&self, rows: impl Into<Rows>) -> ScriptResult<String> {
        if self.returning && !self.op.supports_returning() {
            return Err(ScriptError::InvalidOperation(format!(
                ":returning is not supported by :{}",
                self.op
            )));
        }

        let rows = rows.into().normalize()?;
        if rows.is_empty() {
            return Err(if self.op == MutationOp::Rm {
                ScriptError::EmptyKeys
            } else {
                ScriptError::EmptyRows
            });
        }

        let keys = self.spec.key_names();
        let item = if self.op == MutationOp::Rm { "key" } else { "row" };
        for row in &rows {
            let mut missing: Vec<String> = keys
                .iter()
                .filter(|key| !row.contains_key(key.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                missing.sort();
                return Err(ScriptError::MissingKeys {
                    missing,
                    item,
                    row: render_row(row),
                });
            }
        }

        let values = self.value_columns(&rows);
        let mut columns = keys.clone();
        columns.extend(values.iter().cloned());

        let constant = ConstantRule::new(columns.iter().cloned())
            .rows(rows.iter().map(|row| {
                columns
                    .iter()
                    .map(|column| row.get(column).cloned().unwrap_or(Value::Null))
                    .collect()
            }))
            .render();

        let mut script = format!(
            "{}\n:{} {} {}",
            constant,
            self.op,
            self.spec.name,
            render_spec(&keys, &values)
        );
        if self.returning {
            script.push_str("\n:returning");
        }
        Ok(script)
    }

    /// Value columns carried by the constant rule
    ///
    /// Updates only carry values some row supplies, so the engine leaves the
    /// rest of each stored row untouched. Other directives carry every declared
    /// value, with absent ones rendered as `null`.
    fn value_columns(&self, rows: &[Row]) -> Vec<String> {
        match self.op {
            MutationOp::Rm | MutationOp::EnsureNot => Vec::new(),
            MutationOp::Update => self
                .spec
                .value_names()
                .into_iter()
                .filter(|column| rows.iter().any(|row| row.contains_key(column)))
                .collect(),
            _ => self.spec.value_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    fn rel_spec() -> RelationSpec {
        RelationSpec::new("rel").key("a").value("b")
    }

    #[test]
    fn test_put_with_returning() {
        let spec = rel_spec();
        let script = Mutation::new(MutationOp::Put, &spec)
            .returning(true)
            .render(vec![row! { "a" => 1, "b" => "one" }, row! { "a" => 2, "b" => "two" }])
            .unwrap();
        assert_eq!(
            script,
            "?[a, b] <- [[1, \"one\"], [2, \"two\"]]\n:put rel {a => b}\n:returning"
        );
    }

    #[test]
    fn test_missing_value_renders_null() {
        let spec = rel_spec();
        let script = Mutation::new(MutationOp::Insert, &spec)
            .render(row! { "a" => 3 })
            .unwrap();
        assert_eq!(script, "?[a, b] <- [[3, null]]\n:insert rel {a => b}");
    }

    #[test]
    fn test_missing_key_names_key_and_row() {
        let spec = rel_spec();
        let err = Mutation::new(MutationOp::Put, &spec)
            .render(vec![row! { "b" => "three" }])
            .unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingKeys {
                missing: vec!["a".to_string()],
                item: "row",
                row: "{b: \"three\"}".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Missing required keys [a] in row {b: \"three\"}"
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        let spec = rel_spec();
        let err = Mutation::new(MutationOp::Put, &spec)
            .render(Vec::<Row>::new())
            .unwrap_err();
        assert_eq!(err, ScriptError::EmptyRows);

        let err = Mutation::new(MutationOp::Rm, &spec)
            .render(Vec::<Row>::new())
            .unwrap_err();
        assert_eq!(err, ScriptError::EmptyKeys);
    }

    #[test]
    fn test_rm_uses_keys_only() {
        let spec = RelationSpec::new("airport")
            .key("code")
            .values(["desc", "lon", "lat", "country"]);
        let script = Mutation::new(MutationOp::Rm, &spec)
            .returning(true)
            .render(row! { "code" => "LAX", "desc" => "ignored" })
            .unwrap();
        assert_eq!(script, "?[code] <- [[\"LAX\"]]\n:rm airport {code}\n:returning");
    }

    #[test]
    fn test_rm_missing_key_mentions_key() {
        let spec = rel_spec();
        let err = Mutation::new(MutationOp::Rm, &spec)
            .render(vec![row! { "b" => "one" }])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required keys [a] in key {b: \"one\"}");
    }

    #[test]
    fn test_update_carries_supplied_values_only() {
        let spec = RelationSpec::new("airport")
            .key("code")
            .values(["desc", "lon", "lat", "country"]);
        let script = Mutation::new(MutationOp::Update, &spec)
            .render(vec![
                row! { "code" => "JFK", "lat" => 40.6 },
                row! { "code" => "SFO", "desc" => "San Francisco" },
            ])
            .unwrap();
        assert_eq!(
            script,
            "?[code, desc, lat] <- [[\"JFK\", null, 40.6], [\"SFO\", \"San Francisco\", null]]\n:update airport {code => desc, lat}"
        );
    }

    #[test]
    fn test_ensure_not_and_returning_rejection() {
        let spec = rel_spec();
        let script = Mutation::new(MutationOp::EnsureNot, &spec)
            .render(row! { "a" => 9, "b" => "nine" })
            .unwrap();
        assert_eq!(script, "?[a] <- [[9]]\n:ensure_not rel {a}");

        let err = Mutation::new(MutationOp::Ensure, &spec)
            .returning(true)
            .render(row! { "a" => 9 })
            .unwrap_err();
        assert!(matches!(err, ScriptError::InvalidOperation(_)));
    }

    #[test]
    fn test_temporal_rows() {
        let spec = RelationSpec::new("hos")
            .keys(["state", "year"])
            .value("hos")
            .temporal(true);
        let script = Mutation::new(MutationOp::Put, &spec)
            .render(row! { "state" => "US", "year" => vec![Value::Int(2001), Value::Bool(true)], "hos" => "Bush" })
            .unwrap();
        assert_eq!(
            script,
            "?[state, year, hos] <- [[\"US\", [2001, true], \"Bush\"]]\n:put hos {state, year => hos}"
        );
    }
}
