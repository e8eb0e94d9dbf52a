// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Fixed rule invocations (`<~`)
//!
//! Fixed rules are algorithms and utilities implemented inside the engine
//! (`PageRank`, `ShortestPathDijkstra`, `ReorderSort`, ...) or registered by the
//! application as custom rules.

use super::options::QueryOptions;
use crate::value::{format_value, Value};

/// `*relation[c1, c2]`: positional input from a stored relation
pub fn stored_input<I, S>(relation: &str, columns: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    format!("*{}", rule_input(relation, columns))
}

/// `rule[c1, c2]`: positional input from a rule defined in the same script
pub fn rule_input<I, S>(rule: &str, columns: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let columns: Vec<String> = columns
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .collect();
    format!("{}[{}]", rule, columns.join(", "))
}

/// `name[head] <~ Algorithm(input, ..., option: value, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct FixedRuleCall {
    name: String,
    head: Vec<String>,
    algorithm: String,
    inputs: Vec<String>,
    params: Vec<(String, String)>,
    options: QueryOptions,
}

impl FixedRuleCall {
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            name: "?".to_string(),
            head: Vec::new(),
            algorithm: algorithm.into(),
            inputs: Vec::new(),
            params: Vec::new(),
            options: QueryOptions::default(),
        }
    }

    /// Rule name receiving the output; defaults to the entry rule `?`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn head<I, S>(mut self, head: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.head = head.into_iter().map(Into::into).collect();
        self
    }

    /// Pre-formatted input relation, see [`stored_input`] and [`rule_input`]
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }

    /// Keyword option rendered as a literal
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.push((name.into(), format_value(&value.into())));
        self
    }

    /// Keyword option passed through as an expression, e.g. `to_lowercase(name)`
    pub fn param_expr(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.params.push((name.into(), expr.into()));
        self
    }

    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn render(&self) -> String {
        let mut args = self.inputs.clone();
        args.extend(
            self.params
                .iter()
                .map(|(name, value)| format!("{}: {}", name, value)),
        );
        let mut call = format!(
            "{}[{}] <~ {}({})",
            self.name,
            self.head.join(", "),
            self.algorithm,
            args.join(", ")
        );
        let options = self.options.render();
        if !options.is_empty() {
            call.push('\n');
            call.push_str(&options);
        }
        call
    }
}
