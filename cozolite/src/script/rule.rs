// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Inline and constant rules

use super::options::QueryOptions;
use crate::value::{format_value, Value};

/// `name[head] := atom, atom, ...` followed by option directives
#[derive(Debug, Clone, PartialEq)]
pub struct InlineRule {
    name: String,
    head: Vec<String>,
    body: Vec<String>,
    options: QueryOptions,
}

impl InlineRule {
    /// An entry rule (`?`) projecting `head`
    pub fn new<I, S>(head: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::named("?", head)
    }

    pub fn named<I, S>(name: impl Into<String>, head: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            head: head.into_iter().map(Into::into).collect(),
            body: Vec::new(),
            options: QueryOptions::default(),
        }
    }

    pub fn atom(mut self, atom: impl Into<String>) -> Self {
        self.body.push(atom.into());
        self
    }

    pub fn atoms<I, S>(mut self, atoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body.extend(atoms.into_iter().map(Into::into));
        self
    }

    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn render(&self) -> String {
        let mut rule = format!(
            "{}[{}] := {}",
            self.name,
            self.head.join(", "),
            self.body.join(", ")
        );
        let options = self.options.render();
        if !options.is_empty() {
            rule.push('\n');
            rule.push_str(&options);
        }
        rule
    }
}

/// `name[head] <- [[...], ...]`: a rule whose rows are literal data
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantRule {
    name: String,
    head: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ConstantRule {
    pub fn new<I, S>(head: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "?".to_string(),
            head: head.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Vec<Value>>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn render(&self) -> String {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let values: Vec<String> = row.iter().map(format_value).collect();
                format!("[{}]", values.join(", "))
            })
            .collect();
        format!("{}[{}] <- [{}]", self.name, self.head.join(", "), rows.join(", "))
    }
}
