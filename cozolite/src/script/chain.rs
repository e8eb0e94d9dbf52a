// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Chained queries
//!
//! Several brace-delimited queries in one script run inside a single engine
//! transaction.

use super::options::QueryOptions;

/// One query of a chained script
#[derive(Debug, Clone, PartialEq)]
pub struct ChainQuery {
    pub query: String,
    pub options: Option<QueryOptions>,
}

impl ChainQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// `{`, the query, its option lines, `}` - each on its own line
    pub fn to_script(&self) -> String {
        let mut script = format!("{{\n{}", self.query);
        if let Some(options) = &self.options {
            let rendered = options.render();
            if !rendered.is_empty() {
                script.push('\n');
                script.push_str(&rendered);
            }
        }
        script.push_str("\n}");
        script
    }
}

impl From<&str> for ChainQuery {
    fn from(query: &str) -> Self {
        ChainQuery::new(query)
    }
}

impl From<String> for ChainQuery {
    fn from(query: String) -> Self {
        ChainQuery::new(query)
    }
}

/// Join queries into one multi-statement script
pub fn chain(queries: &[ChainQuery]) -> String {
    queries
        .iter()
        .map(ChainQuery::to_script)
        .collect::<Vec<_>>()
        .join("\n")
}
