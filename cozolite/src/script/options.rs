// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query option directives

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One sort key of an `:order` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderKey {
    Asc(String),
    Desc(String),
}

impl OrderKey {
    pub fn asc(column: impl Into<String>) -> Self {
        OrderKey::Asc(column.into())
    }

    pub fn desc(column: impl Into<String>) -> Self {
        OrderKey::Desc(column.into())
    }

    pub fn render(&self) -> String {
        match self {
            OrderKey::Asc(column) => column.clone(),
            OrderKey::Desc(column) => format!("-{}", column),
        }
    }
}

/// `-col` sorts descending, `+col` and `col` ascending
impl From<&str> for OrderKey {
    fn from(key: &str) -> Self {
        let key = key.trim();
        if let Some(column) = key.strip_prefix('-') {
            OrderKey::Desc(column.trim().to_string())
        } else if let Some(column) = key.strip_prefix('+') {
            OrderKey::Asc(column.trim().to_string())
        } else {
            OrderKey::Asc(key.to_string())
        }
    }
}

impl From<String> for OrderKey {
    fn from(key: String) -> Self {
        OrderKey::from(key.as_str())
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        key.render()
    }
}

/// Row-count assertion checked by the engine after evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assertion {
    /// `:assert none` - the query must return no rows
    None,
    /// `:assert some` - the query must return at least one row
    Some,
}

impl Assertion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Assertion::None => "none",
            Assertion::Some => "some",
        }
    }
}

/// Options attached to a query
///
/// Every option the builders understand has its own field and rendering rule.
/// `extra` carries engine options the builders pass through untouched, rendered
/// as `:key value` after the known options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub order: Vec<OrderKey>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    #[serde(with = "seconds")]
    pub timeout: Option<Duration>,
    #[serde(with = "seconds")]
    pub sleep: Option<Duration>,
    #[serde(rename = "assert")]
    pub assertion: Option<Assertion>,
    pub extra: BTreeMap<String, String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order.push(OrderKey::Asc(column.into()));
        self
    }

    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order.push(OrderKey::Desc(column.into()));
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn sleep(mut self, sleep: Duration) -> Self {
        self.sleep = Some(sleep);
        self
    }

    pub fn assertion(mut self, assertion: Assertion) -> Self {
        self.assertion = Some(assertion);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Render each present option as its own `:name value` directive
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if !self.order.is_empty() {
            let keys: Vec<String> = self.order.iter().map(OrderKey::render).collect();
            lines.push(format!(":order {}", keys.join(", ")));
        }
        if let Some(offset) = self.offset {
            lines.push(format!(":offset {}", offset));
        }
        if let Some(limit) = self.limit {
            lines.push(format!(":limit {}", limit));
        }
        if let Some(timeout) = self.timeout {
            lines.push(format!(":timeout {}", format_seconds(timeout)));
        }
        if let Some(sleep) = self.sleep {
            lines.push(format!(":sleep {}", format_seconds(sleep)));
        }
        if let Some(assertion) = self.assertion {
            lines.push(format!(":assert {}", assertion.as_str()));
        }
        for (key, value) in &self.extra {
            let line = format!(":{} {}", key, value);
            lines.push(line.trim_end().to_string());
        }

        lines
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

fn format_seconds(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        duration.as_secs().to_string()
    } else {
        duration.as_secs_f64().to_string()
    }
}

/// Durations as (fractional) seconds in configuration files
mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_f64(duration.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|e| {
                    serde::de::Error::custom(format!("invalid duration of {} seconds: {}", secs, e))
                })
            })
            .transpose()
    }
}
