// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Script building errors

use thiserror::Error;

/// Input-validation errors raised before any script reaches a client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Data cannot be empty")]
    EmptyRows,

    #[error("Keys cannot be empty")]
    EmptyKeys,

    /// `item` is `"row"` for mutations and `"key"` for removals
    #[error("Missing required keys [{}] in {} {}", .missing.join(", "), .item, .row)]
    MissingKeys {
        missing: Vec<String>,
        item: &'static str,
        row: String,
    },

    #[error("Row {index} has {found} values but the table has {expected} columns")]
    RaggedRow {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unknown validity keyword: {0}")]
    UnknownValidityKeyword(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type ScriptResult<T> = Result<T, ScriptError>;
