// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Client traits
//!
//! Implemented by adapters around a concrete engine handle. Every method is a
//! single blocking request; failures are reported as [`ClientError`] and are
//! never retried by callers.

use super::types::{Callback, ClientResult, FixedRuleFn, NamedRows, Params};
use crate::script::Row;
use std::collections::BTreeMap;
use std::path::Path;

/// Handle on a multi-statement engine transaction
pub trait ClientTransaction {
    /// Run a script inside the transaction
    fn run(&self, script: &str, params: &Params) -> ClientResult<NamedRows>;

    /// Make the transaction's writes durable
    fn commit(&self) -> ClientResult<()>;

    /// Discard the transaction's writes
    fn abort(&self) -> ClientResult<()>;
}

/// Main database client trait
///
/// Defines the engine operations the facade delegates to: script execution,
/// structured row access, relation export/import, backups, change callbacks,
/// custom fixed rules and transactions.
pub trait Client {
    /// Transaction handle returned by [`Client::multi_transact`]
    type Transaction: ClientTransaction;

    /// Execute a script with named parameters
    fn run(&self, script: &str, params: &Params) -> ClientResult<NamedRows>;

    /// Upsert rows without going through a script
    fn put(&self, relation: &str, rows: &[Row]) -> ClientResult<NamedRows>;

    /// Remove rows by key without going through a script
    fn rm(&self, relation: &str, keys: &[Row]) -> ClientResult<NamedRows>;

    /// Update rows without going through a script
    fn update(&self, relation: &str, rows: &[Row]) -> ClientResult<NamedRows>;

    /// Dump the named relations
    fn export_relations(&self, relations: &[String]) -> ClientResult<BTreeMap<String, NamedRows>>;

    /// Load relation contents produced by [`Client::export_relations`]
    fn import_relations(&self, data: BTreeMap<String, NamedRows>) -> ClientResult<()>;

    /// Write a backup of the whole database to `path`
    fn backup(&self, path: &Path) -> ClientResult<()>;

    /// Replace the database contents with the backup at `path`
    fn restore(&self, path: &Path) -> ClientResult<()>;

    /// Load selected relations from the backup at `path`
    fn import_from_backup(&self, path: &Path, relations: &[String]) -> ClientResult<()>;

    /// Listen for changes to a relation; returns the callback id
    fn register_callback(&self, relation: &str, callback: Callback) -> ClientResult<u32>;

    /// Returns whether a callback with that id existed
    fn unregister_callback(&self, id: u32) -> ClientResult<bool>;

    /// Make a custom fixed rule callable from scripts as `name(...)`
    fn register_fixed_rule(&self, name: &str, arity: usize, rule: FixedRuleFn) -> ClientResult<()>;

    /// Returns whether a rule with that name existed
    fn unregister_fixed_rule(&self, name: &str) -> ClientResult<bool>;

    /// Start a multi-statement transaction
    fn multi_transact(&self, write: bool) -> ClientResult<Self::Transaction>;

    /// Release the underlying engine handle
    fn close(&mut self) -> ClientResult<()>;
}
