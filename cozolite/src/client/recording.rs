// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Recording client for testing
//!
//! Records every request it receives and answers from a queue of canned
//! responses (`status: OK` when the queue is empty). Clones share state, so a
//! test can keep one handle while the facade owns another.

use super::traits::{Client, ClientTransaction};
use super::types::{Callback, CallbackOp, ClientError, ClientResult, FixedRuleFn, NamedRows, Params};
use crate::script::Row;
use crate::value::Value;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type SharedCallback = Arc<dyn Fn(CallbackOp, NamedRows, NamedRows) + Send + Sync>;
type SharedFixedRule =
    Arc<dyn Fn(&[NamedRows], &BTreeMap<String, Value>) -> ClientResult<NamedRows> + Send + Sync>;

/// A request observed by a [`RecordingClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Run { script: String, params: Params },
    Put { relation: String, rows: Vec<Row> },
    Rm { relation: String, keys: Vec<Row> },
    Update { relation: String, rows: Vec<Row> },
    ExportRelations(Vec<String>),
    ImportRelations(Vec<String>),
    Backup(PathBuf),
    Restore(PathBuf),
    ImportFromBackup { path: PathBuf, relations: Vec<String> },
    RegisterCallback { relation: String, id: u32 },
    UnregisterCallback(u32),
    RegisterFixedRule { name: String, arity: usize },
    UnregisterFixedRule(String),
    BeginTransaction { write: bool },
    TransactionRun { script: String, params: Params },
    Commit,
    Abort,
    Close,
}

#[derive(Default)]
struct RecordingState {
    calls: Vec<RecordedCall>,
    responses: VecDeque<ClientResult<NamedRows>>,
    begin_failure: Option<ClientError>,
    commit_failure: Option<ClientError>,
    abort_failure: Option<ClientError>,
    relations: BTreeMap<String, NamedRows>,
    callbacks: BTreeMap<u32, (String, SharedCallback)>,
    next_callback_id: u32,
    fixed_rules: BTreeMap<String, (usize, SharedFixedRule)>,
    closed: bool,
}

impl RecordingState {
    fn ensure_open(&self) -> ClientResult<()> {
        if self.closed {
            return Err(ClientError::new("client is closed"));
        }
        Ok(())
    }

    fn respond(&mut self, call: RecordedCall) -> ClientResult<NamedRows> {
        self.ensure_open()?;
        log::trace!("Recorded {:?}", call);
        self.calls.push(call);
        self.responses
            .pop_front()
            .unwrap_or_else(|| Ok(NamedRows::status_ok()))
    }

    fn record(&mut self, call: RecordedCall) -> ClientResult<()> {
        self.ensure_open()?;
        log::trace!("Recorded {:?}", call);
        self.calls.push(call);
        Ok(())
    }
}

/// In-memory [`Client`] that records requests instead of executing them
#[derive(Clone, Default)]
pub struct RecordingClient {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next script or structured row call
    pub fn push_response(&self, rows: NamedRows) {
        self.state.lock().responses.push_back(Ok(rows));
    }

    /// Queue a failure for the next script or structured row call
    pub fn push_failure(&self, error: ClientError) {
        self.state.lock().responses.push_back(Err(error));
    }

    pub fn fail_next_begin(&self, error: ClientError) {
        self.state.lock().begin_failure = Some(error);
    }

    pub fn fail_next_commit(&self, error: ClientError) {
        self.state.lock().commit_failure = Some(error);
    }

    pub fn fail_next_abort(&self, error: ClientError) {
        self.state.lock().abort_failure = Some(error);
    }

    /// Make a relation available to `export_relations`
    pub fn seed_relation(&self, name: impl Into<String>, rows: NamedRows) {
        self.state.lock().relations.insert(name.into(), rows);
    }

    /// Relation contents seeded or imported so far
    pub fn relation(&self, name: &str) -> Option<NamedRows> {
        self.state.lock().relations.get(name).cloned()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Scripts sent directly or inside transactions, in order
    pub fn scripts(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Run { script, .. } | RecordedCall::TransactionRun { script, .. } => {
                    Some(script.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn last_script(&self) -> Option<String> {
        self.scripts().pop()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Deliver a change to every callback registered on `relation`; returns how many ran
    pub fn fire_callback(&self, relation: &str, op: CallbackOp, new: NamedRows, old: NamedRows) -> usize {
        let callbacks: Vec<SharedCallback> = self
            .state
            .lock()
            .callbacks
            .values()
            .filter(|(target, _)| target == relation)
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in &callbacks {
            callback(op, new.clone(), old.clone());
        }
        callbacks.len()
    }

    /// Invoke a registered custom fixed rule as the engine would
    pub fn call_fixed_rule(
        &self,
        name: &str,
        inputs: &[NamedRows],
        options: &BTreeMap<String, Value>,
    ) -> ClientResult<NamedRows> {
        let (arity, rule) = self
            .state
            .lock()
            .fixed_rules
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::new(format!("fixed rule not found: {}", name)))?;
        let rows = rule(inputs, options)?;
        if let Some(width) = rows.rows.iter().map(Vec::len).find(|w| *w != arity) {
            return Err(ClientError::new(format!(
                "fixed rule {} returned a row of width {}, expected {}",
                name, width, arity
            )));
        }
        Ok(rows)
    }
}

impl fmt::Debug for RecordingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RecordingClient")
            .field("calls", &state.calls.len())
            .field("queued_responses", &state.responses.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl Client for RecordingClient {
    type Transaction = RecordingTransaction;

    fn run(&self, script: &str, params: &Params) -> ClientResult<NamedRows> {
        self.state.lock().respond(RecordedCall::Run {
            script: script.to_string(),
            params: params.clone(),
        })
    }

    fn put(&self, relation: &str, rows: &[Row]) -> ClientResult<NamedRows> {
        self.state.lock().respond(RecordedCall::Put {
            relation: relation.to_string(),
            rows: rows.to_vec(),
        })
    }

    fn rm(&self, relation: &str, keys: &[Row]) -> ClientResult<NamedRows> {
        self.state.lock().respond(RecordedCall::Rm {
            relation: relation.to_string(),
            keys: keys.to_vec(),
        })
    }

    fn update(&self, relation: &str, rows: &[Row]) -> ClientResult<NamedRows> {
        self.state.lock().respond(RecordedCall::Update {
            relation: relation.to_string(),
            rows: rows.to_vec(),
        })
    }

    fn export_relations(&self, relations: &[String]) -> ClientResult<BTreeMap<String, NamedRows>> {
        let mut state = self.state.lock();
        state.record(RecordedCall::ExportRelations(relations.to_vec()))?;
        relations
            .iter()
            .map(|name| {
                state
                    .relations
                    .get(name)
                    .cloned()
                    .map(|rows| (name.clone(), rows))
                    .ok_or_else(|| ClientError::new(format!("relation not found: {}", name)))
            })
            .collect()
    }

    fn import_relations(&self, data: BTreeMap<String, NamedRows>) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.record(RecordedCall::ImportRelations(data.keys().cloned().collect()))?;
        state.relations.extend(data);
        Ok(())
    }

    fn backup(&self, path: &Path) -> ClientResult<()> {
        self.state
            .lock()
            .record(RecordedCall::Backup(path.to_path_buf()))
    }

    fn restore(&self, path: &Path) -> ClientResult<()> {
        self.state
            .lock()
            .record(RecordedCall::Restore(path.to_path_buf()))
    }

    fn import_from_backup(&self, path: &Path, relations: &[String]) -> ClientResult<()> {
        self.state.lock().record(RecordedCall::ImportFromBackup {
            path: path.to_path_buf(),
            relations: relations.to_vec(),
        })
    }

    fn register_callback(&self, relation: &str, callback: Callback) -> ClientResult<u32> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.next_callback_id += 1;
        let id = state.next_callback_id;
        state
            .callbacks
            .insert(id, (relation.to_string(), Arc::from(callback)));
        state.calls.push(RecordedCall::RegisterCallback {
            relation: relation.to_string(),
            id,
        });
        Ok(id)
    }

    fn unregister_callback(&self, id: u32) -> ClientResult<bool> {
        let mut state = self.state.lock();
        state.record(RecordedCall::UnregisterCallback(id))?;
        Ok(state.callbacks.remove(&id).is_some())
    }

    fn register_fixed_rule(&self, name: &str, arity: usize, rule: FixedRuleFn) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.record(RecordedCall::RegisterFixedRule {
            name: name.to_string(),
            arity,
        })?;
        state
            .fixed_rules
            .insert(name.to_string(), (arity, Arc::from(rule)));
        Ok(())
    }

    fn unregister_fixed_rule(&self, name: &str) -> ClientResult<bool> {
        let mut state = self.state.lock();
        state.record(RecordedCall::UnregisterFixedRule(name.to_string()))?;
        Ok(state.fixed_rules.remove(name).is_some())
    }

    fn multi_transact(&self, write: bool) -> ClientResult<RecordingTransaction> {
        let mut state = self.state.lock();
        state.record(RecordedCall::BeginTransaction { write })?;
        if let Some(error) = state.begin_failure.take() {
            return Err(error);
        }
        Ok(RecordingTransaction {
            state: self.state.clone(),
            write,
        })
    }

    fn close(&mut self) -> ClientResult<()> {
        let mut state = self.state.lock();
        if !state.closed {
            state.calls.push(RecordedCall::Close);
            state.closed = true;
        }
        Ok(())
    }
}

/// Transaction handle of a [`RecordingClient`]
pub struct RecordingTransaction {
    state: Arc<Mutex<RecordingState>>,
    write: bool,
}

impl RecordingTransaction {
    pub fn is_write(&self) -> bool {
        self.write
    }
}

impl ClientTransaction for RecordingTransaction {
    fn run(&self, script: &str, params: &Params) -> ClientResult<NamedRows> {
        self.state.lock().respond(RecordedCall::TransactionRun {
            script: script.to_string(),
            params: params.clone(),
        })
    }

    fn commit(&self) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.record(RecordedCall::Commit)?;
        match state.commit_failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn abort(&self) -> ClientResult<()> {
        let mut state = self.state.lock();
        state.record(RecordedCall::Abort)?;
        match state.abort_failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
