//! Database handle
//!
//! This module provides the main entry point for working with a Cozo
//! database. The handle owns the injected client for its whole lifetime and
//! releases it on `close()` or when dropped.

use crate::config::{DbOptions, OpenClient};
use crate::error::{Error, Result};
use crate::executor::{run_logged, ScriptExecutor};
use crate::transaction::Transaction;
use cozolite::{CallbackOp, Client, NamedRows, Params, Row, Rows, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Main entry point for database operations
///
/// Script-based operations come from [`ScriptExecutor`]; the methods here
/// forward structured data straight to the client.
///
/// # Examples
///
/// With the `cozo` feature enabled:
///
/// ```no_run
/// use cozolite_sdk::{CozoClient, CozoDb, DbOptions, ScriptExecutor};
///
/// # fn main() -> Result<(), cozolite_sdk::Error> {
/// let db: CozoDb<CozoClient> = CozoDb::open(&DbOptions::default())?;
/// let relations = db.list_relations()?;
/// db.close()?;
/// # Ok(())
/// # }
/// ```
pub struct CozoDb<C: Client> {
    client: C,
    closed: bool,
}

impl<C: Client> CozoDb<C> {
    /// Wrap an already opened client
    pub fn new(client: C) -> Self {
        CozoDb {
            client,
            closed: false,
        }
    }

    /// Open a client from configuration
    pub fn open(options: &DbOptions) -> Result<Self>
    where
        C: OpenClient,
    {
        log::info!(
            "Opening {} database at {}",
            options.engine,
            options.path.display()
        );
        let client = C::open(options).map_err(|e| {
            Error::Connection(format!(
                "Failed to open {} database at {}: {}",
                options.engine,
                options.path.display(),
                e
            ))
        })?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Release the client
    pub fn close(mut self) -> Result<()> {
        self.close_internal()
    }

    fn close_internal(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        log::debug!("Closing database");
        self.client.close().map_err(Error::Client)
    }

    /// Upsert rows through the client's structured path
    pub fn put(&self, relation: &str, rows: impl Into<Rows>) -> Result<NamedRows> {
        let rows = rows.into().normalize()?;
        self.put_rows(relation, &rows)
    }

    /// Upsert rows, filling `field` with `validity` in rows that lack it
    pub fn put_with_validity(
        &self,
        relation: &str,
        rows: impl Into<Rows>,
        field: &str,
        validity: impl Into<Value>,
    ) -> Result<NamedRows> {
        let validity = validity.into();
        let mut rows = rows.into().normalize()?;
        for row in &mut rows {
            row.entry(field.to_string())
                .or_insert_with(|| validity.clone());
        }
        self.put_rows(relation, &rows)
    }

    fn put_rows(&self, relation: &str, rows: &[Row]) -> Result<NamedRows> {
        log::debug!("Putting {} rows into {}", rows.len(), relation);
        self.structured(|| self.client.put(relation, rows))
    }

    /// Remove rows by key through the client's structured path
    pub fn remove(&self, relation: &str, keys: impl Into<Rows>) -> Result<NamedRows> {
        let keys = keys.into().normalize()?;
        log::debug!("Removing {} keys from {}", keys.len(), relation);
        self.structured(|| self.client.rm(relation, &keys))
    }

    /// Update rows through the client's structured path
    pub fn update(&self, relation: &str, rows: impl Into<Rows>) -> Result<NamedRows> {
        let rows = rows.into().normalize()?;
        log::debug!("Updating {} rows in {}", rows.len(), relation);
        self.structured(|| self.client.update(relation, &rows))
    }

    pub fn export_relations(&self, relations: &[&str]) -> Result<BTreeMap<String, NamedRows>> {
        let relations: Vec<String> = relations.iter().map(|r| r.to_string()).collect();
        self.structured(|| self.client.export_relations(&relations))
    }

    pub fn import_relations(&self, data: BTreeMap<String, NamedRows>) -> Result<()> {
        self.structured(|| self.client.import_relations(data))
    }

    pub fn backup(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::info!("Backing up database to {}", path.display());
        self.structured(|| self.client.backup(path))
    }

    pub fn restore(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::info!("Restoring database from {}", path.display());
        self.structured(|| self.client.restore(path))
    }

    /// Load selected relations from a backup
    pub fn import_from_backup(&self, path: impl AsRef<Path>, relations: &[&str]) -> Result<()> {
        let path = path.as_ref();
        let relations: Vec<String> = relations.iter().map(|r| r.to_string()).collect();
        self.structured(|| self.client.import_from_backup(path, &relations))
    }

    /// Listen for changes to `relation`; returns the id used to unregister
    pub fn register_callback<F>(&self, relation: &str, callback: F) -> Result<u32>
    where
        F: Fn(CallbackOp, NamedRows, NamedRows) + Send + Sync + 'static,
    {
        self.structured(|| self.client.register_callback(relation, Box::new(callback)))
    }

    pub fn unregister_callback(&self, id: u32) -> Result<bool> {
        self.structured(|| self.client.unregister_callback(id))
    }

    /// Make `name(...)` callable as a fixed rule producing rows of `arity` columns
    pub fn register_fixed_rule<F>(&self, name: &str, arity: usize, rule: F) -> Result<()>
    where
        F: Fn(&[NamedRows], &BTreeMap<String, Value>) -> cozolite::ClientResult<NamedRows>
            + Send
            + Sync
            + 'static,
    {
        self.structured(|| self.client.register_fixed_rule(name, arity, Box::new(rule)))
    }

    pub fn unregister_fixed_rule(&self, name: &str) -> Result<bool> {
        self.structured(|| self.client.unregister_fixed_rule(name))
    }

    /// Begin a transaction
    ///
    /// The transaction aborts when dropped unless committed.
    pub fn transaction(&self, write: bool) -> Result<Transaction<'_, C>> {
        Transaction::begin(self, write)
    }

    /// Run `body` inside a transaction
    ///
    /// Commits when `body` returns `Ok`. When `body` fails or panics the
    /// transaction is aborted and the body's outcome is returned. A failed
    /// commit triggers an abort; if that abort fails too its error is
    /// returned instead of the commit's.
    pub fn transact<T, F>(&self, write: bool, body: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_, C>) -> Result<T>,
    {
        let tx = self.transaction(write)?;
        match body(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = tx.abort() {
                    log::warn!("Failed to abort transaction after error: {}", abort_err);
                }
                Err(e)
            }
        }
    }

    fn structured<T>(&self, request: impl FnOnce() -> cozolite::ClientResult<T>) -> Result<T> {
        request().map_err(|e| {
            log::error!("Client request failed: {}", e);
            Error::Client(e)
        })
    }
}

impl<C: Client> ScriptExecutor for CozoDb<C> {
    fn run_script(&self, script: &str, params: &Params) -> Result<NamedRows> {
        run_logged(script, || self.client.run(script, params))
    }
}

impl<C: Client> Drop for CozoDb<C> {
    fn drop(&mut self) {
        if let Err(e) = self.close_internal() {
            log::warn!("Failed to close database on drop: {}", e);
        }
    }
}
