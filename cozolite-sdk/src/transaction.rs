//! Multi-statement transactions
//!
//! This module provides transaction support following the rusqlite pattern:
//! - Transactions automatically abort when dropped (unless committed)
//! - RAII ensures no forgotten aborts
//! - Explicit commit() required to persist changes
//!
//! Isolation and durability belong to the engine; this type only decides
//! when to commit or abort the client's transaction handle.

use crate::connection::CozoDb;
use crate::error::{Error, Result};
use crate::executor::{run_logged, ScriptExecutor};
use cozolite::{Client, ClientTransaction, NamedRows, Params};
use std::marker::PhantomData;

/// Represents an active database transaction
///
/// Every [`ScriptExecutor`] operation can run inside a transaction.
///
/// # Examples
///
/// ```no_run
/// # use cozolite_sdk::{CozoDb, RecordingClient, RelationSpec, ScriptExecutor, row};
/// # let db = CozoDb::new(RecordingClient::new());
/// # let rel = RelationSpec::new("rel").key("a").value("b");
/// // Transaction with explicit commit
/// let tx = db.transaction(true)?;
/// tx.put_relation(&rel, row! { "a" => 1, "b" => "one" }, false)?;
/// tx.commit()?;
///
/// // Transaction that aborts (dropped without commit)
/// {
///     let tx = db.transaction(true)?;
///     tx.put_relation(&rel, row! { "a" => 2, "b" => "two" }, false)?;
///     // tx is dropped here, the client transaction is aborted
/// }
/// # Ok::<(), cozolite_sdk::Error>(())
/// ```
pub struct Transaction<'db, C: Client> {
    inner: C::Transaction,
    write: bool,
    finished: bool,
    drop_behavior: DropBehavior,
    _db: PhantomData<&'db CozoDb<C>>,
}

/// Behavior when a transaction is dropped unfinished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropBehavior {
    /// Abort the transaction when dropped (default)
    #[default]
    Abort,
    /// Commit the transaction when dropped
    Commit,
    /// Panic if the transaction is dropped without explicit commit/abort
    Panic,
    /// Do nothing when dropped
    Ignore,
}

impl<'db, C: Client> Transaction<'db, C> {
    /// Begin a new transaction
    ///
    /// This is called internally by `CozoDb::transaction()`.
    pub(crate) fn begin(db: &'db CozoDb<C>, write: bool) -> Result<Self> {
        log::debug!("Beginning {} transaction", if write { "write" } else { "read" });
        let inner = db.client().multi_transact(write).map_err(|e| {
            log::error!("Failed to begin transaction: {}", e);
            Error::Client(e)
        })?;

        Ok(Transaction {
            inner,
            write,
            finished: false,
            drop_behavior: DropBehavior::default(),
            _db: PhantomData,
        })
    }

    pub fn is_write(&self) -> bool {
        self.write
    }

    /// Commit the transaction
    ///
    /// If the commit fails an abort is attempted. The abort's error is
    /// returned when it fails too, otherwise the commit's.
    pub fn commit(mut self) -> Result<()> {
        self.commit_internal()
    }

    /// Abort the transaction
    ///
    /// This is called automatically when the transaction is dropped, so
    /// explicit abort is rarely needed.
    pub fn abort(mut self) -> Result<()> {
        self.abort_internal()
    }

    /// Set the behavior when this transaction is dropped unfinished
    pub fn set_drop_behavior(&mut self, behavior: DropBehavior) {
        self.drop_behavior = behavior;
    }

    fn commit_internal(&mut self) -> Result<()> {
        if self.finished {
            return Err(Error::Transaction(
                "Transaction already finished".to_string(),
            ));
        }
        self.finished = true;

        log::debug!("Committing transaction");
        let commit_err = match self.inner.commit() {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        log::error!("Commit failed, aborting: {}", commit_err);

        match self.inner.abort() {
            Ok(()) => Err(Error::Client(commit_err)),
            Err(abort_err) => {
                log::error!("Abort after failed commit also failed: {}", abort_err);
                Err(Error::Client(abort_err))
            }
        }
    }

    fn abort_internal(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        log::debug!("Aborting transaction");
        self.inner.abort().map_err(|e| {
            log::error!("Abort failed: {}", e);
            Error::Client(e)
        })
    }
}

impl<'db, C: Client> ScriptExecutor for Transaction<'db, C> {
    fn run_script(&self, script: &str, params: &Params) -> Result<NamedRows> {
        if self.finished {
            return Err(Error::Transaction(
                "Transaction already finished".to_string(),
            ));
        }
        run_logged(script, || self.inner.run(script, params))
    }
}

impl<'db, C: Client> Drop for Transaction<'db, C> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        match self.drop_behavior {
            DropBehavior::Abort => {
                if let Err(e) = self.abort_internal() {
                    log::warn!("Failed to abort transaction on drop: {}", e);
                }
            }
            DropBehavior::Commit => {
                if let Err(e) = self.commit_internal() {
                    log::warn!("Failed to commit transaction on drop: {}", e);
                }
            }
            DropBehavior::Panic => {
                if !std::thread::panicking() {
                    panic!("Transaction dropped without explicit commit or abort");
                }
            }
            DropBehavior::Ignore => {}
        }
    }
}
