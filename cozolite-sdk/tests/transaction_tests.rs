//! Transaction lifecycle tests
//!
//! Covers the scoped `transact` form, explicit commit/abort and the
//! behaviors applied when a transaction is dropped unfinished.

#[path = "testutils/mod.rs"]
mod testutils;

use cozolite_sdk::{row, ClientError, DropBehavior, Error, RecordedCall, ScriptExecutor};
use std::panic::{catch_unwind, AssertUnwindSafe};
use testutils::db_fixture::{airport_rows, airport_spec, DbFixture};

fn tx_tail(calls: &[RecordedCall]) -> Vec<RecordedCall> {
    calls
        .iter()
        .filter(|call| {
            matches!(
                call,
                RecordedCall::BeginTransaction { .. } | RecordedCall::Commit | RecordedCall::Abort
            )
        })
        .cloned()
        .collect()
}

#[test]
fn test_transact_commits_on_success() {
    let fixture = DbFixture::new();
    let spec = airport_spec();

    let count = fixture
        .db
        .transact(true, |tx| {
            tx.put_relation(&spec, airport_rows(), false)?;
            Ok(2)
        })
        .unwrap();
    assert_eq!(count, 2);

    let calls = fixture.calls();
    assert!(matches!(calls[1], RecordedCall::TransactionRun { .. }));
    assert_eq!(
        tx_tail(&calls),
        vec![RecordedCall::BeginTransaction { write: true }, RecordedCall::Commit]
    );
}

#[test]
fn test_error_in_body_aborts_instead_of_committing() {
    let fixture = DbFixture::new();
    let spec = airport_spec();

    let result: cozolite_sdk::Result<()> = fixture.db.transact(true, |tx| {
        tx.put_relation(&spec, airport_rows(), false)?;
        Err(Error::InvalidOperation("stop halfway".to_string()))
    });

    assert!(matches!(result, Err(Error::InvalidOperation(_))));
    assert_eq!(
        tx_tail(&fixture.calls()),
        vec![RecordedCall::BeginTransaction { write: true }, RecordedCall::Abort]
    );
}

#[test]
fn test_validation_error_in_body_sends_nothing_and_aborts() {
    let fixture = DbFixture::new();
    let spec = airport_spec();

    let result = fixture.db.transact(true, |tx| {
        tx.put_relation(&spec, row! { "desc" => "no code" }, false)
    });

    assert!(result.unwrap_err().is_validation());
    assert!(fixture.scripts().is_empty());
    assert_eq!(fixture.calls().last(), Some(&RecordedCall::Abort));
}

#[test]
fn test_panic_in_body_aborts() {
    let fixture = DbFixture::new();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _: cozolite_sdk::Result<()> = fixture.db.transact(true, |tx| {
            tx.script("?[a] <- [[1]]")?;
            panic!("body panicked");
        });
    }));

    assert!(outcome.is_err());
    assert_eq!(fixture.calls().last(), Some(&RecordedCall::Abort));
    assert!(!fixture.calls().contains(&RecordedCall::Commit));
}

#[test]
fn test_failed_commit_falls_back_to_abort() {
    let fixture = DbFixture::new();
    fixture
        .client
        .fail_next_commit(ClientError::new("write conflict"));

    let err = fixture
        .db
        .transact(true, |tx| tx.script("?[a] <- [[1]]"))
        .unwrap_err();

    assert_eq!(err.client_error().map(|e| e.message.as_str()), Some("write conflict"));
    assert_eq!(
        tx_tail(&fixture.calls()),
        vec![
            RecordedCall::BeginTransaction { write: true },
            RecordedCall::Commit,
            RecordedCall::Abort
        ]
    );
}

#[test]
fn test_failed_abort_after_failed_commit_is_surfaced() {
    let fixture = DbFixture::new();
    fixture
        .client
        .fail_next_commit(ClientError::new("write conflict"));
    fixture
        .client
        .fail_next_abort(ClientError::new("engine unavailable"));

    let tx = fixture.db.transaction(true).unwrap();
    let err = tx.commit().unwrap_err();

    assert_eq!(
        err.client_error().map(|e| e.message.as_str()),
        Some("engine unavailable")
    );
}

#[test]
fn test_begin_failure_passes_through() {
    let fixture = DbFixture::new();
    fixture
        .client
        .fail_next_begin(ClientError::new("database is read-only"));

    let err = fixture.db.transact(true, |_tx| Ok(())).unwrap_err();
    assert_eq!(err.to_string(), "database is read-only");
}

#[test]
fn test_drop_aborts_by_default() {
    let fixture = DbFixture::new();
    {
        let tx = fixture.db.transaction(false).unwrap();
        tx.script("?[a] <- [[1]]").unwrap();
    }
    assert_eq!(
        tx_tail(&fixture.calls()),
        vec![RecordedCall::BeginTransaction { write: false }, RecordedCall::Abort]
    );
}

#[test]
fn test_explicit_abort() {
    let fixture = DbFixture::new();
    let tx = fixture.db.transaction(true).unwrap();
    tx.abort().unwrap();
    assert_eq!(
        tx_tail(&fixture.calls()),
        vec![RecordedCall::BeginTransaction { write: true }, RecordedCall::Abort]
    );
}

#[test]
#[should_panic(expected = "Transaction dropped without explicit commit or abort")]
fn test_panic_drop_behavior() {
    let fixture = DbFixture::new();
    let mut tx = fixture.db.transaction(true).unwrap();
    tx.set_drop_behavior(DropBehavior::Panic);
}
