//! Test utilities for CozoLite SDK integration tests
//!
//! DbFixture wraps a database handle around a RecordingClient and keeps a
//! second handle on the client so tests can inspect what was sent.

pub mod db_fixture;
