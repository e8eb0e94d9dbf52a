//! CozoLite SDK - High-level ergonomic Rust API for Cozo databases
//!
//! This crate provides a developer-friendly facade on top of the CozoLite
//! script builders. Every operation either renders a CozoScript and sends it
//! to the injected client, or forwards structured rows to the client
//! directly. Errors reported by the client are logged and returned unchanged.
//!
//! # Quick Start
//!
//! ```no_run
//! use cozolite_sdk::{CozoDb, Error, RecordingClient, RelationSpec, ScriptExecutor, row};
//!
//! # fn main() -> Result<(), Error> {
//! let db = CozoDb::new(RecordingClient::new());
//!
//! let airport = RelationSpec::new("airport")
//!     .key("code")
//!     .values(["desc", "lon", "lat", "country"]);
//! db.create_relation(&airport)?;
//! db.put_relation(&airport, row! { "code" => "JFK", "country" => "US" }, false)?;
//!
//! let result = db.query_builder("airport")
//!     .select(["code", "desc"])
//!     .filter("country", "US")
//!     .execute()?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   Application Code (Your Rust App)      │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  CozoLite SDK (this crate)              │
//! │  - CozoDb (database handle)             │
//! │  - ScriptExecutor (script operations)   │
//! │  - QueryBuilder (fluent queries)        │
//! │  - Transaction (commit / abort)         │
//! │  - TypedResult (deserialization)        │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  CozoLite Core (cozolite crate)         │
//! │  - Script builders                      │
//! │  - Literal formatting                   │
//! │  - Client trait                         │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//!   Cozo engine client (CozoClient with the
//!   `cozo` feature, or any injected Client)
//! ```
//!
//! # Module Organization
//!
//! - [`connection`] - Database handle and structured pass-through
//! - [`executor`] - Script-based operations
//! - [`query`] - Query builder and execution
//! - [`transaction`] - Transaction support
//! - [`result`] - Result handling and deserialization
//! - [`config`] - Database options
//! - `engine` - Client over the embedded Cozo engine (`cozo` feature)
//! - [`error`] - Error types and handling

// Re-export core types for convenience
pub use cozolite::{
    row, AccessLevel, Assertion, CallbackOp, ChainQuery, Client, ClientError, ClientTransaction,
    Column, FixedRuleCall, InlineRule, MutationOp, NamedRows, OrderKey, Params, QueryOptions,
    RecordedCall, RecordingClient, RelationAccess, RelationSpec, Row, Rows, ScriptError, SystemOp,
    Triggers, Validity, ValidityKeyword, Value,
};

// SDK modules
pub mod config;
pub mod connection;
#[cfg(feature = "cozo")]
pub mod engine;
pub mod error;
pub mod executor;
pub mod query;
pub mod result;
pub mod transaction;

// Re-export main types for convenience
pub use config::{DbOptions, Engine, OpenClient};
pub use connection::CozoDb;
#[cfg(feature = "cozo")]
pub use engine::{CozoClient, CozoTransaction};
pub use error::{Error, Result};
pub use executor::ScriptExecutor;
pub use query::QueryBuilder;
pub use result::TypedResult;
pub use transaction::{DropBehavior, Transaction};
