// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CozoLite - typed CozoScript builders for embedded Cozo databases
//!
//! CozoLite renders database operations (relation creation, mutations, rule
//! queries, time-travel reads, fixed-rule calls, indexes, triggers) into
//! CozoScript text and hands that text to an injected [`Client`]. Query planning
//! and storage live in the engine behind the client.
//!
//! # Usage
//!
//! ```no_run
//! use cozolite::{Mutation, MutationOp, RelationSpec, row};
//!
//! let airport = RelationSpec::new("airport")
//!     .key("code")
//!     .values(["desc", "lon", "lat", "country"]);
//!
//! let script = Mutation::new(MutationOp::Put, &airport)
//!     .render(row! { "code" => "JFK", "desc" => "John F. Kennedy" })
//!     .expect("row carries every key column");
//! ```
//!
//! Most applications use the `cozolite-sdk` facade instead of calling the
//! builders directly.

pub mod client;
pub mod error;
pub mod script;
pub mod value;

pub use client::{
    Callback, CallbackOp, Client, ClientError, ClientResult, ClientTransaction, FixedRuleFn,
    NamedRows, Params, RecordedCall, RecordingClient, RecordingTransaction,
};
pub use error::{ScriptError, ScriptResult};
pub use script::{
    chain, render_row, stored_input, rule_input, AccessLevel, Assertion, ChainQuery, Column,
    ConstantRule, FixedRuleCall, InlineRule, Mutation, MutationOp, OrderKey, QueryOptions,
    RelationAccess, RelationSpec, Row, Rows, SystemOp, Triggers,
};
pub use value::{format_validity, format_value, Validity, ValidityKeyword, Value};

/// CozoLite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CozoLite crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
