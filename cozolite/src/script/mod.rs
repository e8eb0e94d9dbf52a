// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CozoScript builders
//!
//! Pure functions and value objects that render requests into script text:
//! - options: query option directives (`:order`, `:limit`, ...)
//! - relation: stored relation schemas and mutation specs
//! - rows: row input normalization
//! - access / rule / fixed_rule: rule heads and bodies
//! - mutation: `:put`, `:rm` and friends over constant rules
//! - chain: multi-statement transaction scripts
//! - ddl: relation, index, trigger and system directives

pub mod access;
pub mod chain;
pub mod ddl;
pub mod fixed_rule;
pub mod mutation;
pub mod options;
pub mod relation;
pub mod rows;
pub mod rule;

pub use access::RelationAccess;
pub use chain::{chain, ChainQuery};
pub use ddl::{AccessLevel, SystemOp, Triggers};
pub use fixed_rule::{rule_input, stored_input, FixedRuleCall};
pub use mutation::{Mutation, MutationOp};
pub use options::{Assertion, OrderKey, QueryOptions};
pub use relation::{Column, RelationSpec};
pub use rows::{render_row, Row, Rows};
pub use rule::{ConstantRule, InlineRule};
