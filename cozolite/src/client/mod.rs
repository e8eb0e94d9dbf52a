// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Database client boundary
//!
//! The engine itself lives behind the [`Client`] trait. CozoLite only renders
//! scripts and forwards them; it never plans, stores or isolates anything.

pub mod recording;
pub mod traits;
pub mod types;

pub use recording::{RecordedCall, RecordingClient, RecordingTransaction};
pub use traits::{Client, ClientTransaction};
pub use types::{Callback, CallbackOp, ClientError, ClientResult, FixedRuleFn, NamedRows, Params};
