//! Test utilities for CozoLite integration tests
//!
//! Shared relation specs and rows used across the script rendering tests.

pub mod relations;
