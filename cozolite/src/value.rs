// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Script values and their CozoScript literal rendering
//!
//! Supports the value shapes a script can carry inline:
//! - Basic types: Null, Bool, Int, Float, String
//! - Collections: List
//! - Temporal marker: Validity (`[timestamp, assert]`)
//! - Engine types: Uuid, Json

use crate::error::ScriptError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Temporal validity marker stored in the last key column of a time-travel relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Validity {
    /// Microseconds since the Unix epoch
    pub timestamp: i64,
    /// `true` asserts the fact from `timestamp` on, `false` retracts it
    pub assert: bool,
}

impl Validity {
    pub fn new(timestamp: i64, assert: bool) -> Self {
        Self { timestamp, assert }
    }

    /// Assert a fact starting at the given instant
    pub fn assert_at(at: DateTime<Utc>) -> Self {
        Self::new(at.timestamp_micros(), true)
    }

    /// Retract a fact starting at the given instant
    pub fn retract_at(at: DateTime<Utc>) -> Self {
        Self::new(at.timestamp_micros(), false)
    }
}

/// Keywords accepted in place of a timestamp in time-travel reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidityKeyword {
    Now,
    End,
    Assert,
    Retract,
}

impl ValidityKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidityKeyword::Now => "NOW",
            ValidityKeyword::End => "END",
            ValidityKeyword::Assert => "ASSERT",
            ValidityKeyword::Retract => "RETRACT",
        }
    }
}

impl FromStr for ValidityKeyword {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOW" => Ok(ValidityKeyword::Now),
            "END" => Ok(ValidityKeyword::End),
            "ASSERT" => Ok(ValidityKeyword::Assert),
            "RETRACT" => Ok(ValidityKeyword::Retract),
            _ => Err(ScriptError::UnknownValidityKeyword(s.to_string())),
        }
    }
}

impl fmt::Display for ValidityKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can appear as a literal in a script or a cell in a result
///
/// Deserialization is untagged, so JSON arrays become `List` and JSON
/// objects become `Json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Uuid(Uuid),
    List(Vec<Value>),
    Validity(Validity),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Validity markers and `[number, bool]` pairs both read as a validity
    pub fn as_validity(&self) -> Option<Validity> {
        match self {
            Value::Validity(v) => Some(*v),
            Value::List(items) => match items.as_slice() {
                [Value::Int(ts), Value::Bool(assert)] => Some(Validity::new(*ts, *assert)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Convert to a plain JSON value (validity becomes `[ts, assert]`, UUIDs become strings)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::json!(i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Uuid(u) => serde_json::Value::String(u.to_string()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Validity(v) => serde_json::json!([v.timestamp, v.assert]),
            Value::Json(j) => j.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_value(self))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<Validity> for Value {
    fn from(v: Validity) -> Self {
        Value::Validity(v)
    }
}

impl From<ValidityKeyword> for Value {
    fn from(k: ValidityKeyword) -> Self {
        Value::String(k.as_str().to_string())
    }
}

/// Instants become microsecond timestamps, the unit validity reads are expressed in
impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::Int(at.timestamp_micros())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            object @ serde_json::Value::Object(_) => Value::Json(object),
        }
    }
}

/// Render a value as a CozoScript literal
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::String(s) => quote_string(s),
        Value::Uuid(u) => format!("to_uuid({})", quote_string(&u.to_string())),
        Value::List(items) => {
            let parts: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Validity(v) => format!("[{}, {}]", v.timestamp, v.assert),
        Value::Json(j) => format!("parse_json({})", quote_string(&j.to_string())),
    }
}

/// Render a validity marker for a time-travel clause
///
/// Keywords (`now`, `end`, `assert`, `retract`, any case) render single-quoted
/// and upper-cased; everything else renders as an ordinary literal.
pub fn format_validity(value: &Value) -> String {
    if let Value::String(s) = value {
        if let Ok(keyword) = s.parse::<ValidityKeyword>() {
            return format!("'{}'", keyword.as_str());
        }
    }
    format_value(value)
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "to_float(\"NAN\")".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "to_float(\"INF\")".to_string()
        } else {
            "to_float(\"NEG_INF\")".to_string()
        }
    } else {
        // Debug keeps a fractional part (`1.0`) and switches to exponent form for extremes
        format!("{:?}", f)
    }
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
