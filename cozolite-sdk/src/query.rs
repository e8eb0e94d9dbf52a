//! Query builder for fluent select-style queries
//!
//! This module provides a builder API for reading a stored relation without
//! assembling rule text by hand.

use crate::error::{Error, Result};
use crate::executor::ScriptExecutor;
use crate::result::TypedResult;
use cozolite::{
    Assertion, InlineRule, NamedRows, Params, QueryOptions, RelationAccess, ScriptError, Value,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fluent API for building select-style queries
///
/// Selected columns become both the rule head and the bindings of the stored
/// relation atom. Equality filters are emitted as separate `col == literal`
/// atoms and raw conditions are appended verbatim.
///
/// # Examples
///
/// ```no_run
/// # use cozolite_sdk::{CozoDb, RecordingClient, ScriptExecutor};
/// # let db = CozoDb::new(RecordingClient::new());
/// let result = db.query_builder("airport")
///     .select(["code", "desc", "lon", "lat"])
///     .filter("country", "US")
///     .condition("lon > -100")
///     .order_by_desc("lat")
///     .limit(1)
///     .execute()?;
///
/// // Equivalent to:
/// // ?[code, desc, lon, lat] := *airport{code, desc, lon, lat, country}, country == "US", lon > -100
/// // :order -lat
/// // :limit 1
/// # Ok::<(), cozolite_sdk::Error>(())
/// ```
pub struct QueryBuilder<'e, E: ScriptExecutor + ?Sized> {
    executor: &'e E,
    access: RelationAccess,
    conditions: Vec<String>,
    options: QueryOptions,
    params: Params,
}

impl<'e, E: ScriptExecutor + ?Sized> QueryBuilder<'e, E> {
    pub(crate) fn new(executor: &'e E, relation: &str) -> Self {
        QueryBuilder {
            executor,
            access: RelationAccess::new(relation),
            conditions: Vec::new(),
            options: QueryOptions::new(),
            params: Params::new(),
        }
    }

    /// Add output columns, in order
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access = self.access.columns(columns);
        self
    }

    pub fn column(mut self, column: &str) -> Self {
        self.access = self.access.column(column);
        self
    }

    /// Require `column` to equal `value`
    pub fn filter(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.access = self.access.filter(column, value);
        self
    }

    /// Add a raw body atom such as `lon > -100`
    ///
    /// Can be called multiple times; conditions are joined as a conjunction.
    pub fn condition(mut self, condition: &str) -> Self {
        self.conditions.push(condition.to_string());
        self
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.options = self.options.order_by(column);
        self
    }

    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.options = self.options.order_by_desc(column);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.options = self.options.offset(n);
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.options = self.options.limit(n);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.timeout(timeout);
        self
    }

    pub fn sleep(mut self, sleep: Duration) -> Self {
        self.options = self.options.sleep(sleep);
        self
    }

    pub fn assertion(mut self, assertion: Assertion) -> Self {
        self.options = self.options.assertion(assertion);
        self
    }

    /// Engine option rendered as `:key value` without interpretation
    pub fn option(mut self, key: &str, value: &str) -> Self {
        self.options = self.options.extra(key, value);
        self
    }

    /// Replace all options collected so far
    pub fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Read the relation as of `validity` (a timestamp, `[ts, bool]` or a keyword like `"NOW"`)
    pub fn at(mut self, validity: impl Into<Value>) -> Self {
        self.access = self.access.at(validity);
        self
    }

    /// Bind `$name` for use inside conditions
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    /// Render the query script
    ///
    /// Fails when no column has been selected.
    pub fn build(&self) -> Result<String> {
        let head = self.access.requested_columns();
        if head.is_empty() {
            return Err(Error::Validation(ScriptError::InvalidOperation(format!(
                "query on {} selects no columns",
                self.access.relation()
            ))));
        }

        Ok(InlineRule::new(head.iter().cloned())
            .atoms(self.access.atoms())
            .atoms(self.conditions.iter().cloned())
            .options(self.options.clone())
            .render())
    }

    pub fn execute(&self) -> Result<NamedRows> {
        let script = self.build()?;
        self.executor.run_script(&script, &self.params)
    }

    pub fn typed(&self) -> Result<TypedResult> {
        self.execute().map(TypedResult::from)
    }

    /// Execute and deserialize every row into `T`
    pub fn fetch<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.typed()?.deserialize_rows()
    }
}

#[cfg(test)]
mod tests {
    use crate::connection::CozoDb;
    use crate::executor::ScriptExecutor;
    use cozolite::{RecordingClient, Validity};

    #[test]
    fn test_build_with_filters_and_options() {
        let db = CozoDb::new(RecordingClient::new());
        let script = db
            .query_builder("airport")
            .select(["code", "desc"])
            .filter("country", "US")
            .condition("lat > 30")
            .order_by("code")
            .limit(10)
            .build()
            .unwrap();
        assert_eq!(
            script,
            "?[code, desc] := *airport{code, desc, country}, country == \"US\", lat > 30\n:order code\n:limit 10"
        );
    }

    #[test]
    fn test_time_travel() {
        let db = CozoDb::new(RecordingClient::new());
        let builder = db
            .query_builder("hos")
            .select(["hos", "year"])
            .filter("state", "US");

        assert_eq!(
            builder.build().unwrap(),
            "?[hos, year] := *hos{hos, year, state}, state == \"US\""
        );
        assert_eq!(
            db.query_builder("hos")
                .select(["hos", "year"])
                .at("now")
                .build()
                .unwrap(),
            "?[hos, year] := *hos{hos, year @ 'NOW'}"
        );
        assert_eq!(
            db.query_builder("hos")
                .select(["hos"])
                .at(Validity::new(2019, true))
                .build()
                .unwrap(),
            "?[hos] := *hos{hos @ [2019, true]}"
        );
    }

    #[test]
    fn test_requires_selection() {
        let db = CozoDb::new(RecordingClient::new());
        let err = db.query_builder("airport").limit(1).build().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_params_sent_with_script() {
        let client = RecordingClient::new();
        let db = CozoDb::new(client.clone());
        db.query_builder("airport")
            .select(["code"])
            .condition("lat > $min_lat")
            .param("min_lat", 30)
            .execute()
            .unwrap();

        match &client.calls()[0] {
            cozolite::RecordedCall::Run { script, params } => {
                assert_eq!(script, "?[code] := *airport{code}, lat > $min_lat");
                assert_eq!(params.get("min_lat"), Some(&cozolite::Value::Int(30)));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }
}
