//! Client adapter over the embedded Cozo engine
//!
//! Available with the `cozo` feature. [`CozoClient`] owns a
//! `cozo::DbInstance` opened from [`DbOptions`]: the engine name, the storage
//! path and the engine options all reach `DbInstance::new`. Values cross the
//! boundary through their JSON form, which both sides already understand.
//!
//! Structured `put`/`rm`/`update` calls run as a parameterized script:
//!
//! ```text
//! ?[code, desc] <- $data
//! :put airport {code, desc}
//! ```

use crate::config::{DbOptions, Engine, OpenClient};
use cozo::{DataValue, DbInstance, MultiTransaction, ScriptMutability, SimpleFixedRule};
use cozolite::{
    Callback, CallbackOp, Client, ClientError, ClientResult, ClientTransaction, FixedRuleFn,
    NamedRows, Params, Row, Value,
};
use std::collections::BTreeMap;
use std::path::Path;

/// [`Client`] backed by an embedded Cozo database
pub struct CozoClient {
    db: Option<DbInstance>,
    engine: Engine,
}

impl CozoClient {
    pub fn engine(&self) -> Engine {
        self.engine
    }

    fn db(&self) -> ClientResult<&DbInstance> {
        self.db
            .as_ref()
            .ok_or_else(|| ClientError::new("database is closed"))
    }

    fn run_rows(&self, op: &str, relation: &str, rows: &[Row]) -> ClientResult<NamedRows> {
        let Some((script, data)) = rows_script(op, relation, rows)? else {
            return Ok(NamedRows::status_ok());
        };
        let mut params = BTreeMap::new();
        params.insert("data".to_string(), data);
        let result = self
            .db()?
            .run_script(&script, params, ScriptMutability::Mutable)
            .map_err(engine_error)?;
        Ok(from_engine_rows(result))
    }
}

impl std::fmt::Debug for CozoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CozoClient")
            .field("engine", &self.engine)
            .field("closed", &self.db.is_none())
            .finish()
    }
}

impl OpenClient for CozoClient {
    fn open(options: &DbOptions) -> ClientResult<Self> {
        let engine_options = serde_json::Value::Object(options.options.clone()).to_string();
        let db = DbInstance::new(options.engine.as_str(), &options.path, &engine_options)
            .map_err(engine_error)?;
        log::debug!(
            "Opened cozo {} engine at {}",
            options.engine,
            options.path.display()
        );
        Ok(CozoClient {
            db: Some(db),
            engine: options.engine,
        })
    }
}

impl Client for CozoClient {
    type Transaction = CozoTransaction;

    fn run(&self, script: &str, params: &Params) -> ClientResult<NamedRows> {
        let result = self
            .db()?
            .run_script(script, to_engine_params(params), ScriptMutability::Mutable)
            .map_err(engine_error)?;
        Ok(from_engine_rows(result))
    }

    fn put(&self, relation: &str, rows: &[Row]) -> ClientResult<NamedRows> {
        self.run_rows("put", relation, rows)
    }

    fn rm(&self, relation: &str, keys: &[Row]) -> ClientResult<NamedRows> {
        self.run_rows("rm", relation, keys)
    }

    fn update(&self, relation: &str, rows: &[Row]) -> ClientResult<NamedRows> {
        self.run_rows("update", relation, rows)
    }

    fn export_relations(&self, relations: &[String]) -> ClientResult<BTreeMap<String, NamedRows>> {
        let exported = self
            .db()?
            .export_relations(relations.iter())
            .map_err(engine_error)?;
        Ok(exported
            .into_iter()
            .map(|(name, rows)| (name, from_engine_rows(rows)))
            .collect())
    }

    fn import_relations(&self, data: BTreeMap<String, NamedRows>) -> ClientResult<()> {
        let data = data
            .iter()
            .map(|(name, rows)| (name.clone(), to_engine_rows(rows)))
            .collect();
        self.db()?.import_relations(data).map_err(engine_error)
    }

    fn backup(&self, path: &Path) -> ClientResult<()> {
        self.db()?.backup_db(path_string(path)).map_err(engine_error)
    }

    fn restore(&self, path: &Path) -> ClientResult<()> {
        self.db()?
            .restore_backup(path_string(path))
            .map_err(engine_error)
    }

    fn import_from_backup(&self, path: &Path, relations: &[String]) -> ClientResult<()> {
        self.db()?
            .import_from_backup(path_string(path), relations)
            .map_err(engine_error)
    }

    fn register_callback(&self, relation: &str, callback: Callback) -> ClientResult<u32> {
        let (id, receiver) = self.db()?.register_callback(relation, None);
        std::thread::Builder::new()
            .name(format!("cozo-callback-{}", id))
            .spawn(move || {
                // Ends once the engine drops the sender on unregister or close
                for (op, new_rows, old_rows) in receiver.iter() {
                    let op = match op {
                        cozo::CallbackOp::Put => CallbackOp::Put,
                        cozo::CallbackOp::Rm => CallbackOp::Rm,
                    };
                    callback(op, from_engine_rows(new_rows), from_engine_rows(old_rows));
                }
            })
            .map_err(|e| ClientError::new(format!("failed to start callback thread: {}", e)))?;
        Ok(id)
    }

    fn unregister_callback(&self, id: u32) -> ClientResult<bool> {
        Ok(self.db()?.unregister_callback(id))
    }

    fn register_fixed_rule(&self, name: &str, arity: usize, rule: FixedRuleFn) -> ClientResult<()> {
        let rule = SimpleFixedRule::new(arity, move |inputs, options| {
            let inputs: Vec<NamedRows> = inputs.into_iter().map(from_engine_rows).collect();
            let options: BTreeMap<String, Value> = options
                .into_iter()
                .map(|(key, value)| (key, from_data_value(value)))
                .collect();
            rule(&inputs, &options)
                .map(|rows| to_engine_rows(&rows))
                .map_err(|e| miette::miette!("{}", e))
        });
        self.db()?
            .register_fixed_rule(name.to_string(), rule)
            .map_err(engine_error)
    }

    fn unregister_fixed_rule(&self, name: &str) -> ClientResult<bool> {
        self.db()?.unregister_fixed_rule(name).map_err(engine_error)
    }

    fn multi_transact(&self, write: bool) -> ClientResult<Self::Transaction> {
        Ok(CozoTransaction {
            inner: self.db()?.multi_transaction(write),
        })
    }

    fn close(&mut self) -> ClientResult<()> {
        if self.db.take().is_some() {
            log::debug!("Closed cozo {} engine", self.engine);
        }
        Ok(())
    }
}

/// Engine transaction returned by [`CozoClient::multi_transact`]
pub struct CozoTransaction {
    inner: MultiTransaction,
}

impl ClientTransaction for CozoTransaction {
    fn run(&self, script: &str, params: &Params) -> ClientResult<NamedRows> {
        let result = self
            .inner
            .run_script(script, to_engine_params(params))
            .map_err(engine_error)?;
        Ok(from_engine_rows(result))
    }

    fn commit(&self) -> ClientResult<()> {
        self.inner.commit().map_err(engine_error)
    }

    fn abort(&self) -> ClientResult<()> {
        self.inner.abort().map_err(engine_error)
    }
}

fn engine_error(err: impl std::fmt::Display) -> ClientError {
    ClientError::new(err.to_string())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Script and `$data` payload for a structured row operation; `None` for no rows
///
/// Every row must carry the columns of the first one.
fn rows_script(op: &str, relation: &str, rows: &[Row]) -> ClientResult<Option<(String, DataValue)>> {
    let Some(first) = rows.first() else {
        return Ok(None);
    };
    let columns: Vec<&String> = first.keys().collect();
    let data = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            if row.len() != columns.len() || columns.iter().any(|c| !row.contains_key(*c)) {
                return Err(ClientError::new(format!(
                    "row {} of {} does not have the columns of the first row",
                    index, relation
                )));
            }
            Ok(DataValue::List(row.values().map(to_data_value).collect()))
        })
        .collect::<ClientResult<Vec<DataValue>>>()?;

    let columns: Vec<&str> = columns.iter().map(|c| c.as_str()).collect();
    let columns = columns.join(", ");
    let script = format!("?[{}] <- $data\n:{} {} {{{}}}", columns, op, relation, columns);
    Ok(Some((script, DataValue::List(data))))
}

fn to_data_value(value: &Value) -> DataValue {
    DataValue::from(value.to_json())
}

fn from_data_value(value: DataValue) -> Value {
    Value::from(serde_json::Value::from(value))
}

fn to_engine_params(params: &Params) -> BTreeMap<String, DataValue> {
    params
        .iter()
        .map(|(name, value)| (name.clone(), to_data_value(value)))
        .collect()
}

fn to_engine_rows(rows: &NamedRows) -> cozo::NamedRows {
    let tuples = rows
        .rows
        .iter()
        .map(|row| row.iter().map(to_data_value).collect())
        .collect();
    cozo::NamedRows::new(rows.headers.clone(), tuples)
}

fn from_engine_rows(rows: cozo::NamedRows) -> NamedRows {
    let cozo::NamedRows {
        headers,
        rows,
        next,
        ..
    } = rows;
    NamedRows {
        headers,
        rows: rows
            .into_iter()
            .map(|row| row.into_iter().map(from_data_value).collect())
            .collect(),
        next: next.map(|more| Box::new(from_engine_rows(*more))),
    }
}
