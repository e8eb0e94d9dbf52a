//! Database configuration
//!
//! Options are plain serde structs so they can live in application config
//! files:
//!
//! ```json
//! { "engine": "sqlite", "path": "./data/cozo.db", "options": {} }
//! ```
//!
//! They are read by clients implementing [`OpenClient`], such as the
//! `CozoClient` adapter built with the `cozo` feature. A client that is not
//! backed by storage is injected with [`CozoDb::new`](crate::CozoDb::new)
//! instead.

use crate::error::Result;
use cozolite::{Client, ClientResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Storage engine backing the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Non-persistent, in memory
    Mem,
    #[default]
    Sqlite,
    Rocksdb,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Mem => "mem",
            Engine::Sqlite => "sqlite",
            Engine::Rocksdb => "rocksdb",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options used to open a database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbOptions {
    pub engine: Engine,
    pub path: PathBuf,
    /// Engine-specific options passed to the engine untouched
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            engine: Engine::Sqlite,
            path: PathBuf::from("mydb.db"),
            options: serde_json::Map::new(),
        }
    }
}

impl DbOptions {
    pub fn new(engine: Engine, path: impl AsRef<Path>) -> Self {
        Self {
            engine,
            path: path.as_ref().to_path_buf(),
            options: serde_json::Map::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Engine::Mem, "")
    }

    /// Parse options from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Clients that open a storage engine described by [`DbOptions`]
pub trait OpenClient: Client + Sized {
    /// Open `options.engine` at `options.path`, passing `options.options` through
    fn open(options: &DbOptions) -> ClientResult<Self>;
}
