//! Test fixture for SDK integration tests

#![allow(dead_code)]

use cozolite_sdk::{row, CozoDb, NamedRows, RecordedCall, RecordingClient, RelationSpec, Row, Value};

/// Database handle plus an observer on the client behind it
pub struct DbFixture {
    pub db: CozoDb<RecordingClient>,
    pub client: RecordingClient,
    relation_suffix: u32,
}

impl DbFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let client = RecordingClient::new();
        DbFixture {
            db: CozoDb::new(client.clone()),
            client,
            relation_suffix: fastrand::u32(..),
        }
    }

    /// Relation name unique to this fixture
    pub fn relation_name(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.relation_suffix)
    }

    /// Scripts sent so far, in order
    pub fn scripts(&self) -> Vec<String> {
        self.client.scripts()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.client.calls()
    }

    /// Queue the rows the next request will return
    pub fn respond_with(&self, rows: NamedRows) {
        self.client.push_response(rows);
    }
}

/// `airport {code => desc, lon, lat, country}`
pub fn airport_spec() -> RelationSpec {
    RelationSpec::new("airport")
        .key("code")
        .values(["desc", "lon", "lat", "country"])
}

pub fn airport_rows() -> Vec<Row> {
    vec![
        row! {
            "code" => "JFK",
            "desc" => "John F. Kennedy International Airport",
            "lon" => -73.7781,
            "lat" => 40.6413,
            "country" => "US",
        },
        row! {
            "code" => "LAX",
            "desc" => "Los Angeles International Airport",
            "lon" => -118.4085,
            "lat" => 33.9416,
            "country" => "US",
        },
    ]
}

/// What the engine answers for the filtered airport query
pub fn filtered_airports() -> NamedRows {
    NamedRows::new(
        ["code", "desc", "lon", "lat"],
        vec![vec![
            Value::from("JFK"),
            Value::from("John F. Kennedy International Airport"),
            Value::from(-73.7781),
            Value::from(40.6413),
        ]],
    )
}
