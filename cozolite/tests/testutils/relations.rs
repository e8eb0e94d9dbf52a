//! Relation specs and sample rows used by the script tests

#![allow(dead_code)]

use cozolite::{row, RelationSpec, Row, Validity};

/// Install a test logger once per binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Relation name with a random suffix so tests never share names
pub fn unique_relation(prefix: &str) -> String {
    format!("{}_{}", prefix, fastrand::u32(..))
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

/// Heads of state with validity-versioned history: `hos {state, year: Validity => hos}`
pub fn hos_spec() -> RelationSpec {
    RelationSpec::new("hos")
        .keys(["state", "year"])
        .value("hos")
        .temporal(true)
}

pub fn hos_rows() -> Vec<Row> {
    vec![
        row! { "state" => "US", "year" => Validity::new(2001, true), "hos" => "Bush" },
        row! { "state" => "US", "year" => Validity::new(2009, true), "hos" => "Obama" },
        row! { "state" => "US", "year" => Validity::new(2017, true), "hos" => "Trump" },
    ]
}
