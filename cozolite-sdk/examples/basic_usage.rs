//! Basic usage example for CozoLite SDK
//!
//! This example demonstrates the core features of the CozoLite Rust SDK:
//! - Wrapping a client in a database handle
//! - Creating relations and writing rows
//! - Query builder API
//! - Time-travel reads
//! - Using transactions
//! - Typed result deserialization
//!
//! The database is backed by the recording client, so every script is
//! printed instead of executed. Build with the `cozo` feature and open a
//! `CozoDb<CozoClient>` from `DbOptions` to run against a real engine.
//!
//! Run with: cargo run --example basic_usage

use cozolite_sdk::{
    row, CozoDb, Error, NamedRows, RecordingClient, RelationSpec, ScriptExecutor,
    Validity, Value,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Airport {
    code: String,
    lat: f64,
}

fn main() -> Result<(), Error> {
    env_logger::init();
    println!("=== CozoLite SDK Basic Usage Example ===\n");

    // 1. Wrap a client
    println!("1. Opening database...");
    let db = CozoDb::new(RecordingClient::new());
    let client = db.client().clone();
    println!("   ✓ Database opened (recording client)\n");

    // 2. Create relations
    println!("2. Creating relations...");
    let airport = RelationSpec::new("airport")
        .key("code")
        .values(["desc", "lon", "lat", "country"]);
    let hos = RelationSpec::new("hos")
        .keys(["state", "year"])
        .value("hos")
        .temporal(true);
    db.create_relation(&airport)?;
    db.create_relation(&hos)?;
    println!("   ✓ Created airport and hos\n");

    // 3. Insert data using a transaction
    println!("3. Inserting data with transaction...");
    db.transact(true, |tx| {
        tx.put_relation(
            &airport,
            vec![
                row! { "code" => "JFK", "desc" => "John F. Kennedy", "lon" => -73.7781, "lat" => 40.6413, "country" => "US" },
                row! { "code" => "LAX", "desc" => "Los Angeles", "lon" => -118.4085, "lat" => 33.9416, "country" => "US" },
            ],
            false,
        )?;
        tx.put_relation(
            &hos,
            row! { "state" => "US", "year" => Validity::new(2017, true), "hos" => "Trump" },
            false,
        )
    })?;
    println!("   ✓ Committed\n");

    // 4. Query builder
    println!("4. Querying with the builder...");
    client.push_response(NamedRows::new(
        ["code", "lat"],
        vec![vec![Value::from("JFK"), Value::from(40.6413)]],
    ));
    let airports: Vec<Airport> = db
        .query_builder("airport")
        .select(["code", "lat"])
        .filter("country", "US")
        .condition("lat > 35")
        .order_by_desc("lat")
        .limit(1)
        .fetch()?;
    println!("   Found {} airports: {:?}\n", airports.len(), airports);

    // 5. Time travel
    println!("5. Reading hos as of now...");
    let result = db
        .query_builder("hos")
        .select(["hos", "year"])
        .filter("state", "US")
        .at("now")
        .execute()?;
    println!("{}\n", result);

    // 6. Scripts sent so far
    println!("6. Scripts sent to the client:");
    for script in client.scripts() {
        println!("---\n{}", script);
    }

    db.close()?;
    println!("\n=== Example completed successfully ===");
    Ok(())
}
