//! End-to-end script rendering scenarios
//!
//! Each test builds the scripts an application would send for a realistic
//! workload and checks the exact text against the engine grammar.

#[path = "testutils/mod.rs"]
mod testutils;

use cozolite::script::ddl;
use cozolite::{
    chain, row, rule_input, stored_input, Assertion, ChainQuery, Client, FixedRuleCall,
    InlineRule, Mutation, MutationOp, NamedRows, Params, QueryOptions, RecordedCall,
    RecordingClient, RelationAccess, RelationSpec, Rows, ScriptError, Triggers, Value,
};
use std::time::Duration;
use testutils::relations::{
    airport_rows, airport_spec, hos_rows, hos_spec, init_logging, unique_relation,
};

#[test]
fn test_airport_create_put_query() {
    init_logging();
    let spec = airport_spec();

    assert_eq!(
        ddl::create_relation(&spec, None),
        ":create airport {code => desc, lon, lat, country}"
    );

    let put = Mutation::new(MutationOp::Put, &spec)
        .render(airport_rows())
        .expect("rows carry the key column");
    assert_eq!(
        put,
        "?[code, desc, lon, lat, country] <- [\
         [\"JFK\", \"John F. Kennedy International Airport\", -73.7781, 40.6413, \"US\"], \
         [\"LAX\", \"Los Angeles International Airport\", -118.4085, 33.9416, \"US\"]]\n\
         :put airport {code => desc, lon, lat, country}"
    );

    let access = RelationAccess::new("airport")
        .columns(["code", "desc", "lon", "lat"])
        .filter("country", "US");
    let query = InlineRule::new(["code", "desc", "lon", "lat"])
        .atoms(access.atoms())
        .atoms(["lon > -100", "lat > 30"])
        .options(QueryOptions::new().order_by_desc("lat").limit(1))
        .render();
    assert_eq!(
        query,
        "?[code, desc, lon, lat] := *airport{code, desc, lon, lat, country}, country == \"US\", lon > -100, lat > 30\n\
         :order -lat\n\
         :limit 1"
    );
}

#[test]
fn test_time_travel_reads() {
    let spec = hos_spec();
    assert_eq!(
        ddl::create_relation(&spec, None),
        ":create hos {state, year: Validity => hos}"
    );

    let put = Mutation::new(MutationOp::Put, &spec)
        .render(hos_rows())
        .unwrap();
    assert!(put.starts_with("?[state, year, hos] <- [[\"US\", [2001, true], \"Bush\"]"));
    assert!(put.ends_with(":put hos {state, year => hos}"));

    let at_year = RelationAccess::new("hos")
        .columns(["hos", "year"])
        .filter("state", "US")
        .at(2019);
    assert_eq!(
        at_year.atoms(),
        vec!["*hos{hos, year, state @ 2019}", "state == \"US\""]
    );

    for keyword in ["now", "NOW", "Now"] {
        let access = RelationAccess::new("hos").columns(["hos"]).at(keyword);
        assert_eq!(access.atom(), "*hos{hos @ 'NOW'}");
    }
    let plain = RelationAccess::new("hos").columns(["hos"]).at("yesterday");
    assert_eq!(plain.atom(), "*hos{hos @ \"yesterday\"}");
}

#[test]
fn test_missing_keys_and_empty_input() {
    let spec = RelationSpec::new("rel").key("a").value("b");

    let err = Mutation::new(MutationOp::Put, &spec)
        .render(vec![row! { "a" => 1, "b" => "one" }, row! { "b" => "three" }])
        .unwrap_err();
    assert!(err.to_string().contains("[a]"));
    assert!(err.to_string().contains("{b: \"three\"}"));

    for op in [
        MutationOp::Insert,
        MutationOp::Update,
        MutationOp::Delete,
        MutationOp::Ensure,
        MutationOp::EnsureNot,
    ] {
        let err = Mutation::new(op, &spec)
            .render(row! { "b" => "three" })
            .unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingKeys {
                missing: vec!["a".to_string()],
                item: "row",
                row: "{b: \"three\"}".to_string(),
            },
            "{} accepted a row without its key",
            op
        );
    }

    for op in [
        MutationOp::Put,
        MutationOp::Insert,
        MutationOp::Update,
        MutationOp::Delete,
        MutationOp::Ensure,
        MutationOp::EnsureNot,
    ] {
        let err = Mutation::new(op, &spec)
            .render(Vec::<cozolite::Row>::new())
            .unwrap_err();
        assert_eq!(err, ScriptError::EmptyRows, "{} accepted empty input", op);
    }

    let composite = RelationSpec::new("route").keys(["src", "dst"]).value("weight");
    let err = Mutation::new(MutationOp::Rm, &composite)
        .render(row! { "weight" => 1.5 })
        .unwrap_err();
    assert_eq!(
        err,
        ScriptError::MissingKeys {
            missing: vec!["dst".to_string(), "src".to_string()],
            item: "key",
            row: "{weight: 1.5}".to_string(),
        }
    );
}

#[test]
fn test_table_input() {
    let spec = RelationSpec::new("rel").key("a").value("b");
    let table = NamedRows::new(
        ["a", "b"],
        vec![vec![Value::Int(1), Value::from("one")], vec![Value::Int(2)]],
    );
    let err = Mutation::new(MutationOp::Put, &spec)
        .render(Rows::from(table))
        .unwrap_err();
    assert_eq!(
        err,
        ScriptError::RaggedRow {
            index: 1,
            expected: 2,
            found: 1
        }
    );

    let table = NamedRows::new(["a", "b"], vec![vec![Value::Int(1), Value::from("one")]]);
    assert_eq!(
        Mutation::new(MutationOp::Insert, &spec).render(table).unwrap(),
        "?[a, b] <- [[1, \"one\"]]\n:insert rel {a => b}"
    );
}

#[test]
fn test_shortest_path_fixed_rule() {
    let edges = InlineRule::named("edges", ["src", "dst", "weight"])
        .atom("*route{src, dst, weight}");
    let starting = InlineRule::named("starting", ["code"]).atom("code = \"JFK\"");
    let call = FixedRuleCall::new("ShortestPathDijkstra")
        .head(["start", "goal", "cost", "path"])
        .input(rule_input("edges", ["src", "dst", "weight"]))
        .input(rule_input("starting", ["code"]))
        .input(stored_input("airport", ["code"]))
        .param("undirected", false)
        .options(QueryOptions::new().limit(5));

    let script = [edges.render(), starting.render(), call.render()].join("\n");
    assert_eq!(
        script,
        "edges[src, dst, weight] := *route{src, dst, weight}\n\
         starting[code] := code = \"JFK\"\n\
         ?[start, goal, cost, path] <~ ShortestPathDijkstra(edges[src, dst, weight], starting[code], *airport[code], undirected: false)\n\
         :limit 5"
    );
}

#[test]
fn test_chained_transaction_script() {
    let spec = RelationSpec::new("rel").key("a").value("b");
    let put = Mutation::new(MutationOp::Put, &spec)
        .render(row! { "a" => 1, "b" => "one" })
        .unwrap();
    let script = chain(&[
        ChainQuery::new(put),
        ChainQuery::new("?[a, b] := *rel{a, b}").with_options(
            QueryOptions::new()
                .assertion(Assertion::Some)
                .timeout(Duration::from_millis(1500)),
        ),
    ]);
    assert_eq!(
        script,
        "{\n?[a, b] <- [[1, \"one\"]]\n:put rel {a => b}\n}\n\
         {\n?[a, b] := *rel{a, b}\n:timeout 1.5\n:assert some\n}"
    );
}

#[test]
fn test_index_and_trigger_directives() {
    let relation = unique_relation("route");
    assert_eq!(
        ddl::create_index(&relation, "by_dst", ["dst", "src"]),
        format!("::index create {}:by_dst {{dst, src}}", relation)
    );
    assert_eq!(
        ddl::drop_index(&relation, "by_dst"),
        format!("::index drop {}:by_dst", relation)
    );

    let triggers = Triggers::new().on_replace("?[a] := _new[a] :put audit {a}");
    assert_eq!(
        triggers.render(&relation),
        format!(
            "::set_triggers {}\non replace {{ ?[a] := _new[a] :put audit {{a}} }}",
            relation
        )
    );
    assert_eq!(
        ddl::remove_relations([relation.as_str()]),
        format!("::remove {}", relation)
    );
}

#[test]
fn test_recorded_scripts_match_rendered_text() {
    init_logging();
    let client = RecordingClient::new();
    let spec = airport_spec();
    let scripts = vec![
        ddl::create_relation(&spec, None),
        Mutation::new(MutationOp::Put, &spec)
            .returning(true)
            .render(airport_rows())
            .unwrap(),
    ];
    for script in &scripts {
        client.run(script, &Params::new()).unwrap();
    }

    assert_eq!(client.scripts(), scripts);
    assert!(matches!(client.calls()[1], RecordedCall::Run { .. }));
    assert!(client.last_script().unwrap().ends_with("\n:returning"));
}
