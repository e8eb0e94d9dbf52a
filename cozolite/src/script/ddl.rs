// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Relation, index, trigger and system directives

use super::relation::RelationSpec;
use crate::value::{format_value, Value};

/// `query` (when given) followed by `:create name {schema}`
pub fn create_relation(spec: &RelationSpec, query: Option<&str>) -> String {
    let directive = format!(":create {} {{{}}}", spec.name, spec.schema());
    match query {
        Some(query) => format!("{}\n{}", query, directive),
        None => directive,
    }
}

/// `query` followed by `:replace name {schema}`
pub fn replace_relation(spec: &RelationSpec, query: &str) -> String {
    format!("{}\n:replace {} {{{}}}", query, spec.name, spec.schema())
}

/// `::index create relation:index {c1, c2}`
pub fn create_index<I, S>(relation: &str, index: &str, columns: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    format!(
        "::index create {}:{} {{{}}}",
        relation,
        index,
        join_names(columns)
    )
}

/// `::index drop relation:index`
pub fn drop_index(relation: &str, index: &str) -> String {
    format!("::index drop {}:{}", relation, index)
}

/// `::remove a, b`
pub fn remove_relations<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    format!("::remove {}", join_names(names))
}

fn join_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trigger queries attached to a stored relation
///
/// Setting an empty `Triggers` clears every trigger on the relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triggers {
    pub on_put: Vec<String>,
    pub on_rm: Vec<String>,
    pub on_replace: Vec<String>,
}

impl Triggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_put(mut self, query: impl Into<String>) -> Self {
        self.on_put.push(query.into());
        self
    }

    pub fn on_rm(mut self, query: impl Into<String>) -> Self {
        self.on_rm.push(query.into());
        self
    }

    pub fn on_replace(mut self, query: impl Into<String>) -> Self {
        self.on_replace.push(query.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_put.is_empty() && self.on_rm.is_empty() && self.on_replace.is_empty()
    }

    /// `::set_triggers relation` followed by one `on <event> { query }` line per trigger
    pub fn render(&self, relation: &str) -> String {
        let mut script = format!("::set_triggers {}", relation);
        let blocks = [
            ("put", &self.on_put),
            ("rm", &self.on_rm),
            ("replace", &self.on_replace),
        ];
        for (event, queries) in blocks {
            for query in queries {
                script.push_str(&format!("\non {} {{ {} }}", event, query));
            }
        }
        script
    }
}

/// Access level of a stored relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Normal,
    /// Cannot be removed
    Protected,
    /// Cannot be mutated
    ReadOnly,
    /// Cannot be read or written by scripts
    Hidden,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Normal => "normal",
            AccessLevel::Protected => "protected",
            AccessLevel::ReadOnly => "read_only",
            AccessLevel::Hidden => "hidden",
        }
    }
}

/// Engine system operations (`::name ...`)
#[derive(Debug, Clone, PartialEq)]
pub enum SystemOp {
    Relations,
    Columns(String),
    Indices(String),
    ShowTriggers(String),
    Rename { from: String, to: String },
    AccessLevel { level: AccessLevel, relations: Vec<String> },
    Describe { relation: String, description: String },
    Explain(String),
    Running,
    Kill(u64),
    Compact,
}

impl SystemOp {
    pub fn render(&self) -> String {
        match self {
            SystemOp::Relations => "::relations".to_string(),
            SystemOp::Columns(relation) => format!("::columns {}", relation),
            SystemOp::Indices(relation) => format!("::indices {}", relation),
            SystemOp::ShowTriggers(relation) => format!("::show_triggers {}", relation),
            SystemOp::Rename { from, to } => format!("::rename {} -> {}", from, to),
            SystemOp::AccessLevel { level, relations } => {
                format!("::access_level {} {}", level.as_str(), join_names(relations))
            }
            SystemOp::Describe {
                relation,
                description,
            } => format!(
                "::describe {} {}",
                relation,
                format_value(&Value::String(description.clone()))
            ),
            SystemOp::Explain(query) => format!("::explain {{ {} }}", query),
            SystemOp::Running => "::running".to_string(),
            SystemOp::Kill(id) => format!("::kill {}", id),
            SystemOp::Compact => "::compact".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_replace() {
        let spec = RelationSpec::new("airport")
            .key("code")
            .values(["desc", "lon", "lat", "country"]);
        assert_eq!(
            create_relation(&spec, None),
            ":create airport {code => desc, lon, lat, country}"
        );

        let rel = RelationSpec::new("rel").key("a").value("b");
        assert_eq!(
            create_relation(&rel, Some("?[a, b] <- [[1, 'x']]")),
            "?[a, b] <- [[1, 'x']]\n:create rel {a => b}"
        );
        assert_eq!(
            replace_relation(&rel, "?[a, b] := *other{a, b}"),
            "?[a, b] := *other{a, b}\n:replace rel {a => b}"
        );
    }

    #[test]
    fn test_index_directives() {
        assert_eq!(
            create_index("route", "dst_idx", ["dst", "src", "weight"]),
            "::index create route:dst_idx {dst, src, weight}"
        );
        assert_eq!(drop_index("route", "dst_idx"), "::index drop route:dst_idx");
    }

    #[test]
    fn test_triggers() {
        let triggers = Triggers::new()
            .on_put("?[b, a] := _new[a, b] :put rel_rev{b, a}")
            .on_rm("?[b, a] := _old[a, b] :rm rel_rev{b, a}");
        assert_eq!(
            triggers.render("rel"),
            "::set_triggers rel\non put { ?[b, a] := _new[a, b] :put rel_rev{b, a} }\non rm { ?[b, a] := _old[a, b] :rm rel_rev{b, a} }"
        );
        assert_eq!(Triggers::new().render("rel"), "::set_triggers rel");
    }

    #[test]
    fn test_remove_relations() {
        assert_eq!(remove_relations(["airport"]), "::remove airport");
        assert_eq!(remove_relations(["a", "b"]), "::remove a, b");
    }

    #[test]
    fn test_system_ops() {
        assert_eq!(SystemOp::Relations.render(), "::relations");
        assert_eq!(SystemOp::Columns("rel".into()).render(), "::columns rel");
        assert_eq!(
            SystemOp::Rename {
                from: "a".into(),
                to: "b".into()
            }
            .render(),
            "::rename a -> b"
        );
        assert_eq!(
            SystemOp::AccessLevel {
                level: AccessLevel::ReadOnly,
                relations: vec!["a".into(), "b".into()]
            }
            .render(),
            "::access_level read_only a, b"
        );
        assert_eq!(
            SystemOp::Describe {
                relation: "airport".into(),
                description: "IATA \"codes\"".into()
            }
            .render(),
            "::describe airport \"IATA \\\"codes\\\"\""
        );
        assert_eq!(SystemOp::Kill(3).render(), "::kill 3");
        assert_eq!(
            SystemOp::Explain("?[a] := *rel{a}".into()).render(),
            "::explain { ?[a] := *rel{a} }"
        );
    }
}
