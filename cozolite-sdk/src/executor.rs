//! Script-based database operations
//!
//! Every operation here renders a script with the `cozolite` builders and
//! sends it through [`ScriptExecutor::run_script`]. The database handle and
//! transactions both implement the trait, so each operation is available in
//! either place.

use crate::error::{Error, Result};
use crate::query::QueryBuilder;
use cozolite::script::ddl;
use cozolite::{
    chain, ChainQuery, ClientResult, FixedRuleCall, InlineRule, Mutation, MutationOp, NamedRows,
    Params, RelationSpec, Rows, SystemOp, Triggers,
};

/// Run `request`, logging the script first and any client failure after
pub(crate) fn run_logged<T>(script: &str, request: impl FnOnce() -> ClientResult<T>) -> Result<T> {
    log::debug!("Executing script:\n{}", script);
    request().map_err(|e| {
        log::error!("Script failed: {}", e);
        Error::Client(e)
    })
}

/// Operations that reduce to a single script
///
/// # Examples
///
/// ```no_run
/// use cozolite_sdk::{CozoDb, RecordingClient, RelationSpec, ScriptExecutor, row};
///
/// # fn main() -> cozolite_sdk::Result<()> {
/// let db = CozoDb::new(RecordingClient::new());
/// let rel = RelationSpec::new("rel").key("a").value("b");
///
/// db.create_relation(&rel)?;
/// db.put_relation(&rel, vec![row! { "a" => 1, "b" => "one" }], true)?;
/// # Ok(())
/// # }
/// ```
pub trait ScriptExecutor {
    /// Send a script with named parameters to the client
    fn run_script(&self, script: &str, params: &Params) -> Result<NamedRows>;

    /// Send a raw script without parameters
    fn script(&self, script: &str) -> Result<NamedRows> {
        self.run_script(script, &Params::new())
    }

    /// `:create` an empty stored relation
    fn create_relation(&self, spec: &RelationSpec) -> Result<NamedRows> {
        self.script(&ddl::create_relation(spec, None))
    }

    /// `:create` a stored relation filled by `query`
    fn create_relation_from(&self, spec: &RelationSpec, query: &str) -> Result<NamedRows> {
        self.script(&ddl::create_relation(spec, Some(query)))
    }

    /// `:replace` a stored relation with the result of `query`
    fn replace_relation(&self, spec: &RelationSpec, query: &str) -> Result<NamedRows> {
        self.script(&ddl::replace_relation(spec, query))
    }

    /// Validate and send a mutation
    ///
    /// Nothing is sent when the rows are empty or a row lacks a key column.
    fn mutate(
        &self,
        op: MutationOp,
        spec: &RelationSpec,
        rows: impl Into<Rows>,
        returning: bool,
    ) -> Result<NamedRows> {
        let script = Mutation::new(op, spec).returning(returning).render(rows)?;
        self.script(&script)
    }

    fn put_relation(&self, spec: &RelationSpec, rows: impl Into<Rows>, returning: bool) -> Result<NamedRows> {
        self.mutate(MutationOp::Put, spec, rows, returning)
    }

    fn insert_relation(&self, spec: &RelationSpec, rows: impl Into<Rows>, returning: bool) -> Result<NamedRows> {
        self.mutate(MutationOp::Insert, spec, rows, returning)
    }

    fn update_relation(&self, spec: &RelationSpec, rows: impl Into<Rows>, returning: bool) -> Result<NamedRows> {
        self.mutate(MutationOp::Update, spec, rows, returning)
    }

    fn delete_relation(&self, spec: &RelationSpec, rows: impl Into<Rows>, returning: bool) -> Result<NamedRows> {
        self.mutate(MutationOp::Delete, spec, rows, returning)
    }

    fn ensure_relation(&self, spec: &RelationSpec, rows: impl Into<Rows>) -> Result<NamedRows> {
        self.mutate(MutationOp::Ensure, spec, rows, false)
    }

    fn ensure_not_relation(&self, spec: &RelationSpec, rows: impl Into<Rows>) -> Result<NamedRows> {
        self.mutate(MutationOp::EnsureNot, spec, rows, false)
    }

    /// `:rm` rows by key
    fn remove_rows(&self, spec: &RelationSpec, keys: impl Into<Rows>, returning: bool) -> Result<NamedRows> {
        self.mutate(MutationOp::Rm, spec, keys, returning)
    }

    /// Start a select-style query over a stored relation
    fn query_builder(&self, relation: &str) -> QueryBuilder<'_, Self> {
        QueryBuilder::new(self, relation)
    }

    fn run_rule(&self, rule: &InlineRule) -> Result<NamedRows> {
        self.script(&rule.render())
    }

    /// Send helper rules followed by a fixed-rule call as one script
    fn run_fixed_rule(&self, rules: &[InlineRule], call: &FixedRuleCall) -> Result<NamedRows> {
        let mut lines: Vec<String> = rules.iter().map(InlineRule::render).collect();
        lines.push(call.render());
        self.script(&lines.join("\n"))
    }

    /// Run several queries in one engine transaction
    fn chain_queries(&self, queries: &[ChainQuery]) -> Result<NamedRows> {
        self.script(&chain(queries))
    }

    fn create_index(&self, relation: &str, index: &str, columns: &[&str]) -> Result<NamedRows> {
        self.script(&ddl::create_index(relation, index, columns))
    }

    fn drop_index(&self, relation: &str, index: &str) -> Result<NamedRows> {
        self.script(&ddl::drop_index(relation, index))
    }

    /// Replace every trigger on `relation`; empty `triggers` clears them
    fn set_triggers(&self, relation: &str, triggers: &Triggers) -> Result<NamedRows> {
        self.script(&triggers.render(relation))
    }

    fn drop_relation(&self, name: &str) -> Result<NamedRows> {
        self.script(&ddl::remove_relations([name]))
    }

    fn drop_relations(&self, names: &[&str]) -> Result<NamedRows> {
        if names.is_empty() {
            return Err(Error::InvalidOperation(
                "No relations given to drop".to_string(),
            ));
        }
        self.script(&ddl::remove_relations(names))
    }

    fn system(&self, op: &SystemOp) -> Result<NamedRows> {
        self.script(&op.render())
    }

    fn list_relations(&self) -> Result<NamedRows> {
        self.system(&SystemOp::Relations)
    }

    fn columns(&self, relation: &str) -> Result<NamedRows> {
        self.system(&SystemOp::Columns(relation.to_string()))
    }
}
