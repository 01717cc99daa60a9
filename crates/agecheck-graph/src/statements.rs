//! The fixed SQL statements issued against an AGE database.
//!
//! Cypher runs inside `cypher('<graph>', $$ ... $$ [, params])`. Graph names
//! are validated identifiers, so interpolating them is safe; values always
//! travel as bind parameters.

use agecheck_core::GraphName;

/// Puts `ag_catalog` first so `cypher()` and `agtype` resolve unqualified.
pub const SEARCH_PATH: &str = r#"SET search_path = ag_catalog, "$user", public;"#;

/// Whether a graph with the given name (`$1`) exists.
pub const GRAPH_EXISTS: &str =
    "SELECT EXISTS (SELECT 1 FROM ag_catalog.ag_graph WHERE name = $1::name);";

/// Create a graph named `$1`.
pub const CREATE_GRAPH: &str = "SELECT * FROM ag_catalog.create_graph($1::name);";

/// Drop the graph named `$1` together with its labels.
pub const DROP_GRAPH: &str = "SELECT * FROM ag_catalog.drop_graph($1::name, true);";

/// Match every vertex in the graph.
pub fn match_all(graph: &GraphName) -> String {
    format!("SELECT * FROM cypher('{graph}', $$MATCH (v) return v$$) as (a agtype);")
}

/// Create one Person vertex. `$name` is looked up in the agtype map bound
/// to `$1`; AGE never sees the outer bind parameters directly.
pub fn create_person(graph: &GraphName) -> String {
    format!(
        "SELECT * FROM cypher('{graph}', $$ CREATE (v:Person {{name: $name}}) $$, $1) as (a agtype);"
    )
}

/// Names of all Person vertices.
pub fn person_names(graph: &GraphName) -> String {
    format!("SELECT * FROM cypher('{graph}', $$MATCH (v:Person) RETURN v.name$$) as (name agtype);")
}
