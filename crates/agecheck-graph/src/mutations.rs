//! Write operations against an AGE graph.
//!
//! Values are passed to Cypher through an agtype parameter map bound as
//! the third argument of `cypher()`.

use agecheck_core::GraphName;

use crate::agtype::Agtype;
use crate::client::{AgeClient, GraphError, QueryParam, QueryRequest};
use crate::statements;

impl AgeClient {
    /// Create a single `Person` vertex with the given name.
    pub async fn create_person(
        &mut self,
        graph: &GraphName,
        name: &str,
    ) -> Result<Vec<Agtype>, GraphError> {
        let params = Agtype::from_json(&serde_json::json!({ "name": name }));
        let request = QueryRequest::new(statements::create_person(graph))
            .bind(QueryParam::Agtype(params));

        let rows = self.fetch_agtype(request).await?;
        tracing::debug!(graph = %graph, name, "Created Person vertex");
        Ok(rows)
    }

    /// Create the graph. Fails if it already exists.
    pub async fn create_graph(&mut self, graph: &GraphName) -> Result<(), GraphError> {
        let request =
            QueryRequest::new(statements::CREATE_GRAPH).bind(QueryParam::Text(graph.to_string()));
        self.execute(request).await?;
        tracing::info!(graph = %graph, "Created graph");
        Ok(())
    }

    /// Create the graph unless it already exists. Returns true if created.
    pub async fn ensure_graph(&mut self, graph: &GraphName) -> Result<bool, GraphError> {
        if self.graph_exists(graph).await? {
            tracing::debug!(graph = %graph, "Graph already exists");
            return Ok(false);
        }
        self.create_graph(graph).await?;
        Ok(true)
    }

    /// Drop the graph and everything in it.
    pub async fn drop_graph(&mut self, graph: &GraphName) -> Result<(), GraphError> {
        let request =
            QueryRequest::new(statements::DROP_GRAPH).bind(QueryParam::Text(graph.to_string()));
        self.execute(request).await?;
        tracing::info!(graph = %graph, "Dropped graph");
        Ok(())
    }
}
