//! Read operations against an AGE graph.

use agecheck_core::GraphName;

use crate::agtype::Agtype;
use crate::client::{AgeClient, GraphError, QueryParam, QueryRequest};
use crate::statements;

impl AgeClient {
    /// Return every vertex in the graph as opaque agtype values.
    pub async fn match_all(&mut self, graph: &GraphName) -> Result<Vec<Agtype>, GraphError> {
        let rows = self
            .fetch_agtype(QueryRequest::new(statements::match_all(graph)))
            .await?;
        tracing::debug!(graph = %graph, rows = rows.len(), "Matched all vertices");
        Ok(rows)
    }

    /// Return the `name` property of every Person vertex.
    pub async fn person_names(&mut self, graph: &GraphName) -> Result<Vec<Agtype>, GraphError> {
        self.fetch_agtype(QueryRequest::new(statements::person_names(graph)))
            .await
    }

    /// Whether the graph is registered in `ag_catalog.ag_graph`.
    pub async fn graph_exists(&mut self, graph: &GraphName) -> Result<bool, GraphError> {
        let request = QueryRequest::new(statements::GRAPH_EXISTS)
            .bind(QueryParam::Text(graph.to_string()));
        self.fetch_bool(request).await
    }
}
