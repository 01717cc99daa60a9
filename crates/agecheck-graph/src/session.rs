//! Trait seam between the runner and a live AGE connection.

use async_trait::async_trait;

use agecheck_core::{ConnectionConfig, GraphName};

use crate::agtype::Agtype;
use crate::client::{AgeClient, GraphError};

/// Opens sessions. Separate from [`GraphSession`] so a failed connect
/// never yields a session object.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: GraphSession;

    async fn connect(&self, config: &ConnectionConfig) -> Result<Self::Session, GraphError>;
}

/// The operations a smoke-test run needs from one connection.
#[async_trait]
pub trait GraphSession: Send + Sized {
    async fn configure_session(&mut self) -> Result<(), GraphError>;

    async fn ensure_graph(&mut self, graph: &GraphName) -> Result<bool, GraphError>;

    async fn match_all(&mut self, graph: &GraphName) -> Result<Vec<Agtype>, GraphError>;

    async fn create_person(
        &mut self,
        graph: &GraphName,
        name: &str,
    ) -> Result<Vec<Agtype>, GraphError>;

    async fn close(self) -> Result<(), GraphError>;
}

/// Connects real [`AgeClient`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeConnector;

#[async_trait]
impl Connector for AgeConnector {
    type Session = AgeClient;

    async fn connect(&self, config: &ConnectionConfig) -> Result<AgeClient, GraphError> {
        AgeClient::connect(config).await
    }
}

#[async_trait]
impl GraphSession for AgeClient {
    async fn configure_session(&mut self) -> Result<(), GraphError> {
        AgeClient::configure_session(self).await
    }

    async fn ensure_graph(&mut self, graph: &GraphName) -> Result<bool, GraphError> {
        AgeClient::ensure_graph(self, graph).await
    }

    async fn match_all(&mut self, graph: &GraphName) -> Result<Vec<Agtype>, GraphError> {
        AgeClient::match_all(self, graph).await
    }

    async fn create_person(
        &mut self,
        graph: &GraphName,
        name: &str,
    ) -> Result<Vec<Agtype>, GraphError> {
        AgeClient::create_person(self, graph, name).await
    }

    async fn close(self) -> Result<(), GraphError> {
        AgeClient::close(self).await
    }
}
