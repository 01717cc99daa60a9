//! The smoke-test run: connect, set the search path, read, write, close.
//!
//! Connect and search-path failures end the run with an error. Read and
//! write failures are printed, logged, and recorded; the run carries on.
//! The connection is closed on every path once it has been opened.

use std::io::Write;

use agecheck_core::{AppConfig, EventPayload, RunId, RunReport, RunState, Step, StepOutcome};
use agecheck_graph::{Agtype, Connector, GraphError, GraphSession};

use crate::error::{Result, RunnerError};

/// Drives one connection through the fixed statement sequence.
pub struct GraphQueryRunner {
    config: AppConfig,
    run_id: RunId,
}

impl GraphQueryRunner {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            run_id: RunId::new(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Run against `connector`, printing query failures to stdout.
    pub async fn run<C: Connector>(&self, connector: &C) -> Result<RunReport> {
        let mut stdout = std::io::stdout();
        self.run_with_output(connector, &mut stdout).await
    }

    /// Run against `connector`, printing query failures to `out`.
    pub async fn run_with_output<C, W>(&self, connector: &C, out: &mut W) -> Result<RunReport>
    where
        C: Connector,
        W: Write + Send,
    {
        let graph = &self.config.run.graph;
        let mut run = Run::new(RunReport::new(self.run_id, graph.clone()));
        tracing::info!(
            run_id = %self.run_id,
            graph = %graph,
            host = %self.config.database.host,
            port = self.config.database.port,
            "Starting run"
        );

        let mut session = connector
            .connect(&self.config.database)
            .await
            .map_err(RunnerError::Connect)?;
        run.advance(RunState::Connected);

        let driven = self.drive(&mut session, &mut run, out).await;

        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Connection did not close cleanly");
        }
        driven?;

        run.advance(RunState::Done);
        let report = run.finish();
        tracing::info!(
            run_id = %self.run_id,
            failed_queries = report.failed_queries(),
            "Run complete"
        );
        Ok(report)
    }

    async fn drive<S, W>(&self, session: &mut S, run: &mut Run, out: &mut W) -> Result<()>
    where
        S: GraphSession,
        W: Write + Send,
    {
        let graph = &self.config.run.graph;

        session
            .configure_session()
            .await
            .map_err(RunnerError::Configure)?;
        run.succeeded(Step::SearchPath, 0);
        run.advance(RunState::SearchPathSet);

        if self.config.run.create_graph {
            let created = session
                .ensure_graph(graph)
                .await
                .map_err(|source| RunnerError::Bootstrap {
                    graph: graph.to_string(),
                    source,
                })?;
            run.succeeded(Step::CreateGraph, u64::from(created));
        }

        debug_assert!(run.state.allows_queries());
        let read = session.match_all(graph).await;
        run.settle(Step::Read, read, out);
        run.advance(RunState::ReadAttempted);

        let write = session
            .create_person(graph, &self.config.run.person_name)
            .await;
        run.settle(Step::Write, write, out);
        run.advance(RunState::WriteAttempted);

        Ok(())
    }
}

/// State and report for the run in progress.
struct Run {
    state: RunState,
    report: RunReport,
}

impl Run {
    fn new(report: RunReport) -> Self {
        Self {
            state: RunState::Disconnected,
            report,
        }
    }

    fn advance(&mut self, to: RunState) {
        debug_assert_eq!(self.state.successor(), Some(to));
        let from = self.state;
        self.state = to;
        tracing::debug!(run_id = %self.report.run_id, %from, %to, "State changed");
        self.report.push_event(EventPayload::StateChanged { from, to });
    }

    fn succeeded(&mut self, step: Step, rows: u64) {
        self.report.record(StepOutcome::succeeded(step, rows));
        self.report.push_event(EventPayload::QuerySucceeded { step, rows });
    }

    fn settle<W: Write>(
        &mut self,
        step: Step,
        result: std::result::Result<Vec<Agtype>, GraphError>,
        out: &mut W,
    ) {
        match result {
            Ok(rows) => {
                for row in &rows {
                    tracing::debug!(%step, value = %row, "Row");
                }
                tracing::info!(%step, rows = rows.len(), "Query succeeded");
                self.succeeded(step, rows.len() as u64);
            }
            Err(e) => {
                if let Err(io) = writeln!(out, "{step} query failed: {e}") {
                    tracing::warn!(error = %io, "Could not print query error");
                }
                tracing::warn!(%step, error = %e, "Query failed, continuing");
                let error = e.to_string();
                self.report.record(StepOutcome::failed(step, error.clone()));
                self.report.push_event(EventPayload::QueryFailed { step, error });
            }
        }
    }

    fn finish(mut self) -> RunReport {
        self.report.finish(self.state);
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use agecheck_core::{ConnectionConfig, GraphName};

    #[derive(Debug, Clone, Copy, Default)]
    struct Script {
        fail_connect: bool,
        fail_configure: bool,
        fail_bootstrap: bool,
        fail_read: bool,
        fail_write: bool,
    }

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct MockConnector {
        script: Script,
        calls: CallLog,
    }

    impl MockConnector {
        fn new(script: Script) -> Self {
            Self {
                script,
                calls: Arc::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    struct MockSession {
        script: Script,
        calls: CallLog,
    }

    impl MockSession {
        fn log(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    fn query_error(msg: &str) -> GraphError {
        GraphError::Query(sqlx::Error::Protocol(msg.to_string()))
    }

    #[async_trait]
    impl Connector for MockConnector {
        type Session = MockSession;

        async fn connect(
            &self,
            _config: &ConnectionConfig,
        ) -> std::result::Result<MockSession, GraphError> {
            self.calls.lock().unwrap().push("connect".to_string());
            if self.script.fail_connect {
                return Err(GraphError::Connection("connection refused".to_string()));
            }
            Ok(MockSession {
                script: self.script,
                calls: self.calls.clone(),
            })
        }
    }

    #[async_trait]
    impl GraphSession for MockSession {
        async fn configure_session(&mut self) -> std::result::Result<(), GraphError> {
            self.log("configure_session");
            if self.script.fail_configure {
                return Err(GraphError::Configuration(
                    "schema \"ag_catalog\" does not exist".into(),
                ));
            }
            Ok(())
        }

        async fn ensure_graph(
            &mut self,
            graph: &GraphName,
        ) -> std::result::Result<bool, GraphError> {
            self.log(format!("ensure_graph:{graph}"));
            if self.script.fail_bootstrap {
                return Err(query_error("permission denied for schema ag_catalog"));
            }
            Ok(true)
        }

        async fn match_all(
            &mut self,
            graph: &GraphName,
        ) -> std::result::Result<Vec<Agtype>, GraphError> {
            self.log(format!("match_all:{graph}"));
            if self.script.fail_read {
                return Err(query_error("graph \"testgraph\" does not exist"));
            }
            Ok(vec![Agtype::new(
                r#"{"id": 1, "label": "Person", "properties": {"name": "Tom"}}::vertex"#,
            )])
        }

        async fn create_person(
            &mut self,
            graph: &GraphName,
            name: &str,
        ) -> std::result::Result<Vec<Agtype>, GraphError> {
            self.log(format!("create_person:{graph}:{name}"));
            if self.script.fail_write {
                return Err(query_error("graph \"testgraph\" does not exist"));
            }
            Ok(Vec::new())
        }

        async fn close(self) -> std::result::Result<(), GraphError> {
            self.log("close");
            Ok(())
        }
    }

    async fn run_script(
        config: AppConfig,
        script: Script,
    ) -> (Result<RunReport>, Vec<String>, String) {
        let connector = MockConnector::new(script);
        let runner = GraphQueryRunner::new(config);
        let mut out = Vec::new();
        let result = runner.run_with_output(&connector, &mut out).await;
        (result, connector.calls(), String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_happy_path_issues_statements_in_order() {
        let (result, calls, out) = run_script(AppConfig::default(), Script::default()).await;
        let report = result.unwrap();

        assert_eq!(
            calls,
            vec![
                "connect",
                "configure_session",
                "match_all:testgraph",
                "create_person:testgraph:Tom",
                "close",
            ]
        );
        assert!(out.is_empty());
        assert_eq!(report.final_state, RunState::Done);
        assert_eq!(report.failed_queries(), 0);
        assert_eq!(report.outcome(Step::Read).map(|o| o.rows), Some(1));
    }

    #[tokio::test]
    async fn test_read_failure_still_attempts_write() {
        let script = Script {
            fail_read: true,
            ..Default::default()
        };
        let (result, calls, out) = run_script(AppConfig::default(), script).await;
        let report = result.unwrap();

        assert!(calls.contains(&"create_person:testgraph:Tom".to_string()));
        assert!(out.contains("read query failed"));
        assert!(out.contains("does not exist"));
        assert_eq!(report.final_state, RunState::Done);
        assert_eq!(report.failed_queries(), 1);
        assert!(report.outcome(Step::Write).unwrap().ok);
    }

    #[tokio::test]
    async fn test_both_failures_are_logged_and_run_completes() {
        let script = Script {
            fail_read: true,
            fail_write: true,
            ..Default::default()
        };
        let (result, calls, out) = run_script(AppConfig::default(), script).await;
        let report = result.unwrap();

        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("read query failed"));
        assert!(out.contains("write query failed"));
        assert_eq!(report.failed_queries(), 2);
        assert_eq!(report.final_state, RunState::Done);
        assert_eq!(calls.last().map(String::as_str), Some("close"));
    }

    #[tokio::test]
    async fn test_connect_failure_is_fatal_and_sends_nothing() {
        let script = Script {
            fail_connect: true,
            ..Default::default()
        };
        let (result, calls, out) = run_script(AppConfig::default(), script).await;

        assert!(matches!(result, Err(RunnerError::Connect(_))));
        assert_eq!(calls, vec!["connect"]);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_search_path_failure_is_fatal_and_closes() {
        let script = Script {
            fail_configure: true,
            ..Default::default()
        };
        let (result, calls, _) = run_script(AppConfig::default(), script).await;

        assert!(matches!(result, Err(RunnerError::Configure(_))));
        assert_eq!(calls, vec!["connect", "configure_session", "close"]);
    }

    #[tokio::test]
    async fn test_create_graph_runs_after_search_path() {
        let mut config = AppConfig::default();
        config.run.create_graph = true;
        config.run.graph = GraphName::new("people").unwrap();
        config.run.person_name = "Jane".to_string();

        let (result, calls, _) = run_script(config, Script::default()).await;
        let report = result.unwrap();

        assert_eq!(
            calls,
            vec![
                "connect",
                "configure_session",
                "ensure_graph:people",
                "match_all:people",
                "create_person:people:Jane",
                "close",
            ]
        );
        assert_eq!(report.outcome(Step::CreateGraph).map(|o| o.rows), Some(1));
    }

    #[tokio::test]
    async fn test_bootstrap_failure_is_fatal_and_closes() {
        let mut config = AppConfig::default();
        config.run.create_graph = true;
        let script = Script {
            fail_bootstrap: true,
            ..Default::default()
        };

        let (result, calls, _) = run_script(config, script).await;

        assert!(matches!(result, Err(RunnerError::Bootstrap { .. })));
        assert!(!calls.iter().any(|c| c.starts_with("match_all")));
        assert_eq!(calls.last().map(String::as_str), Some("close"));
    }

    #[tokio::test]
    async fn test_state_events_follow_linear_order() {
        let (result, _, _) = run_script(AppConfig::default(), Script::default()).await;
        let report = result.unwrap();

        let states: Vec<RunState> = report
            .events
            .iter()
            .filter_map(|e| match e.payload {
                EventPayload::StateChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(
            states,
            vec![
                RunState::Connected,
                RunState::SearchPathSet,
                RunState::ReadAttempted,
                RunState::WriteAttempted,
                RunState::Done,
            ]
        );
        assert!(report.events.iter().all(|e| e.run_id == report.run_id));
    }

    #[tokio::test]
    async fn test_report_serializes_to_json() {
        let script = Script {
            fail_read: true,
            ..Default::default()
        };
        let (result, _, _) = run_script(AppConfig::default(), script).await;
        let report = result.unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["final_state"], "done");
        assert_eq!(json["graph"], "testgraph");

        let steps: Vec<&str> = json["outcomes"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|o| o["step"].as_str())
            .collect();
        assert_eq!(steps, vec!["search_path", "read", "write"]);
        assert_eq!(json["outcomes"][1]["ok"], false);
        assert!(json["outcomes"][1]["error"]
            .as_str()
            .unwrap()
            .contains("does not exist"));
        assert!(json["outcomes"][2].get("error").is_none());
        assert_eq!(json["events"][0]["event_type"], "StateChanged");
    }
}
