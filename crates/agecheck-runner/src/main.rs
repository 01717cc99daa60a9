//! CLI entry point for the agecheck smoke test.
//!
//! Query failures go to stdout and do not affect the exit status; a failed
//! connect, search-path change, or graph bootstrap exits non-zero.

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use agecheck_core::{AppConfig, GraphName};
use agecheck_graph::AgeConnector;
use agecheck_runner::GraphQueryRunner;

#[derive(Parser)]
#[command(name = "agecheck")]
#[command(about = "Run a Cypher read and write against an Apache AGE graph")]
struct Cli {
    /// Config file prefix (default: agecheck).
    #[arg(short, long, default_value = "agecheck")]
    config: String,

    /// Graph to query (overrides run.graph).
    #[arg(short, long)]
    graph: Option<String>,

    /// Name for the created Person node (overrides run.person_name).
    #[arg(short, long)]
    name: Option<String>,

    /// Create the graph first if it does not exist.
    #[arg(long)]
    create_graph: bool,

    /// Print the run report as JSON on stdout when done.
    #[arg(long)]
    json: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = load_config(&cli)?;
    let runner = GraphQueryRunner::new(config);

    let report = match runner.run(&AgeConnector).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(run_id = %runner.run_id(), error = %e, "Run aborted");
            return Err(e.into());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(&cli.config)?;

    if let Some(graph) = &cli.graph {
        config.run.graph = GraphName::new(graph.as_str())?;
    }
    if let Some(name) = &cli.name {
        config.run.person_name = name.clone();
    }
    if cli.create_graph {
        config.run.create_graph = true;
    }

    Ok(config)
}
