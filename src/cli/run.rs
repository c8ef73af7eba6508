//! `run` subcommand: execute a definition file and print the result

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::domain::{ExecutionRequest, WorkflowDefinition, WorkflowEngine};
use crate::infrastructure::logging::init_logging;

#[derive(Args)]
pub struct RunArgs {
    /// Path to the workflow definition JSON file
    pub definition: PathBuf,

    /// Query to execute the workflow with
    #[arg(short, long)]
    pub query: Option<String>,

    /// Extra execution payload as a JSON object
    #[arg(short, long)]
    pub payload: Option<String>,

    /// User id to attribute the execution to
    #[arg(long)]
    pub user_id: Option<String>,

    /// Workflow id override
    #[arg(long)]
    pub workflow_id: Option<String>,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.logging);

    let raw = std::fs::read_to_string(&args.definition)
        .with_context(|| format!("failed to read {}", args.definition.display()))?;
    let definition =
        WorkflowDefinition::from_json(&raw).context("failed to parse workflow definition")?;

    let mut payload: Value = match &args.payload {
        Some(text) => serde_json::from_str(text).context("failed to parse --payload JSON")?,
        None => json!({}),
    };
    if let Some(query) = &args.query {
        if let Value::Object(map) = &mut payload {
            map.insert("query".to_string(), Value::String(query.clone()));
        }
    }

    let engine = crate::create_engine(&config)?;

    let mut request = ExecutionRequest::new(definition, payload);
    if let Some(user_id) = args.user_id {
        request = request.with_user_id(user_id);
    }
    if let Some(workflow_id) = args.workflow_id {
        request = request.with_workflow_id(workflow_id);
    }

    let result = engine.execute(request).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if result.error {
        std::process::exit(1);
    }

    Ok(())
}
