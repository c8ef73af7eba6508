//! `inspect` subcommand: show how a definition parses and schedules

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::domain::{ExecutionGraph, WorkflowDefinition};

#[derive(Args)]
pub struct InspectArgs {
    /// Path to the workflow definition JSON file
    pub definition: PathBuf,
}

pub async fn run(args: InspectArgs) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.definition)
        .with_context(|| format!("failed to read {}", args.definition.display()))?;
    let definition =
        WorkflowDefinition::from_json(&raw).context("failed to parse workflow definition")?;

    let declared = definition.nodes.len();
    let graph = ExecutionGraph::parse(&definition);

    println!("Nodes ({} of {} declared):", graph.nodes().len(), declared);
    for node in graph.nodes() {
        println!("  {} [{}] {}", node.id, node.kind.label(), node.label);
    }

    println!("Edges ({}):", graph.edges().len());
    for (source, target) in graph.edges() {
        println!("  {source} -> {target}");
    }

    println!("Execution order:");
    for (index, node_id) in graph.execution_order().iter().enumerate() {
        println!("  {}. {node_id}", index + 1);
    }

    let scheduled = graph.execution_order().len();
    if scheduled < graph.nodes().len() {
        println!(
            "Warning: {} node(s) are on a cycle and will not execute",
            graph.nodes().len() - scheduled
        );
    }

    Ok(())
}
