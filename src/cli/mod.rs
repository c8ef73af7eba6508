//! CLI for the workflow engine
//!
//! Subcommands:
//! - `run`: execute a workflow definition file and print the result
//! - `inspect`: print the parsed graph and its execution order

pub mod inspect;
pub mod run;

use clap::{Parser, Subcommand};

/// PMP Workflow Engine - execute no-code AI workflow graphs
#[derive(Parser)]
#[command(name = "pmp-workflow-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute a workflow definition against a query
    Run(run::RunArgs),

    /// Show the parsed graph and execution order without executing
    Inspect(inspect::InspectArgs),
}
