//! Command line interface definitions.

use crate::pipeline::PipelineResult;
use clap::{Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flowsql")]
#[command(about = "Compile visual pipeline graphs into query programs")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a graph document and print the generated programs
    Compile {
        /// Graph document (JSON)
        graph: PathBuf,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete nodes and every output left without input
    Cascade {
        /// Graph document (JSON)
        graph: PathBuf,

        /// Ids of the nodes to delete
        #[arg(required = true)]
        ids: Vec<String>,

        /// Only report what would be removed
        #[arg(long)]
        dry_run: bool,
    },
}

/// Plain-text listing of a compile result.
///
/// One block per terminal sink; without any, the final program alone.
pub fn render_programs(result: &PipelineResult) -> String {
    let mut out = String::new();
    if result.programs.is_empty() {
        if let Some(text) = &result.final_text {
            let _ = writeln!(out, "{};", text);
        }
        return out;
    }
    for (sink, program) in &result.programs {
        let _ = writeln!(out, "-- {}\n{};\n", sink, program);
    }
    out
}
