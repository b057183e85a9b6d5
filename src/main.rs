//! flowsql - Main Entry Point
//!
//! Compiles graph documents exported by the pipeline editor, or applies a
//! cascade deletion to them, and prints the result to stdout.

use anyhow::Context;
use clap::Parser;
use flowsql::{
    cli::{render_programs, Cli, Command},
    config::{CompilerSettings, GraphDocument},
    pipeline::{cascade_delete, estimate_cascade_impact, NodeId, PipelineCompiler},
    FlowError,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for generated output
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,flowsql=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = CompilerSettings::load_or_default(cli.config.as_deref());

    match cli.command {
        Command::Compile { graph, json } => run_compile(&graph, json, settings),
        Command::Cascade {
            graph,
            ids,
            dry_run,
        } => run_cascade(&graph, ids, dry_run),
    }
}

fn run_compile(path: &Path, json: bool, settings: CompilerSettings) -> anyhow::Result<()> {
    let document = GraphDocument::load(path)?;
    let result = PipelineCompiler::new(settings).compile(
        &document.nodes,
        &document.edges,
        &document.context,
    );

    if json {
        let text = serde_json::to_string_pretty(&result).context("Failed to render result")?;
        println!("{}", text);
    } else {
        print!("{}", render_programs(&result));
        for error in result.errors.values() {
            eprintln!("error: {}", error);
        }
    }

    if let Some(fatal) = result.fatal {
        return Err(FlowError::Pipeline(fatal).into());
    }
    if !result.success {
        anyhow::bail!("{} node(s) failed to compile", result.errors.len());
    }
    Ok(())
}

fn run_cascade(path: &Path, ids: Vec<String>, dry_run: bool) -> anyhow::Result<()> {
    let document = GraphDocument::load(path)?;
    let targets: Vec<NodeId> = ids.into_iter().map(NodeId::from).collect();

    if dry_run {
        let summary = estimate_cascade_impact(&targets, &document.nodes, &document.edges);
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to render summary")?
        );
        return Ok(());
    }

    let outcome = cascade_delete(&targets, document.nodes, document.edges);
    let updated = GraphDocument {
        nodes: outcome.nodes,
        edges: outcome.edges,
        context: document.context,
    };
    println!("{}", updated.to_json()?);
    Ok(())
}
