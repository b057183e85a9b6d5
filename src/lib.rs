//! # flowsql: visual pipeline compiler
//!
//! Compiles node graphs drawn in a visual pipeline editor into query text.
//! Each node is one relational step (event source, union, join, filter,
//! aggregation, view output); edges carry one node's result into the next.
//!
//! ## Architecture
//!
//! - **Pipeline**: dependency graph, cycle detection, scheduling and
//!   per-kind code generation ([`pipeline`])
//! - **Cascade deletion**: graph maintenance for node removal, with a dry run
//! - **Configuration**: naming conventions and failure policy, loaded from TOML
//!
//! ## Configuration
//!
//! Settings are stored in the platform config directory under `flowsql`
//! (see [`config`]). Every setting has a default, so no file is required.
//!
//! ## Example
//!
//! ```
//! use flowsql::pipeline::{compile, Edge, Node};
//! use flowsql::pipeline::nodes::{EventConfig, EventField, OutputConfig};
//! use flowsql::ExternalContext;
//!
//! let nodes = vec![
//!     Node::event("e1", EventConfig::default().with_field(EventField::column("role_id"))),
//!     Node::output("o1", OutputConfig::named("v1")),
//! ];
//! let edges = vec![Edge::new("e1", "o1")];
//!
//! let result = compile(&nodes, &edges, &ExternalContext::new("game_db", 42));
//! assert!(result.success);
//! assert!(result.final_text.unwrap().starts_with("CREATE OR REPLACE VIEW game_42.v1 AS"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::{CompilerSettings, FailurePolicy, GraphDocument};
pub use error::{FlowError, Result};
pub use pipeline::{
    cascade_delete, compile, estimate_cascade_impact, Edge, Node, NodeId, PipelineCompiler,
    PipelineResult,
};
pub use types::ExternalContext;
