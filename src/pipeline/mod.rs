//! Graph compiler for visual query pipelines.
//!
//! Nodes describe relational steps (event sources, unions, joins, filters,
//! aggregations and view outputs). Edges carry the output of one node into
//! another. Compilation turns a graph snapshot into generated query text.
//!
//! # Architecture
//!
//! ```text
//! (nodes, edges) ──► DependencyGraph ──► detect_cycles ──► schedule
//!                                                             │
//!                          PipelineResult ◄── compile_node ◄──┘
//! ```
//!
//! # Design
//!
//! - **Closed kind set** — `NodeKind` enum, compiled by an exhaustive match.
//! - **Flat graph** — `DependencyGraph` is an ordered map keyed by `NodeId`,
//!   iterated in node-list order so results are deterministic.
//! - **Errors as values** — a failing node is recorded and independent
//!   branches keep compiling; only a cycle aborts the run.
//! - **Stateless** — every compile rebuilds the graph from its inputs.

pub mod cascade;
pub mod compiled_plan;
pub mod compiler;
pub mod cycle;
pub mod error;
pub mod fragment;
pub mod graph;
pub mod id;
pub mod node;
pub mod node_type;
pub mod nodes;
pub mod port;
pub mod scheduler;

pub use cascade::{cascade_delete, estimate_cascade_impact, CascadeOutcome, CascadeSummary};
pub use compiled_plan::{PipelineResult, PlanStats, Stage};
pub use compiler::{compile, PipelineCompiler};
pub use cycle::{detect_cycles, CycleReport};
pub use error::{NodeError, PipelineError};
pub use fragment::{NodeMetadata, NodeOutput, Upstream};
pub use graph::{Adjacency, DependencyGraph};
pub use id::{EdgeId, NodeId};
pub use node::{Edge, Node, NodeKind};
pub use node_type::{Arity, NodeType};
pub use port::{PortDescriptor, PortDirection};
pub use scheduler::schedule;
