//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use flowsql::pipeline::{NodeId, PipelineResult};
use flowsql::ExternalContext;

/// Context used by integration tests
pub fn test_context() -> ExternalContext {
    ExternalContext::new("game_db", 42)
}

/// Execution order as plain strings
pub fn order_of(result: &PipelineResult) -> Vec<&str> {
    result.execution_order.iter().map(NodeId::as_str).collect()
}

/// Position of `id` in the execution order
pub fn position(result: &PipelineResult, id: &str) -> usize {
    result
        .execution_order
        .iter()
        .position(|n| n.as_str() == id)
        .unwrap_or_else(|| panic!("{} not scheduled", id))
}
