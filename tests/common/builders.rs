//! Test data builders for creating graph snapshots

use flowsql::pipeline::nodes::{
    AggregateConfig, EventConfig, EventField, FilterConfig, JoinConfig, OutputConfig,
};
use flowsql::pipeline::{Edge, Node};

/// Builder for creating test graphs
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event node selecting the given columns
    pub fn event(mut self, id: &str, columns: &[&str]) -> Self {
        let config = columns
            .iter()
            .fold(EventConfig::default(), |c, col| c.with_field(EventField::column(*col)));
        self.nodes.push(Node::event(id, config));
        self
    }

    pub fn union_all(mut self, id: &str) -> Self {
        self.nodes.push(Node::union_all(id));
        self
    }

    pub fn join(mut self, id: &str, config: JoinConfig) -> Self {
        self.nodes.push(Node::join(id, config));
        self
    }

    pub fn filter(mut self, id: &str, config: FilterConfig) -> Self {
        self.nodes.push(Node::filter(id, config));
        self
    }

    pub fn aggregate(mut self, id: &str, config: AggregateConfig) -> Self {
        self.nodes.push(Node::aggregate(id, config));
        self
    }

    pub fn output(mut self, id: &str, view_name: &str) -> Self {
        self.nodes.push(Node::output(id, OutputConfig::named(view_name)));
        self
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push(Edge::new(source, target));
        self
    }

    /// Edge into a named input port
    pub fn edge_to(mut self, source: &str, target: &str, handle: &str) -> Self {
        self.edges.push(Edge::new(source, target).with_target_handle(handle));
        self
    }

    pub fn build(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_builder() {
        let (nodes, edges) = GraphBuilder::new()
            .event("e1", &["role_id"])
            .output("o1", "v1")
            .edge("e1", "o1")
            .build();

        assert_eq!(nodes.len(), 2);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target.as_str(), "o1");
    }
}
