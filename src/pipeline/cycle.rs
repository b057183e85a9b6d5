//! Cycle detection over the dependency graph.
//!
//! Depth-first search along dependency links with a path stack and an
//! on-stack set. Every back-link closes one cycle; scanning continues over
//! all components so independent cycles are reported together.
//!
//! Reported cycles follow edge direction (`a -> b` means an edge from `a` to
//! `b`), start at the member that comes first in node-list order, and repeat
//! that member at the end: `[a, b, a]`.

use crate::pipeline::graph::DependencyGraph;
use crate::pipeline::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// All distinct cycles found in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycles: Vec<Vec<NodeId>>,
}

impl CycleReport {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }
}

struct Search<'g> {
    graph: &'g DependencyGraph,
    visited: HashSet<&'g NodeId>,
    on_stack: HashSet<&'g NodeId>,
    path: Vec<&'g NodeId>,
    seen: HashSet<Vec<NodeId>>,
    cycles: Vec<Vec<NodeId>>,
}

/// Find every cycle in `graph`.
pub fn detect_cycles(graph: &DependencyGraph) -> CycleReport {
    let mut search = Search {
        graph,
        visited: HashSet::with_capacity(graph.len()),
        on_stack: HashSet::new(),
        path: Vec::new(),
        seen: HashSet::new(),
        cycles: Vec::new(),
    };

    for id in graph.node_ids() {
        if !search.visited.contains(id) {
            search.visit(id);
        }
    }

    CycleReport {
        cycles: search.cycles,
    }
}

impl<'g> Search<'g> {
    /// Depth-first walk from `root` on an explicit frame stack.
    ///
    /// Each frame holds a node and the index of its next dependency to
    /// look at, so chain depth is bounded by memory rather than the call
    /// stack.
    fn visit(&mut self, root: &'g NodeId) {
        let graph = self.graph;
        let mut frames: Vec<(&'g NodeId, usize)> = vec![(root, 0)];
        self.enter(root);

        while let Some(frame) = frames.last_mut() {
            let (id, next) = *frame;
            match graph.dependencies(id).get(next) {
                Some(dep) => {
                    frame.1 += 1;
                    if self.on_stack.contains(dep) {
                        self.record(dep);
                    } else if !self.visited.contains(dep) {
                        self.enter(dep);
                        frames.push((dep, 0));
                    }
                }
                None => {
                    frames.pop();
                    self.path.pop();
                    self.on_stack.remove(id);
                }
            }
        }
    }

    fn enter(&mut self, id: &'g NodeId) {
        self.visited.insert(id);
        self.on_stack.insert(id);
        self.path.push(id);
    }

    /// `closing` is on the stack; the path from it to the top is a cycle.
    fn record(&mut self, closing: &NodeId) {
        let Some(start) = self.path.iter().position(|p| *p == closing) else {
            return;
        };

        // The path runs along dependency links, i.e. against edge direction.
        let mut body: Vec<NodeId> = self.path[start..]
            .iter()
            .rev()
            .map(|id| (*id).clone())
            .collect();

        let pivot = body
            .iter()
            .enumerate()
            .min_by_key(|(_, id)| self.graph.index_of(id).unwrap_or(usize::MAX))
            .map(|(i, _)| i)
            .unwrap_or(0);
        body.rotate_left(pivot);

        if !self.seen.insert(body.clone()) {
            return;
        }

        tracing::debug!("Found cycle through {} node(s)", body.len());
        let first = body[0].clone();
        body.push(first);
        self.cycles.push(body);
    }
}
