//! Co-authorship graph.
//!
//! # Overview
//!
//! Nodes are author display names; an undirected edge joins two authors who
//! share at least one work. The graph is simple: no self-loops and at most one
//! edge per pair, however many works the pair shares.
//!
//! ## Pipeline
//!
//! ```text
//! work ids ──► WorkSource::fetch ──► build::GraphBuilder
//!                                        │
//!                                        ▼
//!                              BuiltGraph { graph, affiliations, report }
//!                                        │
//!                                        ▼
//!                              stats::GraphStats (density, clustering, …)
//! ```
//!
//! ## Node order
//!
//! Nodes keep first-seen order: the order of works, then of authors within a
//! work. Hub ranking breaks score ties by this order.

pub mod build;
pub mod stats;

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

pub use build::{BuildOptions, BuiltGraph, FailedFetch, FetchReport, GraphBuilder, build_graph};
pub use stats::GraphStats;

// ---------------------------------------------------------------------------
// CollabGraph
// ---------------------------------------------------------------------------

/// Undirected co-authorship graph keyed by author name.
#[derive(Debug, Clone, Default)]
pub struct CollabGraph {
    /// Nodes are author names; edge weights are unused.
    pub graph: UnGraph<String, ()>,
    /// Author name → node index.
    pub node_map: HashMap<String, NodeIndex>,
}

impl CollabGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an edge list, inserting nodes in first-seen order.
    #[must_use]
    pub fn from_edges(edges: &[(&str, &str)]) -> Self {
        Self::from_parts(&[], edges)
    }

    /// Build a graph from explicit nodes (inserted first) plus an edge list.
    #[must_use]
    pub fn from_parts(nodes: &[&str], edges: &[(&str, &str)]) -> Self {
        let mut graph = Self::new();
        for name in nodes {
            graph.add_author(name);
        }
        for (a, b) in edges {
            graph.add_collaboration(a, b);
        }
        graph
    }

    /// Return the node for `name`, adding it if absent.
    pub fn add_author(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_map.insert(name.to_string(), idx);
        idx
    }

    /// Connect two authors. Returns `true` if a new edge was created.
    ///
    /// Self-pairs are ignored and repeated pairs collapse into one edge.
    pub fn add_collaboration(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            self.add_author(a);
            return false;
        }
        let ia = self.add_author(a);
        let ib = self.add_author(b);
        if self.graph.contains_edge(ia, ib) {
            return false;
        }
        self.graph.add_edge(ia, ib, ());
        true
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    #[must_use]
    pub fn contains_author(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Author name at `idx`.
    #[must_use]
    pub fn author(&self, idx: NodeIndex) -> &str {
        self.graph.node_weight(idx).map_or("", String::as_str)
    }

    /// Author names in node order.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    #[must_use]
    pub fn are_collaborators(&self, a: &str, b: &str) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(ia), Some(ib)) => self.graph.contains_edge(ia, ib),
            _ => false,
        }
    }

    /// Edge endpoints as author names, in edge insertion order.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| (self.author(e.source()), self.author(e.target())))
    }

    /// Neighbor lists indexed by node index, each sorted ascending.
    ///
    /// Sorting fixes the summation order in the numeric passes, so results do
    /// not depend on petgraph's internal adjacency order.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        self.graph
            .node_indices()
            .map(|v| {
                let mut nbrs: Vec<usize> = self.graph.neighbors(v).map(NodeIndex::index).collect();
                nbrs.sort_unstable();
                nbrs.dedup();
                nbrs
            })
            .collect()
    }

    /// BLAKE3 fingerprint of the node and edge sets, independent of insertion
    /// order.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut nodes: Vec<&str> = self.authors().collect();
        nodes.sort_unstable();

        let mut edges: Vec<(&str, &str)> = self
            .edge_pairs()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        edges.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for name in nodes {
            hasher.update(b"n\0");
            hasher.update(name.as_bytes());
            hasher.update(b"\n");
        }
        for (a, b) in edges {
            hasher.update(b"e\0");
            hasher.update(a.as_bytes());
            hasher.update(b"\0");
            hasher.update(b.as_bytes());
            hasher.update(b"\n");
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }
}
