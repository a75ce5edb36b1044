//! Whole-network statistics.
//!
//! # Statistics Provided
//!
//! - **total_nodes** / **total_edges**: size of the co-authorship graph.
//! - **density**: `2m / (n (n - 1))` for an undirected graph; zero for graphs
//!   with fewer than two nodes.
//! - **average_clustering**: mean local clustering coefficient; zero for the
//!   empty graph.
//! - **component_count**: connected components (isolated authors each form
//!   their own).
//! - **isolated_node_count**: authors with no co-authors in the fetched set.
//! - **fingerprint**: BLAKE3 hash of the node and edge sets.

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::CollabGraph;
use crate::metrics::clustering::average_clustering;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    #[serde(rename = "total_nodes")]
    pub node_count: usize,
    #[serde(rename = "total_edges")]
    pub edge_count: usize,
    pub density: f64,
    pub average_clustering: f64,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub fingerprint: String,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(g: &CollabGraph) -> Self {
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let component_count = if node_count == 0 {
            0
        } else {
            connected_components(&g.graph)
        };

        let isolated_node_count = g
            .graph
            .node_indices()
            .filter(|&idx| g.degree(idx) == 0)
            .count();

        Self {
            node_count,
            edge_count,
            density: density(node_count, edge_count),
            average_clustering: average_clustering(g),
            component_count,
            isolated_node_count,
            fingerprint: g.fingerprint(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Undirected graph density.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let max_edges = node_count as f64 * (node_count - 1) as f64;
    2.0 * edge_count as f64 / max_edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_stats() {
        let stats = GraphStats::from_graph(&CollabGraph::new());
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.edge_count, 0);
        assert!(stats.density.abs() < f64::EPSILON);
        assert!(stats.average_clustering.abs() < f64::EPSILON);
        assert_eq!(stats.component_count, 0);
    }

    #[test]
    fn density_values() {
        assert!(density(0, 0).abs() < f64::EPSILON);
        assert!(density(1, 0).abs() < f64::EPSILON);
        assert!((density(3, 3) - 1.0).abs() < 1e-12);
        assert!((density(4, 3) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn components_and_isolates() {
        let g = CollabGraph::from_parts(&["Solo"], &[("A", "B"), ("C", "D")]);
        let stats = GraphStats::from_graph(&g);
        assert_eq!(stats.component_count, 3);
        assert_eq!(stats.isolated_node_count, 1);
    }

    #[test]
    fn serializes_with_summary_field_names() {
        let g = CollabGraph::from_edges(&[("A", "B")]);
        let json = serde_json::to_value(GraphStats::from_graph(&g)).expect("serialize");
        assert_eq!(json["total_nodes"], 2);
        assert_eq!(json["total_edges"], 1);
        assert_eq!(json["density"], 1.0);
    }
}
