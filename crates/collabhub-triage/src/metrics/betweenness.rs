//! Betweenness centrality via Brandes' algorithm.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! Complexity: O(V * E).
//!
//! # Normalization
//!
//! The graph is undirected, so the accumulation above visits every pair of
//! endpoints twice. Scores are multiplied by `1 / ((n - 1)(n - 2))`, which
//! maps the middle of a three-node path (and the center of any star) to 1.0.
//! With two or fewer nodes no node can lie between two others and the raw
//! (zero) scores are returned.

use std::collections::{HashMap, VecDeque};

use tracing::instrument;

use crate::graph::CollabGraph;

/// Compute normalized betweenness centrality for every author.
#[must_use]
#[instrument(skip(g))]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(g: &CollabGraph) -> HashMap<String, f64> {
    let n = g.node_count();
    if n == 0 {
        return HashMap::new();
    }

    let adjacency = g.adjacency();
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in 0..n {
        // Nodes in order of discovery (farthest popped first).
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[s] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[s] = 0;

        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);

            for &w in &adjacency[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }

                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                if sigma[w] > 0.0 {
                    delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
                }
            }

            if w != s {
                cb[w] += delta[w];
            }
        }
    }

    let scale = if n > 2 {
        1.0 / ((n - 1) as f64 * (n - 2) as f64)
    } else {
        1.0
    };

    g.graph
        .node_indices()
        .map(|idx| (g.author(idx).to_string(), cb[idx.index()] * scale))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_graph() {
        assert!(betweenness_centrality(&CollabGraph::new()).is_empty());
    }

    #[test]
    fn two_nodes_score_zero() {
        let bc = betweenness_centrality(&CollabGraph::from_edges(&[("A", "B")]));
        assert_close(bc["A"], 0.0);
        assert_close(bc["B"], 0.0);
    }

    #[test]
    fn path_middle_is_one() {
        let bc = betweenness_centrality(&CollabGraph::from_edges(&[("A", "B"), ("B", "C")]));
        assert_close(bc["A"], 0.0);
        assert_close(bc["B"], 1.0);
        assert_close(bc["C"], 0.0);
    }

    #[test]
    fn star_center_is_one() {
        let g = CollabGraph::from_edges(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C"), ("Hub", "D")]);
        let bc = betweenness_centrality(&g);
        assert_close(bc["Hub"], 1.0);
        for leaf in ["A", "B", "C", "D"] {
            assert_close(bc[leaf], 0.0);
        }
    }

    #[test]
    fn triangle_has_no_brokers() {
        let g = CollabGraph::from_edges(&[("A", "B"), ("B", "C"), ("A", "C")]);
        let bc = betweenness_centrality(&g);
        for v in bc.values() {
            assert_close(*v, 0.0);
        }
    }

    #[test]
    fn four_cycle_splits_paths() {
        // A-B-C-D-A: each node brokers half of the one pair opposite it.
        let g = CollabGraph::from_edges(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]);
        let bc = betweenness_centrality(&g);
        for v in bc.values() {
            assert_close(*v, 1.0 / 6.0);
        }
    }

    #[test]
    fn isolated_nodes_score_zero_and_count_toward_n() {
        let g = CollabGraph::from_parts(&["Solo"], &[("A", "B"), ("B", "C")]);
        let bc = betweenness_centrality(&g);
        assert_close(bc["Solo"], 0.0);
        // raw 2 ordered pairs, scaled by 1 / (3 * 2)
        assert_close(bc["B"], 1.0 / 3.0);
    }
}
