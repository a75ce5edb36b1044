//! Local and average clustering coefficients.
//!
//! The local coefficient of `v` is the fraction of pairs of `v`'s neighbors
//! that are themselves connected: `2 T(v) / (deg(v) (deg(v) - 1))`, where
//! `T(v)` counts triangles through `v`. Nodes with fewer than two neighbors
//! score 0.

use std::collections::HashMap;

use tracing::instrument;

use crate::graph::CollabGraph;

#[allow(clippy::cast_precision_loss)]
fn coefficients(g: &CollabGraph) -> Vec<f64> {
    let adjacency = g.adjacency();

    adjacency
        .iter()
        .map(|nbrs| {
            let k = nbrs.len();
            if k < 2 {
                return 0.0;
            }
            let mut triangles = 0usize;
            for (i, &u) in nbrs.iter().enumerate() {
                for &w in &nbrs[i + 1..] {
                    if adjacency[u].binary_search(&w).is_ok() {
                        triangles += 1;
                    }
                }
            }
            (2 * triangles) as f64 / (k * (k - 1)) as f64
        })
        .collect()
}

/// Clustering coefficient for every author.
#[must_use]
pub fn local_clustering(g: &CollabGraph) -> HashMap<String, f64> {
    coefficients(g)
        .into_iter()
        .zip(g.authors())
        .map(|(c, name)| (name.to_string(), c))
        .collect()
}

/// Mean of the local coefficients over all nodes, isolated ones included.
/// Zero for the empty graph.
#[must_use]
#[instrument(skip(g))]
#[allow(clippy::cast_precision_loss)]
pub fn average_clustering(g: &CollabGraph) -> f64 {
    let n = g.node_count();
    if n == 0 {
        return 0.0;
    }
    coefficients(g).iter().sum::<f64>() / n as f64
}
