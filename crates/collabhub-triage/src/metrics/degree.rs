//! Normalized degree centrality.
//!
//! `degree(v) / (n - 1)`: the fraction of other authors `v` has worked with.
//! A lone node scores 1.0 by convention.

use std::collections::HashMap;

use tracing::instrument;

use crate::graph::CollabGraph;

#[must_use]
#[instrument(skip(g))]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(g: &CollabGraph) -> HashMap<String, f64> {
    let n = g.node_count();
    if n == 0 {
        return HashMap::new();
    }
    if n == 1 {
        return g.authors().map(|name| (name.to_string(), 1.0)).collect();
    }

    let scale = 1.0 / (n - 1) as f64;
    g.graph
        .node_indices()
        .map(|idx| (g.author(idx).to_string(), g.degree(idx) as f64 * scale))
        .collect()
}
