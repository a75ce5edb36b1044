//! Result tables for a scored, laid-out graph.
//!
//! The hub table is ordered by rank. The edge list keeps only edges touching
//! at least one hub, in graph edge order; edges between two non-hubs add
//! nothing to a hub-focused view.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::CollabGraph;
use crate::graph::build::Affiliations;
use crate::graph::stats::GraphStats;
use crate::layout::Layout;
use crate::score::AuthorScore;
use crate::style::institution_colors;
use collabhub_core::model::UNKNOWN_INSTITUTION;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubRow {
    /// 1-based.
    pub rank: usize,
    pub name: String,
    pub institution: String,
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    pub hub_score: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRow {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub nodes: Vec<HubRow>,
    pub edges: Vec<EdgeRow>,
    pub institutions: BTreeMap<String, usize>,
    pub center_author: String,
    pub network_stats: GraphStats,
    /// True when eigenvector scores were replaced with zeros.
    pub eigenvector_fallback: bool,
}

#[must_use]
pub fn summarize(
    g: &CollabGraph,
    hubs: &[AuthorScore],
    layout: &Layout,
    affiliations: &Affiliations,
    center_author: &str,
    eigenvector_fallback: bool,
) -> Summary {
    let nodes = hubs
        .iter()
        .enumerate()
        .map(|(i, hub)| {
            let pos = g
                .node_index(&hub.name)
                .and_then(|idx| layout.get(idx))
                .unwrap_or_default();
            HubRow {
                rank: i + 1,
                name: hub.name.clone(),
                institution: affiliations
                    .get(&hub.name)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_INSTITUTION.to_string()),
                degree: hub.degree,
                betweenness: hub.betweenness,
                eigenvector: hub.eigenvector,
                hub_score: hub.hub_score,
                x: pos.x,
                y: pos.y,
            }
        })
        .collect();

    let is_hub = |name: &str| hubs.iter().any(|h| h.name == name);
    let edges = g
        .edge_pairs()
        .filter(|&(a, b)| is_hub(a) || is_hub(b))
        .map(|(a, b)| EdgeRow {
            source: a.to_string(),
            target: b.to_string(),
        })
        .collect();

    Summary {
        nodes,
        edges,
        institutions: institution_colors(affiliations),
        center_author: center_author.to_string(),
        network_stats: GraphStats::from_graph(g),
        eigenvector_fallback,
    }
}
