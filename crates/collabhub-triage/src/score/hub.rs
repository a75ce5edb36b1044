//! Composite hub score.
//!
//! `hub(v) = degree(v) + betweenness(v) + eigenvector(v)`, each measure taken
//! unweighted and as computed (normalized degree, normalized betweenness,
//! unit-L2 eigenvector). Authors are ranked by this score in descending order;
//! ties keep node order, which is first-seen order during graph construction.

use collabhub_core::config::EigenvectorConfig;
use serde::Serialize;
use tracing::{info, instrument};

use crate::graph::CollabGraph;
use crate::metrics::{
    EigenvectorFallback, betweenness_centrality, degree_centrality, eigenvector_centrality,
};

/// Every measure for one author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorScore {
    pub name: String,
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    pub hub_score: f64,
}

/// Scores for every node, in node order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubScores {
    pub entries: Vec<AuthorScore>,
    /// Set when eigenvector scores were replaced with zeros.
    pub eigenvector_fallback: Option<EigenvectorFallback>,
}

impl HubScores {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[must_use]
pub fn hub_score(degree: f64, betweenness: f64, eigenvector: f64) -> f64 {
    degree + betweenness + eigenvector
}

/// Compute degree, betweenness, and eigenvector centrality and combine them.
#[must_use]
#[instrument(skip(g))]
pub fn score_authors(g: &CollabGraph, eigen: &EigenvectorConfig) -> HubScores {
    let dc = degree_centrality(g);
    let bc = betweenness_centrality(g);
    let ev = eigenvector_centrality(g, eigen.max_iter, eigen.tolerance);

    let entries: Vec<AuthorScore> = g
        .authors()
        .map(|name| {
            let degree = dc.get(name).copied().unwrap_or(0.0);
            let betweenness = bc.get(name).copied().unwrap_or(0.0);
            let eigenvector = ev.scores.get(name).copied().unwrap_or(0.0);
            AuthorScore {
                name: name.to_string(),
                degree,
                betweenness,
                eigenvector,
                hub_score: hub_score(degree, betweenness, eigenvector),
            }
        })
        .collect();

    info!(
        authors = entries.len(),
        eigen_iterations = ev.iterations,
        eigen_method = ?ev.method,
        eigen_fallback = ev.fallback.is_some(),
        "scored authors"
    );

    HubScores {
        entries,
        eigenvector_fallback: ev.fallback,
    }
}

/// All authors sorted by hub score, highest first. The sort is stable.
#[must_use]
pub fn rank_authors(scores: &HubScores) -> Vec<&AuthorScore> {
    let mut ranked: Vec<&AuthorScore> = scores.entries.iter().collect();
    ranked.sort_by(|a, b| b.hub_score.total_cmp(&a.hub_score));
    ranked
}

/// The top `min(k, n)` authors by hub score.
#[must_use]
pub fn select_hubs(scores: &HubScores, k: usize) -> Vec<AuthorScore> {
    rank_authors(scores).into_iter().take(k).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_for(g: &CollabGraph) -> HubScores {
        score_authors(g, &EigenvectorConfig::default())
    }

    #[test]
    fn hub_score_is_plain_sum() {
        assert!((hub_score(0.5, 0.25, 0.125) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn entries_follow_node_order() {
        let g = CollabGraph::from_edges(&[("B", "A"), ("A", "C")]);
        let s = scores_for(&g);
        let names: Vec<&str> = s.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn star_center_ranks_first() {
        let g = CollabGraph::from_edges(&[("A", "Hub"), ("Hub", "B"), ("Hub", "C")]);
        let s = scores_for(&g);
        let top = select_hubs(&s, 1);
        assert_eq!(top[0].name, "Hub");
    }

    #[test]
    fn ties_keep_node_order() {
        let g = CollabGraph::from_edges(&[("C", "B"), ("B", "A"), ("A", "C")]);
        let s = scores_for(&g);
        let names: Vec<String> = select_hubs(&s, 3).into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn k_larger_than_n_returns_everyone() {
        let g = CollabGraph::from_edges(&[("A", "B")]);
        assert_eq!(select_hubs(&scores_for(&g), 20).len(), 2);
    }

    #[test]
    fn edgeless_graph_flags_fallback() {
        let g = CollabGraph::from_parts(&["A", "B"], &[]);
        let s = scores_for(&g);
        assert_eq!(s.eigenvector_fallback, Some(EigenvectorFallback::NoEdges));
        assert!(s.entries.iter().all(|e| e.eigenvector.abs() < f64::EPSILON));
    }
}
