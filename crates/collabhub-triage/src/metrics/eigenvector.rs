//! Eigenvector centrality: power iteration with a dense eigensolver behind it.
//!
//! # Algorithm
//!
//! Power iteration on `A + I` (the adjacency matrix shifted by the identity):
//!
//! 1. Initialize scores uniformly.
//! 2. For each node `v`: `score(v) = score(v) + sum of score(u) over neighbors u`.
//! 3. Normalize the score vector to unit L2 norm.
//! 4. Repeat until the L2 change drops below `tolerance` or `max_iter` is hit.
//!
//! The shift leaves the eigenvectors of `A` unchanged but keeps the iteration
//! from oscillating on bipartite graphs (paths, stars, even cycles).
//!
//! Power iteration converges at the rate `(λ2 + 1) / (λ1 + 1)`, which is slow
//! when two dense clusters hang off a single bridge. When `max_iter` runs out
//! the principal eigenvector is taken from a symmetric eigendecomposition of
//! the dense adjacency matrix instead ([`EigenvectorMethod::Dense`]).
//!
//! # Fallback
//!
//! A graph with no edges has no meaningful principal eigenvector, and a solve
//! that fails or produces non-finite values has no trustworthy one. In every
//! such case the whole result is replaced by zeros and
//! [`EigenvectorResult::fallback`] says why. Scores are never partially
//! substituted.

use std::collections::HashMap;
use std::fmt;

use nalgebra::{DMatrix, SymmetricEigen};
use tracing::{debug, instrument, warn};

use crate::graph::CollabGraph;

/// Which solver produced the scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EigenvectorMethod {
    PowerIteration,
    /// Symmetric eigendecomposition, used once power iteration runs out of
    /// iterations.
    Dense,
}

/// Why eigenvector scores were replaced with zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EigenvectorFallback {
    /// The graph has nodes but no edges.
    NoEdges,
    /// Neither power iteration nor the dense solver converged.
    NotConverged,
    /// The iteration produced NaN or infinity.
    NonFinite,
}

impl fmt::Display for EigenvectorFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoEdges => "graph has no edges",
            Self::NotConverged => "eigensolver did not converge",
            Self::NonFinite => "eigensolver produced non-finite values",
        };
        f.write_str(text)
    }
}

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    /// Author name → score. All zeros when `fallback` is set.
    pub scores: HashMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether power iteration met the tolerance within `max_iter`.
    pub converged: bool,
    pub method: EigenvectorMethod,
    /// Set when scores were replaced by zeros.
    pub fallback: Option<EigenvectorFallback>,
}

impl EigenvectorResult {
    fn zeros(g: &CollabGraph, iterations: usize, reason: EigenvectorFallback) -> Self {
        warn!(%reason, nodes = g.node_count(), "eigenvector centrality unavailable, using zeros");
        Self {
            scores: g.authors().map(|name| (name.to_string(), 0.0)).collect(),
            iterations,
            converged: false,
            method: EigenvectorMethod::PowerIteration,
            fallback: Some(reason),
        }
    }
}

/// Compute eigenvector centrality for every author.
///
/// # Arguments
///
/// * `g`: The co-authorship graph.
/// * `max_iter`: Maximum number of iterations.
/// * `tolerance`: Convergence threshold on the L2 norm of the change in
///   scores between iterations.
#[must_use]
#[instrument(skip(g))]
#[allow(clippy::cast_precision_loss)]
pub fn eigenvector_centrality(g: &CollabGraph, max_iter: usize, tolerance: f64) -> EigenvectorResult {
    let n = g.node_count();

    if n == 0 {
        return EigenvectorResult {
            scores: HashMap::new(),
            iterations: 0,
            converged: true,
            method: EigenvectorMethod::PowerIteration,
            fallback: None,
        };
    }
    if g.edge_count() == 0 {
        return EigenvectorResult::zeros(g, 0, EigenvectorFallback::NoEdges);
    }

    let adjacency = g.adjacency();
    let init_val = 1.0 / (n as f64).sqrt();
    let mut scores: Vec<f64> = vec![init_val; n];

    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..max_iter {
        iterations = iter + 1;

        let mut new_scores = scores.clone();
        for (v, nbrs) in adjacency.iter().enumerate() {
            for &u in nbrs {
                new_scores[v] += scores[u];
            }
        }

        let norm: f64 = new_scores.iter().map(|x| x * x).sum::<f64>().sqrt();
        if !norm.is_finite() {
            return EigenvectorResult::zeros(g, iterations, EigenvectorFallback::NonFinite);
        }
        if norm > 0.0 {
            for x in &mut new_scores {
                *x /= norm;
            }
        }

        let diff: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt();

        scores = new_scores;

        if diff < tolerance {
            converged = true;
            break;
        }
    }

    let method = if converged {
        EigenvectorMethod::PowerIteration
    } else {
        debug!(iterations, nodes = n, "power iteration exhausted, solving densely");
        let Some(dense) = dense_principal_eigenvector(&adjacency) else {
            return EigenvectorResult::zeros(g, iterations, EigenvectorFallback::NotConverged);
        };
        scores = dense;
        EigenvectorMethod::Dense
    };
    if scores.iter().any(|x| !x.is_finite()) {
        return EigenvectorResult::zeros(g, iterations, EigenvectorFallback::NonFinite);
    }

    let result = g
        .graph
        .node_indices()
        .map(|idx| (g.author(idx).to_string(), scores[idx.index()]))
        .collect();

    EigenvectorResult {
        scores: result,
        iterations,
        converged,
        method,
        fallback: None,
    }
}

/// Unit-norm eigenvector of the largest eigenvalue of the adjacency matrix.
///
/// The Perron vector of each connected component is single-signed, so taking
/// absolute values removes the solver's arbitrary sign (and per-component
/// signs when components tie on the largest eigenvalue).
fn dense_principal_eigenvector(adjacency: &[Vec<usize>]) -> Option<Vec<f64>> {
    let n = adjacency.len();
    let mut matrix = DMatrix::<f64>::zeros(n, n);
    for (v, nbrs) in adjacency.iter().enumerate() {
        for &u in nbrs {
            matrix[(v, u)] = 1.0;
            matrix[(u, v)] = 1.0;
        }
    }

    let eigen = SymmetricEigen::try_new(matrix, f64::EPSILON, 0)?;
    let top = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)?;

    let mut vector: Vec<f64> = eigen.eigenvectors.column(top).iter().map(|x| x.abs()).collect();
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if !(norm.is_finite() && norm > 0.0) {
        return None;
    }
    for x in &mut vector {
        *x /= norm;
    }
    Some(vector)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_converges_trivially() {
        let result = eigenvector_centrality(&CollabGraph::new(), 100, 1e-6);
        assert!(result.scores.is_empty());
        assert!(result.converged);
        assert!(result.fallback.is_none());
    }

    #[test]
    fn edgeless_graph_falls_back_to_zero() {
        let g = CollabGraph::from_parts(&["A", "B"], &[]);
        let result = eigenvector_centrality(&g, 100, 1e-6);
        assert_eq!(result.fallback, Some(EigenvectorFallback::NoEdges));
        assert!(result.scores.values().all(|v| v.abs() < f64::EPSILON));
        assert_eq!(result.scores.len(), 2);
    }

    #[test]
    fn triangle_is_uniform() {
        let g = CollabGraph::from_edges(&[("A", "B"), ("B", "C"), ("A", "C")]);
        let result = eigenvector_centrality(&g, 100, 1e-9);
        let expected = 1.0 / 3.0_f64.sqrt();
        for v in result.scores.values() {
            assert!((v - expected).abs() < 1e-6, "{v}");
        }
    }

    #[test]
    fn star_center_dominates() {
        let g = CollabGraph::from_edges(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C"), ("Hub", "D")]);
        let result = eigenvector_centrality(&g, 1000, 1e-9);
        assert!(result.converged);
        // Principal eigenvector of K1,4: center 1/sqrt(2), leaves 1/(2 sqrt(2)).
        assert!((result.scores["Hub"] - 1.0 / 2.0_f64.sqrt()).abs() < 1e-6);
        assert!((result.scores["A"] - 1.0 / (2.0 * 2.0_f64.sqrt())).abs() < 1e-6);
    }

    #[test]
    fn exhausted_iterations_switch_to_dense_solver() {
        let g = CollabGraph::from_edges(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")]);
        let result = eigenvector_centrality(&g, 1, 1e-12);
        assert!(!result.converged);
        assert_eq!(result.method, EigenvectorMethod::Dense);
        assert!(result.fallback.is_none());
        // Path P5: lambda = sqrt(3), vector (1/2, sqrt(3)/2, 1, sqrt(3)/2, 1/2) / sqrt(3).
        let s3 = 3.0_f64.sqrt();
        assert!((result.scores["C"] - 1.0 / s3).abs() < 1e-9);
        assert!((result.scores["A"] - 0.5 / s3).abs() < 1e-9);
        assert!((result.scores["B"] - 0.5).abs() < 1e-9);
    }

    /// Two 12-author labs bridged by one center author, plus a student on L1.
    fn bridged_labs() -> CollabGraph {
        let lab = |prefix: &str| -> Vec<String> { (1..=12).map(|i| format!("{prefix}{i}")).collect() };
        let (left, right) = (lab("L"), lab("R"));
        let mut edges: Vec<(String, String)> = Vec::new();
        for members in [&left, &right] {
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    edges.push((a.clone(), b.clone()));
                }
                edges.push(("Center".to_string(), a.clone()));
            }
        }
        edges.push(("L1".to_string(), "Student".to_string()));
        let refs: Vec<(&str, &str)> = edges.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        CollabGraph::from_edges(&refs)
    }

    #[test]
    fn bridged_labs_get_real_scores_with_default_budget() {
        let g = bridged_labs();
        let result = eigenvector_centrality(&g, 1000, 1e-6);
        assert!(result.fallback.is_none(), "{:?}", result.fallback);
        assert!(result.scores.values().all(|v| v.is_finite() && *v > 0.0));
        assert!(result.scores["Center"] > result.scores["R2"]);
        assert!(result.scores["L1"] > result.scores["L2"]);
        let norm: f64 = result.scores.values().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dense_and_power_iteration_agree() {
        let g = CollabGraph::from_edges(&[("Hub", "A"), ("Hub", "B"), ("Hub", "C"), ("A", "B")]);
        let power = eigenvector_centrality(&g, 10_000, 1e-12);
        let dense = eigenvector_centrality(&g, 1, 1e-12);
        assert_eq!(power.method, EigenvectorMethod::PowerIteration);
        assert_eq!(dense.method, EigenvectorMethod::Dense);
        for (name, v) in &power.scores {
            assert!((v - dense.scores[name]).abs() < 1e-6, "{name}");
        }
    }

    #[test]
    fn isolated_nodes_score_zero_when_others_converge() {
        let g = CollabGraph::from_parts(&["Solo"], &[("A", "B"), ("B", "C"), ("A", "C")]);
        let result = eigenvector_centrality(&g, 1000, 1e-9);
        assert!(result.fallback.is_none());
        assert!(result.scores["Solo"].abs() < 1e-6);
        assert!(result.scores["A"] > 0.5);
    }
}
