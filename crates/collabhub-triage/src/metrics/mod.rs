//! Centrality metrics for the co-authorship graph.
//!
//! Each metric answers a different question about an author:
//!
//! - **Degree** (`degree`): how many distinct collaborators do they have?
//! - **Betweenness** (`betweenness`): how often do they sit on shortest paths
//!   between other authors, i.e. bridge otherwise distant groups?
//! - **Eigenvector** (`eigenvector`): are they connected to other
//!   well-connected authors?
//! - **Clustering** (`clustering`): how tightly knit is their neighborhood?
//!
//! All metrics take a [`CollabGraph`](crate::graph::CollabGraph) and return
//! scores keyed by author name. Every node gets a score, including isolated
//! ones.
//!
//! ```rust,ignore
//! use collabhub_triage::graph::CollabGraph;
//! use collabhub_triage::metrics::{betweenness_centrality, degree_centrality, eigenvector_centrality};
//!
//! let g = CollabGraph::from_edges(&[("A", "B"), ("B", "C")]);
//! let dc = degree_centrality(&g);
//! let bc = betweenness_centrality(&g);
//! let ev = eigenvector_centrality(&g, 1000, 1e-6);
//! ```

pub mod betweenness;
pub mod clustering;
pub mod degree;
pub mod eigenvector;

pub use betweenness::betweenness_centrality;
pub use clustering::{average_clustering, local_clustering};
pub use degree::degree_centrality;
pub use eigenvector::{
    EigenvectorFallback, EigenvectorMethod, EigenvectorResult, eigenvector_centrality,
};
