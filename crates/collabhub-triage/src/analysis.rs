//! One-call analysis of a built graph.

use collabhub_core::config::AnalysisConfig;
use tracing::{info, instrument};

use crate::graph::BuiltGraph;
use crate::layout::{HubLayout, select_and_layout};
use crate::score::score_authors;
use crate::style::{RenderScene, build_scene};
use crate::summary::{Summary, summarize};

/// Tables and picture description for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: Summary,
    pub scene: RenderScene,
}

/// Score, rank, lay out, and summarize `built`.
///
/// An empty graph is valid and yields empty tables and a scene with no
/// nodes.
#[must_use]
#[instrument(skip(built, config), fields(nodes = built.graph.node_count()))]
pub fn analyze(built: &BuiltGraph, config: &AnalysisConfig) -> Analysis {
    let g = &built.graph;
    let scores = score_authors(g, &config.eigenvector);
    let HubLayout { ranked, layout } =
        select_and_layout(g, &scores, &config.center_author, config.hub_count, &config.layout);

    let summary = summarize(
        g,
        &ranked,
        &layout,
        &built.affiliations,
        &config.center_author,
        scores.eigenvector_fallback.is_some(),
    );
    let scene = build_scene(g, &layout, &ranked, &built.affiliations, &config.center_author);

    info!(
        hubs = ranked.len(),
        hub_edges = summary.edges.len(),
        institutions = summary.institutions.len(),
        "analysis complete"
    );

    Analysis { summary, scene }
}
