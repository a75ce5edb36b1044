//! End-to-end scenarios over in-memory record sources.
//!
//! Each test feeds a handful of synthetic works through graph construction
//! and analysis and checks the resulting tables, mirroring what the CLI and
//! web surface return.

use collabhub_core::config::AnalysisConfig;
use collabhub_core::fetch::{FetchError, RecordSet};
use collabhub_core::model::{Authorship, WorkRecord};
use collabhub_triage::analyze;
use collabhub_triage::graph::{BuildOptions, build_graph};
use collabhub_triage::layout::{Position, spiral_position};
use collabhub_triage::style::GOLD;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn work(authors: &[(&str, &str)]) -> WorkRecord {
    WorkRecord::new(
        authors
            .iter()
            .map(|(name, inst)| Authorship::new(Some(*name), &[*inst]))
            .collect(),
    )
}

fn ids(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("W{i}")).collect()
}

fn config(center: &str) -> AnalysisConfig {
    AnalysisConfig {
        center_author: center.to_string(),
        fetch_delay: std::time::Duration::ZERO,
        ..AnalysisConfig::batch()
    }
}

// ===========================================================================
// Triangle
// ===========================================================================

#[test]
fn three_pairwise_works_form_a_triangle() {
    let mut set = RecordSet::new();
    set.insert("W1", work(&[("A", "X"), ("B", "Y")]));
    set.insert("W2", work(&[("B", "Y"), ("C", "X")]));
    set.insert("W3", work(&[("A", "X"), ("C", "X")]));

    let built = build_graph(&ids(3), &set, &BuildOptions::default());
    assert_eq!(built.graph.node_count(), 3);
    assert_eq!(built.graph.edge_count(), 3);

    let analysis = analyze(&built, &config("A"));
    let summary = &analysis.summary;

    assert_eq!(summary.nodes.len(), 3);
    for row in &summary.nodes {
        assert!((row.degree - 1.0).abs() < 1e-12, "{}", row.name);
        assert!(row.betweenness.abs() < 1e-12);
    }
    assert_eq!(summary.edges.len(), 3);
    assert!((summary.network_stats.density - 1.0).abs() < 1e-12);
    assert!((summary.network_stats.average_clustering - 1.0).abs() < 1e-12);

    // Equal scores keep first-seen order; A is the center and sits at the origin.
    let names: Vec<&str> = summary.nodes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!((summary.nodes[0].x, summary.nodes[0].y), (0.0, 0.0));
    assert_eq!(
        Position::new(summary.nodes[1].x, summary.nodes[1].y),
        spiral_position(1)
    );
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn all_fetches_failing_yields_empty_result() {
    let source = |id: &str| -> Result<WorkRecord, FetchError> {
        Err(FetchError::Status {
            work_id: id.to_string(),
            status: 503,
        })
    };

    let built = build_graph(&ids(4), &source, &BuildOptions::default());
    assert_eq!(built.report.failed.len(), 4);

    let analysis = analyze(&built, &config("A"));
    let summary = &analysis.summary;

    assert!(summary.nodes.is_empty());
    assert!(summary.edges.is_empty());
    assert!(summary.institutions.is_empty());
    assert_eq!(summary.network_stats.node_count, 0);
    assert_eq!(summary.network_stats.edge_count, 0);
    assert!(summary.network_stats.density.abs() < f64::EPSILON);
    assert!(summary.network_stats.average_clustering.abs() < f64::EPSILON);
    assert!(analysis.scene.nodes.is_empty());
    assert_eq!(analysis.scene.title, "Top 0 Hub Nodes in Collaboration Network");
}

#[test]
fn partial_failures_keep_the_rest() {
    let mut set = RecordSet::new();
    set.insert("W1", work(&[("A", "X"), ("B", "Y")]));
    set.insert("W3", work(&[("C", "Z"), ("D", "Z")]));

    let built = build_graph(&ids(3), &set, &BuildOptions::default());
    assert_eq!(built.report.fetched, 2);
    assert_eq!(built.report.failed[0].work_id, "W2");
    assert_eq!(built.graph.node_count(), 4);
    assert_eq!(built.graph.edge_count(), 2);
}

// ===========================================================================
// Hub selection
// ===========================================================================

#[test]
fn hub_count_caps_selection() {
    let mut set = RecordSet::new();
    for i in 0..30 {
        let coauthor = format!("Co{i}");
        set.insert(
            &format!("W{}", i + 1),
            work(&[("Center", "Lab"), (coauthor.as_str(), "Elsewhere")]),
        );
    }

    let built = build_graph(&ids(30), &set, &BuildOptions::default());
    assert_eq!(built.graph.node_count(), 31);

    let analysis = analyze(&built, &config("Center"));
    let summary = &analysis.summary;

    assert_eq!(summary.nodes.len(), 20);
    assert_eq!(summary.nodes[0].name, "Center");
    assert_eq!((summary.nodes[0].x, summary.nodes[0].y), (0.0, 0.0));
    // Every edge touches the center, so every edge is a hub edge.
    assert_eq!(summary.edges.len(), 30);
    assert_eq!(summary.institutions.len(), 2);

    // 11 regular nodes first, then hubs in rank order; the center is gold.
    assert_eq!(analysis.scene.nodes.len(), 31);
    assert_eq!(analysis.scene.nodes[11].fill, GOLD);
    assert_eq!(analysis.scene.labels.len(), 20);
    assert_eq!(analysis.scene.labels[0].text, "1. Center");
}

#[test]
fn eigenvector_fallback_is_total_and_flagged() {
    let mut set = RecordSet::new();
    set.insert("W1", work(&[("Solo", "X")]));
    set.insert("W2", work(&[("Other", "Y")]));

    let built = build_graph(&ids(2), &set, &BuildOptions::default());
    let analysis = analyze(&built, &config("Solo"));

    assert!(analysis.summary.eigenvector_fallback);
    assert_eq!(analysis.summary.nodes.len(), 2);
    assert!(analysis.summary.nodes.iter().all(|r| r.eigenvector.abs() < f64::EPSILON));
}

#[test]
fn bridged_labs_keep_eigenvector_term_with_default_budget() {
    // One paper per lab, both co-authored by the center; one extra student paper.
    let lab = |prefix: &str, inst: &'static str| -> Vec<(String, &'static str)> {
        (1..=12).map(|i| (format!("{prefix}{i}"), inst)).collect()
    };
    let mut set = RecordSet::new();
    for (id, members) in [("W1", lab("L", "Left")), ("W2", lab("R", "Right"))] {
        let mut authors: Vec<(&str, &str)> = vec![("Center", "Bridge")];
        authors.extend(members.iter().map(|(name, inst)| (name.as_str(), *inst)));
        set.insert(id, work(&authors));
    }
    set.insert("W3", work(&[("L1", "Left"), ("Student", "Left")]));

    let built = build_graph(&ids(3), &set, &BuildOptions::default());
    assert_eq!(built.graph.node_count(), 26);

    let analysis = analyze(&built, &config("Center"));
    let summary = &analysis.summary;

    assert!(!summary.eigenvector_fallback);
    assert_eq!(summary.nodes[0].name, "Center");
    assert!(summary.nodes.iter().all(|r| r.eigenvector > 0.0), "{:?}", summary.nodes);
    let l1 = summary.nodes.iter().find(|r| r.name == "L1").expect("L1 is a hub");
    assert!(l1.eigenvector > summary.nodes.iter().find(|r| r.name == "L2").map_or(0.0, |r| r.eigenvector));
}
