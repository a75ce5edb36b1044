//! Graph construction from fetched work records.
//!
//! # Overview
//!
//! [`build_graph`] walks the work id list in order, fetches each record from a
//! [`WorkSource`], and folds it into a [`GraphBuilder`]. Per work, every named
//! author becomes a node and every unordered pair of distinct named authors
//! becomes an edge. Authors listed alone still appear as isolated nodes.
//!
//! ## Affiliations
//!
//! Each author keeps exactly one institution. When an author appears in
//! several works, the most recently processed work's institution wins.
//!
//! ## Failures
//!
//! A failed fetch never aborts the build. The id is recorded in the
//! [`FetchReport`] and skipped. If every fetch fails the result is an empty
//! graph, which downstream stages handle as a valid input.

use std::collections::HashMap;
use std::time::Duration;

use collabhub_core::config::AnalysisConfig;
use collabhub_core::fetch::WorkSource;
use collabhub_core::model::WorkRecord;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::CollabGraph;

/// Author name → institution name.
pub type Affiliations = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Process at most this many ids (from the front of the list).
    pub max_works: Option<usize>,
    /// Pause between consecutive fetches.
    pub fetch_delay: Duration,
}

impl From<&AnalysisConfig> for BuildOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            max_works: config.max_works,
            fetch_delay: config.fetch_delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFetch {
    pub work_id: String,
    pub reason: String,
}

/// What happened to each id during a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    /// Ids supplied by the caller.
    pub requested: usize,
    /// Ids actually attempted after the `max_works` cap.
    pub attempted: usize,
    /// Ids whose record was retrieved and folded into the graph.
    pub fetched: usize,
    pub failed: Vec<FailedFetch>,
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Incremental graph construction, one work at a time.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: CollabGraph,
    affiliations: Affiliations,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one work into the graph. Returns the number of named authors.
    pub fn add_work(&mut self, record: &WorkRecord) -> usize {
        let authors = record.affiliations();

        for aff in &authors {
            self.graph.add_author(&aff.author);
            self.affiliations
                .insert(aff.author.clone(), aff.institution.clone());
        }

        for (i, a) in authors.iter().enumerate() {
            for b in &authors[i + 1..] {
                self.graph.add_collaboration(&a.author, &b.author);
            }
        }

        authors.len()
    }

    #[must_use]
    pub const fn graph(&self) -> &CollabGraph {
        &self.graph
    }

    #[must_use]
    pub fn finish(self) -> (CollabGraph, Affiliations) {
        (self.graph, self.affiliations)
    }
}

// ---------------------------------------------------------------------------
// BuiltGraph
// ---------------------------------------------------------------------------

/// Output of [`build_graph`].
#[derive(Debug, Clone, Default)]
pub struct BuiltGraph {
    pub graph: CollabGraph,
    pub affiliations: Affiliations,
    pub report: FetchReport,
}

/// Fetch every work in `work_ids` and build the co-authorship graph.
///
/// Ids are processed in order, capped at `options.max_works`. The delay is
/// applied between consecutive fetches, not before the first one.
#[instrument(skip(work_ids, source), fields(ids = work_ids.len()))]
pub fn build_graph<S>(work_ids: &[String], source: &S, options: &BuildOptions) -> BuiltGraph
where
    S: WorkSource + ?Sized,
{
    let limit = options
        .max_works
        .map_or(work_ids.len(), |cap| cap.min(work_ids.len()));
    let selected = &work_ids[..limit];

    let mut builder = GraphBuilder::new();
    let mut report = FetchReport {
        requested: work_ids.len(),
        attempted: selected.len(),
        ..FetchReport::default()
    };

    for (i, work_id) in selected.iter().enumerate() {
        if i > 0 && !options.fetch_delay.is_zero() {
            std::thread::sleep(options.fetch_delay);
        }

        match source.fetch(work_id) {
            Ok(record) => {
                let authors = builder.add_work(&record);
                report.fetched += 1;
                debug!(work_id, authors, "added work");
            }
            Err(err) => {
                warn!(work_id, error = %err, "skipping work");
                report.failed.push(FailedFetch {
                    work_id: work_id.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let (graph, affiliations) = builder.finish();
    info!(
        fetched = report.fetched,
        failed = report.failed.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built collaboration graph"
    );

    BuiltGraph {
        graph,
        affiliations,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collabhub_core::fetch::{FetchError, RecordSet};
    use collabhub_core::model::Authorship;

    fn work(authors: &[(&str, &str)]) -> WorkRecord {
        WorkRecord::new(
            authors
                .iter()
                .map(|(name, inst)| Authorship::new(Some(*name), &[*inst]))
                .collect(),
        )
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn three_author_work_is_a_triangle() {
        let mut builder = GraphBuilder::new();
        let n = builder.add_work(&work(&[("A", "X"), ("B", "Y"), ("C", "X")]));
        assert_eq!(n, 3);

        let (graph, affs) = builder.finish();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(affs["B"], "Y");
    }

    #[test]
    fn solo_author_is_isolated_node() {
        let mut builder = GraphBuilder::new();
        builder.add_work(&work(&[("Solo", "X")]));
        let (graph, affs) = builder.finish();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(affs["Solo"], "X");
    }

    #[test]
    fn duplicate_author_in_one_work_adds_no_loop() {
        let mut builder = GraphBuilder::new();
        builder.add_work(&work(&[("A", "X"), ("A", "X"), ("B", "Y")]));
        let (graph, _) = builder.finish();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn later_work_overwrites_affiliation() {
        let mut builder = GraphBuilder::new();
        builder.add_work(&work(&[("A", "Old"), ("B", "Y")]));
        builder.add_work(&work(&[("A", "New"), ("C", "Z")]));
        let (_, affs) = builder.finish();
        assert_eq!(affs["A"], "New");
    }

    #[test]
    fn unnamed_authorships_are_ignored() {
        let record = WorkRecord::new(vec![
            Authorship::new(Some("A"), &["X"]),
            Authorship::new(None, &["Y"]),
            Authorship::new(Some("B"), &[]),
        ]);
        let mut builder = GraphBuilder::new();
        assert_eq!(builder.add_work(&record), 2);
        assert_eq!(builder.graph().edge_count(), 1);
    }

    #[test]
    fn failed_fetches_are_reported_and_skipped() {
        let mut set = RecordSet::new();
        set.insert("W1", work(&[("A", "X"), ("B", "Y")]));

        let built = build_graph(&ids(&["W1", "W2"]), &set, &BuildOptions::default());

        assert_eq!(built.graph.edge_count(), 1);
        assert_eq!(built.report.fetched, 1);
        assert_eq!(built.report.failed.len(), 1);
        assert_eq!(built.report.failed[0].work_id, "W2");
    }

    #[test]
    fn every_fetch_failing_yields_empty_graph() {
        let source = |id: &str| -> Result<WorkRecord, FetchError> {
            Err(FetchError::NotFound(id.to_string()))
        };
        let built = build_graph(&ids(&["W1", "W2", "W3"]), &source, &BuildOptions::default());

        assert!(built.graph.is_empty());
        assert!(built.affiliations.is_empty());
        assert_eq!(built.report.failed.len(), 3);
    }

    #[test]
    fn max_works_caps_from_the_front() {
        let mut set = RecordSet::new();
        set.insert("W1", work(&[("A", "X"), ("B", "X")]));
        set.insert("W2", work(&[("C", "X"), ("D", "X")]));

        let options = BuildOptions {
            max_works: Some(1),
            ..BuildOptions::default()
        };
        let built = build_graph(&ids(&["W1", "W2"]), &set, &options);

        assert_eq!(built.report.requested, 2);
        assert_eq!(built.report.attempted, 1);
        assert!(built.graph.contains_author("A"));
        assert!(!built.graph.contains_author("C"));
    }

    #[test]
    fn cap_larger_than_list_is_harmless() {
        let options = BuildOptions {
            max_works: Some(10),
            ..BuildOptions::default()
        };
        let built = build_graph(&ids(&["W1"]), &RecordSet::new(), &options);
        assert_eq!(built.report.attempted, 1);
    }
}
