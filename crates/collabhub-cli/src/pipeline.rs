//! The full analysis run shared by `chub analyze` and the web endpoint.
//!
//! ```text
//! ids ──► build_graph ──► analyze ──► render_png ──► AnalysisResult
//! ```
//!
//! Callers differ only in the [`AnalysisConfig`] preset and the
//! [`WorkSource`] they pass in.

use collabhub_core::config::AnalysisConfig;
use collabhub_core::fetch::WorkSource;
use collabhub_render::{RenderError, RenderOptions, encode_base64, render_png};
use collabhub_triage::{Analysis, BuildOptions, FetchReport, Summary, analyze, build_graph};
use serde::Serialize;
use tracing::{info, instrument};

/// Everything a caller receives from one run, serialized as one object.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Base64-encoded PNG of the hub network.
    pub image: String,
    #[serde(flatten)]
    pub summary: Summary,
    pub fetch_report: FetchReport,
}

/// A finished run: the result object plus the raw PNG bytes.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub result: AnalysisResult,
    pub png: Vec<u8>,
}

/// Fetch, build, score, lay out, summarize, and render.
///
/// Individual fetch failures never fail the run; they are listed in the
/// result's `fetch_report`.
///
/// # Errors
///
/// Returns a [`RenderError`] if the image cannot be produced. No partial
/// result is returned in that case.
#[instrument(skip_all, fields(ids = work_ids.len(), center = %config.center_author))]
pub fn run_pipeline<S>(
    work_ids: &[String],
    source: &S,
    config: &AnalysisConfig,
) -> Result<PipelineRun, RenderError>
where
    S: WorkSource + ?Sized,
{
    let built = build_graph(work_ids, source, &BuildOptions::from(config));
    let Analysis { summary, scene } = analyze(&built, config);

    let png = render_png(&scene, &RenderOptions::from(&config.render))?;
    info!(bytes = png.len(), hubs = summary.nodes.len(), "rendered hub network");

    Ok(PipelineRun {
        result: AnalysisResult {
            image: encode_base64(&png),
            summary,
            fetch_report: built.report,
        },
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use collabhub_core::fetch::RecordSet;
    use collabhub_core::model::{Authorship, WorkRecord};
    use std::time::Duration;

    fn work(names: &[&str]) -> WorkRecord {
        WorkRecord::new(
            names
                .iter()
                .map(|name| Authorship::new(Some(*name), &["Stanford University"]))
                .collect(),
        )
    }

    fn quick_config() -> AnalysisConfig {
        let mut config = AnalysisConfig::batch();
        config.fetch_delay = Duration::ZERO;
        config.render.width = 320;
        config.render.height = 288;
        config
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn triangle_run_produces_full_result() {
        let mut records = RecordSet::new();
        records.insert("W1", work(&["A", "B"]));
        records.insert("W2", work(&["B", "C"]));
        records.insert("W3", work(&["A", "C"]));

        let run = run_pipeline(&ids(&["W1", "W2", "W3"]), &records, &quick_config())
            .expect("pipeline");

        assert_eq!(run.result.summary.nodes.len(), 3);
        assert_eq!(run.result.summary.edges.len(), 3);
        assert_eq!(run.result.fetch_report.fetched, 3);
        assert!(run.png.starts_with(&[0x89, b'P', b'N', b'G']));
        assert!(run.result.image.starts_with("iVBORw0KGgo"));
    }

    #[test]
    fn serialized_result_is_flat() {
        let mut records = RecordSet::new();
        records.insert("W1", work(&["A", "B"]));

        let run = run_pipeline(&ids(&["W1"]), &records, &quick_config()).expect("pipeline");
        let value = serde_json::to_value(&run.result).expect("serialize");

        for key in [
            "image",
            "nodes",
            "edges",
            "institutions",
            "center_author",
            "network_stats",
            "fetch_report",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["network_stats"]["total_nodes"], 2);
    }

    #[test]
    fn all_fetches_failing_still_renders() {
        let run = run_pipeline(&ids(&["W1", "W2"]), &RecordSet::new(), &quick_config())
            .expect("pipeline");

        assert!(run.result.summary.nodes.is_empty());
        assert!(run.result.summary.edges.is_empty());
        assert_eq!(run.result.fetch_report.failed.len(), 2);
        assert!(!run.png.is_empty());
    }

    #[test]
    fn tiny_canvas_is_a_render_error() {
        let mut config = quick_config();
        config.render.width = 8;
        let err = run_pipeline(&ids(&[]), &RecordSet::new(), &config).expect_err("too small");
        assert!(matches!(err, RenderError::CanvasTooSmall { .. }));
    }
}
