//! `chub analyze`: id table in, ranked hub table and network PNG out.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use collabhub_core::config::{AnalysisConfig, RunMode};
use collabhub_core::fetch::{OpenAlexClient, RecordSet};
use collabhub_core::input::read_work_ids;
use collabhub_core::ErrorCode;
use tracing::info;

use super::{load_settings, report};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};
use crate::pipeline::{AnalysisResult, run_pipeline};

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// CSV or TXT table of work ids (column `id`, `ids.openalex`, or the first).
    #[arg(value_name = "FILE", required_unless_present = "ids")]
    pub file: Option<PathBuf>,

    /// Extra work id, appended after any read from FILE. Repeatable.
    #[arg(long = "id", value_name = "ID")]
    pub ids: Vec<String>,

    /// Author pinned at the origin when selected as a hub.
    #[arg(long, value_name = "NAME")]
    pub center: Option<String>,

    /// Number of hubs to select.
    #[arg(long, value_name = "K")]
    pub hubs: Option<usize>,

    /// Process at most this many ids from the front of the list.
    #[arg(long, value_name = "N")]
    pub max_works: Option<usize>,

    /// Pause between consecutive fetches, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Seed for the spring layout.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Write the rendered network PNG to this path.
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Serve work records from a JSON file instead of the OpenAlex API.
    #[arg(long, value_name = "PATH")]
    pub records: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// Overlay command-line values on the batch preset.
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(center) = &self.center {
            config.center_author.clone_from(center);
        }
        if let Some(k) = self.hubs {
            config.hub_count = k;
        }
        if let Some(cap) = self.max_works {
            config.max_works = Some(cap);
        }
        if let Some(ms) = self.delay_ms {
            config.fetch_delay = Duration::from_millis(ms);
        }
        if let Some(seed) = self.seed {
            config.layout.seed = seed;
        }
    }

    fn collect_ids(&self, output: OutputMode) -> anyhow::Result<Vec<String>> {
        let mut ids = match &self.file {
            Some(path) => read_work_ids(path).map_err(|err| report(output, err.code(), err))?,
            None => Vec::new(),
        };
        ids.extend(self.ids.iter().cloned());
        Ok(ids)
    }
}

/// Execute `chub analyze`.
///
/// # Errors
///
/// Returns an error if the config or input table is unusable, the records
/// file cannot be loaded, or the image cannot be rendered or written.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config_path: Option<&Path>,
    output: OutputMode,
    cwd: &Path,
) -> anyhow::Result<()> {
    let settings = load_settings(config_path, cwd, output)?;
    let mut config = settings.analysis(RunMode::Batch);
    args.apply(&mut config);
    config
        .validate()
        .map_err(|err| report(output, err.code(), err))?;

    let ids = args.collect_ids(output)?;
    info!(ids = ids.len(), "collected work ids");

    let run = match &args.records {
        Some(path) => {
            let records = match RecordSet::from_json_file(path) {
                Ok(records) => records,
                Err(err) => {
                    render_error(output, &CliError::new(format!("{err:#}")))?;
                    return Err(err);
                }
            };
            info!(records = records.len(), path = %path.display(), "using offline records");
            run_pipeline(&ids, &records, &config)
        }
        None => run_pipeline(&ids, &OpenAlexClient::new(&settings.fetch), &config),
    }
    .map_err(|err| report(output, err.code(), err))?;

    if let Some(path) = &args.image {
        if let Err(err) = std::fs::write(path, &run.png) {
            render_error(
                output,
                &CliError::from_code(
                    ErrorCode::RenderFailed,
                    format!("failed to write {}: {err}", path.display()),
                ),
            )?;
            return Err(err).with_context(|| format!("Failed to write {}", path.display()));
        }
        info!(path = %path.display(), bytes = run.png.len(), "wrote network image");
    }

    render_mode(
        output,
        &run.result,
        render_analysis_text,
        |result, w| render_analysis_pretty(result, args.image.as_deref(), w),
    )
}

fn render_analysis_text(result: &AnalysisResult, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "rank\tname\tinstitution\thub_score\tdegree\tbetweenness\teigenvector")?;
    for row in &result.summary.nodes {
        writeln!(
            w,
            "{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            row.rank,
            row.name,
            row.institution,
            row.hub_score,
            row.degree,
            row.betweenness,
            row.eigenvector
        )?;
    }
    Ok(())
}

fn render_analysis_pretty(
    result: &AnalysisResult,
    image: Option<&Path>,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let summary = &result.summary;
    let stats = &summary.network_stats;

    pretty_section(w, &format!("Top {} hubs", summary.nodes.len()))?;
    writeln!(
        w,
        "{:>4}  {:<28} {:<28} {:>8}",
        "#", "Author", "Institution", "Score"
    )?;
    for row in &summary.nodes {
        let marker = if row.name == summary.center_author { "*" } else { " " };
        writeln!(
            w,
            "{:>4}{marker} {:<28} {:<28} {:>8.4}",
            row.rank,
            truncate(&row.name, 28),
            truncate(&row.institution, 28),
            row.hub_score
        )?;
    }
    writeln!(w)?;

    pretty_section(w, "Network")?;
    pretty_kv(w, "nodes", stats.node_count.to_string())?;
    pretty_kv(w, "edges", stats.edge_count.to_string())?;
    pretty_kv(w, "density", format!("{:.4}", stats.density))?;
    pretty_kv(w, "clustering", format!("{:.4}", stats.average_clustering))?;
    pretty_kv(w, "components", stats.component_count.to_string())?;
    pretty_kv(w, "hub edges", summary.edges.len().to_string())?;
    pretty_kv(w, "institutions", summary.institutions.len().to_string())?;

    let fetch = &result.fetch_report;
    pretty_kv(
        w,
        "works",
        format!(
            "{} fetched, {} failed of {} requested",
            fetch.fetched,
            fetch.failed.len(),
            fetch.requested
        ),
    )?;
    if summary.eigenvector_fallback {
        pretty_kv(w, "eigenvector", "fallback used; all scores set to 0")?;
    }
    if let Some(path) = image {
        pretty_kv(w, "image", path.display().to_string())?;
    }
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_preset_values() {
        let args = AnalyzeArgs {
            center: Some("Ada Lovelace".into()),
            hubs: Some(5),
            max_works: Some(3),
            delay_ms: Some(0),
            seed: Some(7),
            ..AnalyzeArgs::default()
        };
        let mut config = AnalysisConfig::batch();
        args.apply(&mut config);

        assert_eq!(config.center_author, "Ada Lovelace");
        assert_eq!(config.hub_count, 5);
        assert_eq!(config.max_works, Some(3));
        assert_eq!(config.fetch_delay, Duration::ZERO);
        assert_eq!(config.layout.seed, 7);
    }

    #[test]
    fn no_overrides_keep_preset() {
        let mut config = AnalysisConfig::batch();
        AnalyzeArgs::default().apply(&mut config);
        assert_eq!(config, AnalysisConfig::batch());
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd…");
    }
}
