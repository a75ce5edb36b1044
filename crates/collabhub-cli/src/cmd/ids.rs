//! `chub ids`: show the work ids an input table yields.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use collabhub_core::input::read_work_ids;
use serde::Serialize;

use super::report;
use crate::output::{OutputMode, pretty_rule, render_mode};

#[derive(Args, Debug)]
pub struct IdsArgs {
    /// CSV or TXT table with a header row.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct IdsOutput {
    file: String,
    count: usize,
    ids: Vec<String>,
}

/// Execute `chub ids`.
///
/// # Errors
///
/// Returns an error if the table cannot be read or has no usable id column.
pub fn run_ids(args: &IdsArgs, output: OutputMode) -> anyhow::Result<()> {
    let ids = read_work_ids(&args.file).map_err(|err| report(output, err.code(), err))?;

    let payload = IdsOutput {
        file: args.file.display().to_string(),
        count: ids.len(),
        ids,
    };

    render_mode(output, &payload, render_ids_text, render_ids_pretty)
}

fn render_ids_text(payload: &IdsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for id in &payload.ids {
        writeln!(w, "{id}")?;
    }
    Ok(())
}

fn render_ids_pretty(payload: &IdsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{} work ids in {}", payload.count, payload.file)?;
    pretty_rule(w)?;
    for (i, id) in payload.ids.iter().enumerate() {
        writeln!(w, "{:>5}  {id}", i + 1)?;
    }
    Ok(())
}
