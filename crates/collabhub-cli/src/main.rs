#![forbid(unsafe_code)]

mod cmd;
mod output;
mod pipeline;

use std::env;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "chub",
    author,
    version,
    about = "chub: find the hub authors of a co-authorship network",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (unless CHUB_LOG is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output (shorthand for `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Output format; defaults to pretty on a terminal and text when piped.
    #[arg(long, global = true, value_enum, value_name = "FORMAT")]
    format: Option<OutputMode>,

    /// Config file (default: ./collabhub.toml if present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Analysis",
        about = "Rank hub authors and render the network",
        long_about = "Fetch every work in the id table, build the co-authorship graph, rank \
                      authors by degree + betweenness + eigenvector centrality, and render the \
                      top hubs as a PNG.",
        after_help = "EXAMPLES:\n    # Analyze a table of OpenAlex work ids\n    chub analyze works.csv --image hubs.png\n\n    # Center a different author and keep 10 hubs\n    chub analyze works.csv --center \"Ada Lovelace\" --hubs 10\n\n    # Run offline against saved records\n    chub analyze works.csv --records records.json --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "List the work ids in a table",
        long_about = "Read a CSV or TXT table and print the work ids that analyze would fetch.",
        after_help = "EXAMPLES:\n    # Show the ids\n    chub ids works.csv\n\n    # Emit machine-readable output\n    chub ids works.csv --json"
    )]
    Ids(cmd::ids::IdsArgs),

    #[command(
        next_help_heading = "Service",
        about = "Serve the upload endpoint",
        long_about = "Run the HTTP endpoint: upload an id table, get the hub analysis as JSON.",
        after_help = "EXAMPLES:\n    # Listen on the configured address\n    chub serve\n\n    # Listen on all interfaces\n    chub serve --bind 0.0.0.0:5000"
    )]
    Serve(cmd::serve::ServeArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CHUB_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "collabhub=debug,chub=debug,info"
        } else {
            "collabhub=info,chub=info,warn"
        })
    });

    let format = env::var("CHUB_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output, so logs always go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = env::current_dir()?;
    let output = cli.output_mode();
    debug!(?output, "resolved output mode");

    match cli.command {
        Commands::Analyze(ref args) => {
            cmd::analyze::run_analyze(args, cli.config.as_deref(), output, &cwd)
        }
        Commands::Ids(ref args) => cmd::ids::run_ids(args, output),
        Commands::Serve(ref args) => {
            cmd::serve::run_serve(args, cli.config.as_deref(), output, &cwd)
        }
    }
}
