//! Gapfill - quality scoring for model-filled gaps in vehicle ads
//!
//! The `gapfill` command scores gap fills and turns runs into reports.
//!
//! ## Commands
//!
//! - `score`: Score a single filled word
//! - `evaluate`: Score a file of gap fills and write a run report
//! - `compare`: Rank run reports from several models
//! - `gaps`: Create, locate and fill `[GAP:n]` markers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gapfill_core::{
    build_inputs, compare_models, create_gaps, fill_gaps, find_gaps, read_run_report_json,
    write_comparison_md, write_evaluations_csv, write_run_report_json, GapEvaluationInput,
    GapfillConfig, ModelRun, RunReport, RunSpan, METRICS,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "gapfill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Score words language models put into gaps of Polish vehicle ads", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Config file (JSON); falls back to $GAPFILL_CONFIG, then defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one filled word
    Score {
        /// The word the model put into the gap
        word: String,

        /// Text around the gap
        #[arg(short, long, default_value = "")]
        context: String,

        /// Preposition directly before the gap
        #[arg(short, long, default_value = "")]
        preposition: String,

        /// Gap index to report
        #[arg(short, long, default_value = "1")]
        index: u32,
    },

    /// Score a JSON array of gap fills
    Evaluate {
        /// Fills file: `[{"index": 1, "word": "...", "context": "...", "preposition": "..."}]`
        fills: PathBuf,

        /// Model name recorded in the report
        #[arg(short, long, default_value = "unknown")]
        model: String,

        /// Write the run report (JSON) here
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write per-gap rows (CSV) here
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Score chunks on blocking tasks concurrently
        #[arg(long)]
        parallel: bool,
    },

    /// Rank run reports by average overall score
    Compare {
        /// Run reports written by `evaluate --out`
        #[arg(required = true)]
        reports: Vec<PathBuf>,

        /// Write the comparison (Markdown) here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Work with gap markers
    Gaps {
        #[command(subcommand)]
        action: GapsAction,
    },
}

#[derive(Subcommand)]
enum GapsAction {
    /// Replace a share of the words in a text with markers
    Create {
        /// Source text
        text: String,

        /// Percentage of words to remove (0-100)
        #[arg(short, long, default_value = "20")]
        percent: f64,

        /// Selection seed; the same seed removes the same words
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },

    /// List markers with their context and preposition
    Find {
        /// Text containing `[GAP:n]` markers
        text: String,
    },

    /// Write fills into their markers
    Fill {
        /// Text containing `[GAP:n]` markers
        text: String,

        /// Fills file: `{"1": "word", "2": "word"}`
        fills: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    gapfill_core::init_tracing(cli.json, level);

    let config = load_config(cli.config.as_deref())?;

    let outcome = match cli.command {
        Commands::Score {
            word,
            context,
            preposition,
            index,
        } => cmd_score(&config, index, &word, &context, &preposition),
        Commands::Evaluate {
            fills,
            model,
            out,
            csv,
            parallel,
        } => {
            cmd_evaluate(
                &config,
                &fills,
                &model,
                out.as_deref(),
                csv.as_deref(),
                parallel,
            )
            .await
        }
        Commands::Compare { reports, out } => cmd_compare(&reports, out.as_deref()),
        Commands::Gaps { action } => match action {
            GapsAction::Create {
                text,
                percent,
                seed,
            } => cmd_gaps_create(&text, percent, seed),
            GapsAction::Find { text } => cmd_gaps_find(&config, &text),
            GapsAction::Fill { text, fills } => cmd_gaps_fill(&config, &text, &fills),
        },
    };

    METRICS.flush();
    outcome
}

fn load_config(path: Option<&Path>) -> Result<GapfillConfig> {
    match path {
        Some(path) => GapfillConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {:?}", path)),
        None => GapfillConfig::from_env().context("Failed to load config from environment"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_fills<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse fills {:?}", path))
}

/// Score one word
fn cmd_score(
    config: &GapfillConfig,
    index: u32,
    word: &str,
    context: &str,
    preposition: &str,
) -> Result<()> {
    let result = config.scorer().evaluate(index, word, context, preposition);
    print_json(&result)
}

/// Score a fills file and optionally persist the run
async fn cmd_evaluate(
    config: &GapfillConfig,
    fills: &Path,
    model: &str,
    out: Option<&Path>,
    csv: Option<&Path>,
    parallel: bool,
) -> Result<()> {
    let inputs: Vec<GapEvaluationInput> = read_fills(fills)?;
    let scorer = config.scorer();

    let _span = RunSpan::enter(model);
    let aggregate = if parallel {
        scorer
            .evaluate_all_parallel(inputs.clone(), config.parallel_chunk_size)
            .await?
    } else {
        scorer.evaluate_all(&inputs)
    };

    if let Some(path) = csv {
        write_evaluations_csv(path, model, &aggregate)?;
    }

    let report = RunReport::new(model, &inputs, aggregate)?;
    match out {
        Some(path) => {
            write_run_report_json(path, &report)?;
            info!(
                model = %model,
                total_gaps = report.aggregate.total_gaps,
                average_overall = report.aggregate.average_overall,
                "run report written"
            );
            Ok(())
        }
        None => print_json(&report),
    }
}

/// Rank previously written run reports
fn cmd_compare(reports: &[PathBuf], out: Option<&Path>) -> Result<()> {
    let mut runs = Vec::with_capacity(reports.len());
    for path in reports {
        let report = read_run_report_json(path)?;
        runs.push(ModelRun::new(report.model, report.aggregate));
    }

    let comparison = compare_models(&runs);
    if let Some(path) = out {
        write_comparison_md(path, &comparison)?;
    }
    print_json(&comparison)
}

fn cmd_gaps_create(text: &str, percent: f64, seed: u64) -> Result<()> {
    let gapped = create_gaps(text, percent, seed)?;
    print_json(&gapped)
}

fn cmd_gaps_find(config: &GapfillConfig, text: &str) -> Result<()> {
    print_json(&find_gaps(text, config.context_window))
}

/// Fill markers and print the text plus the scorer inputs it implies
fn cmd_gaps_fill(config: &GapfillConfig, text: &str, fills: &Path) -> Result<()> {
    let fills: BTreeMap<u32, String> = read_fills(fills)?;

    #[derive(Serialize)]
    struct Filled {
        text: String,
        inputs: Vec<GapEvaluationInput>,
    }

    print_json(&Filled {
        text: fill_gaps(text, &fills),
        inputs: build_inputs(text, &fills, config.context_window),
    })
}
