//! revloop - proposer/critic revision loop CLI
//!
//! ## Commands
//!
//! - `run`: drive one document through the loop and print the transcript
//! - `propose`: print the planner's proposal for a document
//! - `batch`: run a JSON array of initial states concurrently

mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use revloop_core::{propose, run_batch, BatchConfig, Engine, LoopConfig, RunReport, SharedState};

use crate::render::render_transcript;

#[derive(Parser)]
#[command(name = "revloop")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Proposer/critic revision loop", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one document through the revision loop
    Run {
        /// Document title
        #[arg(long)]
        title: String,

        /// Document body
        #[arg(long)]
        content: String,

        /// Review with the strict policy
        #[arg(long)]
        strict: bool,

        /// Make the reviewer always reject (exercises the turn cap)
        #[arg(long)]
        force_issue: bool,

        /// Override the configured turn cap
        #[arg(long)]
        max_turns: Option<u32>,

        /// Config file (default: ./revloop.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the planner's proposal for a document as JSON
    Propose {
        /// Document title
        #[arg(long)]
        title: String,

        /// Document body
        #[arg(long)]
        content: String,
    },

    /// Run a JSON array of initial states and print their reports
    Batch {
        /// Path to a JSON array of initial states
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum number of runs executing at once
        #[arg(long, default_value = "4")]
        max_concurrent: usize,

        /// Config file (default: ./revloop.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    revloop_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Run {
            title,
            content,
            strict,
            force_issue,
            max_turns,
            config,
            format,
        } => {
            let initial = SharedState::new(title, content)
                .with_strict_mode(strict)
                .with_force_issue(force_issue);
            cmd_run(initial, max_turns, config.as_deref(), format)
        }
        Commands::Propose { title, content } => cmd_propose(&title, &content),
        Commands::Batch {
            input,
            max_concurrent,
            config,
        } => cmd_batch(&input, max_concurrent, config.as_deref()).await,
    }
}

fn load_config(path: Option<&Path>, max_turns: Option<u32>) -> Result<LoopConfig> {
    let mut config = LoopConfig::load(path).context("Failed to load revloop configuration")?;
    if let Some(max_turns) = max_turns {
        config = config.with_max_turns(max_turns);
    }
    config.validate().context("Invalid revloop configuration")?;
    Ok(config)
}

fn cmd_run(
    initial: SharedState,
    max_turns: Option<u32>,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let engine = Engine::new(load_config(config, max_turns)?);
    let report = engine.run(initial);
    info!(run_id = %report.run_id, termination = %report.termination, "run complete");
    println!("{}", format_report(&report, format)?);
    Ok(())
}

fn format_report(report: &RunReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_transcript(report),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    })
}

fn cmd_propose(title: &str, content: &str) -> Result<()> {
    let proposal = propose(title, content);
    println!("{}", serde_json::to_string_pretty(&proposal)?);
    Ok(())
}

async fn cmd_batch(input: &Path, max_concurrent: usize, config: Option<&Path>) -> Result<()> {
    let inputs: Vec<SharedState> = read_json_file(input)?;
    let engine = Engine::new(load_config(config, None)?);

    let count = inputs.len();
    let reports = run_batch(engine, inputs, BatchConfig { max_concurrent })
        .await
        .context("Batch run failed")?;

    let accepted = reports.iter().filter(|r| r.accepted()).count();
    info!(runs = count, accepted, "batch complete");
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}
