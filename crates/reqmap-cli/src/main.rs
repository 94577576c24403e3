use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reqmap_core::RequirementKey;
use reqmap_core::config_file::{self, ConfigFile};
use reqmap_parsing::{CueSpec, DisplayRepairer, DocumentParser, ParsingConfigBuilder};

mod output;

use output::ColorMode;

const DEFAULT_OUTPUT: &str = "processed.json";

/// Regulatory requirement mapper - map sections of a regulatory document to business requirements
#[derive(Parser, Debug)]
#[command(name = "reqmap", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, classify and persist the first input document found
    Process {
        /// Candidate input files (PDF, DOCX or TXT), tried in order
        inputs: Vec<PathBuf>,

        /// Path of the JSON artifact to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use Hebrew-run reversal instead of the Unicode bidi algorithm
        #[arg(long)]
        no_bidi: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Dry run: print every section with its scores and verdict, write nothing
    Sections {
        /// Path to the PDF, DOCX or TXT file
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Use Hebrew-run reversal instead of the Unicode bidi algorithm
        #[arg(long)]
        no_bidi: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config_file::load_config();

    match cli.command {
        Command::Process {
            inputs,
            output,
            no_bidi,
            no_color,
        } => process(&config, inputs, output, no_bidi, no_color),
        Command::Sections {
            file_path,
            no_color,
            no_bidi,
        } => sections(&config, &file_path, no_bidi, no_color),
    }
}

fn process(
    config: &ConfigFile,
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    no_bidi: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let candidates = resolve_candidates(config, inputs);
    let output_path = output
        .or_else(|| std::env::var("REQMAP_OUTPUT").ok().map(PathBuf::from))
        .or_else(|| {
            config
                .output
                .as_ref()
                .and_then(|o| o.path.as_ref())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let parser = build_parser(config, use_bidi(config, no_bidi))?;

    let input = reqmap_ingest::locate_input(&candidates)?;
    let doc = reqmap_ingest::parse_path(&input, &parser)
        .with_context(|| format!("failed to process {}", input.display()))?;
    reqmap_reporting::write_report(&output_path, &doc)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    let mut stdout = std::io::stdout();
    output::print_process_summary(&mut stdout, &doc, &output_path, ColorMode(!no_color))?;
    Ok(())
}

fn sections(
    config: &ConfigFile,
    file_path: &Path,
    no_bidi: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let parser = build_parser(config, use_bidi(config, no_bidi))?;
    let text = reqmap_ingest::extract_text(file_path)
        .with_context(|| format!("failed to extract {}", file_path.display()))?;
    let sections = parser.sections(&text);

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());
    let color = ColorMode(!no_color);
    let mut writer = std::io::stdout().lock();

    output::print_dry_run_header(
        &mut writer,
        &file_name,
        sections.len(),
        parser.segmenter().repairer().strategy_name(),
        color,
    )?;

    let mut verdicts = Vec::with_capacity(sections.len());
    for (i, section) in sections.iter().enumerate() {
        let scores = parser.score(section);
        output::print_section(&mut writer, i, section, &scores, color)?;
        verdicts.push(scores.verdict());
    }
    output::print_dry_run_summary(&mut writer, &verdicts, color)?;
    writer.flush()?;
    Ok(())
}

/// Given inputs, else `[input] candidates`, else the built-in defaults.
fn resolve_candidates(config: &ConfigFile, inputs: Vec<PathBuf>) -> Vec<PathBuf> {
    if !inputs.is_empty() {
        return inputs;
    }
    if let Some(candidates) = config.input.as_ref().and_then(|i| i.candidates.as_ref())
        && !candidates.is_empty()
    {
        return candidates.iter().map(PathBuf::from).collect();
    }
    reqmap_ingest::DEFAULT_INPUTS
        .iter()
        .map(PathBuf::from)
        .collect()
}

fn use_bidi(config: &ConfigFile, no_bidi: bool) -> bool {
    if no_bidi || env_flag("REQMAP_NO_BIDI") {
        return false;
    }
    config.display.as_ref().and_then(|d| d.bidi).unwrap_or(true)
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Default patterns plus any `[patterns]` cues from the config file.
fn build_parser(config: &ConfigFile, bidi: bool) -> anyhow::Result<DocumentParser> {
    let mut builder = ParsingConfigBuilder::new();
    if let Some(patterns) = &config.patterns {
        for key in RequirementKey::ALL {
            for cue in patterns.cues_for(key) {
                builder = builder.add_cue(key, CueSpec::Phrase(cue.clone()));
            }
        }
    }
    let parsing_config = builder
        .build()
        .context("invalid regex in [patterns] configuration")?;

    let repairer = if bidi {
        DisplayRepairer::detect()
    } else {
        DisplayRepairer::fallback_only()
    };
    tracing::debug!(strategy = repairer.strategy_name(), "display repair strategy");
    Ok(DocumentParser::with_config(parsing_config, repairer))
}
