mod display;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;
use serplens_core::analyzer;
use serplens_core::input;
use serplens_core::{AnalysisReport, EngineConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "serplens",
    version,
    about = "Serplens — Organic Search Visibility Analyzer",
    long_about = "Turn raw keyword rankings into share of search, share of voice, and a prioritized SEO action plan.\n\nPoint it at a keyword snapshot export and it tells you where the growth is hiding."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze keyword snapshots for visibility metrics and opportunities
    Analyze {
        /// Path to a snapshot JSON file or directory containing snapshots
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format (text, json, markdown)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Path to a serplens.toml with threshold overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show at most N entries per opportunity list (text output only)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Show only the prioritized action plan
    Actions {
        /// Path to a snapshot JSON file or directory containing snapshots
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum number of actions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Path to a serplens.toml with threshold overrides
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a commented serplens.toml with the default thresholds
    Init {
        /// Destination path for the config file
        #[arg(short, long, default_value = "serplens.toml")]
        output: PathBuf,

        /// Overwrite the destination if it already exists
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            format,
            config,
            top,
        } => cmd_analyze(&path, &format, config.as_deref(), top),
        Commands::Actions {
            path,
            limit,
            format,
            config,
        } => cmd_actions(&path, limit, &format, config.as_deref()),
        Commands::Init { output, force } => cmd_init(&output, force),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "serplens", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Envelope for JSON exports so downstream consumers get provenance along
/// with the report.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportEnvelope<'a> {
    generated_at: String,
    source: String,
    report: &'a AnalysisReport,
}

fn discover_snapshot_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let pattern = format!("{}/**/*.json", path.display());
        let mut files: Vec<PathBuf> = glob::glob(&pattern)
            .context("Failed to read glob pattern")?
            .filter_map(|r| r.ok())
            .collect();
        files.sort();
        return Ok(files);
    }

    anyhow::bail!("Path '{}' does not exist", path.display());
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn cmd_analyze(path: &Path, format: &str, config: Option<&Path>, top: Option<usize>) -> Result<()> {
    let files = discover_snapshot_files(path)?;

    if files.is_empty() {
        anyhow::bail!(
            "No snapshot files found at '{}'. \
            Make sure the path points to a keyword snapshot JSON export or a directory.",
            path.display()
        );
    }

    let config = load_config(config)?;

    for file in &files {
        let input = input::load_file(file)
            .with_context(|| format!("Failed to load {}", file.display()))?;

        let report = analyzer::analyze(&input, &config)
            .with_context(|| format!("Failed to analyze {}", file.display()))?;

        let source = file.display().to_string();
        match format {
            "json" => {
                let envelope = ReportEnvelope {
                    generated_at: Utc::now().to_rfc3339(),
                    source,
                    report: &report,
                };
                let json = serde_json::to_string_pretty(&envelope)?;
                println!("{}", json);
            }
            "markdown" => {
                print!("{}", display::format_markdown_report(&report, &source));
            }
            _ => {
                display::print_analysis_report(&report, &source, top);
            }
        }
    }

    Ok(())
}

fn cmd_actions(path: &Path, limit: usize, format: &str, config: Option<&Path>) -> Result<()> {
    let files = discover_snapshot_files(path)?;

    if files.is_empty() {
        anyhow::bail!("No snapshot files found at '{}'", path.display());
    }

    let config = load_config(config)?;

    for file in &files {
        let input = input::load_file(file)
            .with_context(|| format!("Failed to load {}", file.display()))?;

        let report = analyzer::analyze(&input, &config)
            .with_context(|| format!("Failed to analyze {}", file.display()))?;

        match format {
            "json" => {
                let actions: Vec<_> = report.actions.iter().take(limit).collect();
                let json = serde_json::to_string_pretty(&actions)?;
                println!("{}", json);
            }
            _ => {
                display::print_actions(&report, &file.display().to_string(), limit);
            }
        }
    }

    Ok(())
}

fn cmd_init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Pass --force to overwrite it.",
            output.display()
        );
    }

    std::fs::write(output, serplens_core::config::generate_default_config())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Default config written to {}", output.display());
    Ok(())
}
