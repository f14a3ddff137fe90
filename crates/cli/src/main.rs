//! descwatch CLI
//!
//! Monitors description quality in exported datasets and flags weak
//! AI-generated summaries

mod config;
mod progress;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use descwatch_ai::{AssessmentSummary, Assessor, OpenAiConfig, OpenAiSummarizer};
use descwatch_core::{
    average_overall_score, AlertMonitor, QualityEngine, RuleSetReport, TracingSink,
};
use descwatch_filters::{AlertState, LengthThresholds, Verdict};
use descwatch_formats::{collect_records_with, open_dataset, Record};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::MonitorConfig;
use progress::ProgressReporter;

/// Exit code when the data is unhealthy (degraded score or flagged summaries)
const EXIT_ALERT: i32 = 2;

#[derive(Parser)]
#[command(name = "descwatch")]
#[command(version, about = "Description quality monitoring for exported datasets", long_about = None)]
#[command(author = "descwatch")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify and score descriptions, then check the alert threshold
    Score(ScoreArgs),

    /// Summarize descriptions with an LLM and flag low-information summaries
    Assess(AssessArgs),

    /// Inspect a dataset file
    Inspect {
        /// Path to the dataset file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Number of records to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Count records in a dataset
    Count {
        /// Path to the dataset file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Write a starter config file (YAML or TOML by extension)
    InitConfig {
        /// Where to write the config
        #[arg(value_name = "FILE")]
        output: PathBuf,

        /// Which preset to write
        #[arg(long, value_enum, default_value = "default")]
        preset: Preset,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct ScoreArgs {
    /// Dataset files (CSV or JSONL); several are scored as successive snapshots
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Config file (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the alert threshold
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Number of most recent records to list
    #[arg(long, default_value = "10")]
    show_records: usize,

    /// Drop rows that fail validation instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Worker threads for scoring (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args)]
struct AssessArgs {
    /// Dataset file (CSV or JSONL)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Config file (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Assess only the first N records
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Chat model to request summaries from
    #[arg(long)]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible service
    #[arg(long)]
    base_url: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Calls in flight at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Drop rows that fail validation instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Organization id sent with each request
    #[arg(long, env = "OPENAI_ORGANIZATION")]
    organization: Option<String>,

    /// Project id sent with each request
    #[arg(long, env = "OPENAI_PROJECT")]
    project: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Default,
    Strict,
    Lenient,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for reports
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.json) // Disable colors if JSON output
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let healthy = match cli.command {
        Commands::Score(args) => score_datasets(args, cli.json).await? == AlertState::Ok,
        Commands::Assess(args) => assess_dataset(args, cli.json).await?,
        Commands::Inspect { input, limit } => {
            inspect_dataset(input, limit).await?;
            true
        }
        Commands::Count { input } => {
            count_dataset(input).await?;
            true
        }
        Commands::InitConfig {
            output,
            preset,
            force,
        } => {
            init_config(&output, preset, force)?;
            true
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
            true
        }
    };

    if !healthy {
        std::process::exit(EXIT_ALERT);
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MonitorConfig> {
    match path {
        Some(path) => {
            let config = MonitorConfig::load(path)?;
            info!("Loaded config from {:?}", path);
            Ok(config)
        }
        None => Ok(MonitorConfig::default()),
    }
}

/// Read a whole dataset, showing byte progress and a running count of
/// records that would land in NULL or SHORT
fn read_records(
    input: &Path,
    thresholds: &LengthThresholds,
    skip_invalid: bool,
    show_progress: bool,
) -> Result<Vec<Record>> {
    let mut reader =
        open_dataset(input).with_context(|| format!("Failed to open dataset: {}", input.display()))?;

    let progress = match reader.total_bytes() {
        Some(total) => Some(ProgressReporter::new(total, show_progress)?),
        None => None,
    };

    let mut seen = 0usize;
    let mut flagged = 0usize;

    let records = collect_records_with(reader.as_mut(), skip_invalid, |record, bytes| {
        seen += 1;
        if !thresholds.classify(record.description()).is_valid() {
            flagged += 1;
        }
        if seen % 1000 == 0 {
            if let Some(ref progress) = progress {
                progress.update(bytes, seen, flagged);
            }
        }
    })
    .with_context(|| format!("Failed to read {}", input.display()))?;

    if let Some(progress) = progress {
        progress.update(reader.bytes_processed(), records.len(), flagged);
        progress.finish();
    }

    Ok(records)
}

async fn score_datasets(args: ScoreArgs, json_output: bool) -> Result<AlertState> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(threshold) = args.threshold {
        config.alert.threshold = threshold;
    }

    let engine = QualityEngine::new(config.engine_config(args.threads))
        .context("Invalid quality configuration")?;

    info!("Scoring {} dataset(s)", args.inputs.len());
    info!("  Thresholds: short < {}, long > {}", config.thresholds.short_below, config.thresholds.long_above);
    info!("  Alert threshold: {}", config.alert.threshold);

    let mut monitor = AlertMonitor::new(TracingSink);
    let mut outputs = Vec::new();
    let mut rule_reports: Vec<RuleSetReport> = Vec::new();

    for input in &args.inputs {
        let records = read_records(input, &config.thresholds, args.skip_invalid, !json_output)?;
        let report = engine.evaluate(&records);
        let transition = monitor.observe(&report);

        for failure in report.rules.failures() {
            warn!("{:?}: rule failed ({:?}): {}", input, failure.severity, failure.message());
        }
        rule_reports.push(report.rules.clone());

        if json_output {
            outputs.push(serde_json::json!({
                "input": input.to_string_lossy(),
                "report": report,
                "transition": transition,
            }));
        } else {
            progress::print_quality_report(input, &report, args.show_records);
        }
    }

    if rule_reports.len() > 1 {
        info!(
            "Average rule score across {} datasets: {:.1}",
            rule_reports.len(),
            average_overall_score(&rule_reports)
        );
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    }

    Ok(monitor.state().unwrap_or(AlertState::Ok))
}

/// Returns whether every record came back `OK`
async fn assess_dataset(args: AssessArgs, json_output: bool) -> Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let mut ai = config.ai.clone().unwrap_or_default();

    if let Some(model) = args.model {
        ai.model = model;
    }
    if let Some(base_url) = args.base_url {
        ai.base_url = base_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        ai.timeout_secs = timeout_secs;
    }
    if let Some(concurrency) = args.concurrency {
        ai.concurrency = concurrency;
    }

    let api_key = args
        .api_key
        .context("No API key configured: set OPENAI_API_KEY or pass --api-key")?;

    let mut client_config = OpenAiConfig::new(api_key);
    client_config.base_url = ai.base_url.clone();
    client_config.model = ai.model.clone();
    client_config.organization = args.organization;
    client_config.project = args.project;

    let summarizer =
        OpenAiSummarizer::new(client_config).context("Failed to create summarization client")?;
    let assessor = Assessor::new(summarizer, ai.assessor_config())
        .context("Invalid summary heuristics")?;

    let mut records = read_records(&args.input, &config.thresholds, args.skip_invalid, !json_output)?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    info!("Assessing AI summaries");
    info!("  Input: {:?}", args.input);
    info!("  Model: {} via {}", ai.model, ai.base_url);
    info!("  Records: {} (concurrency {})", records.len(), ai.concurrency);

    let progress = ProgressReporter::new_record_based(records.len() as u64, !json_output)?;
    let mut assessments = Vec::with_capacity(records.len());
    let mut flagged = 0usize;

    for chunk in records.chunks(ai.concurrency.max(1) * 4) {
        let batch = assessor.assess_batch(chunk).await;
        flagged += batch.iter().filter(|a| a.verdict != Verdict::Ok).count();
        assessments.extend(batch);
        progress.update(0, assessments.len(), flagged);
    }
    progress.finish();

    let titles: HashMap<i64, &str> = records.iter().map(|r| (r.id, r.title.as_str())).collect();
    let title_of = |id: i64| titles.get(&id).copied().unwrap_or_default().to_string();

    let summary = AssessmentSummary::from_assessments(&assessments);
    for assessment in &summary.flagged {
        warn!(
            "AI alert (record {} - {}): {}",
            assessment.record_id,
            title_of(assessment.record_id),
            assessment.reason
        );
    }

    if json_output {
        let report = serde_json::json!({
            "input": args.input.to_string_lossy(),
            "model": ai.model,
            "summary": summary,
            "assessments": assessments,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        progress::print_assessment_report(&args.input, &summary, &title_of);
    }

    Ok(summary.is_clean())
}

async fn inspect_dataset(input: PathBuf, limit: usize) -> Result<()> {
    info!("Inspecting dataset: {:?}", input);

    let thresholds = LengthThresholds::default();
    let mut reader = open_dataset(&input)?;
    let mut count = 0;

    while let Some(result) = reader.next() {
        let record = result?;
        println!(
            "Record #{} [{}]: {}",
            record.id,
            thresholds.classify(record.description()),
            serde_json::to_string_pretty(&record)?
        );

        count += 1;
        if count >= limit {
            break;
        }
    }

    info!(
        "Processed {} records ({} bytes)",
        reader.records_processed(),
        reader.bytes_processed()
    );

    Ok(())
}

async fn count_dataset(input: PathBuf) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    info!("Counting records in: {:?}", input);

    let mut reader = open_dataset(&input)?;

    let pb = if let Some(total) = reader.total_bytes() {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut count = 0;
    while let Some(result) = reader.next() {
        let _record = result?;
        count += 1;

        if let Some(ref pb) = pb {
            pb.set_position(reader.bytes_processed());
        }

        if count % 10000 == 0 {
            info!("Processed {} records...", count);
        }
    }

    if let Some(pb) = pb {
        pb.finish();
    }

    println!("Total records: {}", count);
    info!("Processed {} bytes", reader.bytes_processed());

    Ok(())
}

fn init_config(output: &Path, preset: Preset, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            output.display()
        );
    }

    let config = match preset {
        Preset::Default => MonitorConfig {
            ai: Some(Default::default()),
            ..Default::default()
        },
        Preset::Strict => MonitorConfig::strict(),
        Preset::Lenient => MonitorConfig::lenient(),
    };

    config.save(output)?;
    info!("Wrote config to {:?}", output);
    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
