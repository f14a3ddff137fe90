//! Progress reporting and report rendering for the CLI

use std::path::Path;

use anyhow::Result;
use descwatch_ai::{AiAssessment, AssessmentSummary};
use descwatch_core::{QualityReport, RuleOutcome};
use descwatch_filters::Classification;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress reporter with a main bar and a stats line
pub struct ProgressReporter {
    _multi: MultiProgress,
    main_bar: ProgressBar,
    stats_bar: ProgressBar,
    mode: ProgressMode,
}

/// Progress tracking mode
enum ProgressMode {
    /// Track progress by bytes read
    Bytes,
    /// Track progress by records handled
    Records,
}

impl ProgressReporter {
    /// Create a reporter tracking bytes read from a dataset
    pub fn new(total_bytes: u64, visible: bool) -> Result<Self> {
        Self::build(
            total_bytes,
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
            ProgressMode::Bytes,
            visible,
        )
    }

    /// Create a reporter tracking records, for the AI pass
    pub fn new_record_based(total_records: u64, visible: bool) -> Result<Self> {
        Self::build(
            total_records,
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {human_pos}/{human_len} ({per_sec}) {msg}",
            ProgressMode::Records,
            visible,
        )
    }

    fn build(len: u64, template: &str, mode: ProgressMode, visible: bool) -> Result<Self> {
        // JSON output keeps the terminal free of bars
        let multi = if visible {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let main_bar = multi.add(ProgressBar::new(len));
        main_bar.set_style(
            ProgressStyle::default_bar()
                .template(template)?
                .progress_chars("█▓▒░-"),
        );

        let stats_bar = multi.add(ProgressBar::new(0));
        stats_bar.set_style(ProgressStyle::default_bar().template("Stats: {msg}")?);

        Ok(Self {
            _multi: multi,
            main_bar,
            stats_bar,
            mode,
        })
    }

    /// Update progress; `position` is bytes or records depending on the mode
    pub fn update(&self, position: u64, total: usize, flagged: usize) {
        match self.mode {
            ProgressMode::Bytes => self.main_bar.set_position(position),
            ProgressMode::Records => self.main_bar.set_position(total as u64),
        }

        self.main_bar.set_message("Processing...");

        let stats_msg = if flagged > 0 {
            format!(
                "{} total | {} flagged ({:.1}%)",
                Self::format_number(total),
                Self::format_number(flagged),
                (flagged as f64 / total as f64) * 100.0
            )
        } else {
            format!("{} total", Self::format_number(total))
        };

        self.stats_bar.set_message(stats_msg);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Complete!");
        self.stats_bar.finish();
    }

    /// Compact number for the live stats line
    fn format_number(n: usize) -> String {
        if n >= 1_000_000 {
            format!("{:.1}M", n as f64 / 1_000_000.0)
        } else if n >= 1_000 {
            format!("{:.1}K", n as f64 / 1_000.0)
        } else {
            n.to_string()
        }
    }
}

/// Print the dashboard-style quality report
pub fn print_quality_report(input: &Path, report: &QualityReport, show_records: usize) {
    println!("\n{}", "═".repeat(60));
    println!("Description Quality Report");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());
    println!("Total records:      {}", format_with_commas(report.total_records));

    for classification in Classification::ALL {
        println!(
            "  {:<17} {} ({:.1}%)",
            format!("{}:", classification),
            format_with_commas(report.count(classification)),
            report.percentage(classification)
        );
    }

    println!("Valid ratio:        {:.1}%", report.valid_ratio);
    println!("Quality score:      {:.1}", report.aggregate_score);
    println!(
        "Alert state:        {} (threshold {:.1})",
        report.alert_state, report.threshold
    );
    println!(
        "Rules passed:       {}/{} ({:.1})",
        report.rules.passed_rules, report.rules.total_rules, report.rules.overall_score
    );
    for outcome in &report.rules.outcomes {
        println!("  {}", rule_line(outcome));
    }

    if show_records > 0 && !report.records.is_empty() {
        println!("{}", "─".repeat(60));
        println!("Most recent records:");
        for record in report.recent(show_records) {
            println!(
                "  #{:<8} {:<6} {:>5.1}  {}",
                record.id,
                record.classification.label(),
                record.score,
                truncate(&record.title, 36)
            );
        }
    }

    println!("{}", "═".repeat(60));
}

/// Print the AI assessment roll-up and every flagged record
pub fn print_assessment_report(input: &Path, summary: &AssessmentSummary, titles: &dyn Fn(i64) -> String) {
    println!("\n{}", "═".repeat(60));
    println!("AI Summary Assessment");
    println!("{}", "═".repeat(60));
    println!("Input:              {}", input.display());
    println!("Assessed:           {}", format_with_commas(summary.total));
    println!("OK:                 {}", format_with_commas(summary.ok));
    println!("Warnings:           {}", format_with_commas(summary.warnings));
    println!("Errors:             {}", format_with_commas(summary.errors));

    if !summary.flagged.is_empty() {
        println!("{}", "─".repeat(60));
        for assessment in &summary.flagged {
            println!("{}", flagged_line(assessment, &titles(assessment.record_id)));
        }
    }

    println!("{}", "═".repeat(60));
}

fn rule_line(outcome: &RuleOutcome) -> String {
    let status = if outcome.passed { "PASS" } else { "FAIL" };
    format!("[{}] {}", status, outcome.message())
}

fn flagged_line(assessment: &AiAssessment, title: &str) -> String {
    format!(
        "  [{}] #{} {}: {}",
        assessment.verdict,
        assessment.record_id,
        truncate(title, 30),
        assessment.reason
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Format number with thousand separators
fn format_with_commas(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
