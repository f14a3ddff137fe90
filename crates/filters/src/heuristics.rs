//! Low-information detection for AI-generated summaries
//!
//! A summary returned by a text-generation service is judged by a short,
//! ordered list of string predicates. The first predicate that matches
//! decides the verdict:
//!
//! 1. empty after trimming -> `Warning`
//! 2. fewer than `min_words` words -> `Warning`
//! 3. contains a configured generic phrase (case-insensitive) -> `Warning`
//! 4. otherwise -> `Ok`
//!
//! `Error` is never produced here; it belongs to the caller (no input text,
//! or the service call failed).

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason attached when there is no description to send
pub const NO_DATA_REASON: &str = "no data to analyze";

/// Outcome of an AI quality assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Ok,
    Warning,
    Error,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Ok => f.write_str("OK"),
            Verdict::Warning => f.write_str("WARNING"),
            Verdict::Error => f.write_str("ERROR"),
        }
    }
}

/// Configuration for summary inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Summaries with fewer words than this are suspicious
    pub min_words: usize,
    /// Phrases typical of refusals or filler output
    pub generic_phrases: Vec<String>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            min_words: 5,
            generic_phrases: [
                "i'm sorry",
                "i don't know",
                "this is a summary",
                "summary not available",
                "no content provided",
                "insufficient information",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        }
    }
}

/// Verdict plus a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub verdict: Verdict,
    pub reason: String,
}

impl Inspection {
    fn warning(reason: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Warning,
            reason: reason.into(),
        }
    }
}

/// Compiled summary heuristics
#[derive(Debug, Clone)]
pub struct SummaryHeuristics {
    config: HeuristicsConfig,
    phrase_regex: Option<Regex>,
}

impl SummaryHeuristics {
    /// Compile the phrase set into a single case-insensitive matcher
    pub fn new(config: HeuristicsConfig) -> Result<Self> {
        let alternatives: Vec<String> = config
            .generic_phrases
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| regex::escape(&normalize_quotes(p)))
            .collect();

        let phrase_regex = if alternatives.is_empty() {
            None
        } else {
            let pattern = format!("(?i)(?:{})", alternatives.join("|"));
            Some(Regex::new(&pattern).map_err(|e| {
                Error::InvalidConfig(format!("invalid generic phrase set: {}", e))
            })?)
        };

        Ok(Self {
            config,
            phrase_regex,
        })
    }

    pub fn config(&self) -> &HeuristicsConfig {
        &self.config
    }

    /// Output is empty or whitespace only
    pub fn is_empty(summary: &str) -> bool {
        summary.trim().is_empty()
    }

    /// Output has fewer than `min_words` whitespace-separated words
    pub fn is_too_short(&self, summary: &str) -> bool {
        summary.split_whitespace().count() < self.config.min_words
    }

    /// First configured generic phrase found in the output, lower-cased
    pub fn matched_phrase(&self, summary: &str) -> Option<String> {
        let regex = self.phrase_regex.as_ref()?;
        let normalized = normalize_quotes(summary);
        regex
            .find(&normalized)
            .map(|m| m.as_str().to_lowercase())
    }

    /// Judge a summary returned by the service
    pub fn inspect(&self, summary: &str) -> Inspection {
        if Self::is_empty(summary) {
            return Inspection::warning("empty summary");
        }

        if self.is_too_short(summary) {
            return Inspection::warning(format!(
                "suspiciously short summary ({} words, minimum {})",
                summary.split_whitespace().count(),
                self.config.min_words
            ));
        }

        if let Some(phrase) = self.matched_phrase(summary) {
            return Inspection::warning(format!(
                "generic or hallucinated summary (matched '{}')",
                phrase
            ));
        }

        Inspection {
            verdict: Verdict::Ok,
            reason: "summary looks informative".to_string(),
        }
    }
}

// Models often emit typographic apostrophes
fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\u{2018}' || c == '\u{2019}' { '\'' } else { c })
        .collect()
}
