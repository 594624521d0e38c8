pub mod chart;
pub mod mood;
pub mod sentiment;
pub mod themes;

use crate::analyzer::sentiment::LexiconScorer;
use crate::analyzer::themes::WordFrequencyExtractor;
use crate::config::Config;
use crate::journal;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

// `artifact` is set only when the image was actually written.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub markdown: String,
    pub artifact: Option<PathBuf>,
}

impl Report {
    pub fn text(markdown: &str) -> Self {
        Self {
            markdown: markdown.to_string(),
            artifact: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub entry_count: usize,
    pub mood: Report,
    pub themes: Report,
}

impl AnalysisReport {
    pub fn artifacts(&self) -> Vec<&Path> {
        [&self.mood.artifact, &self.themes.artifact]
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
            .collect()
    }
}

pub fn analyze_journal(config: &Config) -> Result<Option<AnalysisReport>> {
    let entries = journal::load_entries(&config.journal_dir, config.entry_policy())
        .with_context(|| {
            format!(
                "Failed to load journal entries from {}",
                config.journal_dir.display()
            )
        })?;

    if entries.is_empty() {
        return Ok(None);
    }

    let artifact_dir = config.render_charts.then_some(config.journal_dir.as_path());
    let scorer = LexiconScorer::new()?;
    let extractor = WordFrequencyExtractor::new(config.filter_stopwords, config.max_cloud_words)?;

    let mood = mood::mood_report(&entries, &scorer, artifact_dir)
        .context("Failed to build mood report")?;
    let themes = themes::theme_report(&entries, &extractor, artifact_dir);

    info!(entries = entries.len(), "journal analysis completed");

    Ok(Some(AnalysisReport {
        entry_count: entries.len(),
        mood,
        themes,
    }))
}
