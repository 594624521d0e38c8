use crate::analyzer::sentiment::SentimentScorer;
use crate::analyzer::{Report, chart};
use crate::journal::{JournalEntry, JournalError};
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::warn;

pub const NO_ENTRIES_MESSAGE: &str = "No entries to analyze yet.";
const RECENT_WINDOW: usize = 3;
const TREND_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct MoodSample {
    pub timestamp: NaiveDateTime,
    pub polarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodDirection {
    Positive,
    Negative,
}

impl MoodDirection {
    // zero counts as negative
    pub fn from_average(average: f64) -> Self {
        if average > 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecentPattern {
    NotEnoughEntries,
    Improving,
    Declining,
    Stable,
}

impl RecentPattern {
    pub fn message(self) -> &'static str {
        match self {
            Self::NotEnoughEntries => "Not enough entries for pattern analysis.",
            Self::Improving => "Your mood has been improving over your last few entries.",
            Self::Declining => "Your mood has been declining over your last few entries.",
            Self::Stable => "Your mood has been relatively stable over your last few entries.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    Gratitude,
    ReflectOnPositives,
    Balance,
    Reinforcement,
}

impl Suggestion {
    pub fn for_average(average: f64) -> Self {
        if average < -0.2 {
            Self::Gratitude
        } else if average < 0.0 {
            Self::ReflectOnPositives
        } else if average < 0.2 {
            Self::Balance
        } else {
            Self::Reinforcement
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Gratitude => "Try writing down a few things you are grateful for in your next entries.",
            Self::ReflectOnPositives => {
                "Take a moment to reflect on positive moments, however small they seem."
            }
            Self::Balance => {
                "You seem to be keeping a steady balance. Exploring a new perspective could add depth."
            }
            Self::Reinforcement => {
                "Your outlook is bright. Note down what is working well so you can return to it."
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoodSummary {
    pub samples: Vec<MoodSample>,
    pub average: f64,
    pub overall: MoodDirection,
    pub recent: RecentPattern,
    pub suggestion: Suggestion,
}

pub fn score_entries(
    entries: &[JournalEntry],
    scorer: &dyn SentimentScorer,
) -> Result<Vec<MoodSample>, JournalError> {
    entries
        .iter()
        .map(|entry| {
            let polarity = scorer.polarity(&entry.content)?;
            if !polarity.is_finite() || !(-1.0..=1.0).contains(&polarity) {
                return Err(JournalError::Analysis {
                    subject: entry.file_name.clone(),
                    reason: format!("polarity {polarity} is outside [-1, 1]"),
                });
            }

            Ok(MoodSample {
                timestamp: entry.timestamp,
                polarity,
            })
        })
        .collect()
}

pub fn summarize(samples: Vec<MoodSample>) -> Option<MoodSummary> {
    if samples.is_empty() {
        return None;
    }

    let polarities = samples
        .iter()
        .map(|sample| sample.polarity)
        .collect::<Vec<_>>();
    let average = polarities.iter().sum::<f64>() / polarities.len() as f64;

    Some(MoodSummary {
        overall: MoodDirection::from_average(average),
        recent: recent_pattern(&polarities),
        suggestion: Suggestion::for_average(average),
        average,
        samples,
    })
}

pub fn recent_pattern(polarities: &[f64]) -> RecentPattern {
    if polarities.len() < RECENT_WINDOW {
        return RecentPattern::NotEnoughEntries;
    }

    let recent = &polarities[polarities.len() - RECENT_WINDOW..];
    let diffs = recent
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect::<Vec<_>>();
    let mean_diff = diffs.iter().sum::<f64>() / diffs.len() as f64;

    if mean_diff > TREND_THRESHOLD {
        RecentPattern::Improving
    } else if mean_diff < -TREND_THRESHOLD {
        RecentPattern::Declining
    } else {
        RecentPattern::Stable
    }
}

pub fn render_markdown(summary: &MoodSummary) -> String {
    format!(
        "# Mood Analysis\n\n## Overall Trend\nAcross {} entries your average mood has been {} ({:.2}).\n\n## Recent Pattern\n{}\n\n## Suggestion\n{}\n",
        summary.samples.len(),
        summary.overall.label(),
        summary.average,
        summary.recent.message(),
        summary.suggestion.message()
    )
}

pub fn mood_report(
    entries: &[JournalEntry],
    scorer: &dyn SentimentScorer,
    artifact_dir: Option<&Path>,
) -> Result<Report, JournalError> {
    let Some(summary) = summarize(score_entries(entries, scorer)?) else {
        return Ok(Report::text(NO_ENTRIES_MESSAGE));
    };

    let artifact = artifact_dir.and_then(|dir| {
        chart::write_mood_trend(dir, &summary.samples)
            .inspect_err(|error| warn!(error = %error, "failed to write mood trend chart"))
            .ok()
    });

    Ok(Report {
        markdown: render_markdown(&summary),
        artifact,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        MoodDirection, NO_ENTRIES_MESSAGE, RecentPattern, Suggestion, mood_report, recent_pattern,
        score_entries, summarize,
    };
    use crate::analyzer::chart::MOOD_CHART_FILE;
    use crate::analyzer::sentiment::SentimentScorer;
    use crate::journal::{JournalEntry, JournalError};
    use chrono::{Duration, NaiveDate};

    // polarity is the entry text itself
    struct FixedScorer;

    impl SentimentScorer for FixedScorer {
        fn polarity(&self, text: &str) -> Result<f64, JournalError> {
            text.trim().parse::<f64>().map_err(|error| JournalError::Analysis {
                subject: text.to_string(),
                reason: error.to_string(),
            })
        }
    }

    fn entries(polarities: &[f64]) -> Vec<JournalEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .expect("start");

        polarities
            .iter()
            .enumerate()
            .map(|(index, polarity)| JournalEntry {
                timestamp: start + Duration::days(index as i64),
                content: polarity.to_string(),
                file_name: format!("entry_{index}.md"),
            })
            .collect()
    }

    fn summary_for(polarities: &[f64]) -> super::MoodSummary {
        let samples = score_entries(&entries(polarities), &FixedScorer).expect("scores");
        summarize(samples).expect("summary")
    }

    #[test]
    fn average_is_arithmetic_mean_with_one_sample_per_entry() {
        let summary = summary_for(&[0.5, -0.25, 0.35]);

        assert_eq!(summary.samples.len(), 3);
        assert!((summary.average - 0.2).abs() < 1e-9);
        assert_eq!(summary.overall, MoodDirection::Positive);
    }

    #[test]
    fn zero_average_is_negative() {
        let summary = summary_for(&[0.4, -0.4]);

        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.overall, MoodDirection::Negative);
        assert_eq!(summary.suggestion, Suggestion::Balance);
    }

    #[test]
    fn recent_pattern_classification() {
        assert_eq!(recent_pattern(&[0.1, 0.3, 0.6]), RecentPattern::Improving);
        assert_eq!(recent_pattern(&[0.5, 0.2, -0.1]), RecentPattern::Declining);
        assert_eq!(recent_pattern(&[0.2, 0.25, 0.18]), RecentPattern::Stable);
        assert_eq!(recent_pattern(&[0.1, 0.9]), RecentPattern::NotEnoughEntries);
    }

    #[test]
    fn recent_pattern_uses_only_last_three_samples() {
        assert_eq!(
            recent_pattern(&[-1.0, 1.0, 0.2, 0.25, 0.18]),
            RecentPattern::Stable
        );
    }

    #[test]
    fn suggestion_buckets_partition_the_line() {
        assert_eq!(Suggestion::for_average(-0.9), Suggestion::Gratitude);
        assert_eq!(Suggestion::for_average(-0.2), Suggestion::ReflectOnPositives);
        assert_eq!(Suggestion::for_average(-0.01), Suggestion::ReflectOnPositives);
        assert_eq!(Suggestion::for_average(0.0), Suggestion::Balance);
        assert_eq!(Suggestion::for_average(0.19), Suggestion::Balance);
        assert_eq!(Suggestion::for_average(0.2), Suggestion::Reinforcement);
        assert_eq!(Suggestion::for_average(1.0), Suggestion::Reinforcement);
    }

    #[test]
    fn empty_entries_give_fixed_message_and_no_chart() {
        let dir = tempfile::tempdir().expect("tempdir");

        let report = mood_report(&[], &FixedScorer, Some(dir.path())).expect("report");

        assert_eq!(report.markdown, NO_ENTRIES_MESSAGE);
        assert_eq!(report.artifact, None);
        assert!(!dir.path().join(MOOD_CHART_FILE).exists());
    }

    #[test]
    fn report_mentions_trend_and_writes_chart() {
        let dir = tempfile::tempdir().expect("tempdir");

        let report =
            mood_report(&entries(&[0.1, 0.3, 0.6]), &FixedScorer, Some(dir.path())).expect("report");

        assert!(report.markdown.contains("positive (0.33)"));
        assert!(report.markdown.contains("improving"));
        assert!(report.markdown.contains(Suggestion::Reinforcement.message()));
        assert_eq!(report.artifact, Some(dir.path().join(MOOD_CHART_FILE)));
        assert!(dir.path().join(MOOD_CHART_FILE).exists());
    }

    #[test]
    fn failed_chart_write_reports_no_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("not-created");

        let report =
            mood_report(&entries(&[0.1, 0.3, 0.6]), &FixedScorer, Some(&missing)).expect("report");

        assert!(report.markdown.contains("improving"));
        assert_eq!(report.artifact, None);
    }

    #[test]
    fn out_of_range_polarity_is_an_analysis_error() {
        let result = score_entries(&entries(&[0.2, 1.5]), &FixedScorer);

        assert!(matches!(
            result,
            Err(JournalError::Analysis { subject, .. }) if subject == "entry_1.md"
        ));
    }
}
