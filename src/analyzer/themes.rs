use crate::analyzer::{Report, chart};
use crate::journal::{JournalEntry, JournalError};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::warn;

pub const TOP_THEMES: usize = 5;
pub const NO_THEMES_MESSAGE: &str = "No recurring themes found yet.";

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeFrequency {
    pub term: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ThemeSummary {
    pub frequencies: Vec<ThemeFrequency>,
    pub top: Vec<ThemeFrequency>,
}

#[derive(Debug, Clone)]
pub struct WordFrequencyExtractor {
    token_pattern: Regex,
    stopwords: HashSet<&'static str>,
    filter_stopwords: bool,
    max_words: usize,
}

impl WordFrequencyExtractor {
    pub fn new(filter_stopwords: bool, max_words: usize) -> Result<Self, JournalError> {
        let token_pattern = Regex::new(r"\w[\w']+").map_err(|error| JournalError::Analysis {
            subject: "theme tokenizer".to_string(),
            reason: error.to_string(),
        })?;

        Ok(Self {
            token_pattern,
            stopwords: STOPWORDS.iter().copied().collect(),
            filter_stopwords,
            max_words: max_words.max(1),
        })
    }

    // most frequent term scores 1.0
    pub fn extract(&self, text: &str) -> Vec<ThemeFrequency> {
        // lowercase key -> spelling -> count
        let mut variants: HashMap<String, BTreeMap<String, usize>> = HashMap::new();

        for token in self.token_pattern.find_iter(text) {
            let raw = token.as_str();
            let word = raw
                .strip_suffix("'s")
                .or_else(|| raw.strip_suffix("'S"))
                .unwrap_or(raw)
                .trim_end_matches('\'');
            if word.chars().count() < 2 || word.chars().all(|ch| ch.is_numeric()) {
                continue;
            }

            let key = word.to_lowercase();
            if self.filter_stopwords && self.stopwords.contains(key.as_str()) {
                continue;
            }

            *variants
                .entry(key)
                .or_default()
                .entry(word.to_string())
                .or_insert(0) += 1;
        }

        let mut counts = variants
            .into_iter()
            .filter_map(|(key, spellings)| {
                let total = spellings.values().sum::<usize>();
                // BTreeMap order keeps the lexically smallest spelling on ties.
                let display = spellings
                    .iter()
                    .fold(None::<(&String, usize)>, |best, (spelling, count)| match best {
                        Some((_, best_count)) if best_count >= *count => best,
                        _ => Some((spelling, *count)),
                    })
                    .map(|(spelling, _)| spelling.clone())?;
                Some((key, (display, total)))
            })
            .collect::<HashMap<_, _>>();

        let plural_keys = counts
            .keys()
            .filter(|key| key.ends_with('s') && !key.ends_with("ss"))
            .filter(|key| counts.contains_key(&key[..key.len() - 1]))
            .cloned()
            .collect::<Vec<_>>();
        for plural in plural_keys {
            let Some((_, plural_total)) = counts.remove(&plural) else {
                continue;
            };
            if let Some((_, total)) = counts.get_mut(&plural[..plural.len() - 1]) {
                *total += plural_total;
            }
        }

        let counts = counts.into_values().collect::<Vec<_>>();

        let Some(max_count) = counts.iter().map(|(_, count)| *count).max() else {
            return Vec::new();
        };

        let mut ranked = counts
            .into_iter()
            .map(|(term, count)| ThemeFrequency {
                term,
                score: count as f64 / max_count as f64,
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|left, right| {
            right
                .score
                .total_cmp(&left.score)
                .then_with(|| left.term.cmp(&right.term))
        });
        ranked.truncate(self.max_words);
        ranked
    }
}

pub fn summarize(entries: &[JournalEntry], extractor: &WordFrequencyExtractor) -> ThemeSummary {
    let corpus = entries
        .iter()
        .map(|entry| entry.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let frequencies = extractor.extract(&corpus);
    let top = frequencies.iter().take(TOP_THEMES).cloned().collect();

    ThemeSummary { frequencies, top }
}

pub fn render_markdown(summary: &ThemeSummary) -> String {
    if summary.top.is_empty() {
        return format!("# Word Analysis\n\n## Common Themes\n{NO_THEMES_MESSAGE}\n");
    }

    let bullets = summary
        .top
        .iter()
        .map(|theme| format!("- **{}** - appears often in your entries", theme.term))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# Word Analysis\n\n## Common Themes\n{bullets}\n\n## Reflection\nThese themes may point to what has been occupying your mind.\nConsider picking one of them as a starting point for your next entry.\n"
    )
}

pub fn theme_report(
    entries: &[JournalEntry],
    extractor: &WordFrequencyExtractor,
    artifact_dir: Option<&Path>,
) -> Report {
    let summary = summarize(entries, extractor);

    // no cloud for an empty corpus
    let artifact = artifact_dir
        .filter(|_| !summary.frequencies.is_empty())
        .and_then(|dir| {
            chart::write_word_cloud(dir, &summary.frequencies)
                .inspect_err(|error| warn!(error = %error, "failed to write word cloud"))
                .ok()
        });

    Report {
        markdown: render_markdown(&summary),
        artifact,
    }
}

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm", "i've",
    "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k", "let's", "like",
    "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out",
    "over", "own", "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should",
    "shouldn't", "since", "so", "some", "such", "than", "that", "that's", "the", "their",
    "theirs", "them", "themselves", "then", "there", "there's", "therefore", "these", "they",
    "they'd", "they'll", "they're", "they've", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
    "weren't", "what", "what's", "when", "when's", "where", "where's", "which", "while", "who",
    "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "www", "you", "you'd",
    "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

#[cfg(test)]
mod tests {
    use super::{NO_THEMES_MESSAGE, WordFrequencyExtractor, theme_report};
    use crate::analyzer::chart::WORD_CLOUD_FILE;
    use crate::journal::JournalEntry;
    use chrono::NaiveDate;

    fn entry(content: &str) -> JournalEntry {
        JournalEntry {
            timestamp: NaiveDate::from_ymd_opt(2024, 2, 2)
                .and_then(|date| date.and_hms_opt(10, 0, 0))
                .expect("timestamp"),
            content: content.to_string(),
            file_name: "entry_20240202_100000.md".to_string(),
        }
    }

    fn extractor(filter_stopwords: bool) -> WordFrequencyExtractor {
        WordFrequencyExtractor::new(filter_stopwords, 200).expect("extractor")
    }

    #[test]
    fn more_frequent_term_ranks_first() {
        let ranked = extractor(false).extract("cat cat dog");

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].term, "cat");
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].term, "dog");
        assert_eq!(ranked[1].score, 0.5);
    }

    #[test]
    fn ties_break_lexically() {
        let ranked = extractor(false).extract("pear apple mango");
        let terms = ranked.iter().map(|theme| theme.term.as_str()).collect::<Vec<_>>();

        assert_eq!(terms, ["apple", "mango", "pear"]);
    }

    #[test]
    fn stopwords_numbers_and_possessives_are_handled() {
        let ranked = extractor(true).extract("The garden's roses and the garden in 2024");
        let terms = ranked.iter().map(|theme| theme.term.as_str()).collect::<Vec<_>>();

        assert_eq!(terms, ["garden", "roses"]);
    }

    #[test]
    fn case_variants_and_plurals_merge() {
        let ranked = extractor(true).extract("work Work work works. Friend friends");

        assert_eq!(ranked[0].term, "work");
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].term, "Friend");
        assert_eq!(ranked[1].score, 0.5);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn report_lists_at_most_five_unique_terms_and_writes_cloud() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entries = [
            entry("family walk coffee reading music garden"),
            entry("family walk coffee reading music"),
        ];

        let report = theme_report(&entries, &extractor(true), Some(dir.path()));

        assert_eq!(report.markdown.matches("- **").count(), 5);
        assert!(!report.markdown.contains("**garden**"));
        assert!(report.markdown.contains("## Reflection"));
        assert_eq!(report.artifact, Some(dir.path().join(WORD_CLOUD_FILE)));
        assert!(dir.path().join(WORD_CLOUD_FILE).exists());
    }

    #[test]
    fn empty_corpus_reports_no_themes() {
        let dir = tempfile::tempdir().expect("tempdir");

        let report = theme_report(&[], &extractor(true), Some(dir.path()));
        assert!(report.markdown.contains(NO_THEMES_MESSAGE));
        assert_eq!(report.artifact, None);
        assert!(!dir.path().join(WORD_CLOUD_FILE).exists());

        let blank = theme_report(
            &[entry("   "), entry("the and of")],
            &extractor(true),
            Some(dir.path()),
        );
        assert!(blank.markdown.contains(NO_THEMES_MESSAGE));
        assert_eq!(blank.artifact, None);
    }
}
