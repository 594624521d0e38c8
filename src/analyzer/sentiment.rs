use crate::journal::JournalError;
use regex::Regex;
use std::collections::HashMap;

const NEGATION_WINDOW: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;

pub trait SentimentScorer {
    // must stay within [-1.0, 1.0]
    fn polarity(&self, text: &str) -> Result<f64, JournalError>;
}

#[derive(Debug, Clone)]
pub struct LexiconScorer {
    token_pattern: Regex,
    lexicon: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    pub fn new() -> Result<Self, JournalError> {
        let token_pattern = Regex::new(r"[\p{L}\p{N}]+(?:['’]\p{L}+)?").map_err(|error| {
            JournalError::Analysis {
                subject: "sentiment tokenizer".to_string(),
                reason: error.to_string(),
            }
        })?;

        Ok(Self {
            token_pattern,
            lexicon: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        })
    }

    fn score_tokens(&self, tokens: &[String]) -> Option<f64> {
        let mut total = 0.0;
        let mut scored = 0_usize;
        let mut modifier = 1.0;
        let mut since_negation: Option<usize> = None;

        for token in tokens {
            if is_negation(token) {
                since_negation = Some(0);
                modifier = 1.0;
                continue;
            }

            if let Some(multiplier) = self.intensifiers.get(token.as_str()) {
                modifier = *multiplier;
                continue;
            }

            // an intensifier only reaches the word right after it
            if let Some(base) = self.lexicon.get(token.as_str()) {
                let mut score = (base * modifier).clamp(-1.0, 1.0);
                if since_negation.is_some_and(|distance| distance < NEGATION_WINDOW) {
                    score *= NEGATION_FACTOR;
                }
                total += score;
                scored += 1;
            }
            modifier = 1.0;

            since_negation = since_negation
                .map(|distance| distance + 1)
                .filter(|distance| *distance < NEGATION_WINDOW);
        }

        (scored > 0).then(|| (total / scored as f64).clamp(-1.0, 1.0))
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Result<f64, JournalError> {
        let tokens = self
            .token_pattern
            .find_iter(text)
            .map(|token| token.as_str().to_lowercase().replace('\u{2019}', "'"))
            .collect::<Vec<_>>();

        Ok(self.score_tokens(&tokens).unwrap_or(0.0))
    }
}

fn is_negation(token: &str) -> bool {
    matches!(
        token,
        "not" | "no" | "never" | "nothing" | "nobody" | "nowhere" | "neither" | "nor" | "cannot"
    ) || token.ends_with("n't")
}

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("truly", 1.3),
    ("super", 1.4),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("totally", 1.3),
    ("deeply", 1.4),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("barely", 0.5),
    ("little", 0.7),
];

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("happiness", 0.7),
    ("glad", 0.5),
    ("joy", 0.8),
    ("joyful", 0.8),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("wonderful", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("perfect", 1.0),
    ("beautiful", 0.85),
    ("nice", 0.6),
    ("fun", 0.3),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("calm", 0.3),
    ("peaceful", 0.25),
    ("relaxed", 0.3),
    ("grateful", 0.6),
    ("thankful", 0.5),
    ("proud", 0.8),
    ("excited", 0.4),
    ("exciting", 0.3),
    ("hopeful", 0.5),
    ("hope", 0.3),
    ("confident", 0.5),
    ("motivated", 0.4),
    ("productive", 0.4),
    ("successful", 0.75),
    ("success", 0.3),
    ("better", 0.5),
    ("best", 1.0),
    ("positive", 0.23),
    ("kind", 0.6),
    ("friendly", 0.4),
    ("fine", 0.4),
    ("okay", 0.5),
    ("ok", 0.5),
    ("content", 0.3),
    ("pleased", 0.5),
    ("satisfied", 0.5),
    ("inspired", 0.5),
    ("energized", 0.4),
    ("rested", 0.3),
    ("strong", 0.4),
    ("safe", 0.5),
    ("warm", 0.6),
    ("brilliant", 0.9),
    ("delighted", 0.8),
    ("cheerful", 0.7),
    ("smile", 0.3),
    ("laugh", 0.3),
    ("win", 0.8),
    ("accomplished", 0.6),
    ("fulfilled", 0.6),
    ("optimistic", 0.6),
    ("clear", 0.1),
    // negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("sad", -0.5),
    ("unhappy", -0.6),
    ("depressed", -0.7),
    ("miserable", -0.8),
    ("angry", -0.5),
    ("mad", -0.6),
    ("upset", -0.5),
    ("annoyed", -0.4),
    ("frustrated", -0.6),
    ("frustrating", -0.6),
    ("anxious", -0.4),
    ("anxiety", -0.4),
    ("worried", -0.4),
    ("worry", -0.3),
    ("stressed", -0.5),
    ("stress", -0.4),
    ("stressful", -0.5),
    ("tired", -0.4),
    ("exhausted", -0.6),
    ("lonely", -0.5),
    ("alone", -0.2),
    ("afraid", -0.6),
    ("scared", -0.5),
    ("fear", -0.5),
    ("hate", -0.8),
    ("hated", -0.9),
    ("hurt", -0.5),
    ("pain", -0.5),
    ("painful", -0.7),
    ("difficult", -0.5),
    ("hard", -0.3),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.3),
    ("lost", -0.3),
    ("boring", -1.0),
    ("bored", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("overwhelmed", -0.5),
    ("guilty", -0.5),
    ("ashamed", -0.6),
    ("sick", -0.7),
    ("ugly", -0.7),
    ("negative", -0.3),
    ("cry", -0.4),
    ("cried", -0.4),
    ("broken", -0.4),
    ("hopeless", -0.8),
    ("nervous", -0.3),
    ("weak", -0.4),
    ("confused", -0.3),
    ("regret", -0.5),
    ("problem", -0.3),
    ("problems", -0.3),
];
