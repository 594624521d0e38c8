use crate::journal::MalformedEntryPolicy;
use anyhow::{Context, Result, anyhow, bail};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const APP_DIR: &str = ".journal-companion";
const CONFIG_FILE: &str = "config.json";
const SYSTEM_PROMPT_FILE: &str = "system_prompt.txt";
const DOTENV_FILE: &str = ".env";
const MIN_TIMEOUT_SECONDS: u64 = 5;

pub const ENV_API_URL: &str = "OLLAMA_API_URL";
pub const ENV_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_JOURNAL_DIR: &str = "JOURNAL_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub journal_dir: PathBuf,
    pub ollama_api_url: String,
    pub ollama_model: String,
    pub ai_timeout_seconds: u64,
    pub system_prompt_path: PathBuf,
    pub render_charts: bool,
    pub filter_stopwords: bool,
    pub max_cloud_words: usize,
    pub skip_malformed_entries: bool,
}

impl Default for Config {
    fn default() -> Self {
        let root = default_root_dir();

        Self {
            journal_dir: PathBuf::from("journal_entries"),
            ollama_api_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
            ai_timeout_seconds: 60,
            system_prompt_path: root.join(SYSTEM_PROMPT_FILE),
            render_charts: true,
            filter_stopwords: true,
            max_cloud_words: 200,
            skip_malformed_entries: false,
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        Ok(default_root_dir().join(CONFIG_FILE))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_layered(&config_path, Path::new(DOTENV_FILE), |key| {
            std::env::var(key).ok()
        })
    }

    // config file < .env < process environment
    pub fn load_layered<F>(config_path: &Path, dotenv_path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if config_path.exists() {
            Self::load_from(config_path)?
        } else {
            Self::default()
        };

        let dotenv_values = read_dotenv(dotenv_path)?;
        config.apply_env_overrides(|key| env(key).or_else(|| dotenv_values.get(key).cloned()));

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_empty(ENV_API_URL) {
            self.ollama_api_url = value.trim().trim_end_matches('/').to_string();
        }
        if let Some(value) = non_empty(ENV_MODEL) {
            self.ollama_model = value.trim().to_string();
        }
        if let Some(value) = non_empty(ENV_JOURNAL_DIR) {
            self.journal_dir = expand_home(value.trim());
        }
    }

    pub fn ensure_journal_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.journal_dir).with_context(|| {
            format!(
                "Failed to create journal directory: {}",
                self.journal_dir.display()
            )
        })
    }

    pub fn entry_policy(&self) -> MalformedEntryPolicy {
        if self.skip_malformed_entries {
            MalformedEntryPolicy::Skip
        } else {
            MalformedEntryPolicy::Abort
        }
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.ai_timeout_seconds.max(MIN_TIMEOUT_SECONDS)
    }

    pub fn generate_endpoint(&self) -> Result<Url> {
        if self.ollama_model.trim().is_empty() {
            bail!("ollama_model is empty. Set `journal config set ollama.model <MODEL>` or `{ENV_MODEL}`");
        }

        let base = format!("{}/", self.ollama_api_url.trim().trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|url| url.join("api/generate"))
            .with_context(|| format!("Invalid Ollama API URL: {}", self.ollama_api_url))
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match normalize_config_key(key) {
            "journal_dir" => {
                self.journal_dir = expand_home(value.trim());
            }
            "ollama_api_url" => {
                let trimmed = value.trim().trim_end_matches('/');
                Url::parse(trimmed).with_context(|| format!("Invalid URL: {value}"))?;
                self.ollama_api_url = trimmed.to_string();
            }
            "ollama_model" => {
                if value.trim().is_empty() {
                    bail!("ollama_model must not be empty");
                }
                self.ollama_model = value.trim().to_string();
            }
            "ai_timeout_seconds" => {
                self.ai_timeout_seconds = value
                    .parse::<u64>()
                    .map_err(|_| anyhow!("ai_timeout_seconds must be a number"))?
                    .max(MIN_TIMEOUT_SECONDS);
            }
            "system_prompt_path" => {
                self.system_prompt_path = expand_home(value.trim());
            }
            "render_charts" => {
                self.render_charts = value
                    .parse::<bool>()
                    .map_err(|_| anyhow!("render_charts must be true/false"))?;
            }
            "filter_stopwords" => {
                self.filter_stopwords = value
                    .parse::<bool>()
                    .map_err(|_| anyhow!("filter_stopwords must be true/false"))?;
            }
            "max_cloud_words" => {
                let parsed = value
                    .parse::<usize>()
                    .map_err(|_| anyhow!("max_cloud_words must be a number"))?;
                if parsed == 0 {
                    bail!("max_cloud_words must be at least 1");
                }
                self.max_cloud_words = parsed;
            }
            "skip_malformed_entries" => {
                self.skip_malformed_entries = value
                    .parse::<bool>()
                    .map_err(|_| anyhow!("skip_malformed_entries must be true/false"))?;
            }
            _ => {
                bail!(
                    "Unsupported config key: {key}. Supported keys: journal_dir|journal.dir, ollama_api_url|ollama.url, ollama_model|ollama.model, ai_timeout_seconds|ai.timeout_seconds, system_prompt_path|ai.system_prompt, render_charts|analysis.charts, filter_stopwords|analysis.stopwords, max_cloud_words|analysis.max_words, skip_malformed_entries|journal.skip_malformed"
                );
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        match normalize_config_key(key) {
            "journal_dir" => Some(self.journal_dir.display().to_string()),
            "ollama_api_url" => Some(self.ollama_api_url.clone()),
            "ollama_model" => Some(self.ollama_model.clone()),
            "ai_timeout_seconds" => Some(self.ai_timeout_seconds.to_string()),
            "system_prompt_path" => Some(self.system_prompt_path.display().to_string()),
            "render_charts" => Some(self.render_charts.to_string()),
            "filter_stopwords" => Some(self.filter_stopwords.to_string()),
            "max_cloud_words" => Some(self.max_cloud_words.to_string()),
            "skip_malformed_entries" => Some(self.skip_malformed_entries.to_string()),
            _ => None,
        }
    }
}

pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    dotenv::from_path_iter(path)
        .with_context(|| format!("Failed to open env file: {}", path.display()))?
        .map(|item| item.with_context(|| format!("Failed to parse env file: {}", path.display())))
        .collect()
}

fn normalize_config_key(key: &str) -> &str {
    match key {
        "journal_dir" | "journal.dir" => "journal_dir",
        "ollama_api_url" | "ollama.url" => "ollama_api_url",
        "ollama_model" | "ollama.model" => "ollama_model",
        "ai_timeout_seconds" | "ai.timeout_seconds" => "ai_timeout_seconds",
        "system_prompt_path" | "ai.system_prompt" => "system_prompt_path",
        "render_charts" | "analysis.charts" => "render_charts",
        "filter_stopwords" | "analysis.stopwords" => "filter_stopwords",
        "max_cloud_words" | "analysis.max_words" => "max_cloud_words",
        "skip_malformed_entries" | "journal.skip_malformed" => "skip_malformed_entries",
        _ => key,
    }
}

pub fn expand_home(raw: &str) -> PathBuf {
    raw.strip_prefix("~/")
        .and_then(|stripped| home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| PathBuf::from(raw))
}

fn default_root_dir() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
