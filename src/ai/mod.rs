use crate::config::Config;
use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a journaling assistant.";
pub const FALLBACK_REPLY: &str =
    "I'm having trouble reaching the language model right now. Your reflection is still saved, so let's try again in a moment.";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

pub fn load_system_prompt(config: &Config) -> String {
    match fs::read_to_string(&config.system_prompt_path) {
        Ok(content) if !content.trim().is_empty() => content.trim().to_string(),
        Ok(_) => {
            warn!(path = %config.system_prompt_path.display(), "system prompt file is empty. using default prompt");
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
        Err(error) => {
            warn!(error = %error, path = %config.system_prompt_path.display(), "could not load system prompt. using default prompt");
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}

pub fn build_prompt(system_prompt: &str, user_input: &str) -> String {
    format!("{system_prompt}\n\nUser: {user_input}\nAssistant:")
}

pub fn generate_reply(config: &Config, system_prompt: &str, user_input: &str) -> Result<String> {
    generate(config, &build_prompt(system_prompt, user_input))
}

pub fn test_connection(config: &Config) -> Result<String> {
    let prompt = build_prompt(
        "Reply with exactly one short sentence confirming you are reachable.",
        "Health check for the journal companion.",
    );

    generate(config, &prompt)
}

fn generate(config: &Config, prompt: &str) -> Result<String> {
    let endpoint = config.generate_endpoint()?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds()))
        .build()
        .context("Failed to create Ollama HTTP client")?;

    let request_body = json!({
        "model": config.ollama_model,
        "prompt": prompt,
        "stream": false,
    });

    debug!(endpoint = %endpoint, model = %config.ollama_model, "sending generate request");
    let response = client
        .post(endpoint)
        .json(&request_body)
        .send()
        .context("Ollama API request failed")?;

    let status = response.status();
    let body = response
        .text()
        .context("Failed to read Ollama response body")?;

    if !status.is_success() {
        bail!("Ollama API error {}: {}", status, body);
    }

    parse_generate_body(&body)
}

fn parse_generate_body(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .with_context(|| format!("Failed to parse Ollama response: {body}"))?;

    parsed
        .response
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| anyhow!("Ollama response did not include a `response` field"))
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SYSTEM_PROMPT, build_prompt, load_system_prompt, parse_generate_body};
    use crate::config::Config;

    #[test]
    fn prompt_layout() {
        assert_eq!(
            build_prompt("Be kind.", "Rough day."),
            "Be kind.\n\nUser: Rough day.\nAssistant:"
        );
    }

    #[test]
    fn parses_response_field() {
        let reply = parse_generate_body(r#"{"model":"llama3","response":"  Hello there. ","done":true}"#)
            .expect("reply");
        assert_eq!(reply, "Hello there.");
    }

    #[test]
    fn rejects_missing_or_blank_response() {
        assert!(parse_generate_body(r#"{"done":true}"#).is_err());
        assert!(parse_generate_body(r#"{"response":"   "}"#).is_err());
        assert!(parse_generate_body("not json").is_err());
    }

    #[test]
    fn system_prompt_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = Config {
            system_prompt_path: dir.path().join("missing.txt"),
            ..Config::default()
        };
        assert_eq!(load_system_prompt(&config), DEFAULT_SYSTEM_PROMPT);

        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "You listen carefully.\n").expect("write prompt");
        config.system_prompt_path = path;
        assert_eq!(load_system_prompt(&config), "You listen carefully.");
    }
}
