use crate::ai;
use crate::analyzer;
use crate::config::Config;
use crate::journal;
use anyhow::{Context, Result};
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;
use tracing::{error, warn};

const HELP_TEXT: &str = "# Journaling Commands and Tips

## Commands
- `help` - show this message
- `analyze` - look for mood trends and themes in your entries
- `exit` - end the session

## Tips
1. Write freely, there is no wrong way to journal
2. Be honest with yourself
3. Grammar and spelling do not matter here
4. Write as much or as little as you like

## Prompt Ideas
- What is on your mind right now?
- What made today different?
- What are you grateful for?
- What has been challenging lately?
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Help,
    Analyze,
    Exit,
    Empty,
    Reflection(String),
}

pub fn parse_input(raw: &str) -> SessionInput {
    let trimmed = raw.trim();

    match trimmed.to_lowercase().as_str() {
        "" => SessionInput::Empty,
        "help" => SessionInput::Help,
        "analyze" => SessionInput::Analyze,
        "exit" => SessionInput::Exit,
        _ => SessionInput::Reflection(trimmed.to_string()),
    }
}

pub fn run_session(config: &Config) -> Result<()> {
    config.ensure_journal_dir()?;
    let system_prompt = ai::load_system_prompt(config);
    let theme = ColorfulTheme::default();

    println!("──────────────────────────────────────────");
    println!("  Welcome to your journaling companion.");
    println!("  Type 'help' for commands and tips,");
    println!("  'exit' to end the session.");
    println!("──────────────────────────────────────────");

    loop {
        let raw = match Input::<String>::with_theme(&theme)
            .with_prompt("Your thoughts")
            .allow_empty(true)
            .interact_text()
        {
            Ok(value) => value,
            Err(error) => {
                warn!(error = %error, "prompt closed");
                println!("\nGoodbye. Keep reflecting and growing.");
                break;
            }
        };

        let outcome = match parse_input(&raw) {
            SessionInput::Exit => {
                println!("\nThank you for sharing your thoughts today. Take care.");
                break;
            }
            SessionInput::Help => {
                println!("{HELP_TEXT}");
                Ok(())
            }
            SessionInput::Analyze => print_analysis(config),
            SessionInput::Empty => Ok(()),
            SessionInput::Reflection(text) => {
                respond_and_save(config, &system_prompt, &text).map(|(reply, _)| {
                    println!("\n{reply}\n");
                })
            }
        };

        if let Err(error) = outcome {
            error!(error = %error, "session step failed");
            println!("Error: {error:#}");
            println!("Let's continue our conversation...");
        }
    }

    Ok(())
}

pub fn respond_and_save(
    config: &Config,
    system_prompt: &str,
    reflection: &str,
) -> Result<(String, PathBuf)> {
    let reply = ai::generate_reply(config, system_prompt, reflection).unwrap_or_else(|error| {
        warn!(error = %error, "reply generation failed. using fallback reply");
        ai::FALLBACK_REPLY.to_string()
    });

    let path = journal::save_entry(&config.journal_dir, reflection, &reply)
        .context("Failed to save journal entry")?;

    Ok((reply, path))
}

pub fn print_analysis(config: &Config) -> Result<()> {
    let Some(report) = analyzer::analyze_journal(config)? else {
        println!("No entries found for analysis yet.");
        return Ok(());
    };

    println!("Analyzed {} entries.\n", report.entry_count);
    println!("{}", report.mood.markdown);
    println!("{}", report.themes.markdown);

    let artifacts = report.artifacts();
    if !artifacts.is_empty() {
        println!("Charts:");
        for path in artifacts {
            println!("- {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{SessionInput, parse_input, respond_and_save};
    use crate::ai::FALLBACK_REPLY;
    use crate::config::Config;
    use crate::journal::{MalformedEntryPolicy, load_entries};

    #[test]
    fn commands_are_case_insensitive_and_trimmed() {
        assert_eq!(parse_input("  HELP "), SessionInput::Help);
        assert_eq!(parse_input("Analyze"), SessionInput::Analyze);
        assert_eq!(parse_input("exit"), SessionInput::Exit);
        assert_eq!(parse_input("   "), SessionInput::Empty);
        assert_eq!(
            parse_input(" I want to exit this job "),
            SessionInput::Reflection("I want to exit this job".to_string())
        );
    }

    #[test]
    fn unreachable_model_still_saves_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            journal_dir: dir.path().join("journal"),
            ollama_api_url: "http://127.0.0.1:9".to_string(),
            ai_timeout_seconds: 5,
            ..Config::default()
        };

        let (reply, path) =
            respond_and_save(&config, "Be kind.", "Long day at work.").expect("saved");

        assert_eq!(reply, FALLBACK_REPLY);
        assert!(path.exists());
        let entries = load_entries(&config.journal_dir, MalformedEntryPolicy::Abort).expect("load");
        assert_eq!(entries.len(), 1);
        assert!(entries[0].content.contains("Long day at work."));
    }
}
