mod ai;
mod analyzer;
mod cli;
mod config;
mod journal;

use crate::cli::session::{print_analysis, respond_and_save, run_session};
use crate::cli::{AiCommands, Cli, Commands, ConfigCommands};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => run_session(&load_config()?),
        Commands::Analyze { dir } => handle_analyze(dir),
        Commands::Write { text } => handle_write(&text),
        Commands::Config { command } => handle_config_command(command),
        Commands::Ai { command } => handle_ai_command(command),
        Commands::Doctor => handle_doctor(),
    }
}

fn handle_analyze(dir: Option<std::path::PathBuf>) -> Result<()> {
    let mut config = load_config()?;
    if let Some(dir) = dir {
        config.journal_dir = config::expand_home(&dir.to_string_lossy());
    }

    print_analysis(&config)
}

fn handle_write(text: &str) -> Result<()> {
    let config = load_config()?;
    if text.trim().is_empty() {
        println!("Nothing to write.");
        return Ok(());
    }

    let system_prompt = ai::load_system_prompt(&config);
    let (reply, path) = respond_and_save(&config, &system_prompt, text.trim())?;

    println!("{reply}");
    println!("\nEntry saved: {}", path.display());
    Ok(())
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    let config_path = Config::config_path()?;

    match command {
        ConfigCommands::Set { key, value } => {
            // Edit the file itself so environment overrides are not persisted.
            let mut config = if config_path.exists() {
                Config::load_from(&config_path)?
            } else {
                Config::default()
            };
            config.set_value(&key, &value)?;
            config.save()?;

            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = load_config()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}

fn handle_ai_command(command: AiCommands) -> Result<()> {
    match command {
        AiCommands::Test { base_url, model } => {
            let mut config = load_config()?;

            if let Some(value) = base_url {
                config.ollama_api_url = value.trim().trim_end_matches('/').to_string();
            }
            if let Some(value) = model {
                config.ollama_model = value.trim().to_string();
            }

            let response = ai::test_connection(&config)?;
            println!("Ollama API connection successful");
            println!("{response}");

            Ok(())
        }
    }
}

fn handle_doctor() -> Result<()> {
    let config_path = Config::config_path()?;
    let mut issues = Vec::new();

    if config_path.exists() {
        println!("[OK] config.json found: {}", config_path.display());
    } else {
        println!(
            "[OK] config.json not found, using defaults: {}",
            config_path.display()
        );
    }

    let config = load_config()?;

    match config.generate_endpoint() {
        Ok(endpoint) => println!("[OK] Ollama endpoint: {endpoint} (model {})", config.ollama_model),
        Err(error) => {
            println!("[WARN] Ollama endpoint invalid: {error:#}");
            issues.push("endpoint invalid".to_string());
        }
    }

    if config.system_prompt_path.exists() {
        println!(
            "[OK] system prompt found: {}",
            config.system_prompt_path.display()
        );
    } else {
        println!(
            "[WARN] system prompt missing, default prompt will be used: {}",
            config.system_prompt_path.display()
        );
        issues.push("system prompt missing".to_string());
    }

    if config.journal_dir.is_dir() {
        println!("[OK] journal dir exists: {}", config.journal_dir.display());

        match journal::load_entries(&config.journal_dir, journal::MalformedEntryPolicy::Abort) {
            Ok(entries) => println!("[OK] {} journal entries readable", entries.len()),
            Err(error) => {
                println!("[WARN] journal entries unreadable: {error}");
                issues.push("malformed entries".to_string());
            }
        }
    } else {
        println!(
            "[WARN] journal dir missing (created on first entry): {}",
            config.journal_dir.display()
        );
        issues.push("journal dir missing".to_string());
    }

    if issues.is_empty() {
        println!("doctor result: no issues");
    } else {
        println!("doctor result: {} warning(s)", issues.len());
    }

    Ok(())
}

fn load_config() -> Result<Config> {
    Config::load().context("Failed to load configuration. Fix or remove the config file and retry.")
}
