//! Command handlers.
//!
//! Thin wrappers that bridge CLI subcommands to the controller, the
//! verifier and the settings store. Each returns the process exit code.

use std::path::Path;
use std::process::ExitCode;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::controller::{Controller, Mode};
use crate::llm::GeminiVerifier;
use crate::session;
use crate::settings::{self, Settings};
use crate::upload;
use crate::view;
use crate::AppError;

pub async fn dispatch(cli: Cli) -> Result<ExitCode, AppError> {
    match cli.command {
        Commands::Verify { path } => verify_file(&path, cli.json).await,
        Commands::Session => run_session().await,
        Commands::TestConnection => test_connection(cli.json).await,
        Commands::SaveKey { api_key } => save_key(&api_key),
        Commands::Config { command } => match command {
            ConfigCommands::Show => show_config(cli.json),
            ConfigCommands::Set { key, value } => set_config(&key, &value),
        },
    }
}

/// Build the verifier. A missing credential is fatal here, before any
/// file is read or request is made.
fn verifier() -> Result<GeminiVerifier, AppError> {
    let api_key = settings::resolve_api_key()?;
    let settings = Settings::load();
    Ok(GeminiVerifier::new(api_key, &settings)?)
}

/// One-shot select → verify → render.
async fn verify_file(path: &Path, json: bool) -> Result<ExitCode, AppError> {
    let verifier = verifier()?;
    let mut controller = Controller::new();

    let candidate = upload::read_candidate(path).await?;
    controller.select_file(candidate)?;
    controller.verify(&verifier).await?;

    if json {
        let value = match controller.result() {
            Some(result) => serde_json::to_value(result)?,
            None => serde_json::json!({ "error": controller.error() }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", view::render(&controller));
    }

    Ok(match controller.mode() {
        Mode::Result => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

async fn run_session() -> Result<ExitCode, AppError> {
    let verifier = verifier()?;
    log::info!("[SESSION] Started with model {}", verifier.model());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session::run_session(&verifier, stdin, tokio::io::stdout()).await?;
    Ok(ExitCode::SUCCESS)
}

async fn test_connection(json: bool) -> Result<ExitCode, AppError> {
    let verifier = verifier()?;
    let ok = verifier.ping().await?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "model": verifier.model(), "ok": ok })
        );
    } else if ok {
        println!("{}: connection ok", verifier.model());
    } else {
        println!("{}: service did not accept the request", verifier.model());
    }
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn save_key(api_key: &str) -> Result<ExitCode, AppError> {
    if api_key.trim().is_empty() {
        return Err(AppError::Settings(settings::SettingsError::MissingApiKey));
    }
    settings::save_api_key(api_key.trim())?;
    println!("API key saved to the OS keychain");
    Ok(ExitCode::SUCCESS)
}

fn show_config(json: bool) -> Result<ExitCode, AppError> {
    let settings = Settings::load();
    let path = settings::settings_path();
    if json {
        let mut value = serde_json::to_value(&settings)?;
        value["path"] = serde_json::Value::String(path.display().to_string());
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("settings file: {}", path.display());
        println!("model:         {}", settings.model);
        println!("endpoint:      {}", settings.endpoint);
        println!("timeout_secs:  {}", settings.timeout_secs);
    }
    Ok(ExitCode::SUCCESS)
}

fn set_config(key: &str, value: &str) -> Result<ExitCode, AppError> {
    let path = settings::settings_path();
    // Edit the file as stored, without env overrides baked in.
    let mut settings = Settings::load_from(&path);
    settings.set(key, value)?;
    settings.save_to(&path)?;
    println!("{key} = {value}");
    Ok(ExitCode::SUCCESS)
}
