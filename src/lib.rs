//! Certificate Verifier: application entry point.
//!
//! This is the shell that wires the domains together. No business logic
//! lives here: only module declarations, startup and the top-level error.
//!
//!   - llm/: verification client (Gemini) + verdict types
//!   - upload/: file input boundary, MIME allow-list, preview
//!   - controller: the four-state UI state machine
//!   - view: text rendering of the visible panel
//!   - session: interactive line-command front end
//!   - commands: CLI subcommand handlers
//!   - settings: credentials + persisted settings

pub mod cli;
mod commands;
pub mod controller;
pub mod llm;
pub mod session;
pub mod settings;
pub mod upload;
pub mod view;

use std::process::ExitCode;

use clap::Parser;

/// Anything that can end a command early.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] settings::SettingsError),
    #[error(transparent)]
    Upload(#[from] upload::UploadError),
    #[error(transparent)]
    Controller(#[from] controller::ControllerError),
    #[error("{}", .0.user_message())]
    Verification(#[from] llm::VerificationError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Entry point: called by `main`.
pub async fn run() -> ExitCode {
    settings::load_dotenv();
    env_logger::init();

    let cli = cli::Cli::parse();
    log::info!("Certificate Verifier starting up");

    match commands::dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:?}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
