use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "certverify",
    version,
    about = "Forensic authenticity check of academic certificate images"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify one certificate image and print the verdict
    Verify { path: PathBuf },
    /// Interactive session: open, verify, reset, show
    Session,
    /// Check that the configured model answers
    TestConnection,
    /// Store the API key in the OS keychain
    SaveKey { api_key: String },
    /// Show or change the persisted settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Change one setting: model, endpoint or timeout_secs
    Set { key: String, value: String },
}
