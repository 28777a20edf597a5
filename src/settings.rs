//! Settings and credential resolution.
//!
//! Handles:
//! - `.env.local` / `.env` loading at startup
//! - API key lookup (env var, then OS keychain via the keyring crate)
//! - The persisted settings file in `~/.config/certificate-verifier/`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::prompts::DEFAULT_MODEL;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Env vars checked for the credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

const KEYRING_SERVICE: &str = "certificate-verifier";
const KEYRING_USER: &str = "gemini";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("API_KEY environment variable not set")]
    MissingApiKey,
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
    #[error("Failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Unknown setting: {0}. Use model, endpoint or timeout_secs.")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// User-tunable client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load the settings file, then apply `CERTVERIFY_*` env overrides.
    ///
    /// A missing or unreadable file yields defaults.
    pub fn load() -> Self {
        let mut settings = Self::load_from(&settings_path());
        if let Ok(model) = std::env::var("CERTVERIFY_MODEL") {
            if !model.is_empty() {
                settings.model = model;
            }
        }
        if let Ok(endpoint) = std::env::var("CERTVERIFY_ENDPOINT") {
            if !endpoint.is_empty() {
                settings.endpoint = endpoint;
            }
        }
        settings
    }

    pub fn load_from(path: &Path) -> Self {
        let mut settings: Self = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("[SETTINGS] Ignoring invalid {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        if settings.timeout_secs == 0 {
            log::warn!(
                "[SETTINGS] timeout_secs = 0 in {}, using {}",
                path.display(),
                DEFAULT_TIMEOUT_SECS
            );
            settings.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        settings
    }

    /// Persist to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("[SETTINGS] Saved {}", path.display());
        Ok(())
    }

    /// Update one field from its `config set` string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "model" if !value.trim().is_empty() => self.model = value.trim().to_string(),
            "endpoint" if value.starts_with("http://") || value.starts_with("https://") => {
                self.endpoint = value.to_string()
            }
            "timeout_secs" => {
                let secs: u64 = value.parse().map_err(|_| invalid())?;
                if secs == 0 {
                    return Err(invalid());
                }
                self.timeout_secs = secs;
            }
            "model" | "endpoint" => return Err(invalid()),
            other => return Err(SettingsError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Directory holding `settings.json`. `CERTVERIFY_CONFIG_DIR` overrides it.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CERTVERIFY_CONFIG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("certificate-verifier")
}

pub fn settings_path() -> PathBuf {
    config_dir().join(SETTINGS_FILE)
}

/// Load `.env.local` → `.env` from the working directory. First hit wins.
///
/// Runs before the logger exists, so it reports on stderr.
pub fn load_dotenv() {
    for env_file in [".env.local", ".env"] {
        let path = Path::new(env_file);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break;
        }
    }
}

/// Resolve the API key required at startup.
///
/// Priority:
/// 1. `API_KEY`, then `GEMINI_API_KEY`
/// 2. OS keychain entry (exported into `API_KEY` when found)
pub fn resolve_api_key() -> Result<String, SettingsError> {
    for var in API_KEY_VARS {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                log::info!("[SETTINGS] API key found in {} ({} chars)", var, key.len());
                return Ok(key);
            }
        }
    }

    match keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).and_then(|e| e.get_password()) {
        Ok(key) if !key.is_empty() => {
            std::env::set_var("API_KEY", &key);
            log::info!("[SETTINGS] Loaded API key from OS keychain");
            Ok(key)
        }
        Ok(_) | Err(keyring::Error::NoEntry) => Err(SettingsError::MissingApiKey),
        Err(e) => {
            log::warn!("[SETTINGS] Keychain lookup failed: {}", e);
            Err(SettingsError::MissingApiKey)
        }
    }
}

/// Store the API key in the OS keychain.
pub fn save_api_key(api_key: &str) -> Result<(), SettingsError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    entry.set_password(api_key)?;
    log::info!("[SETTINGS] API key saved to OS keychain");
    Ok(())
}
