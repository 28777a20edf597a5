//! UI state controller: one certificate at a time.
//!
//! The visible panel is a tagged union: each state carries only what its
//! panel renders. The flat fields a view might ask for (selected file,
//! preview, result, loading flag, error message) are derived from it.
//!
//!   Idle ──verify──▶ Loading ──ok──▶ Result ──reset──▶ Idle
//!                       └────err──▶ Error  ──reset──▶ Idle

use crate::llm::{CertificateVerifier, VerificationError, VerificationResult};
use crate::upload::{CandidateFile, CertificateFile, Preview, UploadError};

pub const NO_FILE_SELECTED: &str = "Please upload a certificate file first.";

/// A validated file together with its preview.
#[derive(Debug, Clone)]
pub struct Selection {
    pub file: CertificateFile,
    pub preview: Preview,
}

#[derive(Debug, Clone)]
pub enum ViewState {
    Idle {
        selection: Option<Selection>,
        /// Inline error shown on the upload panel.
        notice: Option<String>,
    },
    Loading {
        selection: Selection,
    },
    Error {
        message: String,
    },
    Result {
        selection: Selection,
        result: VerificationResult,
    },
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Idle {
            selection: None,
            notice: None,
        }
    }
}

/// Which panel is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Loading,
    Error,
    Result,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Idle => "idle",
            Mode::Loading => "loading",
            Mode::Error => "error",
            Mode::Result => "result",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    InvalidFile(#[from] UploadError),
    #[error("{}", NO_FILE_SELECTED)]
    NoFileSelected,
    #[error("A verification is already in progress.")]
    Busy,
    #[error("Cannot {action} while in the {mode} state.")]
    NotAllowed { action: &'static str, mode: Mode },
}

#[derive(Debug, Default)]
pub struct Controller {
    state: ViewState,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        match self.state {
            ViewState::Idle { .. } => Mode::Idle,
            ViewState::Loading { .. } => Mode::Loading,
            ViewState::Error { .. } => Mode::Error,
            ViewState::Result { .. } => Mode::Result,
        }
    }

    // ── Derived fields ───────────────────────────────────────────────

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            ViewState::Idle { selection, .. } => selection.as_ref(),
            ViewState::Loading { selection } | ViewState::Result { selection, .. } => Some(selection),
            ViewState::Error { .. } => None,
        }
    }

    pub fn selected_file(&self) -> Option<&CertificateFile> {
        self.selection().map(|s| &s.file)
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.selection().map(|s| &s.preview)
    }

    pub fn result(&self) -> Option<&VerificationResult> {
        match &self.state {
            ViewState::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading { .. })
    }

    /// The error panel message, or the inline notice on the upload panel.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Error { message } => Some(message.as_str()),
            ViewState::Idle { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Replace the selected file. Only the upload panel accepts files.
    ///
    /// A type outside the allow-list sets the inline notice and keeps the
    /// previous selection.
    pub fn select_file(&mut self, candidate: CandidateFile) -> Result<(), ControllerError> {
        let mode = self.mode();
        let ViewState::Idle { selection, notice } = &mut self.state else {
            return Err(ControllerError::NotAllowed {
                action: "select a file",
                mode,
            });
        };

        match CertificateFile::accept(candidate) {
            Ok(file) => {
                let preview = Preview::of(&file);
                log::info!(
                    "[STATE] Selected {} ({}, {})",
                    preview.file_name,
                    preview.mime,
                    preview.size_label()
                );
                *selection = Some(Selection { file, preview });
                *notice = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("[STATE] Rejected file: {:?}", e);
                *notice = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Idle → Loading. Returns the file the caller must send.
    pub fn begin_verification(&mut self) -> Result<CertificateFile, ControllerError> {
        match std::mem::take(&mut self.state) {
            ViewState::Idle {
                selection: Some(selection),
                ..
            } => {
                let file = selection.file.clone();
                log::info!("[STATE] idle → loading ({})", file.name);
                self.state = ViewState::Loading { selection };
                Ok(file)
            }
            ViewState::Idle {
                selection: None, ..
            } => {
                self.state = ViewState::Idle {
                    selection: None,
                    notice: Some(NO_FILE_SELECTED.to_string()),
                };
                Err(ControllerError::NoFileSelected)
            }
            other => {
                self.state = other;
                if self.is_loading() {
                    Err(ControllerError::Busy)
                } else {
                    Err(ControllerError::NotAllowed {
                        action: "verify",
                        mode: self.mode(),
                    })
                }
            }
        }
    }

    /// Loading → Result | Error.
    ///
    /// Returns false when no verification is in flight; the outcome is
    /// dropped without touching state.
    pub fn complete_verification(
        &mut self,
        outcome: Result<VerificationResult, VerificationError>,
    ) -> bool {
        let selection = match std::mem::take(&mut self.state) {
            ViewState::Loading { selection } => selection,
            other => {
                self.state = other;
                log::warn!(
                    "[STATE] Ignoring verification outcome in the {} state",
                    self.mode()
                );
                return false;
            }
        };

        self.state = match outcome {
            Ok(result) => {
                log::info!("[STATE] loading → result ({})", result.status);
                ViewState::Result { selection, result }
            }
            Err(e) => {
                log::info!("[STATE] loading → error ({})", e);
                ViewState::Error {
                    message: e.user_message().to_string(),
                }
            }
        };
        true
    }

    /// Run a full verification of the selected file against `verifier`.
    ///
    /// Verification failures land in the Error state; `Err` only reports a
    /// transition that was refused.
    pub async fn verify<V: CertificateVerifier>(
        &mut self,
        verifier: &V,
    ) -> Result<(), ControllerError> {
        let file = self.begin_verification()?;
        let outcome = verifier.verify(&file.bytes, file.mime).await;
        self.complete_verification(outcome);
        Ok(())
    }

    /// Back to an empty upload panel. Refused while a request is in flight.
    pub fn reset(&mut self) -> Result<(), ControllerError> {
        if self.is_loading() {
            return Err(ControllerError::Busy);
        }
        log::info!("[STATE] {} → idle (reset)", self.mode());
        self.state = ViewState::default();
        Ok(())
    }
}
