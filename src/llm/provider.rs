//! Verifier trait: the seam between the UI controller and the AI service.
//!
//! The controller only knows this trait. `GeminiVerifier` is the production
//! implementation; tests drive the controller with scripted verifiers.

use crate::upload::ImageMime;

use super::types::VerificationResult;

/// The only message a user ever sees for a failed verification.
pub const SERVICE_UNAVAILABLE: &str = "Failed to communicate with the AI verification service. \
The service may be temporarily unavailable.";

/// Any failure of a single verification attempt.
///
/// The variant keeps the cause for the logs. Callers show
/// [`VerificationError::user_message`] instead of the variant text.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("prompt blocked by the service: {0}")]
    Blocked(String),
    #[error("response contained no text")]
    EmptyResponse,
    #[error("malformed verification JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("incomplete verification data: missing {0}")]
    Incomplete(&'static str),
    #[error("unknown verification status {0:?}")]
    UnknownStatus(String),
}

impl VerificationError {
    pub fn user_message(&self) -> &'static str {
        SERVICE_UNAVAILABLE
    }
}

/// Something that can turn a certificate image into a verdict.
///
/// Exactly one attempt per call; implementations do not retry.
#[allow(async_fn_in_trait)]
pub trait CertificateVerifier {
    async fn verify(
        &self,
        image: &[u8],
        mime: ImageMime,
    ) -> Result<VerificationResult, VerificationError>;
}
