//! LLM domain: certificate verification through a generative model.
//!
//! Public API for the verification client.
//! External code should only use the items exported here.
//!
//!   - gemini.rs: Google Gemini `generateContent` client
//!   - provider.rs: `CertificateVerifier` trait + `VerificationError`
//!   - prompts.rs: instruction prompt + response schema
//!   - types.rs: verdict types and response validation

mod gemini;
pub mod prompts;
pub mod provider;
pub mod types;

pub use gemini::GeminiVerifier;
pub use provider::{CertificateVerifier, VerificationError, SERVICE_UNAVAILABLE};
pub use types::{ExtractedDetails, VerificationResult, VerificationStatus, NOT_AVAILABLE};
