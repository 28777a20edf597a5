//! Gemini VERIFY pipeline: one non-streaming `generateContent` call.
//!
//! Request: instruction prompt + inline base64 image, with
//! `responseMimeType: "application/json"` and a `responseSchema`, so the
//! model answers with bare JSON (no fence stripping).
//!
//! Response: text in `candidates[0].content.parts[*].text`, token usage in
//! `usageMetadata`. The API key travels in the `x-goog-api-key` header so
//! it never shows up in a logged URL.

use std::time::Duration;

use crate::settings::Settings;
use crate::upload::ImageMime;

use super::prompts::{self, PING_PROMPT, TEMPERATURE, VERIFY_PROMPT};
use super::provider::{CertificateVerifier, VerificationError};
use super::types::VerificationResult;

/// Gemini 2.5 Flash list pricing:
/// Input:  $0.30 per 1M tokens
/// Output: $2.50 per 1M tokens
const INPUT_COST_PER_MILLION: f64 = 0.30;
const OUTPUT_COST_PER_MILLION: f64 = 2.50;

/// Production verifier backed by the Google AI `generateContent` endpoint.
pub struct GeminiVerifier {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GeminiVerifier {
    pub fn new(api_key: String, settings: &Settings) -> Result<Self, VerificationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Send a minimal text prompt and report whether the service answered 2xx.
    pub async fn ping(&self) -> Result<bool, VerificationError> {
        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": PING_PROMPT}]}],
                "generationConfig": {"maxOutputTokens": 50}
            }))
            .send()
            .await?;
        log::info!("[VERIFY] Connection test {}, status: {}", self.model, resp.status());
        Ok(resp.status().is_success())
    }

    async fn call(&self, image: &[u8], mime: ImageMime) -> Result<VerificationResult, VerificationError> {
        let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, image);

        log::info!("[VERIFY] Model: {}", self.model);
        log::info!(
            "[VERIFY] Image: {} ({} bytes, {} base64 chars)",
            mime,
            image.len(),
            encoded.len()
        );

        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&build_request_body(&encoded, mime))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VerificationError::Api { status, body });
        }

        let body: serde_json::Value = response.json().await?;
        log::info!("[VERIFY] API latency: {}ms", start.elapsed().as_millis());

        log_usage(&body);

        if let Some(reason) = body["promptFeedback"]["blockReason"].as_str() {
            return Err(VerificationError::Blocked(reason.to_string()));
        }

        let text = extract_text(&body).ok_or(VerificationError::EmptyResponse)?;
        let result = VerificationResult::from_model_json(&text)?;

        log::info!("[VERIFY] Parse result: success");
        log::info!("[VERIFY] Status: {}", result.status);
        log::info!("[VERIFY] Red flags: {}", result.red_flags.len());
        Ok(result)
    }
}

impl CertificateVerifier for GeminiVerifier {
    async fn verify(
        &self,
        image: &[u8],
        mime: ImageMime,
    ) -> Result<VerificationResult, VerificationError> {
        match self.call(image, mime).await {
            Ok(result) => Ok(result),
            Err(e) => {
                log::error!("[VERIFY] Error verifying certificate with Gemini API: {}", e);
                Err(e)
            }
        }
    }
}

/// Request body: prompt first, then the inline image part.
fn build_request_body(encoded_image: &str, mime: ImageMime) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            {
                "role": "user",
                "parts": [
                    { "text": VERIFY_PROMPT },
                    {
                        "inlineData": {
                            "mimeType": mime.as_str(),
                            "data": encoded_image
                        }
                    }
                ]
            }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": prompts::response_schema(),
            "temperature": TEMPERATURE
        }
    })
}

/// Concatenate the non-thought text parts of the first candidate.
fn extract_text(body: &serde_json::Value) -> Option<String> {
    let parts = body.get("candidates")?.get(0)?.get("content")?.get("parts")?.as_array()?;
    let text: String = parts
        .iter()
        .filter(|p| !p["thought"].as_bool().unwrap_or(false))
        .filter_map(|p| p["text"].as_str())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn log_usage(body: &serde_json::Value) {
    let Some(usage) = body.get("usageMetadata") else {
        return;
    };
    let input_tokens = usage["promptTokenCount"].as_u64().unwrap_or(0);
    let output_tokens = usage["candidatesTokenCount"].as_u64().unwrap_or(0);
    log::info!("[VERIFY] Input tokens: {}", input_tokens);
    log::info!("[VERIFY] Output tokens: {}", output_tokens);
    let cost = (input_tokens as f64 * INPUT_COST_PER_MILLION
        + output_tokens as f64 * OUTPUT_COST_PER_MILLION)
        / 1_000_000.0;
    log::info!("[VERIFY] Estimated cost: ${:.6}", cost);
}
