pub mod types;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Credentials;
use types::{DetectedLanguage, ErrorResponse, TextItem, TranslationResult};

const SERVICE_BASE: &str = "https://api.cognitive.microsofttranslator.com";
const API_VERSION: &str = "3.0";

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("language detection error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("language detection returned no result")]
    Empty,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("translation returned no result")]
    Empty,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Language detection and translation, both served by one remote service.
/// Implemented by `TranslatorClient` for production; scripted mocks stand
/// in for it in session tests.
pub trait LanguageService {
    async fn detect(&self, text: &str) -> Result<String, DetectionError>;
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationError>;
}

#[derive(Clone)]
pub struct TranslatorClient {
    http: Client,
    key: String,
    region: String,
    base_url: String,
}

impl TranslatorClient {
    pub fn new(http: Client, credentials: &Credentials) -> Self {
        Self {
            http,
            key: credentials.translator_key.clone(),
            region: credentials.translator_region.clone(),
            base_url: SERVICE_BASE.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            key: "test-key".to_string(),
            region: "test-region".to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn post(&self, path: &str, query: &[(&str, &str)], text: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .query(query)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .header("User-Agent", crate::USER_AGENT)
            .json(&[TextItem { text }])
    }
}

impl LanguageService for TranslatorClient {
    async fn detect(&self, text: &str) -> Result<String, DetectionError> {
        let response = self
            .post("/detect", &[("api-version", API_VERSION)], text)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let (code, message) = api_error(response).await;
            warn!(code, "language detection failed");
            return Err(DetectionError::Api { code, message });
        }

        let body: Vec<DetectedLanguage> = response.json().await?;
        let first = body.into_iter().next().ok_or(DetectionError::Empty)?;
        debug!(language = %first.language, score = first.score, "language detected");
        Ok(first.language)
    }

    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationError> {
        let response = self
            .post(
                "/translate",
                &[("api-version", API_VERSION), ("to", target)],
                text,
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let (code, message) = api_error(response).await;
            warn!(code, target, "translation failed");
            return Err(TranslationError::Api { code, message });
        }

        let body: Vec<TranslationResult> = response.json().await?;
        let translation = body
            .into_iter()
            .next()
            .and_then(|r| r.translations.into_iter().next())
            .ok_or(TranslationError::Empty)?;
        debug!(target, "translation complete");
        Ok(translation.text)
    }
}

async fn api_error(response: reqwest::Response) -> (u16, String) {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = extract_error_message(&text).unwrap_or_else(|| format!("HTTP {status}"));
    (status.as_u16(), message)
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(body).ok()?;
    let error = parsed.error?;
    let message = error.message?;
    match error.code {
        Some(code) => Some(format!("{code}: {message}")),
        None => Some(message),
    }
}
