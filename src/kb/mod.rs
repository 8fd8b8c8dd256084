pub mod types;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Credentials;
use types::{ErrorResponse, QueryRequest, QueryResponse};

const API_VERSION: &str = "2021-10-01";

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("knowledge base error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// One candidate answer, in the relevance order the knowledge base
/// returned it.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub confidence: f64,
}

/// Abstraction over knowledge-base retrieval.
/// Implemented by `KnowledgeBaseClient` for production; scripted mocks
/// stand in for it in session tests.
pub trait AnswerSource {
    async fn answers(&self, question: &str) -> Result<Vec<Answer>, RetrievalError>;
}

#[derive(Clone)]
pub struct KnowledgeBaseClient {
    http: Client,
    key: String,
    base_url: String,
    project: String,
    deployment: String,
}

impl KnowledgeBaseClient {
    pub fn new(http: Client, credentials: &Credentials, project: &str, deployment: &str) -> Self {
        Self {
            http,
            key: credentials.kb_key.clone(),
            base_url: credentials
                .kb_endpoint
                .as_str()
                .trim_end_matches('/')
                .to_string(),
            project: project.to_string(),
            deployment: deployment.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            key: "test-key".to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            project: "TestProject".to_string(),
            deployment: "test".to_string(),
        }
    }
}

impl AnswerSource for KnowledgeBaseClient {
    async fn answers(&self, question: &str) -> Result<Vec<Answer>, RetrievalError> {
        let url = format!("{}/language/:query-knowledgebases", self.base_url);

        let response = self
            .http
            .post(&url)
            .query(&[
                ("projectName", self.project.as_str()),
                ("deploymentName", self.deployment.as_str()),
                ("api-version", API_VERSION),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("User-Agent", crate::USER_AGENT)
            .json(&QueryRequest { question })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = extract_error_message(&text)
                .unwrap_or_else(|| format!("HTTP {status}: {}", snippet(&text)));
            warn!(code = status.as_u16(), "knowledge base query failed");
            return Err(RetrievalError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: QueryResponse = response.json().await?;
        debug!(
            project = %self.project,
            answers = body.answers.len(),
            "knowledge base query complete"
        );

        Ok(body
            .answers
            .into_iter()
            .map(|a| Answer {
                text: a.answer,
                confidence: a.confidence_score.unwrap_or(0.0),
            })
            .collect())
    }
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

fn snippet(text: &str) -> &str {
    const MAX: usize = 200;
    if text.len() <= MAX {
        return text;
    }
    let mut end = MAX;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
