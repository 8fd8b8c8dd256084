use serde::{Deserialize, Serialize};

/// Both endpoints take the same body shape: a one-element array of
/// `{"Text": ...}` objects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextItem<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct DetectedLanguage {
    pub language: String,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TranslationResult {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
pub struct Translation {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceError {
    pub code: Option<i64>,
    pub message: Option<String>,
}
