use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answers: Vec<KbAnswer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KbAnswer {
    pub answer: String,
    pub confidence_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceError {
    pub code: Option<String>,
    pub message: Option<String>,
}
