//! Error types shared across the crate

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Snapshot of an unsuccessful HTTP response.
///
/// Captured whenever a response's status falls outside the 2xx family, so
/// the caller can inspect what the endpoint actually said. The body is
/// fully read before the error is constructed.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ErrorResponse {
    pub(crate) async fn capture(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        Self {
            status,
            headers,
            body,
        }
    }
}

/// Core error type for oxilink operations
#[derive(Debug, thiserror::Error)]
pub enum OxilinkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unsuccessful response: {}", .0.status)]
    UnexpectedResponse(ErrorResponse),
    #[error("query type mismatch: expected {expected}, got {actual}")]
    QueryTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("serialization error: {0}")]
    Serialize(String),
    #[error("query evaluation error: {0}")]
    Query(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("no acceptable media type for: {0}")]
    NotAcceptable(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OxilinkError {
    /// The captured response, if this is a client-protocol error.
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::UnexpectedResponse(response) => Some(response),
            _ => None,
        }
    }
}

impl From<oxigraph::sparql::EvaluationError> for OxilinkError {
    fn from(e: oxigraph::sparql::EvaluationError) -> Self {
        Self::Query(e.to_string())
    }
}

impl From<oxigraph::store::StorageError> for OxilinkError {
    fn from(e: oxigraph::store::StorageError) -> Self {
        Self::Store(e.to_string())
    }
}

impl From<oxigraph::io::RdfParseError> for OxilinkError {
    fn from(e: oxigraph::io::RdfParseError) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<sparesults::QueryResultsParseError> for OxilinkError {
    fn from(e: sparesults::QueryResultsParseError) -> Self {
        Self::Parse(e.to_string())
    }
}
