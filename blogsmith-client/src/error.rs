use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
    #[error("invalid public path: {0}")]
    InvalidPublicPath(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("generation service failed: {0}")]
    Upstream(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "message")]
    error: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

impl ClientError {
    /// Classifies a non-success response by the server's error `kind`,
    /// falling back to the status code.
    pub(crate) async fn from_http_response(resp: Response) -> Self {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Self::classify(status, &text)
    }

    fn classify(status: StatusCode, text: &str) -> Self {
        let body: Option<ErrorBody> = serde_json::from_str(text).ok();
        let kind = body.as_ref().and_then(|b| b.kind.clone());
        let message = body
            .and_then(|b| b.error)
            .unwrap_or_else(|| text.to_string());

        match (kind.as_deref(), status) {
            (Some("not_found"), _) | (None, StatusCode::NOT_FOUND) => ClientError::NotFound(message),
            (Some("validation_failure"), _) | (None, StatusCode::BAD_REQUEST) => {
                ClientError::Validation(message)
            }
            (Some("conflict"), _) | (None, StatusCode::CONFLICT) => ClientError::Conflict(message),
            (Some("upstream_failure"), _) | (None, StatusCode::BAD_GATEWAY) => {
                ClientError::Upstream(message)
            }
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}
