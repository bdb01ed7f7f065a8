use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("blog not found: {0}")]
    BlogNotFound(Uuid),
    #[error("template not found: {0}")]
    TemplateNotFound(Uuid),
    #[error("no public blog for author '{author}' and topic '{topic}'")]
    PublicBlogNotFound { author: String, topic: String },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("generation service failed: {0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable classification reported to clients next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::BlogNotFound(_)
            | DomainError::TemplateNotFound(_)
            | DomainError::PublicBlogNotFound { .. } => "not_found",
            DomainError::Validation(_) => "validation_failure",
            DomainError::Conflict(_) => "conflict",
            DomainError::Upstream(_) => "upstream_failure",
            DomainError::Internal(_) => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::BlogNotFound(_)
            | DomainError::TemplateNotFound(_)
            | DomainError::PublicBlogNotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Upstream(_) => StatusCode::BAD_GATEWAY,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let details = match self {
            DomainError::BlogNotFound(resource) | DomainError::TemplateNotFound(resource) => {
                Some(json!({ "resource": resource }))
            }
            DomainError::PublicBlogNotFound { author, topic } => {
                Some(json!({ "author": author, "topic": topic }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            kind: self.kind(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
