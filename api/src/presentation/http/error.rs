use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::errors::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RateLimited {
    pub error: String,
}

pub const RATE_LIMIT_MESSAGE: &str = "rate limit exceeded. Try again later";

pub fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDetail {
            detail: message.into(),
        }),
    )
        .into_response()
}

pub fn unauthorized(message: &str) -> Response {
    let mut resp = detail(StatusCode::UNAUTHORIZED, message);
    resp.headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    resp
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => detail(StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => unauthorized("Could not validate credentials"),
            AppError::Forbidden => detail(StatusCode::FORBIDDEN, "Forbidden"),
            AppError::NotFound(msg) => detail(StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => detail(StatusCode::CONFLICT, msg),
            AppError::Validation(msg) => detail(StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "request_failed");
                detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Replaces the limiter's plain-text 429 with the JSON body clients expect.
pub async fn rate_limit_body(resp: Response) -> Response {
    if resp.status() != StatusCode::TOO_MANY_REQUESTS {
        return resp;
    }
    let (mut parts, _) = resp.into_parts();
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    let body = Json(RateLimited {
        error: RATE_LIMIT_MESSAGE.into(),
    });
    (parts, body).into_response()
}
