use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::errors::{AppError, AppResult};
use crate::application::services::validation;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::set_password::SetPassword;
use crate::application::use_cases::auth::verify_email::VerifyEmail;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::extractors::{ApiJson, ApiPath};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordSetRequest {
    pub password: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify/:token", get(verify))
        .route("/auth/set-password/:token", post(set_password))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, responses(
    (status = 200, body = TokenResponse),
    (status = 400, body = crate::presentation::http::error::ErrorDetail),
    (status = 422, body = crate::presentation::http::error::ErrorDetail)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = req.email.trim();
    validation::email(email).map_err(AppError::Validation)?;
    validation::password_max_len(&req.password).map_err(AppError::Validation)?;
    let repo = ctx.contact_repo();
    let keys = ctx.jwt_keys();
    let uc = LoginUc {
        repo: repo.as_ref(),
        keys: &keys,
    };
    let dto = LoginDto {
        email: email.to_string(),
        password: req.password,
    };
    let issued = uc.execute(&dto).await?;
    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        token_type: issued.token_type.to_string(),
    }))
}

#[utoipa::path(get, path = "/api/auth/verify/{token}", tag = "Auth",
    params(("token" = String, Path, description = "Verification token from the welcome mail")),
    responses(
        (status = 200, body = String),
        (status = 400, body = crate::presentation::http::error::ErrorDetail)
    ))]
pub async fn verify(
    State(ctx): State<AppContext>,
    ApiPath(token): ApiPath<String>,
) -> AppResult<Json<&'static str>> {
    let repo = ctx.contact_repo();
    let uc = VerifyEmail {
        repo: repo.as_ref(),
    };
    uc.execute(&token).await?;
    Ok(Json("Verified"))
}

#[utoipa::path(post, path = "/api/auth/set-password/{token}", tag = "Auth",
    params(("token" = String, Path, description = "Reset token from the reset mail")),
    request_body = PasswordSetRequest,
    responses(
        (status = 204),
        (status = 400, body = crate::presentation::http::error::ErrorDetail),
        (status = 422, body = crate::presentation::http::error::ErrorDetail)
    ))]
pub async fn set_password(
    State(ctx): State<AppContext>,
    ApiPath(token): ApiPath<String>,
    ApiJson(req): ApiJson<PasswordSetRequest>,
) -> AppResult<StatusCode> {
    validation::password(&req.password).map_err(AppError::Validation)?;
    let repo = ctx.contact_repo();
    let uc = SetPassword {
        repo: repo.as_ref(),
    };
    uc.execute(&token, &req.password).await?;
    Ok(StatusCode::NO_CONTENT)
}
