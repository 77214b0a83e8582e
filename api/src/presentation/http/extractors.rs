use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use axum::response::Response;

use crate::application::errors::AppError;
use crate::application::use_cases::auth::me::CurrentContact;
use crate::bootstrap::app_context::AppContext;
use crate::domain::contacts::contact::Contact;
use crate::presentation::http::error;

/// JSON body whose rejections surface as 422 `{"detail"}` responses.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| {
                let (scheme, token) = auth.split_once(' ')?;
                scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
            })
            .filter(|t| !t.is_empty());
        match token {
            Some(t) => Ok(Bearer(t.to_string())),
            None => Err(error::unauthorized("Not authenticated")),
        }
    }
}

/// The contact owning the bearer token.
pub struct AuthContact(pub Contact);

#[axum::async_trait]
impl FromRequestParts<AppContext> for AuthContact {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        use axum::response::IntoResponse;

        let Bearer(token) = Bearer::from_request_parts(parts, ctx).await?;
        let repo = ctx.contact_repo();
        let keys = ctx.jwt_keys();
        let uc = CurrentContact {
            repo: repo.as_ref(),
            keys: &keys,
        };
        uc.execute(&token)
            .await
            .map(AuthContact)
            .map_err(IntoResponse::into_response)
    }
}

/// An authenticated contact with the admin role.
pub struct AdminContact(pub Contact);

#[axum::async_trait]
impl FromRequestParts<AppContext> for AdminContact {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        use axum::response::IntoResponse;

        let AuthContact(contact) = AuthContact::from_request_parts(parts, ctx).await?;
        if !contact.is_admin() {
            return Err(AppError::Forbidden.into_response());
        }
        Ok(AdminContact(contact))
    }
}
