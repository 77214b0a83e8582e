use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use utoipa::{IntoParams, ToSchema};

use crate::application::errors::{AppError, AppResult};
use crate::application::services::validation;
use crate::application::use_cases::auth::me::CachedProfile;
use crate::application::use_cases::contacts::{
    delete_contact::DeleteContact,
    get_contact::GetContact,
    list_contacts::{DEFAULT_LIMIT, ListContacts},
    request_password_reset::RequestPasswordReset,
    search_contacts::SearchContacts,
    sign_up::{SignUp, SignUpRequest},
    update_avatar::{AvatarUpload, UpdateAvatar},
    update_contact::UpdateContact,
    upcoming_birthdays::{DEFAULT_WINDOW_DAYS, UpcomingBirthdays},
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::contacts::contact::{
    Contact, ContactFilter, ContactPatch, ContactProfile, UserRole,
};
use crate::presentation::http::error;
use crate::presentation::http::extractors::{
    AdminContact, ApiJson, ApiPath, ApiQuery, AuthContact, Bearer,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub birth_day: NaiveDate,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub avatar: Option<String>,
}

impl From<ContactProfile> for ContactResponse {
    fn from(p: ContactProfile) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            phone: p.phone,
            role: p.role,
            birth_day: p.birth_day,
            data: p.data,
            avatar: p.avatar,
        }
    }
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        c.profile().into()
    }
}

fn to_list(rows: Vec<Contact>) -> Json<Vec<ContactResponse>> {
    Json(rows.into_iter().map(ContactResponse::from).collect())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ContactCreateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub birth_day: NaiveDate,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

impl ContactCreateRequest {
    fn validate(&self) -> Result<(), String> {
        validation::name("first_name", &self.first_name)?;
        validation::name("last_name", &self.last_name)?;
        validation::email(&self.email)?;
        validation::phone(&self.phone)?;
        validation::password(&self.password)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ContactUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub birth_day: Option<NaiveDate>,
    /// An explicit `null` clears the stored data; omitting the field keeps it.
    #[serde(default, deserialize_with = "present_value")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl ContactUpdateRequest {
    fn into_patch(self) -> Result<ContactPatch, String> {
        if let Some(v) = &self.first_name {
            validation::name("first_name", v)?;
        }
        if let Some(v) = &self.last_name {
            validation::name("last_name", v)?;
        }
        if let Some(v) = &self.phone {
            validation::phone(v)?;
        }
        Ok(ContactPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            birth_day: self.birth_day,
            data: self.data,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct AvatarMultipart {
    #[schema(value_type = String, format = Binary)]
    file: String,
}

pub fn routes(ctx: AppContext) -> anyhow::Result<Router> {
    // Limits key on the peer address; forwarding headers are client-controlled.
    // 10 requests per minute per client address.
    let me_limit = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .use_headers()
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit for /contacts/me"))?;
    // One request per minute per client address.
    let reset_limit = GovernorConfigBuilder::default()
        .per_second(60)
        .burst_size(1)
        .use_headers()
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit for /contacts/reset-password"))?;

    let limited_me = Router::new()
        .route("/contacts/me", get(me))
        .layer(GovernorLayer {
            config: Arc::new(me_limit),
        })
        .layer(middleware::map_response(error::rate_limit_body));
    let limited_reset = Router::new()
        .route("/contacts/reset-password/:email", post(reset_password))
        .layer(GovernorLayer {
            config: Arc::new(reset_limit),
        })
        .layer(middleware::map_response(error::rate_limit_body));

    let upload_limit = ctx.cfg.upload_max_bytes;
    Ok(Router::new()
        .route("/contacts", get(list_contacts))
        .route("/contacts/", get(list_contacts))
        .route("/contacts/search", get(search_contacts))
        .route("/contacts/soon_celebrate", get(soon_celebrate))
        .route("/contacts/signup", post(signup))
        .route(
            "/contacts/avatar",
            patch(update_avatar).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/contacts/:contact_id",
            get(get_contact).patch(update_contact).delete(delete_contact),
        )
        .merge(limited_me)
        .merge(limited_reset)
        .with_state(ctx))
}

#[utoipa::path(get, path = "/api/contacts", tag = "Contacts",
    params(ListQuery),
    responses((status = 200, body = [ContactResponse])))]
pub async fn list_contacts(
    State(ctx): State<AppContext>,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> AppResult<Json<Vec<ContactResponse>>> {
    let repo = ctx.contact_repo();
    let uc = ListContacts {
        repo: repo.as_ref(),
    };
    let rows = uc
        .execute(q.skip.unwrap_or(0), q.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(to_list(rows))
}

#[utoipa::path(get, path = "/api/contacts/search", tag = "Contacts",
    params(SearchQuery),
    responses(
        (status = 200, body = [ContactResponse]),
        (status = 400, body = error::ErrorDetail)
    ))]
pub async fn search_contacts(
    State(ctx): State<AppContext>,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> AppResult<Json<Vec<ContactResponse>>> {
    let repo = ctx.contact_repo();
    let uc = SearchContacts {
        repo: repo.as_ref(),
    };
    let filter = ContactFilter::new(q.first_name, q.last_name, q.email);
    Ok(to_list(uc.execute(&filter).await?))
}

#[utoipa::path(get, path = "/api/contacts/soon_celebrate", tag = "Contacts",
    responses((status = 200, body = [ContactResponse])))]
pub async fn soon_celebrate(
    State(ctx): State<AppContext>,
) -> AppResult<Json<Vec<ContactResponse>>> {
    let repo = ctx.contact_repo();
    let uc = UpcomingBirthdays {
        repo: repo.as_ref(),
    };
    let today = chrono::Utc::now().date_naive();
    Ok(to_list(uc.execute(today, DEFAULT_WINDOW_DAYS).await?))
}

#[utoipa::path(post, path = "/api/contacts/signup", tag = "Contacts",
    request_body = ContactCreateRequest,
    responses(
        (status = 201, body = ContactResponse),
        (status = 409, body = error::ErrorDetail),
        (status = 422, body = error::ErrorDetail)
    ))]
pub async fn signup(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<ContactCreateRequest>,
) -> AppResult<(StatusCode, Json<ContactResponse>)> {
    req.validate().map_err(AppError::Validation)?;
    let repo = ctx.contact_repo();
    let mailer = ctx.email_sender();
    let uc = SignUp {
        repo: repo.as_ref(),
        mailer: mailer.as_ref(),
        host: &ctx.cfg.host,
    };
    let contact = uc
        .execute(SignUpRequest {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            role: req.role.unwrap_or_default(),
            birth_day: req.birth_day,
            data: req.data,
            password: req.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[utoipa::path(get, path = "/api/contacts/me", tag = "Contacts",
    responses(
        (status = 200, body = ContactResponse),
        (status = 401, body = error::ErrorDetail),
        (status = 429, body = error::RateLimited)
    ))]
pub async fn me(
    State(ctx): State<AppContext>,
    Bearer(token): Bearer,
) -> AppResult<Json<ContactResponse>> {
    let repo = ctx.contact_repo();
    let cache = ctx.user_cache();
    let keys = ctx.jwt_keys();
    let uc = CachedProfile {
        repo: repo.as_ref(),
        cache: cache.as_ref(),
        keys: &keys,
    };
    Ok(Json(uc.execute(&token).await?.into()))
}

#[utoipa::path(post, path = "/api/contacts/reset-password/{email}", tag = "Contacts",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 204, description = "Reset mail sent when the account exists"),
        (status = 429, body = error::RateLimited)
    ))]
pub async fn reset_password(
    State(ctx): State<AppContext>,
    ApiPath(email): ApiPath<String>,
) -> AppResult<StatusCode> {
    let repo = ctx.contact_repo();
    let mailer = ctx.email_sender();
    let uc = RequestPasswordReset {
        repo: repo.as_ref(),
        mailer: mailer.as_ref(),
        host: &ctx.cfg.host,
    };
    uc.execute(email.trim()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/contacts/{contact_id}", tag = "Contacts",
    params(("contact_id" = i32, Path, description = "Contact ID")),
    responses(
        (status = 200, body = ContactResponse),
        (status = 404, body = error::ErrorDetail)
    ))]
pub async fn get_contact(
    State(ctx): State<AppContext>,
    ApiPath(contact_id): ApiPath<i32>,
) -> AppResult<Json<ContactResponse>> {
    let repo = ctx.contact_repo();
    let uc = GetContact {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(contact_id).await?.into()))
}

#[utoipa::path(patch, path = "/api/contacts/{contact_id}", tag = "Contacts",
    params(("contact_id" = i32, Path, description = "Contact ID")),
    request_body = ContactUpdateRequest,
    responses(
        (status = 201, body = ContactResponse),
        (status = 401, body = error::ErrorDetail),
        (status = 403, body = error::ErrorDetail),
        (status = 404, body = error::ErrorDetail)
    ))]
pub async fn update_contact(
    State(ctx): State<AppContext>,
    AuthContact(actor): AuthContact,
    ApiPath(contact_id): ApiPath<i32>,
    ApiJson(req): ApiJson<ContactUpdateRequest>,
) -> AppResult<(StatusCode, Json<ContactResponse>)> {
    let patch = req.into_patch().map_err(AppError::Validation)?;
    let repo = ctx.contact_repo();
    let cache = ctx.user_cache();
    let uc = UpdateContact {
        repo: repo.as_ref(),
        cache: cache.as_ref(),
    };
    let contact = uc.execute(&actor, contact_id, &patch).await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[utoipa::path(delete, path = "/api/contacts/{contact_id}", tag = "Contacts",
    params(("contact_id" = i32, Path, description = "Contact ID")),
    responses(
        (status = 204),
        (status = 401, body = error::ErrorDetail),
        (status = 403, body = error::ErrorDetail),
        (status = 404, body = error::ErrorDetail)
    ))]
pub async fn delete_contact(
    State(ctx): State<AppContext>,
    AuthContact(actor): AuthContact,
    ApiPath(contact_id): ApiPath<i32>,
) -> AppResult<StatusCode> {
    let repo = ctx.contact_repo();
    let cache = ctx.user_cache();
    let uc = DeleteContact {
        repo: repo.as_ref(),
        cache: cache.as_ref(),
    };
    uc.execute(&actor, contact_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(patch, path = "/api/contacts/avatar", tag = "Contacts",
    request_body(content = AvatarMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = ContactResponse),
        (status = 403, body = error::ErrorDetail),
        (status = 422, body = error::ErrorDetail)
    ))]
pub async fn update_avatar(
    State(ctx): State<AppContext>,
    AdminContact(actor): AdminContact,
    mut multipart: Multipart,
) -> AppResult<Json<ContactResponse>> {
    let mut upload: Option<AvatarUpload> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        upload = Some(AvatarUpload {
            bytes: bytes.to_vec(),
            filename,
            content_type,
        });
        break;
    }
    let upload = upload.ok_or_else(|| AppError::validation("file is required"))?;

    let repo = ctx.contact_repo();
    let storage = ctx.avatar_storage();
    let cache = ctx.user_cache();
    let uc = UpdateAvatar {
        repo: repo.as_ref(),
        storage: storage.as_ref(),
        cache: cache.as_ref(),
    };
    Ok(Json(uc.execute(&actor, upload).await?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(email: &str, phone: &str, password: &str) -> ContactCreateRequest {
        ContactCreateRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            phone: phone.into(),
            password: password.into(),
            birth_day: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            role: None,
            data: None,
        }
    }

    #[test]
    fn create_request_checks_every_field() {
        assert!(create_request("ada@example.com", "+38050123456", "secret123")
                .validate()
                .is_ok());
        assert!(create_request("not-an-email", "0501234567", "secret123").validate().is_err());
        assert!(create_request("ada@example.com", "12ab", "secret123").validate().is_err());
        assert!(create_request("ada@example.com", "0501234567", "short").validate().is_err());
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        let patch = ContactUpdateRequest {
            last_name: Some("Byron".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.last_name.as_deref(), Some("Byron"));
        assert!(patch.first_name.is_none());

        let err = ContactUpdateRequest {
            first_name: Some("  ".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap_err();
        assert!(err.contains("first_name"));
    }

    #[test]
    fn explicit_null_data_differs_from_missing_data() {
        let cleared: ContactUpdateRequest =
            serde_json::from_value(serde_json::json!({"data": null})).unwrap();
        assert_eq!(cleared.data, Some(serde_json::Value::Null));

        let untouched: ContactUpdateRequest =
            serde_json::from_value(serde_json::json!({"last_name": "Byron"})).unwrap();
        assert!(untouched.data.is_none());
    }
}
