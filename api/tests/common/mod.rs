#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use contacts_api::application::ports::avatar_storage::{AvatarStorage, StoredAvatar};
use contacts_api::application::ports::contact_repository::{
    ContactRepository, CreateContactError,
};
use contacts_api::application::ports::email_sender::{EmailMessage, EmailSender};
use contacts_api::application::ports::user_cache::UserCache;
use contacts_api::application::services::{passwords, tokens::JwtKeys};
use contacts_api::bootstrap::app_context::{AppContext, AppServices};
use contacts_api::bootstrap::config::Config;
use contacts_api::domain::contacts::contact::{
    Contact, ContactFilter, ContactPatch, ContactProfile, NewContact, UserRole, birthday_key,
};
use contacts_api::infrastructure::storage::fs::FsAvatarStorage;

pub const PASSWORD: &str = "password123";
pub const PEER: ([u8; 4], u16) = ([203, 0, 113, 7], 40000);

#[derive(Default)]
pub struct InMemoryContacts {
    rows: Mutex<Vec<Contact>>,
    stale_email_lookups: AtomicBool,
}

impl InMemoryContacts {
    pub fn all(&self) -> Vec<Contact> {
        self.rows.lock().unwrap().clone()
    }

    /// Makes `find_by_email` report nothing, like a reader racing a
    /// concurrent insert.
    pub fn miss_email_lookups(&self) {
        self.stale_email_lookups.store(true, Ordering::SeqCst);
    }

    fn find(&self, pred: impl Fn(&Contact) -> bool) -> Option<Contact> {
        self.rows.lock().unwrap().iter().find(|c| pred(c)).cloned()
    }

    fn modify(&self, pred: impl Fn(&Contact) -> bool, f: impl FnOnce(&mut Contact)) -> Option<Contact> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|c| pred(c))?;
        f(row);
        row.updated_at = Utc::now();
        Some(row.clone())
    }
}

#[async_trait]
impl ContactRepository for InMemoryContacts {
    async fn list(&self, skip: i64, limit: i64) -> anyhow::Result<Vec<Contact>> {
        Ok(self
            .all()
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Contact>> {
        Ok(self.find(|c| c.id == id))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Contact>> {
        if self.stale_email_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.find(|c| c.email == email))
    }

    async fn find_by_verification_token(&self, token: &str) -> anyhow::Result<Option<Contact>> {
        Ok(self.find(|c| c.verification_token.as_deref() == Some(token)))
    }

    async fn find_by_reset_token(&self, token: &str) -> anyhow::Result<Option<Contact>> {
        Ok(self.find(|c| c.password_reset_token.as_deref() == Some(token)))
    }

    async fn search(&self, filter: &ContactFilter) -> anyhow::Result<Vec<Contact>> {
        Ok(self.all().into_iter().filter(|c| filter.matches(c)).collect())
    }

    async fn birthdays_within(&self, keys: &[String]) -> anyhow::Result<Vec<Contact>> {
        Ok(self
            .all()
            .into_iter()
            .filter(|c| keys.contains(&birthday_key(c.birth_day)))
            .collect())
    }

    async fn create(&self, new: &NewContact) -> Result<Contact, CreateContactError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.email == new.email) {
            return Err(CreateContactError::DuplicateEmail);
        }
        let id = rows.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let contact = Contact {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            role: new.role,
            birth_day: new.birth_day,
            data: new.data.clone(),
            password_hash: new.password_hash.clone(),
            avatar: new.avatar.clone(),
            verified: false,
            verification_token: Some(new.verification_token.clone()),
            password_reset_token: None,
            created_at: now,
            updated_at: now,
        };
        rows.push(contact.clone());
        Ok(contact)
    }

    async fn update(&self, id: i32, patch: &ContactPatch) -> anyhow::Result<Option<Contact>> {
        Ok(self.modify(
            |c| c.id == id,
            |c| {
                if let Some(v) = &patch.first_name {
                    c.first_name = v.clone();
                }
                if let Some(v) = &patch.last_name {
                    c.last_name = v.clone();
                }
                if let Some(v) = &patch.phone {
                    c.phone = v.clone();
                }
                if let Some(v) = patch.birth_day {
                    c.birth_day = v;
                }
                if let Some(v) = &patch.data {
                    c.data = (!v.is_null()).then(|| v.clone());
                }
            },
        ))
    }

    async fn delete(&self, id: i32) -> anyhow::Result<Option<Contact>> {
        let mut rows = self.rows.lock().unwrap();
        let idx = rows.iter().position(|c| c.id == id);
        Ok(idx.map(|i| rows.remove(i)))
    }

    async fn mark_verified(&self, email: &str) -> anyhow::Result<Option<Contact>> {
        Ok(self.modify(
            |c| c.email == email,
            |c| c.verified = true,
        ))
    }

    async fn update_avatar(&self, id: i32, url: &str) -> anyhow::Result<Option<Contact>> {
        Ok(self.modify(|c| c.id == id, |c| c.avatar = Some(url.to_string())))
    }

    async fn issue_reset_token(&self, email: &str, token: &str) -> anyhow::Result<Option<Contact>> {
        Ok(self.modify(
            |c| c.email == email,
            |c| c.password_reset_token = Some(token.to_string()),
        ))
    }

    async fn set_password_by_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<Contact>> {
        Ok(self.modify(
            |c| c.password_reset_token.as_deref() == Some(token),
            |c| {
                c.password_hash = password_hash.to_string();
                c.password_reset_token = None;
            },
        ))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, ContactProfile>>,
}

impl InMemoryCache {
    pub fn get_cached(&self, email: &str) -> Option<ContactProfile> {
        self.entries.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl UserCache for InMemoryCache {
    async fn get(&self, email: &str) -> anyhow::Result<Option<ContactProfile>> {
        Ok(self.get_cached(email))
    }

    async fn put(&self, profile: &ContactProfile) -> anyhow::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(profile.email.clone(), profile.clone());
        Ok(())
    }

    async fn invalidate(&self, email: &str) -> anyhow::Result<()> {
        self.entries.lock().unwrap().remove(email);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAvatars {
    stored: Mutex<Vec<(i32, usize)>>,
}

impl InMemoryAvatars {
    pub fn stored(&self) -> Vec<(i32, usize)> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvatarStorage for InMemoryAvatars {
    async fn store_avatar(
        &self,
        contact_id: i32,
        _original_filename: Option<&str>,
        _content_type: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredAvatar> {
        let mut stored = self.stored.lock().unwrap();
        stored.push((contact_id, bytes.len()));
        let relative_path = format!("avatars/{contact_id}/avatar_{}.png", stored.len());
        Ok(StoredAvatar {
            url: format!("/api/uploads/{relative_path}"),
            relative_path,
            size: bytes.len() as i64,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub cfg: Config,
    pub repo: Arc<InMemoryContacts>,
    pub mailer: Arc<RecordingMailer>,
    pub cache: Arc<InMemoryCache>,
    pub avatars: Arc<InMemoryAvatars>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Stores avatars on disk under `root` and serves them at `/api/uploads`.
    pub fn with_uploads(root: &Path) -> Self {
        Self::build(Some(root))
    }

    fn build(uploads_root: Option<&Path>) -> Self {
        let storage_root = uploads_root.map(|p| p.to_string_lossy().into_owned());
        let cfg = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("integration-test-secret".into()),
            "HOST" => Some("contacts.test".into()),
            "STORAGE_ROOT" => storage_root.clone(),
            _ => None,
        })
        .unwrap();
        let repo = Arc::new(InMemoryContacts::default());
        let mailer = Arc::new(RecordingMailer::default());
        let cache = Arc::new(InMemoryCache::default());
        let avatars = Arc::new(InMemoryAvatars::default());
        let storage: Arc<dyn AvatarStorage> = match uploads_root {
            Some(root) => Arc::new(FsAvatarStorage::new(root, None)),
            None => avatars.clone(),
        };
        let services = AppServices::new(repo.clone(), cache.clone(), storage, mailer.clone());
        let ctx = AppContext::new(cfg.clone(), services);
        let router = contacts_api::presentation::http::router(ctx).unwrap();
        Self {
            router,
            cfg,
            repo,
            mailer,
            cache,
            avatars,
        }
    }

    pub async fn seed(&self, email: &str, verified: bool, role: UserRole) -> Contact {
        let new = NewContact {
            first_name: "Test".into(),
            last_name: "Contact".into(),
            email: email.into(),
            phone: "0501234567".into(),
            role,
            birth_day: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            data: None,
            password_hash: passwords::hash_password(PASSWORD).unwrap(),
            avatar: None,
            verification_token: format!("verify-{email}"),
        };
        let contact = self.repo.create(&new).await.unwrap();
        if verified {
            self.repo.mark_verified(email).await.unwrap().unwrap()
        } else {
            contact
        }
    }

    pub fn token_for(&self, email: &str) -> String {
        JwtKeys::new(self.cfg.jwt_secret.clone(), self.cfg.jwt_expires_secs)
            .issue(email)
            .unwrap()
    }

    pub async fn send_raw(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(req).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::from(PEER)))
        .body(Body::empty())
        .unwrap()
}

pub fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::from(PEER)))
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::from(PEER)))
        .header("content-type", "application/json");
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::from(PEER)));
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Replaces the peer address the request appears to come from.
pub fn from_peer(mut req: Request<Body>, addr: SocketAddr) -> Request<Body> {
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}
