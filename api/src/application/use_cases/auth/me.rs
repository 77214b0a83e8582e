use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::ContactRepository;
use crate::application::ports::user_cache::UserCache;
use crate::application::services::tokens::JwtKeys;
use crate::domain::contacts::contact::{Contact, ContactProfile};

/// Resolves the contact behind a bearer token.
pub struct CurrentContact<'a, R: ContactRepository + ?Sized> {
    pub repo: &'a R,
    pub keys: &'a JwtKeys,
}

impl<'a, R: ContactRepository + ?Sized> CurrentContact<'a, R> {
    pub async fn execute(&self, token: &str) -> AppResult<Contact> {
        let email = self.keys.subject(token).ok_or(AppError::Unauthorized)?;
        self.repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Same as [`CurrentContact`] but answers from the profile cache when it can.
pub struct CachedProfile<'a, R, C>
where
    R: ContactRepository + ?Sized,
    C: UserCache + ?Sized,
{
    pub repo: &'a R,
    pub cache: &'a C,
    pub keys: &'a JwtKeys,
}

impl<'a, R, C> CachedProfile<'a, R, C>
where
    R: ContactRepository + ?Sized,
    C: UserCache + ?Sized,
{
    pub async fn execute(&self, token: &str) -> AppResult<ContactProfile> {
        let email = self.keys.subject(token).ok_or(AppError::Unauthorized)?;
        match self.cache.get(&email).await {
            Ok(Some(profile)) => return Ok(profile),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = ?err, "profile_cache_read_failed"),
        }
        let contact = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)?;
        let profile = contact.profile();
        if let Err(err) = self.cache.put(&profile).await {
            tracing::warn!(error = ?err, "profile_cache_write_failed");
        }
        Ok(profile)
    }
}
