use async_trait::async_trait;

use crate::domain::contacts::contact::{Contact, ContactFilter, ContactPatch, NewContact};

#[derive(Debug, thiserror::Error)]
pub enum CreateContactError {
    #[error("email is already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn list(&self, skip: i64, limit: i64) -> anyhow::Result<Vec<Contact>>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Contact>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Contact>>;
    async fn find_by_verification_token(&self, token: &str) -> anyhow::Result<Option<Contact>>;
    async fn find_by_reset_token(&self, token: &str) -> anyhow::Result<Option<Contact>>;
    async fn search(&self, filter: &ContactFilter) -> anyhow::Result<Vec<Contact>>;
    /// Contacts whose birthday month-day (`MM-DD`) is one of `keys`.
    async fn birthdays_within(&self, keys: &[String]) -> anyhow::Result<Vec<Contact>>;
    async fn create(&self, new: &NewContact) -> Result<Contact, CreateContactError>;
    async fn update(&self, id: i32, patch: &ContactPatch) -> anyhow::Result<Option<Contact>>;
    async fn delete(&self, id: i32) -> anyhow::Result<Option<Contact>>;
    async fn mark_verified(&self, email: &str) -> anyhow::Result<Option<Contact>>;
    async fn update_avatar(&self, id: i32, url: &str) -> anyhow::Result<Option<Contact>>;
    async fn issue_reset_token(&self, email: &str, token: &str)
    -> anyhow::Result<Option<Contact>>;
    /// Replaces the password of the contact holding `token` and consumes the token.
    async fn set_password_by_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<Contact>>;
}
