use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::ContactRepository;
use crate::application::services::passwords;

pub struct SetPassword<'a, R: ContactRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ContactRepository + ?Sized> SetPassword<'a, R> {
    pub async fn execute(&self, reset_token: &str, password: &str) -> AppResult<()> {
        let hash = passwords::hash_password(password)?;
        let contact = self
            .repo
            .set_password_by_reset_token(reset_token, &hash)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid reset token"))?;
        tracing::info!(contact_id = contact.id, "password_reset_completed");
        Ok(())
    }
}
