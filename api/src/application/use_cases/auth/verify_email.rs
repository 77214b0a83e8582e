use crate::application::errors::{AppError, AppResult};
use crate::application::ports::contact_repository::ContactRepository;

pub struct VerifyEmail<'a, R: ContactRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ContactRepository + ?Sized> VerifyEmail<'a, R> {
    pub async fn execute(&self, token: &str) -> AppResult<()> {
        let contact = self
            .repo
            .find_by_verification_token(token)
            .await?
            .ok_or_else(|| AppError::bad_request("Verification failed"))?;
        if contact.verified {
            return Err(AppError::bad_request("Email already verified"));
        }
        self.repo.mark_verified(&contact.email).await?;
        tracing::info!(contact_id = contact.id, "email_verified");
        Ok(())
    }
}
