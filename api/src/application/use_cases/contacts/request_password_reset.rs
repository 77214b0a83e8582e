use serde_json::json;

use crate::application::errors::AppResult;
use crate::application::ports::contact_repository::ContactRepository;
use crate::application::ports::email_sender::{EmailMessage, EmailSender};
use crate::application::services::tokens;

pub struct RequestPasswordReset<'a, R, M>
where
    R: ContactRepository + ?Sized,
    M: EmailSender + ?Sized,
{
    pub repo: &'a R,
    pub mailer: &'a M,
    pub host: &'a str,
}

impl<'a, R, M> RequestPasswordReset<'a, R, M>
where
    R: ContactRepository + ?Sized,
    M: EmailSender + ?Sized,
{
    /// Unknown addresses succeed silently so the endpoint cannot be used to
    /// probe for accounts.
    pub async fn execute(&self, email: &str) -> AppResult<()> {
        let token = tokens::random_token();
        let Some(contact) = self.repo.issue_reset_token(email, &token).await? else {
            tracing::debug!("password_reset_unknown_email");
            return Ok(());
        };
        let message = EmailMessage {
            to: contact.email.clone(),
            subject: "Reset password".into(),
            template: "reset_password".into(),
            context: json!({
                "token": token,
                "host": self.host,
                "first_name": contact.first_name,
            }),
        };
        if let Err(err) = self.mailer.send(&message).await {
            tracing::warn!(contact_id = contact.id, error = ?err, "reset_email_failed");
        }
        Ok(())
    }
}
